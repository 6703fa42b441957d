use std::path::PathBuf;
use thiserror::Error;

/// Why a single item could not be materialized. Never aborts the batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no image url found for {0}")]
    LookupMiss(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a catalog could not be enumerated. Callers fall back to the static catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("category page unusable: {0}")]
    Environment(String),

    #[error("unexpected api response: {0}")]
    Malformed(String),
}
