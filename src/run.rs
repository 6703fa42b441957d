use crate::configuration::Settings;
use crate::error::FetchError;
use crate::models::{DownloadItem, RemoteLocator};
use crate::source::{collect_items, Source};
use crate::wiki::{http_client, WikiClient};
use log::{debug, error, info, warn};
use resolve_path::PathResolveExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Result of materializing one item.
#[derive(Debug)]
pub enum Outcome {
    /// Freshly written, with its size in bytes.
    Downloaded(u64),
    /// Already on disk, with the existing size in bytes.
    Skipped(u64),
    Failed(FetchError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Downloaded(_) => self.downloaded += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    /// Items that are on disk after the run.
    pub fn present(&self) -> usize {
        self.downloaded + self.skipped
    }
}

/// Fetches items one at a time into `output_dir`, skipping files that already exist.
pub struct Fetcher {
    wiki: WikiClient,
    output_dir: PathBuf,
    delay: Duration,
}

impl Fetcher {
    pub fn new(wiki: WikiClient, output_dir: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            wiki,
            output_dir: output_dir.into(),
            delay,
        }
    }

    pub async fn fetch_all(&self, items: &[DownloadItem]) -> Summary {
        let mut summary = Summary::default();
        let total = items.len();

        for (idx, item) in items.iter().enumerate() {
            info!("[{}/{}] {}", idx + 1, total, item.label);

            let outcome = self.fetch_one(item).await;
            match &outcome {
                Outcome::Downloaded(size) => info!("   downloaded ({:.1} KB)", kb(*size)),
                Outcome::Skipped(size) => info!("   already exists ({:.1} KB)", kb(*size)),
                Outcome::Failed(e) => error!("   failed: {}", e),
            }
            summary.record(&outcome);

            // Only throttle after we actually hit the network
            let hit_network = !matches!(outcome, Outcome::Skipped(_));
            if hit_network && idx + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        summary
    }

    pub async fn fetch_one(&self, item: &DownloadItem) -> Outcome {
        let path = self.output_dir.join(&item.local_name);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                debug!("{} exists, skipping", path.display());
                return Outcome::Skipped(meta.len());
            }
            Ok(_) => warn!("{} exists but is not a file", path.display()),
            Err(_) => {}
        }

        match self.download(item, &path).await {
            Ok(size) => Outcome::Downloaded(size),
            Err(e) => Outcome::Failed(e),
        }
    }

    async fn resolve(&self, item: &DownloadItem) -> Result<Url, FetchError> {
        match &item.remote {
            RemoteLocator::Url(url) => Ok(url.clone()),
            RemoteLocator::WikiFile(file) => self
                .wiki
                .image_url(file)
                .await?
                .ok_or_else(|| FetchError::LookupMiss(item.remote.to_string())),
        }
    }

    async fn download(&self, item: &DownloadItem, path: &Path) -> Result<u64, FetchError> {
        let url = self.resolve(item).await?;
        debug!("Getting {}", url);
        let mut response = self
            .wiki
            .http()
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let partial = partial_path(path);
        let written = match write_body(&mut response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if let Err(source) = fs::rename(&partial, path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(FetchError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(written)
    }
}

async fn write_body(response: &mut reqwest::Response, path: &Path) -> Result<u64, FetchError> {
    let io_err = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).await.map_err(io_err)?;
    let mut written = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;

    Ok(written)
}

/// `cap_collector.png` -> `cap_collector.png.part`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

/// Resolves when `signal` reports an interrupt. If the handler could not be
/// installed this logs the error and never resolves, so the run carries on.
pub async fn interrupted<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

pub async fn run(settings: &Settings, source: Source) -> anyhow::Result<Summary> {
    let base_path = settings.output_directory.try_resolve()?.into_owned();
    info!("Output Directory: {}", base_path.display());
    fs::create_dir_all(&base_path).await?;

    let wiki = WikiClient::new(http_client(settings)?, settings.wiki.api_url());
    let listing = collect_items(source, &wiki, settings).await;
    info!(
        "Fetching {} images from {}",
        listing.items.len(),
        listing.origin
    );

    let fetcher = Fetcher::new(wiki, &base_path, settings.inter_item_delay());
    let summary = fetcher.fetch_all(&listing.items).await;

    report(&summary, &base_path, settings);
    Ok(summary)
}

fn report(summary: &Summary, base_path: &Path, settings: &Settings) {
    info!("Downloaded:     {}", summary.downloaded);
    info!("Already there:  {}", summary.skipped);
    info!("Failed:         {}", summary.failed);
    info!("Total:          {} / {}", summary.present(), summary.total());
    info!("Location:       {}", base_path.display());

    if summary.failed > 0 {
        warn!("Some images failed. Running again only retries the missing ones.");
        warn!(
            "They can also be saved by hand from {}",
            settings.wiki.category_url()
        );
    }
}
