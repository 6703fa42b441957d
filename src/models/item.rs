use std::fmt;
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];
const DEFAULT_EXTENSION: &str = "png";
const FILE_NAMESPACE: &str = "File:";
const SYSTEM_PREFIX: &str = "2d20_";

/// Where the bytes for an item come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLocator {
    /// A directly fetchable image URL.
    Url(Url),
    /// A wiki file title (without the `File:` namespace) whose URL must be looked up.
    WikiFile(String),
}

/// One remote image and the file it becomes on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub label: String,
    pub remote: RemoteLocator,
    pub local_name: String,
}

impl DownloadItem {
    pub fn from_url(label: impl Into<String>, url: Url, local_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            remote: RemoteLocator::Url(url),
            local_name: local_name.into(),
        }
    }

    /// Builds an item from a wiki title such as `File:2D20 Action Boy.png`.
    pub fn from_wiki_title(title: &str) -> Self {
        let file = strip_namespace(title);
        Self {
            label: display_name(file),
            remote: RemoteLocator::WikiFile(file.to_string()),
            local_name: sanitize_filename(file),
        }
    }
}

impl fmt::Display for RemoteLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteLocator::Url(url) => write!(f, "{}", url),
            RemoteLocator::WikiFile(name) => write!(f, "{}{}", FILE_NAMESPACE, name),
        }
    }
}

/// Normalizes a wiki image name into a local filename.
///
/// Drops the `File:` namespace and the `2D20_` prefix, removes apostrophes,
/// exclamation marks and periods, turns spaces and slashes into underscores,
/// lowercases, and always ends in an image extension (`.png` unless the name
/// already carries a known one).
pub fn sanitize_filename(name: &str) -> String {
    let (stem, ext) = split_image_extension(strip_namespace(name));
    let stem: String = stem
        .chars()
        .filter(|c| !matches!(c, '\'' | '!' | '.'))
        .map(|c| if c == ' ' || c == '/' { '_' } else { c })
        .collect::<String>()
        .to_lowercase();
    let stem = stem.strip_prefix(SYSTEM_PREFIX).unwrap_or(&stem);

    format!("{}.{}", stem, ext)
}

/// Human readable name for progress output: `2D20_Cap Collector.png` -> `Cap Collector`.
pub fn display_name(name: &str) -> String {
    let (stem, _) = split_image_extension(strip_namespace(name));
    let prefix = SYSTEM_PREFIX.len();
    let stripped = match stem.get(..prefix) {
        Some(head) if head.eq_ignore_ascii_case("2d20_") || head.eq_ignore_ascii_case("2d20 ") => {
            &stem[prefix..]
        }
        _ => stem,
    };
    stripped.replace('_', " ")
}

fn strip_namespace(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix(FILE_NAMESPACE).unwrap_or(name)
}

fn split_image_extension(name: &str) -> (&str, String) {
    if let Some((stem, ext)) = name.rsplit_once('.') {
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return (stem, ext);
        }
    }
    (name, DEFAULT_EXTENSION.to_string())
}
