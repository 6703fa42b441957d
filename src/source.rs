use crate::configuration::{DuplicatePolicy, Settings, WikiSettings};
use crate::error::CatalogError;
use crate::models::{DownloadItem, SourceKind};
use crate::wiki::{name_catalog, scrape_category, static_catalog, WikiClient};
use log::{info, warn};
use std::collections::HashMap;
use std::fmt;

/// Interchangeable providers of the download list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Static,
    ApiCategory,
    DomScrape,
}

impl From<SourceKind> for Source {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Static => Source::Static,
            SourceKind::Api => Source::ApiCategory,
            SourceKind::Dom => Source::DomScrape,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Items to fetch and the catalog they actually came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub origin: &'static str,
    pub items: Vec<DownloadItem>,
}

impl Source {
    pub fn name(self) -> &'static str {
        match self {
            Source::Static => "static catalog",
            Source::ApiCategory => "category query",
            Source::DomScrape => "category page",
        }
    }

    /// Catalog used when this source yields nothing. `None` for the static catalog itself.
    fn fallback(self, settings: &WikiSettings) -> Option<(&'static str, Vec<DownloadItem>)> {
        match self {
            Source::Static => None,
            // Names go through the same lookup path as category members
            Source::ApiCategory => Some(("perk name list", name_catalog())),
            Source::DomScrape => Some((
                Source::Static.name(),
                static_catalog(&settings.image_base),
            )),
        }
    }

    pub async fn enumerate(
        self,
        wiki: &WikiClient,
        settings: &WikiSettings,
    ) -> Result<Vec<DownloadItem>, CatalogError> {
        match self {
            Source::Static => Ok(static_catalog(&settings.image_base)),
            Source::ApiCategory => {
                info!("Listing images in {}", settings.category);
                let titles = wiki.category_members(&settings.category).await?;
                info!("Found {} images in category", titles.len());
                Ok(titles
                    .iter()
                    .map(|title| DownloadItem::from_wiki_title(title))
                    .collect())
            }
            Source::DomScrape => scrape_category(wiki.http(), &settings.category_url()).await,
        }
    }
}

/// Enumerates `source`, falling back to a built-in catalog when it yields nothing,
/// then resolves duplicate local names.
pub async fn collect_items(source: Source, wiki: &WikiClient, settings: &Settings) -> Listing {
    let items = match source.enumerate(wiki, &settings.wiki).await {
        Ok(items) => items,
        Err(e) => {
            warn!("Could not list images from {}: {}", source, e);
            Vec::new()
        }
    };

    let (origin, items) = match source.fallback(&settings.wiki) {
        Some((origin, fallback)) if items.is_empty() => {
            warn!("No images from {}, falling back to {}", source, origin);
            (origin, fallback)
        }
        _ => (source.name(), items),
    };

    Listing {
        origin,
        items: dedupe(items, settings.duplicates),
    }
}

/// Keeps one item per local name. The survivor takes the first occurrence's position.
pub fn dedupe(items: Vec<DownloadItem>, policy: DuplicatePolicy) -> Vec<DownloadItem> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<DownloadItem> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&item.local_name) {
            None => {
                positions.insert(item.local_name.clone(), kept.len());
                kept.push(item);
            }
            Some(&idx) => match policy {
                DuplicatePolicy::FirstWins => {
                    warn!(
                        "Duplicate {}: keeping {}, dropping {}",
                        item.local_name, kept[idx].remote, item.remote
                    );
                }
                DuplicatePolicy::LastWins => {
                    warn!(
                        "Duplicate {}: keeping {}, dropping {}",
                        item.local_name, item.remote, kept[idx].remote
                    );
                    kept[idx] = item;
                }
            },
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteLocator;
    use crate::wiki::catalog::{PERK_IMAGES, PERK_NAMES};
    use reqwest::Client;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.wiki.base_url = server.uri();
        settings
    }

    fn wiki_for(settings: &Settings) -> WikiClient {
        WikiClient::new(Client::new(), settings.wiki.api_url())
    }

    fn item(local: &str, url: &str) -> DownloadItem {
        DownloadItem::from_url(local, Url::parse(url).unwrap(), local)
    }

    #[tokio::test]
    async fn empty_category_falls_back_to_name_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "batchcomplete": "",
                "query": { "categorymembers": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let settings = settings_for(&server);
        let listing = collect_items(Source::ApiCategory, &wiki_for(&settings), &settings).await;
        assert_eq!("perk name list", listing.origin);
        assert_eq!(PERK_NAMES.len(), listing.items.len());
        assert!(listing
            .items
            .iter()
            .all(|i| matches!(i.remote, RemoteLocator::WikiFile(_))));
        assert!(listing
            .items
            .iter()
            .any(|i| i.local_name == "spray_n_pray.png"
                && i.remote == RemoteLocator::WikiFile("2D20_Spray n' Pray.png".into())));
    }

    #[tokio::test]
    async fn api_error_falls_back_to_name_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let settings = settings_for(&server);
        let listing = collect_items(Source::ApiCategory, &wiki_for(&settings), &settings).await;
        assert_eq!("perk name list", listing.origin);
        assert_eq!(PERK_NAMES.len(), listing.items.len());
    }

    #[tokio::test]
    async fn unrecognized_page_falls_back_to_static() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/wiki/Category:Fallout:_The_Roleplaying_Game_perk_images",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let settings = settings_for(&server);
        let listing = collect_items(Source::DomScrape, &wiki_for(&settings), &settings).await;
        assert_eq!("static catalog", listing.origin);
        assert_eq!(PERK_IMAGES.len(), listing.items.len());
        assert!(listing
            .items
            .iter()
            .all(|i| matches!(i.remote, RemoteLocator::Url(_))));
    }

    #[tokio::test]
    async fn category_members_become_wiki_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "categorymembers": [
                    { "title": "File:2D20 Spray n' Pray.png" },
                    { "title": "File:V.A.N.S" }
                ]}
            })))
            .mount(&server)
            .await;

        let settings = settings_for(&server);
        let listing = collect_items(Source::ApiCategory, &wiki_for(&settings), &settings).await;
        assert_eq!("category query", listing.origin);
        let names: Vec<_> = listing.items.iter().map(|i| i.local_name.as_str()).collect();
        assert_eq!(vec!["spray_n_pray.png", "vans.png"], names);
    }

    #[test]
    fn dedupe_first_wins() {
        let items = vec![
            item("a.png", "https://x.example/1/a.png"),
            item("b.png", "https://x.example/b.png"),
            item("a.png", "https://x.example/2/a.png"),
        ];
        let kept = dedupe(items, DuplicatePolicy::FirstWins);
        assert_eq!(2, kept.len());
        assert_eq!(
            RemoteLocator::Url(Url::parse("https://x.example/1/a.png").unwrap()),
            kept[0].remote
        );
    }

    #[test]
    fn dedupe_last_wins_keeps_position() {
        let items = vec![
            item("a.png", "https://x.example/1/a.png"),
            item("b.png", "https://x.example/b.png"),
            item("a.png", "https://x.example/2/a.png"),
        ];
        let kept = dedupe(items, DuplicatePolicy::LastWins);
        assert_eq!(2, kept.len());
        assert_eq!("a.png", kept[0].local_name);
        assert_eq!(
            RemoteLocator::Url(Url::parse("https://x.example/2/a.png").unwrap()),
            kept[0].remote
        );
        assert_eq!("b.png", kept[1].local_name);
    }
}
