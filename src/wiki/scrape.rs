//! Category page scraping.
//!
//! Reads the thumbnail gallery of a rendered category page. Relies on the
//! wiki skin's class names, so a markup change shows up as
//! [`CatalogError::Environment`] rather than an empty list.

use crate::error::CatalogError;
use crate::models::item::{display_name, sanitize_filename};
use crate::models::DownloadItem;
use log::{debug, info};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static THUMBNAIL_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".category-page__member-thumbnail").expect("valid selector")
});
static MEMBER_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.category-page__member-link").expect("valid selector"));
static IMG_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));
static SCALE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/scale-to-width-down/\d+").expect("valid regex"));

/// Fetches the category page and extracts one item per gallery thumbnail.
pub async fn scrape_category(http: &Client, page_url: &str) -> Result<Vec<DownloadItem>, CatalogError> {
    info!("Loading category page {}", page_url);
    let base = Url::parse(page_url)
        .map_err(|e| CatalogError::Environment(format!("bad page url {}: {}", page_url, e)))?;

    let html = http
        .get(base.clone())
        .send()
        .await
        .map_err(|e| CatalogError::Environment(format!("cannot load {}: {}", page_url, e)))?
        .error_for_status()?
        .text()
        .await?;

    parse_category_page(&html, &base)
}

pub fn parse_category_page(html: &str, base: &Url) -> Result<Vec<DownloadItem>, CatalogError> {
    let doc = Html::parse_document(html);
    if doc.select(&THUMBNAIL_SEL).next().is_none() {
        return Err(CatalogError::Environment(
            "no category thumbnails in page markup".into(),
        ));
    }

    let mut items = Vec::new();
    for link in doc.select(&MEMBER_LINK_SEL) {
        let Some(img) = link.select(&IMG_SEL).next() else {
            continue;
        };
        let img = img.value();

        // Lazy-loaded thumbnails keep a placeholder in `src`
        let src = img
            .attr("data-src")
            .or_else(|| img.attr("src"))
            .filter(|s| !s.starts_with("data:"));
        let name = img
            .attr("alt")
            .or_else(|| link.value().attr("title"))
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (Some(src), Some(name)) = (src, name) else {
            continue;
        };
        let url = match base.join(&full_size_url(src)) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping {}: bad image url {}: {}", name, src, e);
                continue;
            }
        };

        items.push(DownloadItem::from_url(
            display_name(name),
            url,
            sanitize_filename(name),
        ));
    }

    info!("Found {} images on category page", items.len());
    Ok(items)
}

/// Turns a scaled thumbnail URL into the URL of the original upload.
pub fn full_size_url(src: &str) -> String {
    if !src.contains("scale-to-width-down") {
        return src.to_string();
    }
    match src.split_once("/revision/") {
        Some((base, _)) => format!("{}/revision/latest", SCALE_RE.replace(base, "")),
        None => SCALE_RE.replace(src, "").into_owned(),
    }
}
