pub mod catalog;
pub mod client;
pub mod scrape;

pub use catalog::{name_catalog, static_catalog};
pub use client::{http_client, WikiClient};
pub use scrape::scrape_category;
