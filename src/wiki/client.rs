use crate::configuration::Settings;
use crate::error::CatalogError;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, REFERER};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

const PAGE_LIMIT: &str = "500";

/// Builds the shared HTTP client that impersonates a browser on every request.
pub fn http_client(settings: &Settings) -> reqwest::Result<Client> {
    let mut headers = HeaderMap::new();
    for (name, value) in &settings.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Ignoring invalid header {}: {}", name, value),
        }
    }
    match HeaderValue::from_str(&settings.referer) {
        Ok(referer) => {
            headers.insert(REFERER, referer);
        }
        Err(_) => warn!("Ignoring invalid referer {}", settings.referer),
    }

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .timeout(settings.timeout())
        .build()
}

/// Thin client over the wiki's `api.php` query interface.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: Client,
    api_url: String,
}

#[derive(Deserialize)]
struct CategoryResponse {
    query: Option<CategoryQuery>,
    #[serde(rename = "continue")]
    next: Option<CategoryContinue>,
}

#[derive(Deserialize)]
struct CategoryQuery {
    #[serde(default)]
    categorymembers: Vec<CategoryMember>,
}

#[derive(Deserialize)]
struct CategoryMember {
    title: String,
}

#[derive(Deserialize)]
struct CategoryContinue {
    cmcontinue: Option<String>,
}

#[derive(Deserialize)]
struct ImageInfoResponse {
    query: Option<PagesQuery>,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: HashMap<String, PageInfo>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Deserialize)]
struct ImageInfo {
    url: String,
}

impl WikiClient {
    pub fn new(http: Client, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Lists every file title in `category`, following continuation tokens.
    pub async fn category_members(&self, category: &str) -> Result<Vec<String>, CatalogError> {
        let mut titles = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut params = vec![
                ("action", "query"),
                ("format", "json"),
                ("list", "categorymembers"),
                ("cmtitle", category),
                ("cmlimit", PAGE_LIMIT),
                ("cmtype", "file"),
            ];
            if let Some(token) = next.as_deref() {
                params.push(("cmcontinue", token));
            }

            let page: CategoryResponse = self
                .http
                .get(&self.api_url)
                .query(&params)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            let Some(query) = page.query else {
                if titles.is_empty() {
                    return Ok(titles);
                }
                return Err(CatalogError::Malformed(format!(
                    "continuation page for {} has no query",
                    category
                )));
            };
            debug!(
                "Category page returned {} members",
                query.categorymembers.len()
            );
            titles.extend(query.categorymembers.into_iter().map(|m| m.title));

            let token = page.next.and_then(|c| c.cmcontinue);
            if token.is_none() || token == next {
                break;
            }
            next = token;
        }

        Ok(titles)
    }

    /// Looks up the original-resolution URL of a file. `None` when the wiki has no image info.
    pub async fn image_url(&self, file: &str) -> reqwest::Result<Option<Url>> {
        let title = format!("File:{}", file);
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("titles", title.as_str()),
            ("prop", "imageinfo"),
            ("iiprop", "url"),
        ];

        let response: ImageInfoResponse = self
            .http
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = response
            .query
            .into_iter()
            .flat_map(|q| q.pages.into_values())
            .find_map(|page| page.imageinfo.into_iter().next())
            .and_then(|info| match Url::parse(&info.url) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Unparseable image url {}: {}", info.url, e);
                    None
                }
            });

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WikiClient {
        WikiClient::new(Client::new(), format!("{}/api.php", server.uri()))
    }

    #[tokio::test]
    async fn category_members_follow_continuation() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("list", "categorymembers"))
            .and(query_param_is_missing("cmcontinue"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "continue": { "cmcontinue": "file|next", "continue": "-||" },
                "query": { "categorymembers": [
                    { "pageid": 1, "ns": 6, "title": "File:2D20 Action Boy.png" },
                    { "pageid": 2, "ns": 6, "title": "File:2D20 Blitz.png" }
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("cmcontinue", "file|next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "categorymembers": [
                    { "pageid": 3, "ns": 6, "title": "File:2D20 Sniper.png" }
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let titles = client(&server).category_members("Category:Perks").await.unwrap();
        assert_eq!(
            vec![
                "File:2D20 Action Boy.png",
                "File:2D20 Blitz.png",
                "File:2D20 Sniper.png"
            ],
            titles
        );
    }

    #[tokio::test]
    async fn category_without_query_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "batchcomplete": "" })))
            .mount(&server)
            .await;

        let titles = client(&server).category_members("Category:Nope").await.unwrap();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn category_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).category_members("Category:Perks").await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }

    #[tokio::test]
    async fn image_url_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("titles", "File:2D20 Blitz.png"))
            .and(query_param("prop", "imageinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "pages": { "42": {
                    "title": "File:2D20 Blitz.png",
                    "imageinfo": [{ "url": "https://static.example/images/d/df/2D20_Blitz.png/revision/latest" }]
                }}}
            })))
            .mount(&server)
            .await;

        let url = client(&server).image_url("2D20 Blitz.png").await.unwrap();
        assert_eq!(
            Some("https://static.example/images/d/df/2D20_Blitz.png/revision/latest"),
            url.as_ref().map(Url::as_str)
        );
    }

    #[tokio::test]
    async fn image_url_missing_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "pages": { "-1": { "title": "File:Nope.png", "missing": "" } } }
            })))
            .mount(&server)
            .await;

        let url = client(&server).image_url("Nope.png").await.unwrap();
        assert!(url.is_none());
    }

    #[test]
    fn http_client_accepts_defaults() {
        assert!(http_client(&Settings::default()).is_ok());
    }
}
