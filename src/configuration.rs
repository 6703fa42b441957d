use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_delay_ms")]
    pub inter_item_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_headers")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub wiki: WikiSettings,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WikiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_path")]
    pub api_path: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_image_base")]
    pub image_base: String,
}

/// Which entry survives when two catalog entries map to the same local file.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    FirstWins,
    LastWins,
}

impl Settings {
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(config_file).required(false))
            .add_source(
                Environment::with_prefix("PERKS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        builder.try_deserialize()
    }

    /// Command line values win over file and environment.
    pub fn with_overrides(mut self, output_directory: Option<String>, delay_ms: Option<u64>) -> Self {
        if let Some(dir) = output_directory {
            self.output_directory = dir;
        }
        if let Some(ms) = delay_ms {
            self.inter_item_delay_ms = ms;
        }
        self
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.inter_item_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            user_agent: default_user_agent(),
            referer: default_referer(),
            inter_item_delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            headers: default_headers(),
            wiki: WikiSettings::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl WikiSettings {
    pub fn api_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_path.trim_start_matches('/')
        )
    }

    pub fn category_url(&self) -> String {
        format!(
            "{}/wiki/{}",
            self.base_url.trim_end_matches('/'),
            self.category
        )
    }
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_path: default_api_path(),
            category: default_category(),
            image_base: default_image_base(),
        }
    }
}

fn default_output_directory() -> String {
    "public/assets/images/perks-2d20".into()
}

fn default_user_agent() -> String {
    CHROME_UA.into()
}

fn default_referer() -> String {
    "https://fallout.fandom.com/".into()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_headers() -> HashMap<String, String> {
    HashMap::from([
        (
            "accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
        ),
        ("accept-language".to_string(), "en-US,en;q=0.5".to_string()),
        ("dnt".to_string(), "1".to_string()),
    ])
}

fn default_base_url() -> String {
    "https://fallout.fandom.com".into()
}

fn default_api_path() -> String {
    "/api.php".into()
}

fn default_category() -> String {
    "Category:Fallout:_The_Roleplaying_Game_perk_images".into()
}

fn default_image_base() -> String {
    "https://static.wikia.nocookie.net/fallout/images".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config() {
        let c = Settings::new("perks.test.json").unwrap();

        assert_eq!("./test/perks", c.output_directory);
        assert_eq!(250, c.inter_item_delay_ms);
        assert_eq!(Duration::from_millis(250), c.inter_item_delay());
        assert_eq!(DuplicatePolicy::LastWins, c.duplicates);
        assert_eq!(Some(&"tests".to_string()), c.headers.get("x-requested-by"));

        // Unset keys keep their defaults
        assert_eq!(default_user_agent(), c.user_agent);
        assert_eq!(30, c.timeout_secs);
        assert_eq!("Category:Test_images", c.wiki.category);
        assert_eq!(default_base_url(), c.wiki.base_url);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let c = Settings::new("does-not-exist").unwrap();
        assert_eq!(default_output_directory(), c.output_directory);
        assert_eq!(WikiSettings::default(), c.wiki);
        assert_eq!(DuplicatePolicy::FirstWins, c.duplicates);
    }

    #[test]
    fn cli_overrides() {
        let c = Settings::default().with_overrides(Some("/tmp/out".into()), Some(0));
        assert_eq!("/tmp/out", c.output_directory);
        assert!(c.inter_item_delay().is_zero());

        let c = Settings::default().with_overrides(None, None);
        assert_eq!(default_output_directory(), c.output_directory);
        assert_eq!(1000, c.inter_item_delay_ms);
    }

    #[test]
    fn wiki_urls() {
        let wiki = WikiSettings {
            base_url: "http://localhost:8080/".into(),
            ..WikiSettings::default()
        };
        assert_eq!("http://localhost:8080/api.php", wiki.api_url());
        assert_eq!(
            "http://localhost:8080/wiki/Category:Fallout:_The_Roleplaying_Game_perk_images",
            wiki.category_url()
        );
    }
}
