use std::path::PathBuf;

use config::{Config, ConfigError};
use resolve_path::PathResolveExt;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_uploads_url")]
    pub uploads_url: String,
    #[serde(default = "default_data_directory")]
    pub data_directory: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: u32,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: u32,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.mangadex.org".into()
}

fn default_uploads_url() -> String {
    "https://uploads.mangadex.org".into()
}

fn default_data_directory() -> String {
    "~/.local/share/manga-browser".into()
}

fn default_language() -> String {
    "en".into()
}

fn default_catalog_limit() -> u32 {
    20
}

fn default_feed_limit() -> u32 {
    100
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Missing config file is fine, every field has a default.
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(config_file).required(false))
            .build()?;
        builder.try_deserialize()
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_directory.resolve().into_owned()
    }
}
