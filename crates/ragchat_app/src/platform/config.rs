use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ragchat_core::selection::decode_selection;
use ragchat_core::{parse_lane_binding, Stack, DEFAULT_WELCOME_MESSAGE};
use ragchat_engine::ClientSettings;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILENAME: &str = "ragchat.ron";

/// Deployment settings, read from a RON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_root: String,
    /// Page the shareable location is built from.
    pub page_url: String,
    pub welcome_message: String,
    /// Initial stack id per lane; `"none"` leaves a lane unbound.
    pub lanes: Vec<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_file: PathBuf,
    pub transcript_html: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            api_root: client.api_root,
            page_url: "http://localhost:8000/".to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            lanes: vec![
                Stack::OpenAi.as_str().to_string(),
                Stack::Google.as_str().to_string(),
            ],
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            log_file: PathBuf::from("ragchat.log"),
            transcript_html: None,
        }
    }
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self> {
        ron::from_str(text).context("invalid ragchat configuration")
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_root: self.api_root.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Configured lane bindings, in display order.
    pub fn lane_defaults(&self) -> Result<Vec<Option<Stack>>> {
        self.lanes
            .iter()
            .map(|raw| parse_lane_binding(raw).with_context(|| format!("lane `{raw}`")))
            .collect()
    }

    /// Lane bindings at startup: the configured ones, overridden by a shared
    /// location when one is given.
    pub fn initial_lanes(&self, location: Option<&str>) -> Result<Vec<Option<Stack>>> {
        let defaults = self.lane_defaults()?;
        Ok(match location {
            Some(location) => decode_selection(location, &defaults),
            None => defaults,
        })
    }

    /// Grows or shrinks the lane list; new lanes start unbound.
    pub fn resize_lanes(&mut self, count: usize) {
        self.lanes.resize(count, "none".to_string());
    }
}

/// The file configuration comes from: `explicit` if given, else
/// `ragchat.ron` when present. `None` means built-in defaults.
pub fn config_source(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            fallback.exists().then_some(fallback)
        }
    }
}

/// Reads the configuration from `source`, or returns defaults. Does not log;
/// the logger is configured from the result.
pub fn load_config(source: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = source else {
        return Ok(AppConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    AppConfig::parse(&text).with_context(|| format!("in {}", path.display()))
}
