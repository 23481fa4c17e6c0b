use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
    #[serde(default = "default_avatar_url")]
    pub default_avatar_url: String,
    #[serde(default = "default_toast_duration")]
    pub toast_duration_secs: u64,
    #[serde(default)]
    pub default_view: DefaultView,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Home,
    /// The signed-in viewer's own tweets.
    Profile,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".into()
}

fn default_tick_rate() -> f64 {
    30.0
}

fn default_avatar_url() -> String {
    "https://flowbite.com/docs/images/people/profile-picture-5.jpg".into()
}

fn default_toast_duration() -> u64 {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            tick_rate_fps: default_tick_rate(),
            default_avatar_url: default_avatar_url(),
            toast_duration_secs: default_toast_duration(),
            default_view: DefaultView::default(),
        }
    }
}

impl AppConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_duration_secs)
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/tweetcard"))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

pub fn load_config() -> AppConfig {
    let Some(path) = config_path() else {
        return AppConfig::default();
    };

    let Ok(contents) = fs::read_to_string(&path) else {
        return AppConfig::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed config: {e}");
        AppConfig::default()
    })
}
