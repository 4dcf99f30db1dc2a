use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::status::OaStatus;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub lookup: LookupConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Cache storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("oalens.db")
}

/// External lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Contact email sent with every external request.
    pub contact_email: String,
    /// Override for the works catalog endpoint (defaults to OpenAlex).
    #[serde(default)]
    pub catalog_base_url: Option<String>,
    /// Override for the OA status endpoint (defaults to Unpaywall).
    #[serde(default)]
    pub status_base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Minimum similarity a title match must strictly exceed.
    #[serde(default = "default_min_match_score")]
    pub min_match_score: f64,
    /// Items per lookup batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_timeout() -> u64 {
    30
}

fn default_min_match_score() -> f64 {
    crate::resolver::DEFAULT_MIN_MATCH_SCORE
}

fn default_batch_size() -> usize {
    crate::pipeline::BATCH_SIZE
}

/// User-facing settings section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_visible_statuses")]
    pub visible_statuses: Vec<OaStatus>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            visible_statuses: default_visible_statuses(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_visible_statuses() -> Vec<OaStatus> {
    vec![
        OaStatus::Gold,
        OaStatus::Green,
        OaStatus::Bronze,
        OaStatus::Hybrid,
    ]
}

impl Config {
    /// Settings the pipeline consumes, assembled from the lookup and
    /// settings sections.
    pub fn pipeline_settings(&self) -> crate::settings::Settings {
        crate::settings::Settings {
            contact_email: self.lookup.contact_email.clone(),
            enabled: self.settings.enabled,
            visible_statuses: self.settings.visible_statuses.clone(),
        }
    }
}
