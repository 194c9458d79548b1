//! Configuration management for Clerk.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::captcha::Timings;
use redtape_common::constants::{
    DEFAULT_BIRTH_COLOR, DEFAULT_CUE_BASE_URL, DEFAULT_LISTEN_ADDR, DEFAULT_OUTBOX_CAPACITY,
    DEFAULT_SESSION_TTL_SECS, DEFAULT_SIREN_URL, DEFAULT_SWEEP_INTERVAL_SECS, delays, region,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session lifetime settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Captcha timer settings
    #[serde(default)]
    pub captcha: CaptchaConfig,

    /// Sound asset settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Where the map pin has to go
    #[serde(default)]
    pub region: RegionConfig,
}

/// Session lifetime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle sessions are dropped after this many seconds
    #[serde(default = "default_session_ttl")]
    pub idle_ttl_secs: u64,

    /// Seconds between idle sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Pending client cues kept per session
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,

    /// Initial value of the date-of-birth picker
    #[serde(default = "default_birth_color")]
    pub birth_color: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_session_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            outbox_capacity: default_outbox_capacity(),
            birth_color: default_birth_color(),
        }
    }
}

/// Captcha timer configuration, in milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    #[serde(default = "default_image_check")]
    pub image_check_ms: u64,

    #[serde(default = "default_advance")]
    pub advance_to_rps_ms: u64,

    #[serde(default = "default_reveal")]
    pub bot_reveal_ms: u64,

    #[serde(default = "default_resolve")]
    pub round_resolve_ms: u64,

    #[serde(default = "default_clear")]
    pub round_clear_ms: u64,

    #[serde(default = "default_auto_close")]
    pub auto_close_ms: u64,
}

impl CaptchaConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            image_check: Duration::from_millis(self.image_check_ms),
            advance_to_rps: Duration::from_millis(self.advance_to_rps_ms),
            bot_reveal: Duration::from_millis(self.bot_reveal_ms),
            round_resolve: Duration::from_millis(self.round_resolve_ms),
            round_clear: Duration::from_millis(self.round_clear_ms),
            auto_close: Duration::from_millis(self.auto_close_ms),
        }
    }
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            image_check_ms: default_image_check(),
            advance_to_rps_ms: default_advance(),
            bot_reveal_ms: default_reveal(),
            round_resolve_ms: default_resolve(),
            round_clear_ms: default_clear(),
            auto_close_ms: default_auto_close(),
        }
    }
}

/// Sound asset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Looping siren for mismatched emails
    #[serde(default = "default_siren_url")]
    pub siren_url: String,

    /// Base URL for every other cue (`{base}/{cue}.ogg`)
    #[serde(default = "default_cue_base_url")]
    pub cue_base_url: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            siren_url: default_siren_url(),
            cue_base_url: default_cue_base_url(),
        }
    }
}

/// Required map region
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// ISO 3166-2 code, matched exactly
    #[serde(default = "default_region_code")]
    pub region_code: String,

    /// ISO 3166-1 code, matched exactly
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Shown on the page
    #[serde(default = "default_region_label")]
    pub label: String,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            region_code: default_region_code(),
            country_code: default_country_code(),
            label: default_region_label(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_session_ttl() -> u64 { DEFAULT_SESSION_TTL_SECS }
fn default_sweep_interval() -> u64 { DEFAULT_SWEEP_INTERVAL_SECS }
fn default_outbox_capacity() -> usize { DEFAULT_OUTBOX_CAPACITY }
fn default_birth_color() -> String { DEFAULT_BIRTH_COLOR.to_string() }
fn default_image_check() -> u64 { delays::IMAGE_CHECK_MS }
fn default_advance() -> u64 { delays::ADVANCE_TO_RPS_MS }
fn default_reveal() -> u64 { delays::BOT_REVEAL_MS }
fn default_resolve() -> u64 { delays::ROUND_RESOLVE_MS }
fn default_clear() -> u64 { delays::ROUND_CLEAR_MS }
fn default_auto_close() -> u64 { delays::AUTO_CLOSE_MS }
fn default_siren_url() -> String { DEFAULT_SIREN_URL.to_string() }
fn default_cue_base_url() -> String { DEFAULT_CUE_BASE_URL.to_string() }
fn default_region_code() -> String { region::DEFAULT_REGION_CODE.to_string() }
fn default_country_code() -> String { region::DEFAULT_COUNTRY_CODE.to_string() }
fn default_region_label() -> String { region::DEFAULT_LABEL.to_string() }

/// `REDTAPE_LISTEN_ADDR`, `REDTAPE_CAPTCHA__IMAGE_CHECK_MS`, ...
fn environment() -> config::Environment {
    config::Environment::with_prefix("REDTAPE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from file and `REDTAPE_*` environment variables,
    /// with CLI overrides on top
    pub fn load(config_path: &str, listen_override: Option<&str>) -> Result<Self> {
        let mut config: Self = if Path::new(config_path).exists() {
            config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .add_source(environment())
                .build()
                .context("Failed to load config file")?
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            tracing::warn!("Config file not found, using defaults");
            config::Config::builder()
                .add_source(environment())
                .build()
                .context("Failed to read environment config")?
                .try_deserialize()
                .context("Failed to parse environment config")?
        };

        // Apply CLI overrides
        if let Some(listen) = listen_override {
            config.listen_addr = listen.to_string();
        }

        Ok(config)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session.sweep_interval_secs.max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            session: SessionConfig::default(),
            captcha: CaptchaConfig::default(),
            audio: AudioConfig::default(),
            region: RegionConfig::default(),
        }
    }
}
