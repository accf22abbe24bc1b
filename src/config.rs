//! Invitation configuration
//!
//! Every design constant lives here with a default. On the web, overrides can be
//! embedded in the page as `<script type="application/json" id="invite-config">`.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::evasive::PlacementRules;
use crate::media::{Track, default_tracks};

/// Labels the runaway button cycles through
pub fn default_no_labels() -> Vec<String> {
    [
        "Thak jaogi cutie! 😂",
        "Mann Jao!",
        "Nahi karna chahiye! 🤔",
        "Itni jaldi? 😜",
        "Hehe! 😁",
        "Try again! 😂",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Console log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,

    // === Runaway button ===
    pub evasive: PlacementRules,
    pub no_labels: Vec<String>,

    // === Carousel ===
    /// Horizontal travel for a swipe (px)
    pub swipe_threshold: f64,
    /// Cross-fade hold before the new slide settles (ms)
    pub slide_settle_ms: u32,

    // === Pages ===
    /// Landing page fade-in stagger (s)
    pub fade_stagger_secs: f64,

    // === Music ===
    pub tracks: Vec<Track>,
    /// Played when the play button is pressed before any track was picked
    pub default_track: String,

    pub calendar: CalendarEvent,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),

            evasive: PlacementRules::default(),
            no_labels: default_no_labels(),

            swipe_threshold: SWIPE_THRESHOLD,
            slide_settle_ms: SLIDE_SETTLE_MS,

            fade_stagger_secs: FADE_STAGGER_SECS,

            tracks: default_tracks(),
            default_track: "lofi".to_string(),

            calendar: CalendarEvent::default(),
        }
    }
}

impl Config {
    /// Id of the inline JSON element read on the web
    pub const ELEMENT_ID: &'static str = "invite-config";

    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the controllers cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.tracks.iter().any(|t| t.key == self.default_track) {
            return Err(Error::Config(format!(
                "default track '{}' is not in the track list",
                self.default_track
            )));
        }
        if self.evasive.margin < 0.0 || self.evasive.min_distance < 0.0 {
            return Err(Error::Config("evasive distances must be positive".to_string()));
        }
        if self.slide_settle_ms > i32::MAX as u32 {
            return Err(Error::Config("slide_settle_ms is too large for a timer".to_string()));
        }
        if self.no_labels.is_empty() {
            return Err(Error::Config("no_labels must not be empty".to_string()));
        }
        if self.swipe_threshold <= 0.0 {
            return Err(Error::Config("swipe threshold must be positive".to_string()));
        }
        Ok(())
    }

    /// Parsed log level, `Info` when unrecognized
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Load overrides from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from #{}", Self::ELEMENT_ID);
                    return config;
                }
                Err(e) => log::warn!("Ignoring invalid config: {}", e),
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.evasive.margin, 20.0);
        assert_eq!(config.evasive.max_attempts, 20);
        assert_eq!(config.slide_settle_ms, 50);
        assert_eq!(config.no_labels.len(), 6);
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            Config::from_json(r#"{"log_level": "debug", "evasive": {"margin": 32.0}}"#).unwrap();
        assert_eq!(config.log_level(), log::Level::Debug);
        assert_eq!(config.evasive.margin, 32.0);
        assert_eq!(config.evasive.min_distance, 120.0);
        assert_eq!(config.tracks.len(), 2);
    }

    #[test]
    fn test_unknown_default_track_is_rejected() {
        let err = Config::from_json(r#"{"default_track": "qawwali"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_no_labels_is_rejected() {
        let err = Config::from_json(r#"{"no_labels": []}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_oversized_settle_delay_is_rejected() {
        let err = Config::from_json(r#"{"slide_settle_ms": 4294967295}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(Config::from_json(r#"{"slide_settle_ms": 300}"#).is_ok());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_bad_log_level_falls_back() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
