use crate::i18n::Language;
use anyhow::{Context, Result};
use std::time::Duration;

/// Tunable behaviour of the page controller.
///
/// `Default` holds the values the site is designed around; `from_env`
/// allows overriding them for previews and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Language
    pub default_language: Language,

    // Form
    pub success_dismiss: Duration,

    // Debounce
    pub scroll_debounce: Duration,
    pub resize_debounce: Duration,

    // Navigation
    pub mobile_breakpoint: f64,
    pub anchor_gap: f64,
    pub spy_offset: f64,

    // Reveal animation
    pub reveal_threshold: f64,
    pub reveal_bottom_margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: Language::ENGLISH,
            success_dismiss: Duration::from_millis(5000),
            scroll_debounce: Duration::from_millis(100),
            resize_debounce: Duration::from_millis(250),
            mobile_breakpoint: 768.0,
            anchor_gap: 20.0,
            spy_offset: 100.0,
            reveal_threshold: 0.1,
            reveal_bottom_margin: -50.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let default_language = match std::env::var("SITE_DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(code.trim())
                .context("SITE_DEFAULT_LANGUAGE is not a supported language")?,
            Err(_) => defaults.default_language,
        };

        Ok(Self {
            default_language,

            // Form
            success_dismiss: env_millis("SITE_SUCCESS_DISMISS_MS")
                .unwrap_or(defaults.success_dismiss),

            // Debounce
            scroll_debounce: env_millis("SITE_SCROLL_DEBOUNCE_MS")
                .unwrap_or(defaults.scroll_debounce),
            resize_debounce: env_millis("SITE_RESIZE_DEBOUNCE_MS")
                .unwrap_or(defaults.resize_debounce),

            // Navigation
            mobile_breakpoint: env_number("SITE_MOBILE_BREAKPOINT")
                .unwrap_or(defaults.mobile_breakpoint),
            anchor_gap: env_number("SITE_ANCHOR_GAP").unwrap_or(defaults.anchor_gap),
            spy_offset: env_number("SITE_SPY_OFFSET").unwrap_or(defaults.spy_offset),

            // Reveal animation
            reveal_threshold: env_number("SITE_REVEAL_THRESHOLD")
                .filter(|t| (0.0..=1.0).contains(t))
                .unwrap_or(defaults.reveal_threshold),
            reveal_bottom_margin: env_number("SITE_REVEAL_BOTTOM_MARGIN")
                .unwrap_or(defaults.reveal_bottom_margin),
        })
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn env_number(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 9] = [
        "SITE_DEFAULT_LANGUAGE",
        "SITE_SUCCESS_DISMISS_MS",
        "SITE_SCROLL_DEBOUNCE_MS",
        "SITE_RESIZE_DEBOUNCE_MS",
        "SITE_MOBILE_BREAKPOINT",
        "SITE_ANCHOR_GAP",
        "SITE_SPY_OFFSET",
        "SITE_REVEAL_THRESHOLD",
        "SITE_REVEAL_BOTTOM_MARGIN",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_language, Language::ENGLISH);
        assert_eq!(config.success_dismiss, Duration::from_millis(5000));
        assert_eq!(config.scroll_debounce, Duration::from_millis(100));
        assert_eq!(config.resize_debounce, Duration::from_millis(250));
        assert_eq!(config.mobile_breakpoint, 768.0);
        assert_eq!(config.anchor_gap, 20.0);
        assert_eq!(config.spy_offset, 100.0);
        assert_eq!(config.reveal_threshold, 0.1);
        assert_eq!(config.reveal_bottom_margin, -50.0);
    }

    #[test]
    #[serial]
    fn test_from_env_without_overrides_matches_defaults() {
        clear_env();
        assert_eq!(Config::from_env().unwrap(), Config::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("SITE_DEFAULT_LANGUAGE", "hi");
        std::env::set_var("SITE_SCROLL_DEBOUNCE_MS", "50");
        std::env::set_var("SITE_MOBILE_BREAKPOINT", "1024");

        let config = Config::from_env().unwrap();
        assert_eq!(config.default_language, Language::HINDI);
        assert_eq!(config.scroll_debounce, Duration::from_millis(50));
        assert_eq!(config.mobile_breakpoint, 1024.0);
        assert_eq!(config.resize_debounce, Duration::from_millis(250));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_numbers_fall_back() {
        clear_env();
        std::env::set_var("SITE_SUCCESS_DISMISS_MS", "soon");
        std::env::set_var("SITE_REVEAL_THRESHOLD", "1.5");
        std::env::set_var("SITE_ANCHOR_GAP", "NaN");

        let config = Config::from_env().unwrap();
        assert_eq!(config.success_dismiss, Duration::from_millis(5000));
        assert_eq!(config.reveal_threshold, 0.1);
        assert_eq!(config.anchor_gap, 20.0);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_unknown_language_is_error() {
        clear_env();
        std::env::set_var("SITE_DEFAULT_LANGUAGE", "fr");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SITE_DEFAULT_LANGUAGE"));
        clear_env();
    }
}
