//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BEAUTICAN_BACKEND_URL=https://shop.example.com/                    │
//! │     BEAUTICAN_LOCALE=ar                                                │
//! │     BEAUTICAN_CURRENCY=SAR                                             │
//! │     BEAUTICAN_TRANSLATIONS=/srv/shop/translations.json                 │
//! │     BEAUTICAN_TIMEOUT_SECS=10                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.beautican.storefront/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [backend]
//! base_url = "https://shop.example.com/"
//! timeout_secs = 10
//! user_agent = "beautican-storefront/0.1"
//!
//! [storefront]
//! currency_suffix = "SAR"
//! checkout_url = "/checkout"
//! default_locale = "en"
//! locale_key = "beautican-lang"
//! # translations_path = "translations.json"
//!
//! [notifications]
//! fade_in_delay_ms = 10
//! visible_ms = 3000
//! fade_out_ms = 300
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use beautican_core::{Locale, Translations, DEFAULT_CHECKOUT_URL, DEFAULT_CURRENCY_SUFFIX};

use crate::error::{StorefrontError, StorefrontResult};

// =============================================================================
// Backend Configuration
// =============================================================================

/// Where the cart endpoints live and how to call them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the `/cart*.js` paths are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:9292/".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("beautican-storefront/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// Storefront Settings
// =============================================================================

/// Presentation and locale settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontSettings {
    /// Appended to every formatted amount.
    #[serde(default = "default_currency_suffix")]
    pub currency_suffix: String,

    #[serde(default = "default_checkout_url")]
    pub checkout_url: String,

    /// Locale used when no preference has been stored.
    #[serde(default)]
    pub default_locale: Locale,

    /// Key the locale preference is stored under.
    #[serde(default = "default_locale_key")]
    pub locale_key: String,

    /// JSON catalog merged over the built-in translations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations_path: Option<PathBuf>,
}

fn default_currency_suffix() -> String {
    DEFAULT_CURRENCY_SUFFIX.to_string()
}

fn default_checkout_url() -> String {
    DEFAULT_CHECKOUT_URL.to_string()
}

fn default_locale_key() -> String {
    "beautican-lang".to_string()
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        StorefrontSettings {
            currency_suffix: default_currency_suffix(),
            checkout_url: default_checkout_url(),
            default_locale: Locale::default(),
            locale_key: default_locale_key(),
            translations_path: None,
        }
    }
}

// =============================================================================
// Notification Timing
// =============================================================================

/// Lifecycle timing of a notification, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Delay between insertion and the visible phase.
    #[serde(default = "default_fade_in_delay")]
    pub fade_in_delay_ms: u64,

    /// Time from insertion until the leaving phase starts.
    #[serde(default = "default_visible")]
    pub visible_ms: u64,

    /// Time from the leaving phase until removal.
    #[serde(default = "default_fade_out")]
    pub fade_out_ms: u64,
}

fn default_fade_in_delay() -> u64 {
    10
}

fn default_visible() -> u64 {
    3000
}

fn default_fade_out() -> u64 {
    300
}

impl Default for NotificationConfig {
    fn default() -> Self {
        NotificationConfig {
            fade_in_delay_ms: default_fade_in_delay(),
            visible_ms: default_visible(),
            fade_out_ms: default_fade_out(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub storefront: StorefrontSettings,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StorefrontResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StorefrontResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StorefrontError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorefrontError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StorefrontError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StorefrontResult<()> {
        let url = Url::parse(&self.backend.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(StorefrontError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.base_url
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(StorefrontError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storefront.locale_key.is_empty() {
            return Err(StorefrontError::InvalidConfig("locale_key must not be empty".into()));
        }

        if self.notifications.visible_ms < self.notifications.fade_in_delay_ms {
            return Err(StorefrontError::InvalidConfig(
                "visible_ms must not be shorter than fade_in_delay_ms".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment
    /// in [`load`](Self::load)).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("BEAUTICAN_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }

        if let Some(locale) = var("BEAUTICAN_LOCALE") {
            match locale.parse() {
                Ok(parsed) => self.storefront.default_locale = parsed,
                Err(_) => warn!(locale = %locale, "Unknown locale in environment"),
            }
        }

        if let Some(currency) = var("BEAUTICAN_CURRENCY") {
            self.storefront.currency_suffix = currency;
        }

        if let Some(path) = var("BEAUTICAN_TRANSLATIONS") {
            self.storefront.translations_path = Some(PathBuf::from(path));
        }

        if let Some(timeout) = var("BEAUTICAN_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                debug!(secs, "Overriding request timeout from environment");
                self.backend.timeout_secs = secs;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "beautican", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Built-in translations, merged with the configured catalog file if any.
    pub fn translations(&self) -> StorefrontResult<Translations> {
        let builtin = Translations::builtin();
        let Some(path) = &self.storefront.translations_path else {
            return Ok(builtin);
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| StorefrontError::Translations(format!("{}: {}", path.display(), e)))?;
        let overlay = Translations::from_json_str(&contents)
            .map_err(|e| StorefrontError::Translations(format!("{}: {}", path.display(), e)))?;

        info!(?path, "Loaded translation overrides");
        Ok(builtin.merged_with(overlay))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.storefront.currency_suffix, "SAR");
        assert_eq!(config.storefront.locale_key, "beautican-lang");
        assert_eq!(config.storefront.default_locale, Locale::En);
        assert_eq!(config.notifications.visible_ms, 3000);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();
        config.backend.base_url = "ws://shop.example.com".into();
        assert!(matches!(config.validate(), Err(StorefrontError::InvalidUrl(_))));

        let mut config = StorefrontConfig::default();
        config.backend.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(StorefrontError::InvalidConfig(_))));

        let mut config = StorefrontConfig::default();
        config.notifications.visible_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BEAUTICAN_BACKEND_URL", "https://shop.example.com/"),
            ("BEAUTICAN_LOCALE", "ar"),
            ("BEAUTICAN_CURRENCY", "ر.س"),
            ("BEAUTICAN_TIMEOUT_SECS", "nope"),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.backend.base_url, "https://shop.example.com/");
        assert_eq!(config.storefront.default_locale, Locale::Ar);
        assert_eq!(config.storefront.currency_suffix, "ر.س");
        // Unparseable values are ignored
        assert_eq!(config.backend.timeout_secs, 10);
    }

    #[test]
    fn test_partial_toml() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://shop.example.com/"

            [storefront]
            default_locale = "ar"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.storefront.default_locale, Locale::Ar);
        assert_eq!(config.storefront.checkout_url, "/checkout");
        assert_eq!(config.notifications.fade_out_ms, 300);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storefront.toml");

        let mut config = StorefrontConfig::default();
        config.storefront.currency_suffix = "AED".into();
        config.save(Some(path.clone())).unwrap();

        let loaded = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.storefront.currency_suffix, "AED");
    }

    #[test]
    fn test_translation_overrides_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translations.json");
        std::fs::write(&path, r#"{"en": {"cart": {"empty": "Nothing here yet"}}}"#).unwrap();

        let mut config = StorefrontConfig::default();
        config.storefront.translations_path = Some(path);
        let translations = config.translations().unwrap();
        assert_eq!(translations.t(Locale::En, "cart.empty"), "Nothing here yet");
        assert_eq!(translations.t(Locale::En, "cart.total"), "Total");

        config.storefront.translations_path = Some(dir.path().join("missing.json"));
        assert!(matches!(
            config.translations(),
            Err(StorefrontError::Translations(_))
        ));
    }
}
