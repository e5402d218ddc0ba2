//! # Locale Switching
//!
//! ```text
//!   init()            preference ──► set_language(locale, persist = false)
//!   toggle()          current.toggled() ──► set_language(next, persist = true)
//!
//!   set_language:     <html lang dir>  ──► every data-i18n text
//!                                      ──► toggle label
//!                                      ──► preference store (if persist)
//! ```
//!
//! The preference store is a small key/value document, so other page
//! settings could share it; the locale lives under one configured key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use beautican_core::i18n::keys;
use beautican_core::{Locale, Translations};

use crate::error::{StorefrontError, StorefrontResult};
use crate::surface::PageSurface;

// =============================================================================
// Preference Store
// =============================================================================

/// Persistent string preferences.
pub trait LocalePreferences: Send + Sync {
    fn load(&self, key: &str) -> StorefrontResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> StorefrontResult<()>;
}

/// Preferences kept in a JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileLocalePreferences {
    path: PathBuf,
}

impl FileLocalePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLocalePreferences { path: path.into() }
    }

    /// `preferences.json` in the platform data directory.
    pub fn default_location() -> Option<Self> {
        directories::ProjectDirs::from("com", "beautican", "storefront")
            .map(|dirs| Self::new(dirs.data_dir().join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorefrontResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| StorefrontError::Preferences(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| StorefrontError::Preferences(e.to_string()))
    }
}

impl LocalePreferences for FileLocalePreferences {
    fn load(&self, key: &str) -> StorefrontResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> StorefrontResult<()> {
        // A corrupt document is replaced rather than blocking the save
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorefrontError::Preferences(e.to_string()))?;
        }
        let contents =
            serde_json::to_string_pretty(&values).map_err(|e| StorefrontError::Preferences(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| StorefrontError::Preferences(e.to_string()))?;

        debug!(path = ?self.path, key, value, "preference saved");
        Ok(())
    }
}

/// Preferences held in memory.
#[derive(Debug, Default)]
pub struct MemoryLocalePreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryLocalePreferences {
    pub fn with(key: &str, value: &str) -> Self {
        let prefs = Self::default();
        prefs.lock().insert(key.to_string(), value.to_string());
        prefs
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalePreferences for MemoryLocalePreferences {
    fn load(&self, key: &str) -> StorefrontResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StorefrontResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Language Switcher
// =============================================================================

/// Applies the active locale to the page and remembers the choice.
pub struct LanguageSwitcher {
    prefs: Arc<dyn LocalePreferences>,
    key: String,
    default_locale: Locale,
    translations: Arc<Translations>,
    surface: Arc<dyn PageSurface>,
    current: Mutex<Locale>,
}

impl LanguageSwitcher {
    pub fn new(
        prefs: Arc<dyn LocalePreferences>,
        key: impl Into<String>,
        default_locale: Locale,
        translations: Arc<Translations>,
        surface: Arc<dyn PageSurface>,
    ) -> Self {
        LanguageSwitcher {
            prefs,
            key: key.into(),
            default_locale,
            translations,
            surface,
            current: Mutex::new(default_locale),
        }
    }

    pub fn current(&self) -> Locale {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Applies the stored preference, or the default, without persisting.
    pub fn init(&self) -> Locale {
        let locale = match self.prefs.load(&self.key) {
            Ok(Some(code)) => code.parse().unwrap_or_else(|_| {
                warn!(code = %code, "ignoring unknown stored locale");
                self.default_locale
            }),
            Ok(None) => self.default_locale,
            Err(e) => {
                warn!(error = %e, "could not read locale preference");
                self.default_locale
            }
        };
        self.apply(locale);
        locale
    }

    /// Switches the page to `locale`, storing the choice if `persist`.
    ///
    /// The page is updated even when storing fails.
    pub fn set_language(&self, locale: Locale, persist: bool) -> StorefrontResult<()> {
        self.apply(locale);
        if persist {
            self.prefs.save(&self.key, locale.code())?;
        }
        Ok(())
    }

    /// Flips between the two locales and persists the result.
    pub fn toggle(&self) -> StorefrontResult<Locale> {
        let next = self.current().toggled();
        self.set_language(next, true)?;
        Ok(next)
    }

    fn apply(&self, locale: Locale) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = locale;

        self.surface.set_document_locale(locale, locale.direction());
        for key in self.surface.i18n_keys() {
            self.surface
                .set_localized_text(&key, &self.translations.t(locale, &key));
        }
        self.surface
            .set_toggle_label(&self.translations.t(locale, keys::LANG_TOGGLE));

        info!(locale = %locale, dir = locale.direction().as_str(), "locale applied");
    }
}
