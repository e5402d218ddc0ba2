//! # Storefront Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Error Categories                         │
//! │                                                                         │
//! │  ┌──────────────────────────┐  ┌──────────────────────────────────────┐ │
//! │  │  TransportError          │  │  StorefrontError                     │ │
//! │  │  (one backend request)   │  │  (everything around it)              │ │
//! │  │                          │  │                                      │ │
//! │  │  Network                 │  │  InvalidConfig / InvalidUrl          │ │
//! │  │  Status                  │  │  ConfigLoadFailed / ConfigSaveFailed │ │
//! │  │  Decode                  │  │  Preferences                         │ │
//! │  │  InconsistentSnapshot    │  │  Translations                        │ │
//! │  │                          │  │  Transport(TransportError)           │ │
//! │  └──────────────────────────┘  └──────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transport errors never leave the cart store: they are logged and turned
//! into a generic notification. `StorefrontError` is what setup code and the
//! binary see.

use thiserror::Error;

use beautican_core::CoreError;

/// Result type alias for storefront setup operations.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Failure of a single cart backend request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The body was not the expected JSON shape.
    #[error("Could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The body decoded but its line list is malformed (empty or repeated lines).
    #[error("Inconsistent cart from {endpoint}: {source}")]
    InconsistentSnapshot {
        endpoint: String,
        #[source]
        source: CoreError,
    },
}

impl TransportError {
    /// Returns the endpoint the failed request targeted.
    pub fn endpoint(&self) -> &str {
        match self {
            TransportError::Network { endpoint, .. }
            | TransportError::Status { endpoint, .. }
            | TransportError::Decode { endpoint, .. }
            | TransportError::InconsistentSnapshot { endpoint, .. } => endpoint,
        }
    }

    /// Returns true if a new user action could reasonably succeed.
    ///
    /// Nothing is retried automatically; this only shapes log levels.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network { .. } => true,
            TransportError::Status { status, .. } => *status >= 500 || *status == 429,
            TransportError::Decode { .. } | TransportError::InconsistentSnapshot { .. } => false,
        }
    }
}

/// Errors from configuration, preferences and storefront setup.
#[derive(Debug, Error)]
pub enum StorefrontError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid storefront configuration.
    #[error("Invalid storefront configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// Locale preference could not be read or written.
    #[error("Locale preference store error: {0}")]
    Preferences(String),

    /// Translation catalog could not be loaded.
    #[error("Failed to load translations: {0}")]
    Translations(String),

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// A backend request failed outside the store (e.g. CLI setup).
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl StorefrontError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StorefrontError::InvalidConfig(_)
                | StorefrontError::InvalidUrl(_)
                | StorefrontError::ConfigLoadFailed(_)
                | StorefrontError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for StorefrontError {
    fn from(err: url::ParseError) -> Self {
        StorefrontError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for StorefrontError {
    fn from(err: std::io::Error) -> Self {
        StorefrontError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StorefrontError {
    fn from(err: toml::de::Error) -> Self {
        StorefrontError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StorefrontError {
    fn from(err: toml::ser::Error) -> Self {
        StorefrontError::ConfigSaveFailed(err.to_string())
    }
}

impl From<reqwest::Error> for StorefrontError {
    fn from(err: reqwest::Error) -> Self {
        StorefrontError::HttpClient(err.to_string())
    }
}
