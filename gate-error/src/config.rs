//! Configuration for the validation bridge

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_INVALID_MESSAGE: &str = "Invalid Inputs";

/// Settings for turning validation failures into an envelope.
///
/// Missing fields take their defaults, so the struct can be embedded in a
/// host's configuration file as a partial section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Locale used to pick the translator
    pub locale: String,
    /// Message placed on every validation envelope
    pub message: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            message: DEFAULT_INVALID_MESSAGE.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}
