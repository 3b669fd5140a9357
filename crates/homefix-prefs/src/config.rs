//! Store configuration: slot key, mode flag, and style block identifier.
//!
//! # Design
//! - Defaults describe the production browser build; tests and alternative
//!   shells override individual fields.
//! - Validation runs before the store touches any backend.

use crate::error::{PrefsError, PrefsResult};

/// Default durable slot key holding the serialised record.
pub const DEFAULT_STORAGE_KEY: &str = "homefix.user";
/// Default class applied to the root scope while dark mode is on.
pub const DEFAULT_MODE_FLAG: &str = "dark-mode";
/// Default identifier of the registered dark-mode style block.
pub const DEFAULT_STYLE_ID: &str = "homefix-dark-mode-styles";

/// Names the store uses when talking to its slot and scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the durable slot.
    pub storage_key: String,
    /// Flag toggled on the root scope by the dark-mode effect.
    pub mode_flag: String,
    /// Identifier of the dark-mode style block.
    pub style_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            mode_flag: DEFAULT_MODE_FLAG.to_string(),
            style_id: DEFAULT_STYLE_ID.to_string(),
        }
    }
}

impl StoreConfig {
    /// Override the slot key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Override the mode flag.
    #[must_use]
    pub fn with_mode_flag(mut self, flag: impl Into<String>) -> Self {
        self.mode_flag = flag.into();
        self
    }

    /// Override the style block identifier.
    #[must_use]
    pub fn with_style_id(mut self, id: impl Into<String>) -> Self {
        self.style_id = id.into();
        self
    }

    /// Check every name is usable by the slot and scope backends.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> PrefsResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(PrefsError::InvalidConfig {
                field: "storageKey",
                reason: "must not be empty",
            });
        }
        if !is_css_identifier(&self.mode_flag) {
            return Err(PrefsError::InvalidConfig {
                field: "modeFlag",
                reason: "must be a CSS identifier",
            });
        }
        if !is_css_identifier(&self.style_id) {
            return Err(PrefsError::InvalidConfig {
                field: "styleId",
                reason: "must be a CSS identifier",
            });
        }
        Ok(())
    }
}

fn is_css_identifier(value: &str) -> bool {
    let body = value.strip_prefix('-').unwrap_or(value);
    let mut chars = body.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
