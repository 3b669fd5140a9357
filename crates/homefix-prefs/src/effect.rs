//! Derived visual effect: the dark-mode flag on the application's root scope.
//!
//! # Design
//! - The effect is a pure function of the record ([`ThemeMode::from_record`]);
//!   scopes only learn about flags and style blocks, never about records.
//! - Flags are set members, so applying the same mode twice is a no-op.

use std::collections::{BTreeSet, HashMap};

use crate::model::UserRecord;

/// Light or dark visual mode derived from `preferences.darkMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    /// Light visual mode.
    Light,
    /// Dark visual mode.
    Dark,
}

impl ThemeMode {
    /// Mode implied by the record.
    #[must_use]
    pub const fn from_record(record: &UserRecord) -> Self {
        if record.preferences.dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// String identifier used in logs and CSS datasets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Whether the mode flag should be present on the root scope.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Root visual scope that receives style rules and mode flags.
pub trait VisualScope {
    /// Whether a style block with `id` is already registered.
    fn has_style(&self, id: &str) -> bool;

    /// Register a style block under `id`.
    fn insert_style(&mut self, id: &str, css: &str);

    /// Whether the flag `name` is currently applied.
    fn has_flag(&self, name: &str) -> bool;

    /// Add (`enabled`) or remove the flag `name`.
    fn set_flag(&mut self, name: &str, enabled: bool);
}

/// Register `css` under `id` unless a block with that id already exists.
///
/// Returns `true` when the block was inserted by this call.
pub fn ensure_style<V: VisualScope + ?Sized>(scope: &mut V, id: &str, css: &str) -> bool {
    if scope.has_style(id) {
        return false;
    }
    scope.insert_style(id, css);
    true
}

/// In-memory scope recording flags and style registrations.
#[derive(Debug, Default, Clone)]
pub struct MemoryScope {
    flags: BTreeSet<String>,
    styles: HashMap<String, String>,
    style_inserts: usize,
}

impl MemoryScope {
    /// Empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of style blocks ever inserted.
    #[must_use]
    pub const fn style_inserts(&self) -> usize {
        self.style_inserts
    }

    /// CSS registered under `id`.
    #[must_use]
    pub fn style(&self, id: &str) -> Option<&str> {
        self.styles.get(id).map(String::as_str)
    }

    /// Currently applied flags, sorted.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }
}

impl VisualScope for MemoryScope {
    fn has_style(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    fn insert_style(&mut self, id: &str, css: &str) {
        self.styles.insert(id.to_string(), css.to_string());
        self.style_inserts += 1;
    }

    fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    fn set_flag(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.flags.insert(name.to_string());
        } else {
            self.flags.remove(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_follows_dark_mode_preference() {
        let mut record = UserRecord::default();
        assert_eq!(ThemeMode::from_record(&record), ThemeMode::Light);
        record.preferences.dark_mode = true;
        assert_eq!(ThemeMode::from_record(&record), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.as_str(), "dark");
        assert!(!ThemeMode::Light.is_dark());
    }

    #[test]
    fn ensure_style_inserts_once() {
        let mut scope = MemoryScope::new();
        assert!(ensure_style(&mut scope, "dark-styles", "body{}"));
        assert!(!ensure_style(&mut scope, "dark-styles", "body{color:red}"));
        assert_eq!(scope.style_inserts(), 1);
        assert_eq!(scope.style("dark-styles"), Some("body{}"));
    }

    #[test]
    fn flags_behave_as_a_set() {
        let mut scope = MemoryScope::new();
        scope.set_flag("dark-mode", true);
        scope.set_flag("dark-mode", true);
        assert_eq!(scope.flags().collect::<Vec<_>>(), vec!["dark-mode"]);
        scope.set_flag("dark-mode", false);
        assert!(!scope.has_flag("dark-mode"));
        scope.set_flag("dark-mode", false);
        assert_eq!(scope.flags().count(), 0);
    }
}
