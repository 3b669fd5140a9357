//! Typed user record and its compiled-in default.
//!
//! # Design
//! - Pure data carriers; every section is mandatory so a stored record either
//!   decodes completely or not at all.
//! - Wire names are camelCase to keep the stored text stable across releases.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Complete user state: personal info, preferences, and security settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Contact and identity details.
    pub personal_info: PersonalInfo,
    /// Marketplace and display preferences.
    pub preferences: Preferences,
    /// Account security settings.
    pub security_settings: SecuritySettings,
}

/// Contact and identity details for the homeowner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    /// Full display name.
    pub full_name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Postal address used for service visits.
    pub address: String,
    /// URI or blob reference of the profile picture.
    pub profile_image: Option<String>,
}

/// Marketplace and display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Whether booking and provider notifications are delivered.
    pub receive_notifications: bool,
    /// Whether the dark visual mode is active.
    pub dark_mode: bool,
    /// Whether the marketing newsletter is delivered.
    pub newsletter_subscription: bool,
    /// Preferred service categories, in user-chosen order, without duplicates.
    pub service_preferences: Vec<String>,
    /// Search radius for provider listings, in miles.
    pub location_radius: f64,
}

/// Account security settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    /// Whether two-factor authentication is enabled.
    pub two_factor_auth: bool,
    /// Date string of the last password change, kept exactly as written.
    pub password_last_changed: String,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            full_name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            address: "123 Main St, Anytown, USA".to_string(),
            profile_image: None,
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            receive_notifications: true,
            dark_mode: false,
            newsletter_subscription: true,
            service_preferences: vec![
                "Plumbing".to_string(),
                "Electrical".to_string(),
                "Cleaning".to_string(),
            ],
            location_radius: 25.0,
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor_auth: false,
            password_last_changed: "2024-01-15".to_string(),
        }
    }
}

impl SecuritySettings {
    /// Calendar date of the last password change, when the stored text is a
    /// `YYYY-MM-DD` date or an RFC 3339 timestamp.
    #[must_use]
    pub fn password_changed_on(&self) -> Option<NaiveDate> {
        let text = self.password_last_changed.trim();
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|at| at.date_naive()))
    }
}

/// Text form used when a calendar date is written into the record.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl UserRecord {
    /// First whitespace-delimited token of the full name, or `""` when blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.personal_info
            .full_name
            .split_whitespace()
            .next()
            .unwrap_or("")
    }
}

/// Drop repeated categories, keeping the first occurrence of each.
#[must_use]
pub fn dedup_categories(categories: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(categories.len());
    for category in categories {
        if !unique.contains(&category) {
            unique.push(category);
        }
    }
    unique
}

/// Whether `radius` is usable as a search radius.
#[must_use]
pub fn is_valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius >= 0.0
}
