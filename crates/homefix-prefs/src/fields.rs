//! Closed identifiers for record sections and fields, typed values, and patches.
//!
//! # Design
//! - Every writable field is a variant of [`Field`]; string names only enter
//!   through [`Section::from_str`] and [`Field::parse`], which reject unknowns.
//! - Field writes and section merges validate first and mutate second, so a
//!   rejected update never leaves a half-applied record behind.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{PrefsError, PrefsResult};
use crate::model::{DATE_FORMAT, UserRecord, dedup_categories, is_valid_radius};

/// Top-level group inside the user record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    /// Contact and identity details.
    PersonalInfo,
    /// Marketplace and display preferences.
    Preferences,
    /// Account security settings.
    SecuritySettings,
}

impl Section {
    /// All sections in record order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::PersonalInfo, Self::Preferences, Self::SecuritySettings]
    }

    /// Wire name used in the stored record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PersonalInfo => "personalInfo",
            Self::Preferences => "preferences",
            Self::SecuritySettings => "securitySettings",
        }
    }

    /// Fields belonging to this section, in record order.
    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::PersonalInfo => &[
                Field::FullName,
                Field::Email,
                Field::Phone,
                Field::Address,
                Field::ProfileImage,
            ],
            Self::Preferences => &[
                Field::ReceiveNotifications,
                Field::DarkMode,
                Field::NewsletterSubscription,
                Field::ServicePreferences,
                Field::LocationRadius,
            ],
            Self::SecuritySettings => &[Field::TwoFactorAuth, Field::PasswordLastChanged],
        }
    }
}

impl FromStr for Section {
    type Err = PrefsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| PrefsError::UnknownSection {
                section: value.to_string(),
            })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writable field of the user record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// `personalInfo.fullName`.
    FullName,
    /// `personalInfo.email`.
    Email,
    /// `personalInfo.phone`.
    Phone,
    /// `personalInfo.address`.
    Address,
    /// `personalInfo.profileImage`.
    ProfileImage,
    /// `preferences.receiveNotifications`.
    ReceiveNotifications,
    /// `preferences.darkMode`.
    DarkMode,
    /// `preferences.newsletterSubscription`.
    NewsletterSubscription,
    /// `preferences.servicePreferences`.
    ServicePreferences,
    /// `preferences.locationRadius`.
    LocationRadius,
    /// `securitySettings.twoFactorAuth`.
    TwoFactorAuth,
    /// `securitySettings.passwordLastChanged`.
    PasswordLastChanged,
}

/// Kind of value a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain text.
    Text,
    /// Text or nothing.
    OptionalText,
    /// Boolean toggle.
    Flag,
    /// Finite non-negative number.
    Number,
    /// Ordered list of names.
    List,
    /// Date string, or a calendar date formatted as `YYYY-MM-DD`.
    Date,
}

impl ValueKind {
    const fn describe(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::OptionalText => "optional text",
            Self::Flag => "boolean",
            Self::Number => "number",
            Self::List => "list",
            Self::Date => "date string",
        }
    }
}

impl Field {
    /// Section the field lives in.
    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::FullName | Self::Email | Self::Phone | Self::Address | Self::ProfileImage => {
                Section::PersonalInfo
            }
            Self::ReceiveNotifications
            | Self::DarkMode
            | Self::NewsletterSubscription
            | Self::ServicePreferences
            | Self::LocationRadius => Section::Preferences,
            Self::TwoFactorAuth | Self::PasswordLastChanged => Section::SecuritySettings,
        }
    }

    /// Wire name used in the stored record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::ProfileImage => "profileImage",
            Self::ReceiveNotifications => "receiveNotifications",
            Self::DarkMode => "darkMode",
            Self::NewsletterSubscription => "newsletterSubscription",
            Self::ServicePreferences => "servicePreferences",
            Self::LocationRadius => "locationRadius",
            Self::TwoFactorAuth => "twoFactorAuth",
            Self::PasswordLastChanged => "passwordLastChanged",
        }
    }

    /// Kind of value the field accepts.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::FullName | Self::Email | Self::Phone | Self::Address => ValueKind::Text,
            Self::ProfileImage => ValueKind::OptionalText,
            Self::ReceiveNotifications
            | Self::DarkMode
            | Self::NewsletterSubscription
            | Self::TwoFactorAuth => ValueKind::Flag,
            Self::ServicePreferences => ValueKind::List,
            Self::LocationRadius => ValueKind::Number,
            Self::PasswordLastChanged => ValueKind::Date,
        }
    }

    /// Resolve a field by section and wire name.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::UnknownField`] when `name` is not a field of `section`.
    pub fn parse(section: Section, name: &str) -> PrefsResult<Self> {
        section
            .fields()
            .iter()
            .copied()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| PrefsError::UnknownField {
                section: section.as_str().to_string(),
                field: name.to_string(),
            })
    }

    fn type_error(self) -> PrefsError {
        PrefsError::FieldType {
            field: self.as_str(),
            expected: self.kind().describe(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section().as_str(), self.as_str())
    }
}

/// New value for a single field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Plain text.
    Text(String),
    /// Text or nothing (clears optional fields).
    OptionalText(Option<String>),
    /// Boolean toggle.
    Flag(bool),
    /// Numeric value.
    Number(f64),
    /// Ordered list of names.
    List(Vec<String>),
    /// Calendar date, stored as `YYYY-MM-DD` text.
    Date(NaiveDate),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        Self::OptionalText(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Replace one field of `record` with `value`.
///
/// # Errors
///
/// Returns [`PrefsError::FieldType`] when the value kind does not match the
/// field, or [`PrefsError::InvalidValue`] when a constraint is violated. The
/// record is untouched on error.
pub(crate) fn apply_field(record: &mut UserRecord, field: Field, value: FieldValue) -> PrefsResult<()> {
    let personal = &mut record.personal_info;
    let prefs = &mut record.preferences;
    let security = &mut record.security_settings;
    match (field, value) {
        (Field::FullName, FieldValue::Text(text)) => personal.full_name = text,
        (Field::Email, FieldValue::Text(text)) => personal.email = text,
        (Field::Phone, FieldValue::Text(text)) => personal.phone = text,
        (Field::Address, FieldValue::Text(text)) => personal.address = text,
        (Field::ProfileImage, FieldValue::Text(text)) => personal.profile_image = Some(text),
        (Field::ProfileImage, FieldValue::OptionalText(text)) => personal.profile_image = text,
        (Field::ReceiveNotifications, FieldValue::Flag(flag)) => prefs.receive_notifications = flag,
        (Field::DarkMode, FieldValue::Flag(flag)) => prefs.dark_mode = flag,
        (Field::NewsletterSubscription, FieldValue::Flag(flag)) => {
            prefs.newsletter_subscription = flag;
        }
        (Field::ServicePreferences, FieldValue::List(list)) => {
            prefs.service_preferences = dedup_categories(list);
        }
        (Field::LocationRadius, FieldValue::Number(radius)) => {
            prefs.location_radius = checked_radius(radius)?;
        }
        (Field::TwoFactorAuth, FieldValue::Flag(flag)) => security.two_factor_auth = flag,
        (Field::PasswordLastChanged, FieldValue::Text(text)) => {
            security.password_last_changed = text;
        }
        (Field::PasswordLastChanged, FieldValue::Date(date)) => {
            security.password_last_changed = date.format(DATE_FORMAT).to_string();
        }
        (field, _) => return Err(field.type_error()),
    }
    Ok(())
}

fn checked_radius(radius: f64) -> PrefsResult<f64> {
    if is_valid_radius(radius) {
        Ok(radius)
    } else {
        Err(PrefsError::InvalidValue {
            field: Field::LocationRadius.as_str(),
            reason: "must be a finite, non-negative number",
        })
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update for [`Section::PersonalInfo`]; `None` leaves a field as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonalInfoPatch {
    /// Replacement full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Replacement email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Replacement phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Replacement postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// `Some(None)` clears the picture; `None` leaves it unchanged.
    #[serde(default, deserialize_with = "present")]
    pub profile_image: Option<Option<String>>,
}

/// Partial update for [`Section::Preferences`]; `None` leaves a field as-is.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreferencesPatch {
    /// Replacement notification toggle.
    #[serde(default)]
    pub receive_notifications: Option<bool>,
    /// Replacement dark mode toggle.
    #[serde(default)]
    pub dark_mode: Option<bool>,
    /// Replacement newsletter toggle.
    #[serde(default)]
    pub newsletter_subscription: Option<bool>,
    /// Replacement category list (deduplicated on apply).
    #[serde(default)]
    pub service_preferences: Option<Vec<String>>,
    /// Replacement search radius.
    #[serde(default)]
    pub location_radius: Option<f64>,
}

/// Partial update for [`Section::SecuritySettings`]; `None` leaves a field as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecuritySettingsPatch {
    /// Replacement two-factor toggle.
    #[serde(default)]
    pub two_factor_auth: Option<bool>,
    /// Replacement password change date string.
    #[serde(default)]
    pub password_last_changed: Option<String>,
}

/// Shallow merge payload targeting exactly one section.
#[derive(Clone, Debug, PartialEq)]
pub enum SectionPatch {
    /// Merge into `personalInfo`.
    PersonalInfo(PersonalInfoPatch),
    /// Merge into `preferences`.
    Preferences(PreferencesPatch),
    /// Merge into `securitySettings`.
    SecuritySettings(SecuritySettingsPatch),
}

impl From<PersonalInfoPatch> for SectionPatch {
    fn from(patch: PersonalInfoPatch) -> Self {
        Self::PersonalInfo(patch)
    }
}

impl From<PreferencesPatch> for SectionPatch {
    fn from(patch: PreferencesPatch) -> Self {
        Self::Preferences(patch)
    }
}

impl From<SecuritySettingsPatch> for SectionPatch {
    fn from(patch: SecuritySettingsPatch) -> Self {
        Self::SecuritySettings(patch)
    }
}

impl SectionPatch {
    /// Section this patch merges into.
    #[must_use]
    pub const fn section(&self) -> Section {
        match self {
            Self::PersonalInfo(_) => Section::PersonalInfo,
            Self::Preferences(_) => Section::Preferences,
            Self::SecuritySettings(_) => Section::SecuritySettings,
        }
    }

    /// Decode a key/value object into a patch for `section`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::UnknownField`] for keys outside the section and
    /// [`PrefsError::InvalidPatch`] when the payload is not an object or a
    /// value has the wrong shape.
    pub fn from_json(section: Section, payload: &Value) -> PrefsResult<Self> {
        if let Some(map) = payload.as_object() {
            for key in map.keys() {
                Field::parse(section, key)?;
            }
        }
        let decode_err = |source| PrefsError::InvalidPatch {
            section: section.as_str(),
            source,
        };
        let payload = payload.clone();
        let patch = match section {
            Section::PersonalInfo => {
                Self::PersonalInfo(serde_json::from_value(payload).map_err(decode_err)?)
            }
            Section::Preferences => {
                Self::Preferences(serde_json::from_value(payload).map_err(decode_err)?)
            }
            Section::SecuritySettings => {
                Self::SecuritySettings(serde_json::from_value(payload).map_err(decode_err)?)
            }
        };
        Ok(patch)
    }

    /// Fields this patch replaces.
    #[must_use]
    pub fn touched(&self) -> Vec<Field> {
        let mut touched = Vec::new();
        match self {
            Self::PersonalInfo(patch) => {
                push_if(&mut touched, patch.full_name.is_some(), Field::FullName);
                push_if(&mut touched, patch.email.is_some(), Field::Email);
                push_if(&mut touched, patch.phone.is_some(), Field::Phone);
                push_if(&mut touched, patch.address.is_some(), Field::Address);
                push_if(&mut touched, patch.profile_image.is_some(), Field::ProfileImage);
            }
            Self::Preferences(patch) => {
                push_if(
                    &mut touched,
                    patch.receive_notifications.is_some(),
                    Field::ReceiveNotifications,
                );
                push_if(&mut touched, patch.dark_mode.is_some(), Field::DarkMode);
                push_if(
                    &mut touched,
                    patch.newsletter_subscription.is_some(),
                    Field::NewsletterSubscription,
                );
                push_if(
                    &mut touched,
                    patch.service_preferences.is_some(),
                    Field::ServicePreferences,
                );
                push_if(&mut touched, patch.location_radius.is_some(), Field::LocationRadius);
            }
            Self::SecuritySettings(patch) => {
                push_if(&mut touched, patch.two_factor_auth.is_some(), Field::TwoFactorAuth);
                push_if(
                    &mut touched,
                    patch.password_last_changed.is_some(),
                    Field::PasswordLastChanged,
                );
            }
        }
        touched
    }

    /// Shallow-merge the patch into `record`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::InvalidValue`] when a patched value violates a
    /// field constraint; the record is untouched on error.
    pub(crate) fn apply(self, record: &mut UserRecord) -> PrefsResult<()> {
        match self {
            Self::PersonalInfo(patch) => {
                let target = &mut record.personal_info;
                if let Some(value) = patch.full_name {
                    target.full_name = value;
                }
                if let Some(value) = patch.email {
                    target.email = value;
                }
                if let Some(value) = patch.phone {
                    target.phone = value;
                }
                if let Some(value) = patch.address {
                    target.address = value;
                }
                if let Some(value) = patch.profile_image {
                    target.profile_image = value;
                }
            }
            Self::Preferences(patch) => {
                let radius = patch.location_radius.map(checked_radius).transpose()?;
                let target = &mut record.preferences;
                if let Some(value) = patch.receive_notifications {
                    target.receive_notifications = value;
                }
                if let Some(value) = patch.dark_mode {
                    target.dark_mode = value;
                }
                if let Some(value) = patch.newsletter_subscription {
                    target.newsletter_subscription = value;
                }
                if let Some(value) = patch.service_preferences {
                    target.service_preferences = dedup_categories(value);
                }
                if let Some(value) = radius {
                    target.location_radius = value;
                }
            }
            Self::SecuritySettings(patch) => {
                let target = &mut record.security_settings;
                if let Some(value) = patch.two_factor_auth {
                    target.two_factor_auth = value;
                }
                if let Some(value) = patch.password_last_changed {
                    target.password_last_changed = value;
                }
            }
        }
        Ok(())
    }
}

fn push_if(touched: &mut Vec<Field>, present: bool, field: Field) {
    if present {
        touched.push(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    #[test]
    fn section_names_parse_and_reject_unknowns() {
        assert_eq!("preferences".parse::<Section>().ok(), Some(Section::Preferences));
        assert!(matches!(
            "billing".parse::<Section>(),
            Err(PrefsError::UnknownSection { section }) if section == "billing"
        ));
    }

    #[test]
    fn every_field_resolves_through_its_own_section() -> Result<(), Box<dyn Error>> {
        for section in Section::all() {
            for field in section.fields() {
                assert_eq!(field.section(), section);
                assert_eq!(Field::parse(section, field.as_str())?, *field);
            }
        }
        assert!(matches!(
            Field::parse(Section::SecuritySettings, "darkMode"),
            Err(PrefsError::UnknownField { .. })
        ));
        Ok(())
    }

    #[test]
    fn apply_field_rejects_mismatched_kinds() {
        let mut record = UserRecord::default();
        let err = apply_field(&mut record, Field::DarkMode, FieldValue::from("yes"));
        assert!(matches!(
            err,
            Err(PrefsError::FieldType {
                field: "darkMode",
                expected: "boolean"
            })
        ));
        assert_eq!(record, UserRecord::default());
    }

    #[test]
    fn apply_field_validates_radius() {
        let mut record = UserRecord::default();
        let err = apply_field(&mut record, Field::LocationRadius, FieldValue::Number(-5.0));
        assert!(matches!(err, Err(PrefsError::InvalidValue { .. })));
        assert!((record.preferences.location_radius - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn profile_image_accepts_text_and_clear() -> Result<(), Box<dyn Error>> {
        let mut record = UserRecord::default();
        apply_field(&mut record, Field::ProfileImage, "blob:avatar-1".into())?;
        assert_eq!(
            record.personal_info.profile_image.as_deref(),
            Some("blob:avatar-1")
        );
        apply_field(&mut record, Field::ProfileImage, FieldValue::OptionalText(None))?;
        assert_eq!(record.personal_info.profile_image, None);
        Ok(())
    }

    #[test]
    fn patch_from_json_rejects_foreign_keys() {
        let err = SectionPatch::from_json(
            Section::Preferences,
            &json!({ "darkMode": true, "fullName": "Jane" }),
        );
        assert!(matches!(
            err,
            Err(PrefsError::UnknownField { section, field })
                if section == "preferences" && field == "fullName"
        ));
    }

    #[test]
    fn patch_from_json_rejects_wrong_shapes() {
        let err = SectionPatch::from_json(Section::Preferences, &json!({ "darkMode": "on" }));
        assert!(matches!(
            err,
            Err(PrefsError::InvalidPatch {
                section: "preferences",
                ..
            })
        ));
        let err = SectionPatch::from_json(Section::Preferences, &json!(["darkMode"]));
        assert!(matches!(err, Err(PrefsError::InvalidPatch { .. })));
    }

    #[test]
    fn patch_distinguishes_clearing_from_omitting_profile_image() -> Result<(), Box<dyn Error>> {
        let cleared = SectionPatch::from_json(Section::PersonalInfo, &json!({ "profileImage": null }))?;
        assert_eq!(cleared.touched(), vec![Field::ProfileImage]);

        let omitted = SectionPatch::from_json(Section::PersonalInfo, &json!({ "phone": "555" }))?;
        assert_eq!(omitted.touched(), vec![Field::Phone]);
        Ok(())
    }

    #[test]
    fn preferences_patch_merges_and_dedups() -> Result<(), Box<dyn Error>> {
        let mut record = UserRecord::default();
        let patch = SectionPatch::from(PreferencesPatch {
            service_preferences: Some(
                ["HVAC", "Roofing", "HVAC"].map(String::from).to_vec(),
            ),
            location_radius: Some(40.0),
            ..PreferencesPatch::default()
        });
        patch.apply(&mut record)?;
        assert_eq!(
            record.preferences.service_preferences,
            ["HVAC", "Roofing"].map(String::from).to_vec()
        );
        assert!((record.preferences.location_radius - 40.0).abs() < f64::EPSILON);
        assert!(record.preferences.receive_notifications);
        assert_eq!(record.personal_info, UserRecord::default().personal_info);
        Ok(())
    }

    #[test]
    fn invalid_radius_in_patch_leaves_section_untouched() {
        let mut record = UserRecord::default();
        let patch = SectionPatch::from(PreferencesPatch {
            dark_mode: Some(true),
            location_radius: Some(f64::NAN),
            ..PreferencesPatch::default()
        });
        assert!(patch.apply(&mut record).is_err());
        assert!(!record.preferences.dark_mode);
    }

    #[test]
    fn security_patch_keeps_date_strings_verbatim() -> Result<(), Box<dyn Error>> {
        let mut record = UserRecord::default();
        SectionPatch::from_json(
            Section::SecuritySettings,
            &json!({ "passwordLastChanged": "2025-06-30T08:00:00Z", "twoFactorAuth": true }),
        )?
        .apply(&mut record)?;
        assert!(record.security_settings.two_factor_auth);
        assert_eq!(
            record.security_settings.password_last_changed,
            "2025-06-30T08:00:00Z"
        );
        Ok(())
    }

    #[test]
    fn password_date_accepts_text_and_calendar_dates() -> Result<(), Box<dyn Error>> {
        let mut record = UserRecord::default();
        apply_field(&mut record, Field::PasswordLastChanged, "2024-02-01".into())?;
        assert_eq!(record.security_settings.password_last_changed, "2024-02-01");

        let date = NaiveDate::from_ymd_opt(2025, 6, 30).ok_or("bad date")?;
        apply_field(&mut record, Field::PasswordLastChanged, date.into())?;
        assert_eq!(record.security_settings.password_last_changed, "2025-06-30");

        let err = apply_field(&mut record, Field::PasswordLastChanged, true.into());
        assert!(matches!(
            err,
            Err(PrefsError::FieldType {
                field: "passwordLastChanged",
                expected: "date string"
            })
        ));
        Ok(())
    }
}
