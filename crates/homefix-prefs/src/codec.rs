//! Text encoding of the user record for the durable slot.

use tracing::debug;

use crate::error::{PrefsError, PrefsResult};
use crate::model::{UserRecord, dedup_categories, is_valid_radius};

/// Serialise the full record as JSON text.
///
/// # Errors
///
/// Returns [`PrefsError::Encode`] if serialisation fails.
pub fn encode(record: &UserRecord) -> PrefsResult<String> {
    serde_json::to_string(record).map_err(|source| PrefsError::Encode { source })
}

/// Reason stored text could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// Human-readable failure detail.
    pub detail: String,
}

/// Parse stored JSON text into a complete record.
///
/// Only structural problems reject the record. Categories are deduplicated
/// and a negative radius is clamped to zero on the way in.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] describing why the text was rejected.
pub fn decode(text: &str) -> Result<UserRecord, DecodeFailure> {
    let mut record: UserRecord = serde_json::from_str(text).map_err(|err| DecodeFailure {
        detail: err.to_string(),
    })?;
    let radius = record.preferences.location_radius;
    if !is_valid_radius(radius) {
        debug!(radius, "stored locationRadius out of range; clamped to zero");
        record.preferences.location_radius = 0.0;
    }
    let categories = std::mem::take(&mut record.preferences.service_preferences);
    record.preferences.service_preferences = dedup_categories(categories);
    Ok(record)
}
