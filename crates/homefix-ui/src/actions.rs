//! UI-facing preference actions and the immutable view handed to components.
//!
//! # Design
//! - Components never touch the store; they emit a [`PreferenceAction`] and
//!   re-render from the next [`PreferenceView`].
//! - Kept DOM-free so the reducer runs under native tests with in-memory backends.

use homefix_prefs::{
    Field, FieldValue, PreferenceSlot, PreferenceStore, PrefsResult, SectionPatch, ThemeMode,
    UserRecord, VisualScope,
};

/// A single change requested by a component.
#[derive(Clone, Debug, PartialEq)]
pub enum PreferenceAction {
    /// Replace one field.
    SetField(Field, FieldValue),
    /// Shallow-merge a section patch.
    MergeSection(SectionPatch),
    /// Add or remove one service category.
    ToggleCategory(String),
    /// Restore the default record.
    Reset,
}

/// Immutable snapshot of the store rendered by components.
#[derive(Clone, Debug, PartialEq)]
pub struct PreferenceView {
    /// Current record.
    pub record: UserRecord,
    /// Greeting name derived from the record.
    pub display_name: String,
    /// Authentication stub result.
    pub authenticated: bool,
    /// Visual mode derived from the record.
    pub theme: ThemeMode,
}

impl PreferenceView {
    /// Capture the store's current state.
    #[must_use]
    pub fn capture<S: PreferenceSlot, V: VisualScope>(store: &PreferenceStore<S, V>) -> Self {
        Self {
            record: store.snapshot(),
            display_name: store.display_name().to_string(),
            authenticated: store.is_authenticated(),
            theme: store.theme_mode(),
        }
    }
}

/// Apply `action` to `store`.
///
/// # Errors
///
/// Propagates validation and storage errors from the store.
pub fn apply_action<S: PreferenceSlot, V: VisualScope>(
    store: &mut PreferenceStore<S, V>,
    action: PreferenceAction,
) -> PrefsResult<()> {
    match action {
        PreferenceAction::SetField(field, value) => store.update_field(field, value).map(drop),
        PreferenceAction::MergeSection(patch) => store.update_section(patch).map(drop),
        PreferenceAction::ToggleCategory(category) => {
            store.toggle_service_preference(&category).map(drop)
        }
        PreferenceAction::Reset => store.reset().map(drop),
    }
}
