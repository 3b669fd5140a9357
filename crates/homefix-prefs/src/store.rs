//! The user preference store: single source of truth for the user record.
//!
//! # Design
//! - Constructed explicitly with [`PreferenceStore::init`] and released with
//!   [`PreferenceStore::teardown`]; consumers receive it by reference.
//! - Every mutation works on a copy, commits it, re-applies the dark-mode
//!   effect, then writes the whole record to the slot.
//! - Unreadable stored data falls back to the default record; the fallback is
//!   reported through `tracing` and the optional diagnostic callback.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::StoreConfig;
use crate::effect::{ThemeMode, VisualScope, ensure_style};
use crate::error::{PrefsError, PrefsResult};
use crate::fields::{Field, FieldValue, Section, SectionPatch, apply_field};
use crate::model::UserRecord;
use crate::slot::PreferenceSlot;
use crate::theme::dark_mode_rules;

/// Why the stored record was not used at initialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnosticKind {
    /// Nothing was stored under the key (first run).
    Missing,
    /// Stored text did not decode into a complete record.
    Malformed {
        /// Decoder failure detail.
        detail: String,
    },
    /// The slot could not be read.
    Unreadable {
        /// Backend failure detail.
        detail: String,
    },
}

/// Report emitted when initialisation substitutes the default record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDiagnostic {
    /// Slot key that was read.
    pub key: String,
    /// Reason the stored value was discarded.
    pub kind: LoadDiagnosticKind,
}

/// Callback receiving load diagnostics.
pub type DiagnosticSink = Box<dyn Fn(&LoadDiagnostic)>;

/// Backends and final record handed back by [`PreferenceStore::teardown`].
#[derive(Debug)]
pub struct StoreParts<S, V> {
    /// Record at teardown time.
    pub record: UserRecord,
    /// Durable slot backend.
    pub slot: S,
    /// Visual scope backend (mode flag cleared).
    pub scope: V,
}

/// Owner of the user record, its durable slot, and its visual scope.
pub struct PreferenceStore<S, V> {
    config: StoreConfig,
    record: UserRecord,
    slot: S,
    scope: V,
}

impl<S: PreferenceSlot, V: VisualScope> PreferenceStore<S, V> {
    /// Build a store, loading the record from `slot` or falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::InvalidConfig`] when `config` fails validation.
    /// Missing or malformed stored data is never an error.
    pub fn init(config: StoreConfig, slot: S, scope: V) -> PrefsResult<Self> {
        Self::init_inner(config, slot, scope, None)
    }

    /// Like [`PreferenceStore::init`], additionally forwarding every discarded
    /// stored record to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::InvalidConfig`] when `config` fails validation.
    pub fn init_with_diagnostics(
        config: StoreConfig,
        slot: S,
        scope: V,
        sink: impl Fn(&LoadDiagnostic) + 'static,
    ) -> PrefsResult<Self> {
        let sink: DiagnosticSink = Box::new(sink);
        Self::init_inner(config, slot, scope, Some(sink))
    }

    fn init_inner(
        config: StoreConfig,
        slot: S,
        mut scope: V,
        sink: Option<DiagnosticSink>,
    ) -> PrefsResult<Self> {
        config.validate()?;
        if ensure_style(&mut scope, &config.style_id, &dark_mode_rules(&config.mode_flag)) {
            debug!(style_id = %config.style_id, "dark mode styles registered");
        }

        let record = match load_record(&slot, &config.storage_key) {
            Ok(record) => {
                debug!(key = %config.storage_key, "user record loaded");
                record
            }
            Err(diagnostic) => {
                report(&diagnostic, sink.as_ref());
                UserRecord::default()
            }
        };

        let mut store = Self {
            config,
            record,
            slot,
            scope,
        };
        store.apply_effect();
        Ok(store)
    }

    /// Current record.
    #[must_use]
    pub const fn record(&self) -> &UserRecord {
        &self.record
    }

    /// Owned copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> UserRecord {
        self.record.clone()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Durable slot backend.
    #[must_use]
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Mutable access to the durable slot backend.
    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    /// Visual scope backend.
    #[must_use]
    pub const fn scope(&self) -> &V {
        &self.scope
    }

    /// Visual mode currently derived from the record.
    #[must_use]
    pub const fn theme_mode(&self) -> ThemeMode {
        ThemeMode::from_record(&self.record)
    }

    /// First whitespace-delimited token of the user's full name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.record.display_name()
    }

    /// Whether a user is signed in. Always `true`: there is no auth backend.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        true
    }

    /// Replace a single field.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::FieldType`] or [`PrefsError::InvalidValue`] for a
    /// rejected value (nothing changes), or a storage error when the write
    /// fails (the new record stays committed in memory).
    pub fn update_field(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> PrefsResult<&UserRecord> {
        let value = value.into();
        self.mutate(field.as_str(), |record| apply_field(record, field, value))
    }

    /// Replace a single field addressed by wire names.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::UnknownSection`] or [`PrefsError::UnknownField`]
    /// for names outside the record, plus everything [`Self::update_field`] returns.
    pub fn update_field_named(
        &mut self,
        section: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> PrefsResult<&UserRecord> {
        let field = Field::parse(section.parse::<Section>()?, field)?;
        self.update_field(field, value)
    }

    /// Shallow-merge a patch into its section.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::InvalidValue`] for a rejected value (nothing
    /// changes), or a storage error when the write fails.
    pub fn update_section(&mut self, patch: impl Into<SectionPatch>) -> PrefsResult<&UserRecord> {
        let patch = patch.into();
        let section = patch.section();
        let touched: Vec<&str> = patch.touched().into_iter().map(Field::as_str).collect();
        debug!(section = %section, fields = ?touched, "merging section patch");
        self.mutate(section.as_str(), |record| patch.apply(record))
    }

    /// Shallow-merge a JSON object into `section`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::UnknownField`] or [`PrefsError::InvalidPatch`]
    /// when the payload does not describe fields of `section`, plus everything
    /// [`Self::update_section`] returns.
    pub fn update_section_json(
        &mut self,
        section: Section,
        payload: &Value,
    ) -> PrefsResult<&UserRecord> {
        let patch = SectionPatch::from_json(section, payload)?;
        self.update_section(patch)
    }

    /// Add `category` to the service preferences, or remove it when present.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::InvalidValue`] for a blank category, or a storage
    /// error when the write fails.
    pub fn toggle_service_preference(&mut self, category: &str) -> PrefsResult<&UserRecord> {
        let category = category.trim();
        if category.is_empty() {
            return Err(PrefsError::InvalidValue {
                field: Field::ServicePreferences.as_str(),
                reason: "category must not be blank",
            });
        }
        self.mutate(Field::ServicePreferences.as_str(), |record| {
            let list = &mut record.preferences.service_preferences;
            if let Some(index) = list.iter().position(|entry| entry == category) {
                list.remove(index);
            } else {
                list.push(category.to_string());
            }
            Ok(())
        })
    }

    /// Restore the compiled-in default record.
    ///
    /// The slot entry is removed before the default is written back.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the slot cannot be cleared (nothing
    /// changes) or when writing the default fails.
    pub fn reset(&mut self) -> PrefsResult<&UserRecord> {
        self.slot.remove(&self.config.storage_key)?;
        info!(key = %self.config.storage_key, "user record reset to defaults");
        self.commit(UserRecord::default(), "reset")
    }

    /// Release the store, clearing the mode flag from the scope.
    ///
    /// Registered style rules stay in place for the scope's lifetime.
    #[must_use]
    pub fn teardown(mut self) -> StoreParts<S, V> {
        self.scope.set_flag(&self.config.mode_flag, false);
        info!(key = %self.config.storage_key, "preference store torn down");
        StoreParts {
            record: self.record,
            slot: self.slot,
            scope: self.scope,
        }
    }

    fn mutate<F>(&mut self, change: &'static str, apply: F) -> PrefsResult<&UserRecord>
    where
        F: FnOnce(&mut UserRecord) -> PrefsResult<()>,
    {
        let mut next = self.record.clone();
        apply(&mut next)?;
        self.commit(next, change)
    }

    fn commit(&mut self, next: UserRecord, change: &'static str) -> PrefsResult<&UserRecord> {
        self.record = next;
        self.apply_effect();
        let text = codec::encode(&self.record)?;
        self.slot.write(&self.config.storage_key, &text)?;
        debug!(
            key = %self.config.storage_key,
            change,
            bytes = text.len(),
            "user record persisted"
        );
        Ok(&self.record)
    }

    fn apply_effect(&mut self) {
        let mode = self.theme_mode();
        self.scope.set_flag(&self.config.mode_flag, mode.is_dark());
        debug!(mode = mode.as_str(), "visual mode applied");
    }
}

fn load_record<S: PreferenceSlot>(slot: &S, key: &str) -> Result<UserRecord, LoadDiagnostic> {
    let diagnostic = |kind| LoadDiagnostic {
        key: key.to_string(),
        kind,
    };
    match slot.read(key) {
        Ok(Some(text)) => codec::decode(&text)
            .map_err(|failure| diagnostic(LoadDiagnosticKind::Malformed { detail: failure.detail })),
        Ok(None) => Err(diagnostic(LoadDiagnosticKind::Missing)),
        Err(err) => Err(diagnostic(LoadDiagnosticKind::Unreadable {
            detail: err.to_string(),
        })),
    }
}

fn report(diagnostic: &LoadDiagnostic, sink: Option<&DiagnosticSink>) {
    match &diagnostic.kind {
        LoadDiagnosticKind::Missing => {
            debug!(key = %diagnostic.key, "no stored user record; using defaults");
            return;
        }
        LoadDiagnosticKind::Malformed { detail } => {
            warn!(key = %diagnostic.key, detail = %detail, "discarding malformed stored user record");
        }
        LoadDiagnosticKind::Unreadable { detail } => {
            warn!(key = %diagnostic.key, detail = %detail, "stored user record unreadable; using defaults");
        }
    }
    if let Some(sink) = sink {
        sink(diagnostic);
    }
}
