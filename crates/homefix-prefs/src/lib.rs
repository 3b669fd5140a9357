#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! DOM-free user preference store for the Homefix marketplace front end.
//!
//! Layout: `model.rs` (record and defaults), `fields.rs` (closed section and
//! field identifiers, patches), `codec.rs` (stored text format), `slot.rs`
//! (durable key-value port), `effect.rs` + `theme.rs` (dark-mode effect and
//! its style rules), `config.rs`, and `store.rs` (`PreferenceStore`).

pub mod codec;
pub mod config;
pub mod effect;
pub mod error;
pub mod fields;
pub mod model;
pub mod slot;
pub mod store;
pub mod theme;

pub use config::StoreConfig;
pub use effect::{MemoryScope, ThemeMode, VisualScope};
pub use error::{PrefsError, PrefsResult};
pub use fields::{
    Field, FieldValue, PersonalInfoPatch, PreferencesPatch, Section, SectionPatch,
    SecuritySettingsPatch,
};
pub use model::{PersonalInfo, Preferences, SecuritySettings, UserRecord};
#[cfg(not(target_arch = "wasm32"))]
pub use slot::FileSlot;
pub use slot::{MemorySlot, PreferenceSlot};
pub use store::{LoadDiagnostic, LoadDiagnosticKind, PreferenceStore, StoreParts};
