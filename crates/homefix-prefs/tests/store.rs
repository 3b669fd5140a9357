use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use homefix_prefs::codec;
use homefix_prefs::{
    Field, FileSlot, LoadDiagnostic, LoadDiagnosticKind, MemoryScope, MemorySlot, PersonalInfoPatch,
    PreferenceSlot, PreferenceStore, Section, StoreConfig, UserRecord, VisualScope,
};
use serde_json::json;

const KEY: &str = "homefix.user";
const FLAG: &str = "dark-mode";

type MemoryStore = PreferenceStore<MemorySlot, MemoryScope>;

fn memory_store() -> Result<MemoryStore, Box<dyn Error>> {
    Ok(PreferenceStore::init(
        StoreConfig::default(),
        MemorySlot::new(),
        MemoryScope::new(),
    )?)
}

#[test]
fn section_merge_leaves_unnamed_fields_unchanged() -> Result<(), Box<dyn Error>> {
    let mut store = memory_store()?;
    store.update_section(PersonalInfoPatch {
        email: Some("jane@example.com".to_string()),
        phone: Some("(555) 987-6543".to_string()),
        ..PersonalInfoPatch::default()
    })?;

    let defaults = UserRecord::default();
    let record = store.record();
    assert_eq!(record.personal_info.email, "jane@example.com");
    assert_eq!(record.personal_info.phone, "(555) 987-6543");
    assert_eq!(record.personal_info.full_name, defaults.personal_info.full_name);
    assert_eq!(record.personal_info.address, defaults.personal_info.address);
    assert_eq!(record.personal_info.profile_image, None);
    assert_eq!(record.preferences, defaults.preferences);
    assert_eq!(record.security_settings, defaults.security_settings);
    Ok(())
}

#[test]
fn json_section_merge_matches_typed_merge() -> Result<(), Box<dyn Error>> {
    let mut store = memory_store()?;
    store.update_section_json(
        Section::Preferences,
        &json!({ "newsletterSubscription": false, "locationRadius": 10 }),
    )?;
    let prefs = &store.record().preferences;
    assert!(!prefs.newsletter_subscription);
    assert!((prefs.location_radius - 10.0).abs() < f64::EPSILON);
    assert!(prefs.receive_notifications);
    assert_eq!(prefs.service_preferences, UserRecord::default().preferences.service_preferences);
    Ok(())
}

#[test]
fn reset_restores_defaults_and_replaces_stored_record() -> Result<(), Box<dyn Error>> {
    let mut store = memory_store()?;
    store.update_field(Field::FullName, "Jane Q. Public")?;
    store.update_field(Field::DarkMode, true)?;
    let prior = store.slot().get(KEY).map(str::to_string).ok_or("nothing stored")?;

    store.reset()?;

    assert_eq!(store.record(), &UserRecord::default());
    assert_eq!(store.slot().remove_count(), 1);
    let stored = store.slot().get(KEY).ok_or("default not stored")?;
    assert_ne!(stored, prior);
    assert_eq!(codec::decode(stored).map_err(|err| err.detail)?, UserRecord::default());
    assert!(!store.scope().has_flag(FLAG));
    Ok(())
}

#[test]
fn malformed_stored_text_falls_back_to_defaults() -> Result<(), Box<dyn Error>> {
    let seen = Rc::new(RefCell::new(Vec::<LoadDiagnostic>::new()));
    let sink = {
        let seen = Rc::clone(&seen);
        move |diagnostic: &LoadDiagnostic| seen.borrow_mut().push(diagnostic.clone())
    };
    let slot = MemorySlot::with_entry(KEY, "{\"personalInfo\": \"oops\"");
    let store =
        PreferenceStore::init_with_diagnostics(StoreConfig::default(), slot, MemoryScope::new(), sink)?;

    assert_eq!(store.record(), &UserRecord::default());
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].key, KEY);
    assert!(matches!(seen[0].kind, LoadDiagnosticKind::Malformed { .. }));
    Ok(())
}

#[test]
fn dark_mode_flag_tracks_preference_and_styles_register_once() -> Result<(), Box<dyn Error>> {
    let mut store = memory_store()?;
    assert!(!store.scope().has_flag(FLAG));

    store.update_field(Field::DarkMode, true)?;
    assert!(store.scope().has_flag(FLAG));
    assert_eq!(store.scope().flags().filter(|flag| *flag == FLAG).count(), 1);

    store.update_field(Field::DarkMode, false)?;
    assert!(!store.scope().has_flag(FLAG));

    for value in [true, true, false, true] {
        store.update_field(Field::DarkMode, value)?;
    }
    assert!(store.scope().has_flag(FLAG));
    assert_eq!(store.scope().style_inserts(), 1);
    Ok(())
}

#[test]
fn reinitialising_on_the_same_scope_keeps_one_style_block() -> Result<(), Box<dyn Error>> {
    let store = memory_store()?;
    let parts = store.teardown();
    let store = PreferenceStore::init(StoreConfig::default(), parts.slot, parts.scope)?;
    assert_eq!(store.scope().style_inserts(), 1);
    Ok(())
}

#[test]
fn display_name_uses_first_token() -> Result<(), Box<dyn Error>> {
    let mut store = memory_store()?;
    store.update_field_named("personalInfo", "fullName", "Jane Q. Public")?;
    assert_eq!(store.display_name(), "Jane");
    Ok(())
}

#[test]
fn two_updates_persist_twice() -> Result<(), Box<dyn Error>> {
    let mut store = memory_store()?;
    store.update_field_named("preferences", "darkMode", true)?;
    store.update_field_named("preferences", "locationRadius", 25_u32)?;

    let mut expected = UserRecord::default();
    expected.preferences.dark_mode = true;
    expected.preferences.location_radius = 25.0;
    assert_eq!(store.record(), &expected);
    assert_eq!(store.slot().write_count(), 2);

    let stored = store.slot().get(KEY).ok_or("record not stored")?;
    assert_eq!(codec::decode(stored).map_err(|err| err.detail)?, expected);
    Ok(())
}

#[test]
fn file_backed_store_survives_restart() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let config = StoreConfig::default();

    let mut store = PreferenceStore::init(config.clone(), FileSlot::new(dir.path()), MemoryScope::new())?;
    store.update_field(Field::TwoFactorAuth, true)?;
    store.toggle_service_preference("Roofing")?;
    let parts = store.teardown();

    let reopened = PreferenceStore::init(config, parts.slot, MemoryScope::new())?;
    assert!(reopened.record().security_settings.two_factor_auth);
    assert!(
        reopened
            .record()
            .preferences
            .service_preferences
            .iter()
            .any(|entry| entry == "Roofing")
    );
    Ok(())
}

#[test]
fn custom_storage_key_is_honoured() -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::default().with_storage_key("tenant-7.user");
    let mut store = PreferenceStore::init(config, MemorySlot::new(), MemoryScope::new())?;
    store.update_field(Field::ReceiveNotifications, false)?;
    assert!(store.slot().read("tenant-7.user")?.is_some());
    assert!(store.slot().read(KEY)?.is_none());
    Ok(())
}
