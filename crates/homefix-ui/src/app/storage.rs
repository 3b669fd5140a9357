//! Browser `localStorage` binding for the durable slot.

use gloo::storage::{LocalStorage, Storage};
use homefix_prefs::{PreferenceSlot, PrefsError, PrefsResult};
use wasm_bindgen::JsValue;

/// Durable slot backed by the origin's `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStorageSlot;

impl PreferenceSlot for LocalStorageSlot {
    fn read(&self, key: &str) -> PrefsResult<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| storage_error("read", key, &err))
    }

    fn write(&mut self, key: &str, value: &str) -> PrefsResult<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| storage_error("write", key, &err))
    }

    fn remove(&mut self, key: &str) -> PrefsResult<()> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|err| storage_error("remove", key, &err))
    }
}

fn storage_error(operation: &'static str, key: &str, err: &JsValue) -> PrefsError {
    PrefsError::Storage {
        operation,
        key: key.to_string(),
        detail: err
            .as_string()
            .unwrap_or_else(|| format!("{err:?}")),
    }
}
