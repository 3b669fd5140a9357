//! Context provider owning the preference store for the component tree.
//!
//! # Design
//! - One store per provider mount: built on first render, torn down when the
//!   provider unmounts.
//! - Children read a [`PreferenceHandle`] from context and dispatch
//!   [`PreferenceAction`]s; the provider re-captures the view after each one.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use homefix_prefs::{LoadDiagnostic, LoadDiagnosticKind, PreferenceStore, StoreConfig};
use yew::prelude::*;

use super::document::DocumentScope;
use super::storage::LocalStorageSlot;
use crate::actions::{PreferenceAction, PreferenceView, apply_action};

type BrowserStore = PreferenceStore<LocalStorageSlot, DocumentScope>;

/// Read-only view plus dispatcher shared through context.
#[derive(Clone, PartialEq)]
pub(crate) struct PreferenceHandle {
    pub(crate) view: Rc<PreferenceView>,
    pub(crate) dispatch: Callback<PreferenceAction>,
}

#[derive(Properties, PartialEq)]
pub(crate) struct PreferenceProviderProps {
    #[prop_or_default]
    pub(crate) children: Children,
}

#[function_component(PreferenceProvider)]
pub(crate) fn preference_provider(props: &PreferenceProviderProps) -> Html {
    let store: Rc<RefCell<Option<BrowserStore>>> = use_mut_ref(init_store);
    let view = {
        let store = store.clone();
        use_state(move || capture(&store))
    };

    {
        let store = store.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    if let Some(store) = store.borrow_mut().take() {
                        let _ = store.teardown();
                    }
                }
            },
            (),
        );
    }

    let dispatch = {
        let store = store.clone();
        let view = view.clone();
        Callback::from(move |action: PreferenceAction| {
            let next = {
                let mut guard = store.borrow_mut();
                let Some(active) = guard.as_mut() else {
                    console::warn!("preference store unavailable; action dropped");
                    return;
                };
                if let Err(err) = apply_action(active, action) {
                    console::error!("preference update failed", err.to_string());
                }
                PreferenceView::capture(active)
            };
            view.set(Rc::new(next));
        })
    };

    let handle = PreferenceHandle {
        view: (*view).clone(),
        dispatch,
    };

    html! {
        <ContextProvider<PreferenceHandle> context={handle}>
            { for props.children.iter() }
        </ContextProvider<PreferenceHandle>>
    }
}

fn init_store() -> Option<BrowserStore> {
    let result = PreferenceStore::init_with_diagnostics(
        StoreConfig::default(),
        LocalStorageSlot,
        DocumentScope,
        log_diagnostic,
    );
    match result {
        Ok(store) => Some(store),
        Err(err) => {
            console::error!("preference store failed to start", err.to_string());
            None
        }
    }
}

fn capture(store: &Rc<RefCell<Option<BrowserStore>>>) -> Rc<PreferenceView> {
    let view = store
        .borrow()
        .as_ref()
        .map_or_else(fallback_view, PreferenceView::capture);
    Rc::new(view)
}

fn fallback_view() -> PreferenceView {
    let record = homefix_prefs::UserRecord::default();
    PreferenceView {
        display_name: record.display_name().to_string(),
        theme: homefix_prefs::ThemeMode::from_record(&record),
        authenticated: true,
        record,
    }
}

fn log_diagnostic(diagnostic: &LoadDiagnostic) {
    let detail = match &diagnostic.kind {
        LoadDiagnosticKind::Missing => "missing",
        LoadDiagnosticKind::Malformed { detail } | LoadDiagnosticKind::Unreadable { detail } => {
            detail.as_str()
        }
    };
    console::warn!(
        "stored preferences discarded; defaults in use",
        diagnostic.key.clone(),
        detail
    );
}
