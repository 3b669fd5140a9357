//! Browser shell: wires the preference store to `localStorage` and the document.

use yew::prelude::*;

use crate::components::preferences::PreferencesPanel;
use context::PreferenceProvider;
pub(crate) use context::PreferenceHandle;

mod context;
mod document;
mod storage;

#[function_component(HomefixApp)]
fn homefix_app() -> Html {
    html! {
        <PreferenceProvider>
            <main class="container mx-auto p-4">
                <PreferencesPanel />
            </main>
        </PreferenceProvider>
    }
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<HomefixApp>::with_root(root).render();
    } else {
        yew::Renderer::<HomefixApp>::new().render();
    }
}
