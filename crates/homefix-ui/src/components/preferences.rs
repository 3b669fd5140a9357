use homefix_prefs::{Field, FieldValue};
use yew::prelude::*;

use crate::actions::PreferenceAction;
use crate::app::PreferenceHandle;

/// Categories offered as chips; the record may hold others added elsewhere.
const CATEGORY_OPTIONS: [&str; 7] = [
    "Plumbing",
    "Electrical",
    "Cleaning",
    "Landscaping",
    "HVAC",
    "Roofing",
    "Painting",
];

const MAX_RADIUS_MILES: u32 = 100;

#[derive(Properties, PartialEq)]
struct ToggleRowProps {
    label: AttrValue,
    checked: bool,
    onchange: Callback<bool>,
}

#[function_component(ToggleRow)]
fn toggle_row(props: &ToggleRowProps) -> Html {
    let onchange = {
        let onchange = props.onchange.clone();
        Callback::from(move |event: Event| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                onchange.emit(input.checked());
            }
        })
    };

    html! {
        <label class="label cursor-pointer gap-2">
            <span>{props.label.clone()}</span>
            <input
                type="checkbox"
                class="toggle"
                checked={props.checked}
                onchange={onchange}
            />
        </label>
    }
}

#[function_component(PreferencesPanel)]
pub(crate) fn preferences_panel() -> Html {
    let Some(handle) = use_context::<PreferenceHandle>() else {
        return html! {};
    };
    let view = handle.view.clone();
    let prefs = &view.record.preferences;

    let set_flag = |field: Field| {
        let dispatch = handle.dispatch.clone();
        Callback::from(move |value: bool| {
            dispatch.emit(PreferenceAction::SetField(field, FieldValue::Flag(value)));
        })
    };

    let on_radius = {
        let dispatch = handle.dispatch.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<web_sys::HtmlInputElement>() {
                let radius = input.value_as_number();
                if radius.is_finite() {
                    dispatch.emit(PreferenceAction::SetField(
                        Field::LocationRadius,
                        FieldValue::Number(radius),
                    ));
                }
            }
        })
    };

    let password_note = view
        .record
        .security_settings
        .password_changed_on()
        .map_or_else(
            || "Password change date unknown".to_string(),
            |date| format!("Password last changed {date}"),
        );

    let on_reset = {
        let dispatch = handle.dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.emit(PreferenceAction::Reset))
    };

    let chips = CATEGORY_OPTIONS.iter().map(|category| {
        let selected = prefs.service_preferences.iter().any(|entry| entry == category);
        let onclick = {
            let dispatch = handle.dispatch.clone();
            let category = (*category).to_string();
            Callback::from(move |_: MouseEvent| {
                dispatch.emit(PreferenceAction::ToggleCategory(category.clone()));
            })
        };
        html! {
            <button
                type="button"
                class={classes!("badge", selected.then_some("badge-primary"))}
                aria-pressed={selected.to_string()}
                {onclick}
            >
                {*category}
            </button>
        }
    });

    html! {
        <section class="card preferences-panel">
            <header>
                <h2>{format!("Welcome back, {}", view.display_name)}</h2>
                <p class="text-sm">{view.record.personal_info.email.clone()}</p>
            </header>
            <ToggleRow
                label="Dark mode"
                checked={prefs.dark_mode}
                onchange={set_flag(Field::DarkMode)}
            />
            <ToggleRow
                label="Booking notifications"
                checked={prefs.receive_notifications}
                onchange={set_flag(Field::ReceiveNotifications)}
            />
            <ToggleRow
                label="Newsletter"
                checked={prefs.newsletter_subscription}
                onchange={set_flag(Field::NewsletterSubscription)}
            />
            <ToggleRow
                label="Two-factor authentication"
                checked={view.record.security_settings.two_factor_auth}
                onchange={set_flag(Field::TwoFactorAuth)}
            />
            <p class="text-xs opacity-70">{password_note}</p>
            <label class="form-control gap-1">
                <span class="label-text">
                    {format!("Search radius: {} miles", prefs.location_radius)}
                </span>
                <input
                    type="range"
                    class="range"
                    min="0"
                    max={MAX_RADIUS_MILES.to_string()}
                    step="1"
                    value={prefs.location_radius.to_string()}
                    oninput={on_radius}
                />
            </label>
            <div class="flex flex-wrap gap-2">
                { for chips }
            </div>
            <button type="button" class="btn btn-outline" onclick={on_reset}>
                {"Reset preferences"}
            </button>
        </section>
    }
}
