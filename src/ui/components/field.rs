use dioxus::prelude::*;

use crate::domain::ShipmentIntent;
use crate::ui::theme;

/// Labelled input with an inline validation message.
#[component]
pub fn TextField(
    label: String,
    value: String,
    error: Option<String>,
    intent: ShipmentIntent,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] placeholder: String,
    #[props(default)] disabled: bool,
    on_input: EventHandler<String>,
) -> Element {
    let invalid = error.is_some();
    rsx! {
        div {
            label { class: "{theme::LABEL}", "{label}" }
            input {
                class: "{theme::input_class(intent, invalid)}",
                r#type: "{input_type}",
                placeholder: "{placeholder}",
                disabled,
                value: "{value}",
                oninput: move |evt| on_input.call(evt.value()),
            }
            if let Some(message) = error {
                p { class: "{theme::ERROR_TEXT}", "{message}" }
            }
        }
    }
}

/// Message for a key that has no input of its own (`rates`, `package_type`).
#[component]
pub fn ErrorLine(message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! { p { class: "{theme::ERROR_TEXT}", "{message}" } },
        None => rsx! { Fragment {} },
    }
}
