use dioxus::prelude::*;

use crate::{
    domain::{AddressSide, WizardState},
    ui::{
        components::{
            address_form::AddressForm,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn AddressStep() -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let intent = state.with(|st| st.intent);

    let on_next = move |_| {
        if let Err(errors) = state.with_mut(|st| st.advance_from_address()) {
            push_toast(
                toasts,
                ToastKind::Warning,
                format!("{} address field(s) need attention.", errors.len()),
            );
        }
    };

    rsx! {
        div { class: "space-y-6",
            div { class: "grid gap-6 lg:grid-cols-2",
                AddressForm { side: AddressSide::From }
                AddressForm { side: AddressSide::To }
            }
            div { class: "flex justify-end",
                button { class: "{theme::btn_primary(intent)}", onclick: on_next, "Next" }
            }
        }
    }
}
