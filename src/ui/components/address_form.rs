use dioxus::prelude::*;

use crate::{
    app::backend_client,
    config::AppConfig,
    domain::{AddressField, AddressSide, WizardState},
    flow,
    ui::{
        components::{
            field::TextField,
            toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn AddressForm(side: AddressSide) -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();
    let mut lookup_id = use_signal(String::new);

    let (intent, address, errors, busy) = state.with(|st| {
        (
            st.intent,
            st.address(side).clone(),
            st.field_errors.clone(),
            st.busy,
        )
    });

    let on_lookup = move |_| {
        if state.with(|st| st.busy) {
            return;
        }
        let Some(client) = backend_client(&config, toasts) else {
            return;
        };
        let address_id = lookup_id();
        let mut working = state();
        state.with_mut(|st| st.busy = true);
        spawn(async move {
            let result = flow::prefill_address(&mut working, side, &address_id, &client).await;
            let filled = result.is_ok().then(|| working.address(side).clone());
            state.with_mut(|st| {
                st.busy = false;
                if let Some(filled) = filled {
                    *st.address_mut(side) = filled;
                    for field in AddressField::ALL {
                        st.field_errors.remove(&field.error_key(side));
                    }
                }
            });
            match result {
                Ok(()) => {
                    push_toast(
                        toasts,
                        ToastKind::Success,
                        format!("{side} address loaded from the address book."),
                    );
                }
                Err(err) => push_flow_error(toasts, &err),
            }
        });
    };

    rsx! {
        section {
            class: "{theme::panel_border(intent)} p-6",
            div { class: "flex items-center justify-between gap-4",
                h2 { class: "text-sm font-semibold uppercase tracking-wide {theme::text_primary(intent)}", "{side.title()}" }
                div { class: "flex items-center gap-2",
                    input {
                        class: "w-32 rounded-lg border border-slate-700 bg-slate-950 px-3 py-1.5 text-xs text-slate-100 focus:outline-none",
                        placeholder: "Address book id",
                        value: "{lookup_id}",
                        oninput: move |evt| lookup_id.set(evt.value()),
                    }
                    button {
                        class: "{theme::btn_small_inactive(intent)}",
                        disabled: busy,
                        onclick: on_lookup,
                        if busy { "Loading…" } else { "Use saved" }
                    }
                }
            }
            div { class: "mt-4 grid gap-4 sm:grid-cols-2",
                for field in AddressField::ALL {
                    TextField {
                        key: "{field.key()}",
                        label: field.label().to_string(),
                        value: address.get(field).to_string(),
                        error: errors.get(&field.error_key(side)).map(str::to_string),
                        intent,
                        input_type: input_type(field).to_string(),
                        disabled: busy,
                        on_input: move |value: String| {
                            state.with_mut(|st| st.set_address_field(side, field, value));
                        },
                    }
                }
            }
        }
    }
}

fn input_type(field: AddressField) -> &'static str {
    match field {
        AddressField::Email => "email",
        AddressField::Mobile => "tel",
        _ => "text",
    }
}
