//! Saved quotations: pick one and carry it into a booking.

use dioxus::prelude::*;
use dioxus::router::Navigator;

use crate::{
    app::{backend_client, draft_store, PendingDraft, Route},
    config::AppConfig,
    domain::{SavedQuotation, ShipmentIntent, WizardState},
    flow,
    infra::CourierClient,
    ui::{
        components::toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        theme,
    },
};

const INTENT: ShipmentIntent = ShipmentIntent::Booking;

#[component]
pub fn QuotationsPage() -> Element {
    let config = use_context::<AppConfig>();
    let mut reload = use_signal(|| 0_u32);

    let listing = use_resource(move || {
        let config = config.clone();
        let _ = reload();
        async move {
            let client = CourierClient::new(&config).map_err(|err| err.to_string())?;
            flow::saved_quotations(&client)
                .await
                .map_err(|err| err.to_string())
        }
    });

    let body = match &*listing.read() {
        None => rsx! {
            p { class: "text-sm {theme::TEXT_MUTED}", "Loading saved quotations…" }
        },
        Some(Err(message)) => rsx! {
            p { class: "{theme::ERROR_TEXT}", "Could not load saved quotations: {message}" }
        },
        Some(Ok(quotations)) if quotations.is_empty() => rsx! {
            p { class: "text-sm {theme::TEXT_MUTED}", "No saved quotations yet." }
        },
        Some(Ok(quotations)) => rsx! {
            table { class: "w-full text-left text-sm",
                thead {
                    tr { class: "text-xs uppercase tracking-wide {theme::TEXT_MUTED}",
                        th { class: "py-2", "Quotation" }
                        th { "Route" }
                        th { "Packages" }
                        th { "Rate" }
                        th { "Total" }
                        th { "Status" }
                        th {}
                    }
                }
                tbody {
                    for record in quotations.iter().cloned() {
                        QuotationRow { key: "{record.id()}", record }
                    }
                }
            }
        },
    };

    rsx! {
        div { class: "space-y-6",
            div { class: "flex flex-wrap items-center justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-semibold {theme::text_primary(INTENT)}", "🧾 Saved quotations" }
                    p { class: "text-sm {theme::TEXT_MUTED}",
                        "Reopen a quotation on the review step and book it."
                    }
                }
                button {
                    class: "{theme::btn_secondary(INTENT)}",
                    onclick: move |_| reload += 1,
                    "Refresh"
                }
            }
            section { class: "{theme::panel_border(INTENT)} p-6", {body} }
            OpenById {}
        }
    }
}

#[component]
fn QuotationRow(record: SavedQuotation) -> Element {
    let state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();
    let PendingDraft(pending) = use_context::<PendingDraft>();
    let nav = use_navigator();

    let quotation_id = record.id().to_string();
    let book_id = quotation_id.clone();
    let busy = state.with(|st| st.busy);
    let rate = record.rate_label().unwrap_or_else(|| "n/a".to_string());
    let total = record
        .total_charge()
        .map(|charge| format!("${charge:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    rsx! {
        tr { class: "border-t border-slate-800 {theme::TEXT_SECONDARY}",
            td { class: "py-2 font-mono", "{quotation_id}" }
            td { "{record.route_label()}" }
            td { "{record.package_total()}" }
            td { "{rate}" }
            td { "{total}" }
            td { class: "text-xs {theme::TEXT_MUTED}", "{record.status_label()}" }
            td { class: "text-right",
                button {
                    class: "{theme::btn_small_inactive(INTENT)}",
                    disabled: busy,
                    onclick: move |_| {
                        open_quotation(book_id.clone(), state, pending, toasts, &config, nav);
                    },
                    "Book"
                }
            }
        }
    }
}

#[component]
fn OpenById() -> Element {
    let state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();
    let PendingDraft(pending) = use_context::<PendingDraft>();
    let nav = use_navigator();
    let mut quotation_id = use_signal(String::new);
    let busy = state.with(|st| st.busy);

    rsx! {
        section { class: "{theme::PANEL_SOLID} flex flex-wrap items-end gap-3 p-5",
            div { class: "flex-1",
                label { class: "{theme::LABEL}", "Quotation id" }
                input {
                    class: "{theme::input_class(INTENT, false)}",
                    placeholder: "e.g. 41",
                    value: "{quotation_id}",
                    oninput: move |evt| quotation_id.set(evt.value()),
                }
            }
            button {
                class: "{theme::btn_primary(INTENT)}",
                disabled: busy,
                onclick: move |_| {
                    open_quotation(quotation_id(), state, pending, toasts, &config, nav);
                },
                if busy { "Loading…" } else { "Open for booking" }
            }
        }
    }
}

/// Loads the quotation and, on success, replaces the wizard and opens it.
fn open_quotation(
    quotation_id: String,
    mut state: Signal<WizardState>,
    mut pending: Signal<Option<WizardState>>,
    toasts: Signal<Vec<ToastMessage>>,
    config: &AppConfig,
    nav: Navigator,
) {
    if state.with(|st| st.busy) {
        return;
    }
    let Some(client) = backend_client(config, toasts) else {
        return;
    };
    let config = config.clone();
    let mut working = state();
    state.with_mut(|st| st.busy = true);
    spawn(async move {
        let result =
            flow::open_saved_quotation(&mut working, &quotation_id, &client, &draft_store(), &config)
                .await;
        match result {
            Ok(()) => {
                working.busy = false;
                state.set(working);
                pending.set(None);
                push_toast(
                    toasts,
                    ToastKind::Success,
                    format!("Quotation {} loaded for booking.", quotation_id.trim()),
                );
                nav.push(Route::Wizard {});
            }
            Err(err) => {
                state.with_mut(|st| st.busy = false);
                push_flow_error(toasts, &err);
            }
        }
    });
}
