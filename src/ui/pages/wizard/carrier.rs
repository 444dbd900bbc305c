use dioxus::prelude::*;

use crate::{
    app::{backend_client, draft_store, PendingDraft, Route},
    config::AppConfig,
    domain::{wizard::RATES_ERROR_KEY, ShipmentIntent, WizardState},
    flow,
    ui::{
        components::{
            field::ErrorLine,
            rate_table::{RateRow, RateTable},
            summary_card::SummaryCard,
            toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn CarrierStep() -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();
    let PendingDraft(mut pending) = use_context::<PendingDraft>();
    let nav = use_navigator();

    let snapshot = state();
    let intent = snapshot.intent;
    let busy = snapshot.busy;
    let brand = config.carrier_brand.clone();
    let rows: Vec<RateRow> = snapshot
        .candidate_rates
        .iter()
        .enumerate()
        .map(|(index, offer)| RateRow::from_offer(index, offer, &brand))
        .collect();
    let selected = snapshot.selected_rate_index(&brand);
    let has_selection = snapshot.selected_rate.is_some();
    let quotation_label = snapshot
        .quotation_id
        .clone()
        .unwrap_or_else(|| "pending".to_string());

    let select_brand = brand.clone();
    let on_select = move |index: usize| {
        let brand = select_brand.clone();
        state.with_mut(|st| {
            if !st.select_rate(index, &brand) {
                tracing::debug!(index, "ignoring selection outside the rate list");
            }
        });
    };

    let later_config = config.clone();
    let on_ship_later = move |_| {
        if state.with(|st| st.busy) {
            return;
        }
        let Some(client) = backend_client(&later_config, toasts) else {
            return;
        };
        let mut working = state();
        state.with_mut(|st| st.busy = true);
        spawn(async move {
            let result = flow::save_for_later(&mut working, &client, &draft_store()).await;
            working.busy = false;
            state.set(working);
            match result {
                Ok(quotation_id) => {
                    pending.set(None);
                    push_toast(
                        toasts,
                        ToastKind::Success,
                        format!("Quotation {quotation_id} saved."),
                    );
                    nav.push(Route::Home {});
                }
                Err(err) => push_flow_error(toasts, &err),
            }
        });
    };

    let on_ship_now = move |_| {
        let mut next = state();
        let result = flow::ship_now(&mut next, &draft_store());
        state.set(next);
        if let Err(err) = result {
            push_flow_error(toasts, &err);
        }
    };

    rsx! {
        div { class: "space-y-6",
            section {
                class: "{theme::panel_border(intent)} p-6",
                div { class: "flex flex-wrap items-baseline justify-between gap-2",
                    h2 { class: "text-sm font-semibold uppercase tracking-wide {theme::text_primary(intent)}", "Carrier rates" }
                    span { class: "text-xs {theme::TEXT_MUTED}", "Quotation {quotation_label}" }
                }
                div { class: "mt-4",
                    RateTable { rows, selected, intent, on_select }
                }
                ErrorLine { message: snapshot.error(RATES_ERROR_KEY).map(str::to_string) }
            }

            if let Some(rate) = snapshot.selected_rate.clone() {
                div { class: "grid gap-4 sm:grid-cols-3",
                    SummaryCard {
                        title: "Selected".to_string(),
                        value: format!("{} {}", rate.carrier_name, rate.plan_name),
                        description: Some(format!("Service {}", rate.service_code)),
                        intent,
                    }
                    SummaryCard {
                        title: "Total charge".to_string(),
                        value: format!("${:.2}", rate.total_charge),
                        description: None,
                        intent,
                    }
                    SummaryCard {
                        title: "Estimated arrival".to_string(),
                        value: rate.estimated_arrival_date.clone(),
                        description: rate.delivery_date_iso(),
                        intent,
                    }
                }
            }

            div { class: "flex flex-wrap justify-between gap-3",
                button {
                    class: "{theme::btn_secondary(intent)}",
                    disabled: busy,
                    onclick: move |_| {
                        state.with_mut(|st| st.go_previous());
                    },
                    "Previous"
                }
                div { class: "flex gap-3",
                    button {
                        class: "{later_button_class(intent)}",
                        disabled: busy || !has_selection,
                        onclick: on_ship_later,
                        if busy { "Saving…" } else { "Ship Later" }
                    }
                    button {
                        class: "{now_button_class(intent)}",
                        disabled: busy || !has_selection,
                        onclick: on_ship_now,
                        "Ship Now"
                    }
                }
            }
        }
    }
}

// Quotations lead with "Ship Later"; bookings lead with "Ship Now".
fn later_button_class(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Quotation => theme::btn_primary(intent),
        ShipmentIntent::Booking => theme::btn_secondary(intent),
    }
}

fn now_button_class(intent: ShipmentIntent) -> &'static str {
    match intent {
        ShipmentIntent::Booking => theme::btn_primary(intent),
        ShipmentIntent::Quotation => theme::btn_secondary(intent),
    }
}
