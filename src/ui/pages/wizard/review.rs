use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::{backend_client, draft_store},
    config::AppConfig,
    domain::{AddressSide, PackageType, WizardState},
    flow,
    ui::{
        components::{
            summary_card::SummaryCard,
            toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn ReviewStep() -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();

    let snapshot = state();
    let intent = snapshot.intent;
    let busy = snapshot.busy;
    let needs_dimensions = snapshot
        .package_type
        .map(PackageType::requires_dimensions)
        .unwrap_or(false);
    let package_summary = format!(
        "{} × {}",
        snapshot.package_count,
        snapshot.package_type.map(PackageType::as_str).unwrap_or("n/a")
    );
    let pickup = snapshot
        .pickup
        .as_ref()
        .map(|slot| slot.to_string())
        .unwrap_or_else(|| "Not scheduled".to_string());
    let submittable = snapshot.check_submittable().is_ok();

    let on_confirm = move |_| {
        if state.with(|st| st.busy) {
            return;
        }
        let Some(client) = backend_client(&config, toasts) else {
            return;
        };
        let config = config.clone();
        let mut working = state();
        state.with_mut(|st| st.busy = true);
        spawn(async move {
            let result = flow::submit_booking(
                &mut working,
                &client,
                &draft_store(),
                &config,
                OffsetDateTime::now_utc(),
            )
            .await;
            working.busy = false;
            state.set(working);
            match result {
                Ok(confirmation) => push_toast(
                    toasts,
                    ToastKind::Success,
                    format!("Shipment {} booked.", confirmation.shipment_id),
                ),
                Err(err) => push_flow_error(toasts, &err),
            }
        });
    };

    rsx! {
        div { class: "space-y-6",
            div { class: "grid gap-4 md:grid-cols-2",
                for side in AddressSide::ALL {
                    SummaryCard {
                        key: "{side.key()}",
                        title: side.title().to_string(),
                        value: snapshot.address(side).name.clone(),
                        description: Some(snapshot.address(side).summary_line()),
                        intent,
                    }
                }
            }

            div { class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
                SummaryCard {
                    title: "Packages".to_string(),
                    value: package_summary,
                    description: None,
                    intent,
                }
                SummaryCard {
                    title: "Pickup".to_string(),
                    value: pickup,
                    description: None,
                    intent,
                }
                if let Some(rate) = snapshot.selected_rate.clone() {
                    SummaryCard {
                        title: "Carrier".to_string(),
                        value: rate.carrier_name.clone(),
                        description: Some(format!("{} ({})", rate.plan_name, rate.service_code)),
                        intent,
                    }
                    SummaryCard {
                        title: "Total cost".to_string(),
                        value: format!("${:.2}", rate.total_charge),
                        description: Some(format!("Estimated delivery {}", rate.estimated_arrival_date)),
                        intent,
                    }
                }
            }

            div {
                class: "{theme::table_container(intent)}",
                table { class: "min-w-full text-sm",
                    thead { class: "{theme::table_header(intent)}",
                        tr {
                            th { class: "px-4 py-2 text-left", "#" }
                            th { class: "px-4 py-2 text-right", "Weight" }
                            if needs_dimensions {
                                th { class: "px-4 py-2 text-right", "Length" }
                                th { class: "px-4 py-2 text-right", "Width" }
                                th { class: "px-4 py-2 text-right", "Height" }
                            }
                        }
                    }
                    tbody { class: "{theme::table_divider(intent)}",
                        for (index, detail) in snapshot.package_details.iter().cloned().enumerate() {
                            tr { key: "{index}",
                                td { class: "px-4 py-2 {theme::TEXT_MUTED}", "{index + 1}" }
                                td { class: "px-4 py-2 text-right", "{detail.weight} {detail.weight_unit.as_str()}" }
                                if needs_dimensions {
                                    td { class: "px-4 py-2 text-right", "{detail.length} {detail.dimension_unit.as_str()}" }
                                    td { class: "px-4 py-2 text-right", "{detail.width} {detail.dimension_unit.as_str()}" }
                                    td { class: "px-4 py-2 text-right", "{detail.height} {detail.dimension_unit.as_str()}" }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "flex justify-between",
                button {
                    class: "{theme::btn_secondary(intent)}",
                    disabled: busy,
                    onclick: move |_| {
                        state.with_mut(|st| st.go_previous());
                    },
                    "Previous"
                }
                button {
                    class: "{theme::btn_primary(intent)}",
                    disabled: busy || !submittable,
                    onclick: on_confirm,
                    if busy { "Booking…" } else { "Confirm booking" }
                }
            }
        }
    }
}
