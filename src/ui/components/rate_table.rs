use dioxus::prelude::*;

use crate::domain::{RateOffer, ShipmentIntent};
use crate::ui::theme;

/// Display-ready projection of a [`RateOffer`].
#[derive(Clone, PartialEq)]
pub struct RateRow {
    pub index: usize,
    pub carrier: String,
    pub plan: String,
    pub service_code: String,
    pub charge: f64,
    pub arrival: String,
    pub transit: String,
}

impl RateRow {
    pub fn from_offer(index: usize, offer: &RateOffer, carrier_brand: &str) -> Self {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or("n/a")
                .to_string()
        };

        let arrival = match (&offer.estimated_arrival_date, &offer.estimated_arrival_time) {
            (Some(date), Some(time)) if !time.trim().is_empty() => format!("{date} {time}"),
            (date, _) => text(date),
        };

        Self {
            index,
            carrier: offer
                .carrier_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| carrier_brand.to_string()),
            plan: offer.plan_label().to_string(),
            service_code: text(&offer.service_code),
            charge: offer.charge(),
            arrival,
            transit: offer
                .transit_time
                .as_deref()
                .map(|days| format!("{days} day(s)"))
                .unwrap_or_else(|| "n/a".to_string()),
        }
    }
}

#[component]
pub fn RateTable(
    rows: Vec<RateRow>,
    selected: Option<usize>,
    intent: ShipmentIntent,
    on_select: EventHandler<usize>,
) -> Element {
    let is_empty = rows.is_empty();
    rsx! {
        div {
            class: "{theme::table_container(intent)}",
            table {
                class: "min-w-full {theme::table_divider(intent)} text-sm",
                thead {
                    class: "{theme::table_header(intent)} text-left tracking-wide",
                    tr {
                        th { class: "px-4 py-3" }
                        th { class: "px-4 py-3 font-medium", "Carrier" }
                        th { class: "px-4 py-3 font-medium", "Plan" }
                        th { class: "px-4 py-3 font-medium", "Code" }
                        th { class: "px-4 py-3 font-medium", "Transit" }
                        th { class: "px-4 py-3 font-medium", "Est. arrival" }
                        th { class: "px-4 py-3 font-medium text-right", "Total" }
                    }
                }
                tbody {
                    class: "{theme::table_divider(intent)}",
                    for row in rows {
                        RateRowView {
                            key: "{row.index}",
                            selected: selected == Some(row.index),
                            row,
                            intent,
                            on_select,
                        }
                    }
                    if is_empty {
                        tr {
                            td {
                                class: "px-4 py-6 text-center text-sm {theme::TEXT_MUTED}",
                                colspan: "7",
                                "No rates yet. Go back and fetch rates for this shipment."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct RateRowViewProps {
    row: RateRow,
    selected: bool,
    intent: ShipmentIntent,
    on_select: EventHandler<usize>,
}

#[component]
fn RateRowView(props: RateRowViewProps) -> Element {
    let row = props.row;
    let intent = props.intent;
    let row_class = format!(
        "cursor-pointer transition-colors {}",
        if props.selected {
            theme::row_selected(intent)
        } else {
            "hover:bg-slate-800/40"
        }
    );
    let index = row.index;
    rsx! {
        tr {
            class: row_class,
            onclick: move |_| props.on_select.call(index),
            td {
                class: "px-4 py-3",
                input {
                    r#type: "radio",
                    name: "carrier-rate",
                    checked: props.selected,
                    onclick: move |evt| {
                        evt.stop_propagation();
                        props.on_select.call(index);
                    },
                }
            }
            td { class: "px-4 py-3 font-medium {theme::TEXT_SECONDARY}", "{row.carrier}" }
            td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{row.plan}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{row.service_code}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{row.transit}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{row.arrival}" }
            td {
                class: "px-4 py-3 text-right font-semibold {theme::accent_text(intent)}",
                {format!("${:.2}", row.charge)}
            }
        }
    }
}
