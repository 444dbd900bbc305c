use dioxus::prelude::*;

use crate::domain::{BookingConfirmation, ShipmentIntent};
use crate::ui::theme;

#[component]
pub fn ShippingLabel(
    confirmation: BookingConfirmation,
    label_url: Option<String>,
    intent: ShipmentIntent,
) -> Element {
    let tracking = confirmation
        .tracking_number
        .clone()
        .unwrap_or_else(|| "pending".to_string());

    rsx! {
        section {
            class: "{theme::panel_border(intent)} p-6 space-y-4",
            div { class: "flex flex-wrap items-baseline justify-between gap-3",
                h2 { class: "text-lg font-semibold {theme::text_primary(intent)}", "Shipping label" }
                p { class: "text-sm {theme::TEXT_SECONDARY}",
                    "Tracking number: "
                    span { class: "font-mono font-semibold {theme::accent_text(intent)}", "{tracking}" }
                }
            }
            dl { class: "grid grid-cols-2 gap-3 text-sm sm:grid-cols-3",
                div {
                    dt { class: "{theme::LABEL}", "Shipment" }
                    dd { class: "mt-1 font-mono {theme::TEXT_SECONDARY}", "{confirmation.shipment_id}" }
                }
                div {
                    dt { class: "{theme::LABEL}", "Base charge" }
                    dd { class: "mt-1 {theme::TEXT_SECONDARY}", "${confirmation.base_service_charge}" }
                }
                div {
                    dt { class: "{theme::LABEL}", "Total charged" }
                    dd { class: "mt-1 font-semibold {theme::TEXT_SECONDARY}", "${confirmation.total_charges}" }
                }
            }
            div { class: "no-print flex items-center gap-4",
                button {
                    class: "{theme::btn_primary(intent)}",
                    onclick: move |_| {
                        let _ = document::eval("window.print();");
                    },
                    "Print label"
                }
                if let Some(url) = label_url.clone() {
                    a { class: "{theme::link_class(intent)}", href: "{url}", target: "_blank", rel: "noreferrer", "Open label" }
                }
            }
            div { class: "label-frame rounded-lg border border-slate-700 bg-white p-4",
                match label_url {
                    Some(url) => rsx! {
                        img { src: "{url}", alt: "Shipping label for {confirmation.shipment_id}" }
                    },
                    None => rsx! {
                        p { class: "text-sm text-slate-700", "Label file: {confirmation.label_filename}" }
                    },
                }
            }
        }
    }
}
