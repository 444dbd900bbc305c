use dioxus::prelude::*;

use crate::domain::ShipmentIntent;
use crate::ui::theme;

#[component]
pub fn SummaryCard(
    title: String,
    value: String,
    description: Option<String>,
    intent: ShipmentIntent,
) -> Element {
    rsx! {
        div {
            class: "{theme::panel_border(intent)} p-4 shadow-sm",
            h3 { class: "{theme::LABEL}", "{title}" }
            p { class: "mt-2 text-lg font-semibold {theme::TEXT_SECONDARY}", "{value}" }
            if let Some(desc) = description {
                p { class: "mt-1 text-xs {theme::TEXT_MUTED}", "{desc}" }
            }
        }
    }
}
