//! Landing screen: pick "Create Booking" or "Create Quotation".

use dioxus::prelude::*;

use crate::{
    app::Route,
    domain::{ShipmentIntent, WizardState},
};

#[component]
pub fn IntentSelectPage() -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let nav = use_navigator();

    let mut choose = move |intent: ShipmentIntent| {
        state.with_mut(|st| {
            // An untouched wizard restarts under the new intent; work in progress keeps its data.
            if st.busy {
                return;
            }
            if st.is_resumable() {
                st.intent = intent;
            } else {
                *st = WizardState::new(intent);
            }
        });
        tracing::debug!(?intent, "intent selected");
        nav.push(Route::Wizard {});
    };

    rsx! {
        div {
            class: "flex items-center justify-center py-12",
            div {
                class: "max-w-4xl w-full",
                div { class: "text-center mb-12",
                    h1 { class: "text-4xl font-bold text-slate-100 mb-3", "Courier Desk" }
                    p { class: "text-xl text-slate-400", "What are we shipping today?" }
                }

                div { class: "grid grid-cols-1 md:grid-cols-2 gap-6",
                    IntentCard {
                        intent: ShipmentIntent::Booking,
                        features: vec![
                            "Ship-from and ship-to addresses",
                            "Live carrier rates",
                            "Label and tracking number",
                        ],
                        on_select: move |_| choose(ShipmentIntent::Booking),
                    }
                    IntentCard {
                        intent: ShipmentIntent::Quotation,
                        features: vec![
                            "Same rate lookup",
                            "Save the chosen rate on the quotation",
                            "Book it later",
                        ],
                        on_select: move |_| choose(ShipmentIntent::Quotation),
                    }
                }

                div { class: "mt-8 text-center",
                    button {
                        class: "text-sm text-slate-400 underline-offset-4 hover:text-emerald-300 hover:underline",
                        onclick: move |_| {
                            nav.push(Route::Quotations {});
                        },
                        "Book a saved quotation →"
                    }
                }
            }
        }
    }
}

#[component]
fn IntentCard(
    intent: ShipmentIntent,
    features: Vec<&'static str>,
    on_select: EventHandler<()>,
) -> Element {
    let border_color = match intent {
        ShipmentIntent::Booking => "border-sky-500/30 hover:border-sky-500/60 hover:bg-sky-500/5",
        ShipmentIntent::Quotation => {
            "border-emerald-500/30 hover:border-emerald-500/60 hover:bg-emerald-500/5"
        }
    };
    let accent_color = crate::ui::theme::accent_text(intent);

    rsx! {
        div {
            class: "group relative rounded-2xl border-2 p-6 cursor-pointer transition-all duration-200 {border_color} bg-slate-900/60",
            onclick: move |_| on_select.call(()),

            div {
                class: "text-5xl mb-4 transition-transform group-hover:scale-110",
                "{intent.emoji()}"
            }
            h2 { class: "text-2xl font-bold {accent_color} mb-2", "{intent.title()}" }
            p { class: "text-sm text-slate-400 mb-4", "{intent.description()}" }
            ul { class: "space-y-1",
                for feature in features {
                    li {
                        class: "text-xs text-slate-500 flex items-center gap-2",
                        span { class: "text-slate-600", "›" }
                        "{feature}"
                    }
                }
            }
            div {
                class: "mt-6 text-center opacity-0 group-hover:opacity-100 transition-opacity",
                span { class: "text-xs font-semibold {accent_color} uppercase tracking-wide", "Start →" }
            }
        }
    }
}
