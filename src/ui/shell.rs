use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::{ShipmentIntent, WizardState, WizardStep};
use crate::ui::theme;
use crate::util::version::version_label;

#[component]
pub fn Shell(children: Element) -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let (intent, step, busy) = state.with(|st| (st.intent, st.step, st.busy));

    let tagline = match intent {
        ShipmentIntent::Booking => "book it, print it, ship it",
        ShipmentIntent::Quotation => "price it now, ship it later",
    };

    let title_class = match intent {
        ShipmentIntent::Booking => "text-xl font-semibold tracking-tight text-sky-200",
        ShipmentIntent::Quotation => "text-xl font-semibold tracking-tight text-emerald-200",
    };

    // Switching intent mid-booking would strand a confirmed label.
    let switch_locked = busy || step == WizardStep::Terminal;

    rsx! {
        div { class: "min-h-screen bg-slate-950 text-slate-100 font-sans",
            header {
                class: "{theme::header_class(intent)} no-print",
                div { class: "mx-auto grid max-w-6xl grid-cols-[1fr_auto_1fr] items-center gap-4",
                    div { class: "flex items-center gap-3",
                        span { class: "text-2xl", "{intent.emoji()}" }
                        div {
                            h1 { class: "{title_class}", "{intent.title()}" }
                            p { class: "text-xs text-slate-500 italic", "{tagline}" }
                        }
                    }

                    div { class: "flex gap-1 justify-center",
                        for choice in [ShipmentIntent::Booking, ShipmentIntent::Quotation] {
                            IntentButton {
                                key: "{choice.title()}",
                                active: intent == choice,
                                disabled: switch_locked,
                                intent: choice,
                                onclick: move |_| state.with_mut(|st| st.intent = choice),
                            }
                        }
                    }

                    nav { class: "flex gap-2 text-sm justify-end",
                        NavButton {
                            active: matches!(current_route, Route::Home {}),
                            onclick: move |_| { nav.push(Route::Home {}); },
                            label: "🏠 Start",
                            intent,
                        }
                        NavButton {
                            active: matches!(current_route, Route::Wizard {}),
                            onclick: move |_| { nav.push(Route::Wizard {}); },
                            label: "🧭 Wizard",
                            intent,
                        }
                        NavButton {
                            active: matches!(current_route, Route::Quotations {}),
                            onclick: move |_| { nav.push(Route::Quotations {}); },
                            label: "🧾 Saved",
                            intent,
                        }
                        NavButton {
                            active: matches!(current_route, Route::Settings {}),
                            onclick: move |_| { nav.push(Route::Settings {}); },
                            label: "⚙️",
                            intent,
                        }
                    }
                }
            }
            main { class: "mx-auto max-w-6xl px-6 py-10",
                {children}
            }
            footer { class: "no-print pb-6 text-center text-xs text-slate-600", "{version_label()}" }
        }
    }
}

#[component]
fn NavButton(
    active: bool,
    onclick: EventHandler<()>,
    label: &'static str,
    intent: ShipmentIntent,
) -> Element {
    let class = match (intent, active) {
        (ShipmentIntent::Booking, true) => {
            "min-w-[5.5rem] rounded-lg border border-sky-500/60 bg-sky-500/15 px-4 py-2 font-semibold text-sky-300"
        }
        (ShipmentIntent::Quotation, true) => {
            "min-w-[5.5rem] rounded-lg border border-emerald-500/60 bg-emerald-500/15 px-4 py-2 font-semibold text-emerald-300"
        }
        (ShipmentIntent::Booking, false) => {
            "min-w-[5.5rem] rounded-lg border border-slate-700 px-4 py-2 text-slate-400 transition hover:border-sky-700 hover:bg-sky-900/20 hover:text-sky-300"
        }
        (ShipmentIntent::Quotation, false) => {
            "min-w-[5.5rem] rounded-lg border border-slate-700 px-4 py-2 text-slate-400 transition hover:border-emerald-700 hover:bg-emerald-900/20 hover:text-emerald-300"
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}

#[component]
fn IntentButton(
    active: bool,
    disabled: bool,
    intent: ShipmentIntent,
    onclick: EventHandler<()>,
) -> Element {
    let class = match (intent, active) {
        (ShipmentIntent::Booking, true) => {
            "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm font-semibold bg-sky-500/20 text-sky-300 border border-sky-500/40"
        }
        (ShipmentIntent::Quotation, true) => {
            "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm font-semibold bg-emerald-500/20 text-emerald-300 border border-emerald-500/40"
        }
        (ShipmentIntent::Booking, false) => {
            "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm text-slate-500 border border-slate-800 hover:border-sky-600 hover:text-sky-400 transition disabled:opacity-50"
        }
        (ShipmentIntent::Quotation, false) => {
            "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm text-slate-500 border border-slate-800 hover:border-emerald-600 hover:text-emerald-400 transition disabled:opacity-50"
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled,
            onclick: move |_| onclick.call(()),
            "{intent.emoji()} {intent.title()}"
        }
    }
}
