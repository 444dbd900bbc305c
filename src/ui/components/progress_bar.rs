use dioxus::prelude::*;

use crate::domain::{ShipmentIntent, WizardStep};
use crate::ui::theme;

#[component]
pub fn StepProgress(current: WizardStep, intent: ShipmentIntent) -> Element {
    rsx! {
        ol {
            class: "flex items-center gap-2",
            for step in WizardStep::ALL {
                li {
                    key: "{step.index()}",
                    class: "flex flex-1 items-center gap-2",
                    span {
                        class: "step-dot flex h-7 w-7 items-center justify-center rounded-full border text-xs font-semibold {dot_class(step, current, intent)}",
                        {(step.index() + 1).to_string()}
                    }
                    span { class: "{label_class(step, current, intent)}", "{step.title()}" }
                    if step != WizardStep::Terminal {
                        span { class: "h-px flex-1 bg-slate-800" }
                    }
                }
            }
        }
    }
}

fn dot_class(step: WizardStep, current: WizardStep, intent: ShipmentIntent) -> &'static str {
    if step == current {
        theme::accent_fill(intent)
    } else if step < current {
        "border-slate-500 bg-slate-700 text-slate-200"
    } else {
        "border-slate-700 text-slate-500"
    }
}

fn label_class(step: WizardStep, current: WizardStep, intent: ShipmentIntent) -> String {
    if step == current {
        format!("text-sm font-semibold {}", theme::text_primary(intent))
    } else {
        format!("text-sm {}", theme::TEXT_MUTED)
    }
}
