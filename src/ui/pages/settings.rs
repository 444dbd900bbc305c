use dioxus::prelude::*;

use crate::{
    app::{draft_store, PendingDraft},
    config::{config_file, AppConfig},
    domain::WizardState,
    flow::FlowError,
    ui::{
        components::toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::{persistence::DraftStore, version::version_label},
};

const SECTION: &str = "rounded-xl border border-slate-800 bg-slate-900/40 p-6";
const SECTION_TITLE: &str = "text-sm font-semibold uppercase tracking-wide text-slate-500";
const ROW: &str = "flex items-center justify-between rounded-lg border border-slate-800 bg-slate-900/60 px-3 py-2";

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();
    let PendingDraft(mut pending) = use_context::<PendingDraft>();

    // Re-read on every render so the status follows saves made elsewhere.
    let mut refresh = use_signal(|| 0_u32);
    let _ = refresh();

    let store = draft_store();
    let draft_path = store
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string());
    let stored = store.load();
    let draft_status = match &stored {
        Some(draft) if draft.is_resumable() => format!(
            "{} draft at the {} step",
            draft.intent.title(),
            draft.step.title()
        ),
        Some(_) => "Empty draft".to_string(),
        None => "No draft stored".to_string(),
    };
    let config_path = config_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string());
    let intent = state.with(|st| st.intent);

    let entries = vec![
        ("Backend URL", config.api_base_url.clone()),
        ("Customer id", config.customer_id.to_string()),
        ("Booked by", config.booked_by.clone()),
        ("Carrier brand", config.carrier_brand.clone()),
        ("Config file", config_path),
    ];

    let on_discard = move |_| {
        pending.set(None);
        match draft_store().clear() {
            Ok(()) => push_toast(toasts, ToastKind::Info, "Stored draft discarded."),
            Err(err) => push_flow_error(toasts, &FlowError::from(err)),
        }
        refresh += 1;
    };

    rsx! {
        div { class: "space-y-8",
            section {
                class: "{SECTION}",
                h2 { class: "{SECTION_TITLE}", "Backend" }
                p { class: "mt-2 text-sm text-slate-400",
                    "Edit the config file or set COURIER_* environment variables, then restart."
                }
                ul { class: "mt-3 space-y-2 text-sm {theme::TEXT_SECONDARY}",
                    for (label, value) in entries {
                        li { key: "{label}", class: "{ROW}",
                            span { "{label}" }
                            span { class: "font-mono text-xs text-slate-400 break-all", "{value}" }
                        }
                    }
                }
            }

            section {
                class: "{SECTION}",
                h2 { class: "{SECTION_TITLE}", "Draft" }
                ul { class: "mt-3 space-y-2 text-sm {theme::TEXT_SECONDARY}",
                    li { class: "{ROW}",
                        span { "Status" }
                        span { class: "text-xs text-slate-400", "{draft_status}" }
                    }
                    li { class: "{ROW}",
                        span { "Location" }
                        span { class: "font-mono text-xs text-slate-400 break-all", "{draft_path}" }
                    }
                }
                button {
                    class: "mt-4 {theme::BTN_DANGER}",
                    disabled: stored.is_none(),
                    onclick: on_discard,
                    "Discard stored draft"
                }
            }

            section {
                class: "flex flex-col items-center gap-1 rounded-xl border border-slate-800 bg-slate-900/40 p-6 text-center text-slate-400",
                h2 { class: "{SECTION_TITLE}", "About" }
                p { class: "text-sm {theme::accent_text(intent)}", "{version_label()}" }
            }
        }
    }
}
