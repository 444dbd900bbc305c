//! The booking/quotation wizard: one page, one component per step.

mod address;
mod carrier;
mod package;
mod review;

use dioxus::prelude::*;

use crate::{
    app::{draft_store, PendingDraft},
    config::AppConfig,
    domain::{WizardState, WizardStep},
    flow,
    infra::CourierClient,
    ui::{
        components::{
            progress_bar::StepProgress,
            shipping_label::ShippingLabel,
            toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::persistence::DraftStore,
};

use address::AddressStep;
use carrier::CarrierStep;
use package::PackageStep;
use review::ReviewStep;

#[component]
pub fn WizardPage() -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let PendingDraft(mut pending) = use_context::<PendingDraft>();

    let (intent, step, busy) = state.with(|st| (st.intent, st.step, st.busy));
    let draft = pending();

    let on_close = move |_| {
        let mut next = state();
        let result = flow::close(&mut next, &draft_store());
        state.set(next);
        pending.set(None);
        match result {
            Ok(()) => push_toast(toasts, ToastKind::Info, "Wizard cleared."),
            Err(err) => push_flow_error(toasts, &err),
        }
    };

    rsx! {
        div { class: "space-y-6",
            if let Some(draft) = draft {
                ResumeBanner { draft }
            }
            div { class: "flex flex-wrap items-center justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-semibold {theme::text_primary(intent)}", "{intent.emoji()} {intent.title()}" }
                    p { class: "text-sm {theme::TEXT_MUTED}", "{intent.description()}" }
                }
                button {
                    class: "{theme::BTN_DANGER} no-print",
                    disabled: busy,
                    onclick: on_close,
                    if step == WizardStep::Terminal { "New shipment" } else { "Close" }
                }
            }
            StepProgress { current: step, intent }
            match step {
                WizardStep::Address => rsx! { AddressStep {} },
                WizardStep::Package => rsx! { PackageStep {} },
                WizardStep::CarrierSelection => rsx! { CarrierStep {} },
                WizardStep::Review => rsx! { ReviewStep {} },
                WizardStep::Terminal => rsx! { LabelStep {} },
            }
        }
    }
}

#[component]
fn ResumeBanner(draft: WizardState) -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let PendingDraft(mut pending) = use_context::<PendingDraft>();
    let summary = format!(
        "{} draft saved at the {} step.",
        draft.intent.title(),
        draft.step.title()
    );

    let on_resume = move |_| {
        if state.with(|st| st.busy) {
            return;
        }
        if let Some(draft) = pending() {
            tracing::info!(step = ?draft.step, "resuming stored draft");
            state.set(draft);
        }
        pending.set(None);
    };

    let on_discard = move |_| {
        pending.set(None);
        if let Err(err) = draft_store().clear() {
            push_flow_error(toasts, &flow::FlowError::from(err));
        }
    };

    rsx! {
        div {
            class: "flex flex-wrap items-center justify-between gap-3 rounded-xl border border-amber-500/40 bg-amber-500/10 px-4 py-3 text-sm text-amber-100",
            span { "{summary}" }
            div { class: "flex gap-2",
                button { class: "{theme::btn_primary(draft.intent)}", onclick: on_resume, "Resume" }
                button { class: "{theme::btn_secondary(draft.intent)}", onclick: on_discard, "Discard" }
            }
        }
    }
}

#[component]
fn LabelStep() -> Element {
    let state = use_context::<Signal<WizardState>>();
    let config = use_context::<AppConfig>();
    let (intent, booking) = state.with(|st| (st.intent, st.booking.clone()));

    let Some(confirmation) = booking else {
        return rsx! {
            p { class: "text-sm {theme::TEXT_MUTED}", "No booking has been created yet." }
        };
    };

    let label_url = CourierClient::new(&config)
        .ok()
        .and_then(|client| client.label_url(&confirmation))
        .map(|url| url.to_string());

    rsx! {
        ShippingLabel { confirmation, label_url, intent }
    }
}
