use dioxus::{prelude::*, signals::Signal};

use crate::{
    config::AppConfig,
    domain::WizardState,
    infra::CourierClient,
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{IntentSelectPage, QuotationsPage, SettingsPage, WizardPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{DraftStore, FileDraftStore},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/wizard")]
    Wizard {},
    #[route("/quotations")]
    Quotations {},
    #[route("/settings")]
    Settings {},
}

/// A draft found on disk at startup, offered for resumption until the user
/// resumes or discards it.
#[derive(Clone, Copy)]
pub struct PendingDraft(pub Signal<Option<WizardState>>);

#[component]
pub fn App() -> Element {
    let config = use_hook(AppConfig::load);
    use_context_provider(|| config.clone());

    let state = use_signal(WizardState::default);
    use_context_provider(|| state);

    let pending = use_signal(|| {
        let draft = draft_store().load().filter(WizardState::is_resumable);
        if let Some(draft) = &draft {
            tracing::info!(intent = ?draft.intent, step = ?draft.step, "found a stored draft");
        }
        draft
    });
    use_context_provider(|| PendingDraft(pending));

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        document::Style { "{assets::tailwind_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// The draft slot every screen reads and writes.
pub fn draft_store() -> FileDraftStore {
    FileDraftStore::default_location()
}

/// Builds a backend client, reporting failures as a toast.
pub fn backend_client(
    config: &AppConfig,
    toasts: Signal<Vec<ToastMessage>>,
) -> Option<CourierClient> {
    match CourierClient::new(config) {
        Ok(client) => Some(client),
        Err(err) => {
            tracing::error!("failed to initialise the courier client: {err}");
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to initialise the courier client: {err}"),
            );
            None
        }
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { Shell { IntentSelectPage {} } }
}

#[component]
pub fn Wizard() -> Element {
    rsx! { Shell { WizardPage {} } }
}

#[component]
pub fn Quotations() -> Element {
    rsx! { Shell { QuotationsPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
