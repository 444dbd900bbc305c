use dioxus::prelude::*;

use crate::{
    app::backend_client,
    config::AppConfig,
    domain::{
        package::parse_package_count, wizard::RATES_ERROR_KEY, AddressField, AddressSide,
        DimensionUnit, FieldErrors, PackageDetail, PackageField, PackageType, ShipmentIntent,
        WeightUnit, WizardState,
    },
    flow,
    ui::{
        components::{
            field::{ErrorLine, TextField},
            toast::{push_flow_error, push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn PackageStep() -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let config = use_context::<AppConfig>();

    let snapshot = state();
    let intent = snapshot.intent;
    let errors = snapshot.field_errors.clone();
    let busy = snapshot.busy;
    let needs_dimensions = snapshot
        .package_type
        .map(PackageType::requires_dimensions)
        .unwrap_or(false);
    let type_invalid = errors.contains("package_type");
    let type_value = snapshot
        .package_type
        .map(PackageType::as_str)
        .unwrap_or_default();
    let pickup_value = snapshot
        .pickup
        .as_ref()
        .map(|slot| slot.input_value())
        .unwrap_or_default();
    let country_errors: Vec<String> = AddressSide::ALL
        .iter()
        .filter_map(|side| {
            errors
                .get(&AddressField::Country.error_key(*side))
                .map(|message| format!("{} country: {message}", side.title()))
        })
        .collect();

    let on_fetch = move |_| {
        if state.with(|st| st.busy) {
            return;
        }
        let Some(client) = backend_client(&config, toasts) else {
            return;
        };
        let mut working = state();
        state.with_mut(|st| st.busy = true);
        spawn(async move {
            let result = flow::request_rates(&mut working, &client).await;
            working.busy = false;
            state.set(working);
            match result {
                Ok(count) => push_toast(
                    toasts,
                    ToastKind::Success,
                    format!("{count} rate(s) received."),
                ),
                Err(err) => push_flow_error(toasts, &err),
            }
        });
    };

    rsx! {
        div { class: "space-y-6",
            section {
                class: "{theme::panel_border(intent)} p-6",
                h2 { class: "text-sm font-semibold uppercase tracking-wide {theme::text_primary(intent)}", "Shipment" }
                div { class: "mt-4 grid gap-4 sm:grid-cols-3",
                    div {
                        label { class: "{theme::LABEL}", "Package type" }
                        select {
                            class: "{theme::input_class(intent, type_invalid)}",
                            value: "{type_value}",
                            disabled: busy,
                            onchange: move |evt| {
                                let kind = PackageType::parse(&evt.value());
                                state.with_mut(|st| st.set_package_type(kind));
                            },
                            option { value: "", "Select…" }
                            for kind in PackageType::ALL {
                                option {
                                    key: "{kind.as_str()}",
                                    value: "{kind.as_str()}",
                                    selected: snapshot.package_type == Some(kind),
                                    "{kind.as_str()}"
                                }
                            }
                        }
                        ErrorLine { message: errors.get("package_type").map(str::to_string) }
                    }
                    TextField {
                        label: "Number of packages".to_string(),
                        value: snapshot.package_count.to_string(),
                        error: errors.get("package_count").map(str::to_string),
                        intent,
                        input_type: "number".to_string(),
                        disabled: busy,
                        on_input: move |value: String| {
                            if let Some(count) = parse_package_count(&value) {
                                state.with_mut(|st| st.set_package_count(count));
                            }
                        },
                    }
                    TextField {
                        label: "Pickup (optional)".to_string(),
                        value: pickup_value,
                        error: None,
                        intent,
                        input_type: "datetime-local".to_string(),
                        disabled: busy,
                        on_input: move |value: String| {
                            let accepted = state.with_mut(|st| st.set_pickup(&value));
                            if !accepted {
                                tracing::debug!(%value, "ignoring unparseable pickup input");
                            }
                        },
                    }
                }
                for message in country_errors {
                    ErrorLine { message: Some(message) }
                }
            }

            for (index, detail) in snapshot.package_details.iter().cloned().enumerate() {
                PackageCard {
                    key: "{index}",
                    index,
                    detail,
                    needs_dimensions,
                    errors: errors.clone(),
                    intent,
                    busy,
                }
            }

            ErrorLine { message: errors.get(RATES_ERROR_KEY).map(str::to_string) }

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
                    disabled: busy,
                    onclick: on_fetch,
                    if busy { "Fetching rates…" } else { "Get rates" }
                }
            }
        }
    }
}

#[component]
fn PackageCard(
    index: usize,
    detail: PackageDetail,
    needs_dimensions: bool,
    errors: FieldErrors,
    intent: ShipmentIntent,
    busy: bool,
) -> Element {
    let mut state = use_context::<Signal<WizardState>>();
    let fields: Vec<PackageField> = if needs_dimensions {
        PackageField::ALL.to_vec()
    } else {
        vec![PackageField::Weight]
    };
    let title = format!("Package {}", index + 1);
    let weight_unit = detail.weight_unit;
    let dimension_unit = detail.dimension_unit;

    rsx! {
        section {
            class: "{theme::PANEL_SOLID} p-5",
            div { class: "flex flex-wrap items-center justify-between gap-3",
                h3 { class: "text-sm font-semibold {theme::TEXT_SECONDARY}", "{title}" }
                div { class: "flex items-center gap-2 text-xs",
                    for unit in [WeightUnit::Lbs, WeightUnit::Kg] {
                        button {
                            key: "{unit.as_str()}",
                            class: "{unit_button_class(unit == weight_unit, intent)}",
                            disabled: busy,
                            onclick: move |_| state.with_mut(|st| st.set_weight_unit(index, unit)),
                            "{unit.as_str()}"
                        }
                    }
                    if needs_dimensions {
                        span { class: "mx-1 text-slate-700", "|" }
                        for unit in [DimensionUnit::In, DimensionUnit::Cm] {
                            button {
                                key: "{unit.as_str()}",
                                class: "{unit_button_class(unit == dimension_unit, intent)}",
                                disabled: busy,
                                onclick: move |_| state.with_mut(|st| st.set_dimension_unit(index, unit)),
                                "{unit.as_str()}"
                            }
                        }
                    }
                }
            }
            div { class: "mt-4 grid gap-4 sm:grid-cols-4",
                for field in fields {
                    TextField {
                        key: "{field.key()}",
                        label: field_label(field, &detail),
                        value: detail.get(field).to_string(),
                        error: errors.get(&field.error_key(index)).map(str::to_string),
                        intent,
                        input_type: "number".to_string(),
                        disabled: busy,
                        on_input: move |value: String| {
                            state.with_mut(|st| st.update_package(index, field, value));
                        },
                    }
                }
            }
        }
    }
}

fn field_label(field: PackageField, detail: &PackageDetail) -> String {
    let unit = match field {
        PackageField::Weight => detail.weight_unit.as_str(),
        _ => detail.dimension_unit.as_str(),
    };
    format!("{} ({unit})", field.label())
}

fn unit_button_class(active: bool, intent: ShipmentIntent) -> &'static str {
    if active {
        theme::btn_small_active(intent)
    } else {
        theme::btn_small_inactive(intent)
    }
}
