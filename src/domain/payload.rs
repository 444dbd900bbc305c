//! Wizard state -> request bodies for the courier backend.
//!
//! Every builder here is total: missing or malformed input falls back to the
//! value in [`FieldDefault::for_field`], never to an error.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{
    address::{AddressSide, PostalAddress},
    package::{PackageDetail, PackageField, PackageType},
    rate::SelectedRate,
    validation::parse_measure,
    wizard::WizardState,
};
use crate::config::AppConfig;

pub const STATUS_UNSAVED: &str = "Unsaved";
pub const STATUS_SAVED: &str = "Saved";

/// Fallback for a wire field whose source value is blank or unparseable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Number(f64),
}

/// Wire fields that carry a defaulting rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultedField {
    /// Any flattened `to_*` / `from_*` booking address field.
    BookingAddress,
    PickupDate,
    QuotePickupTime,
    PickupTime,
    PackageType,
    Measurement,
    CarrierPlan,
    ServiceCode,
    EstimatedDelivery,
    Charge,
}

impl FieldDefault {
    pub fn for_field(field: DefaultedField) -> FieldDefault {
        match field {
            DefaultedField::BookingAddress => FieldDefault::Text("-"),
            DefaultedField::PickupDate => FieldDefault::Text(""),
            DefaultedField::QuotePickupTime => FieldDefault::Text("000000"),
            DefaultedField::PickupTime => FieldDefault::Text(""),
            DefaultedField::PackageType => FieldDefault::Text(""),
            DefaultedField::Measurement => FieldDefault::Number(0.0),
            DefaultedField::CarrierPlan => FieldDefault::Text("N/A"),
            DefaultedField::ServiceCode => FieldDefault::Text("N/A"),
            DefaultedField::EstimatedDelivery => FieldDefault::Text(""),
            DefaultedField::Charge => FieldDefault::Number(0.0),
        }
    }

    fn text(self) -> &'static str {
        match self {
            FieldDefault::Text(text) => text,
            FieldDefault::Number(_) => "",
        }
    }

    fn number(self) -> f64 {
        match self {
            FieldDefault::Number(value) => value,
            FieldDefault::Text(_) => 0.0,
        }
    }
}

fn text_or_default(value: Option<&str>, field: DefaultedField) -> String {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FieldDefault::for_field(field).text())
        .to_string()
}

fn number_or_default(value: Option<f64>, field: DefaultedField) -> f64 {
    value.unwrap_or_else(|| FieldDefault::for_field(field).number())
}

/// Address block used by the rate and quotation endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarrierAddress {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state_province_code: String,
    pub postal_code: String,
    pub country_code: String,
}

impl From<&PostalAddress> for CarrierAddress {
    fn from(address: &PostalAddress) -> Self {
        Self {
            name: address.name.trim().to_string(),
            mobile: address.mobile.trim().to_string(),
            email: address.email.trim().to_string(),
            address: address.address_line.trim().to_string(),
            city: address.city.trim().to_string(),
            state_province_code: address.state.trim().to_string(),
            postal_code: address.postal_code.trim().to_string(),
            country_code: address.country.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuotePackage {
    pub weight: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub package_type: String,
    pub weight_unit: String,
    pub dimension_unit: String,
}

impl QuotePackage {
    fn from_detail(detail: &PackageDetail, kind: Option<PackageType>) -> Self {
        Self {
            weight: detail.weight.trim().to_string(),
            length: detail.length.trim().to_string(),
            width: detail.width.trim().to_string(),
            height: detail.height.trim().to_string(),
            package_type: package_type_text(kind),
            weight_unit: detail.weight_unit.as_str().to_string(),
            dimension_unit: detail.dimension_unit.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RateQuoteRequest {
    pub ship_from_address: CarrierAddress,
    pub ship_to_address: CarrierAddress,
    pub package_count: usize,
    pub pickup_date: String,
    pub pickup_time: String,
    pub package_details: Vec<QuotePackage>,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuotationUpdateRequest {
    pub quotation_id: String,
    pub status: String,
    pub ship_from_address: CarrierAddress,
    pub ship_to_address: CarrierAddress,
    pub package_count: usize,
    pub pickup_date: String,
    pub pickup_time: String,
    pub package_details: Vec<QuotePackage>,
    pub selected_rate: Option<SelectedRate>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingPackageDetails {
    pub carrier_name: String,
    pub carrier_plan: String,
    pub service_code: String,
    pub package_count: usize,
    pub est_cost: f64,
    pub total_cost: f64,
    pub est_delivery_date: String,
    pub booking_date: String,
    pub booking_by: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingItem {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub package_type: String,
    pub package_cost: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookingCreateRequest {
    pub customer_id: i64,
    pub ship_to_address: BTreeMap<String, String>,
    pub ship_from_address: BTreeMap<String, String>,
    pub pickup_date: String,
    pub pickup_time: String,
    pub package_details: BookingPackageDetails,
    pub booking_items: Vec<BookingItem>,
}

pub fn rate_quote_request(state: &WizardState) -> RateQuoteRequest {
    RateQuoteRequest {
        ship_from_address: CarrierAddress::from(&state.ship_from),
        ship_to_address: CarrierAddress::from(&state.ship_to),
        package_count: state.package_count,
        pickup_date: text_or_default(
            state.pickup.as_ref().map(|slot| slot.compact_date()).as_deref(),
            DefaultedField::PickupDate,
        ),
        pickup_time: text_or_default(
            state.pickup.as_ref().map(|slot| slot.compact_time()).as_deref(),
            DefaultedField::QuotePickupTime,
        ),
        package_details: quote_packages(state),
        status: STATUS_UNSAVED.to_string(),
    }
}

/// Body for saving a quotation; the id is supplied by the caller so the
/// builder stays total even before a rate fetch has happened.
pub fn quotation_update_request(state: &WizardState, quotation_id: &str) -> QuotationUpdateRequest {
    let (pickup_date, pickup_time) = iso_pickup(state);
    QuotationUpdateRequest {
        quotation_id: quotation_id.to_string(),
        status: STATUS_SAVED.to_string(),
        ship_from_address: CarrierAddress::from(&state.ship_from),
        ship_to_address: CarrierAddress::from(&state.ship_to),
        package_count: state.package_count,
        pickup_date,
        pickup_time,
        package_details: quote_packages(state),
        selected_rate: state.selected_rate.clone(),
    }
}

pub fn booking_request(
    state: &WizardState,
    config: &AppConfig,
    now: OffsetDateTime,
) -> BookingCreateRequest {
    let (pickup_date, pickup_time) = iso_pickup(state);
    let rate = state.selected_rate.as_ref();
    let total_cost = number_or_default(rate.map(|rate| rate.total_charge), DefaultedField::Charge);

    let package_details = BookingPackageDetails {
        carrier_name: carrier_name(rate, config),
        carrier_plan: text_or_default(
            rate.map(|rate| rate.plan_name.as_str()),
            DefaultedField::CarrierPlan,
        ),
        service_code: text_or_default(
            rate.map(|rate| rate.service_code.as_str()),
            DefaultedField::ServiceCode,
        ),
        package_count: state.package_count,
        est_cost: total_cost,
        total_cost,
        est_delivery_date: text_or_default(
            rate.and_then(SelectedRate::delivery_date_iso).as_deref(),
            DefaultedField::EstimatedDelivery,
        ),
        booking_date: now.format(&Rfc3339).unwrap_or_default(),
        booking_by: config.booked_by.clone(),
    };

    let booking_items = state
        .package_details
        .iter()
        .map(|detail| booking_item(detail, state.package_type, total_cost))
        .collect();

    BookingCreateRequest {
        customer_id: config.customer_id,
        ship_to_address: flatten_address(&state.ship_to, AddressSide::To),
        ship_from_address: flatten_address(&state.ship_from, AddressSide::From),
        pickup_date,
        pickup_time,
        package_details,
        booking_items,
    }
}

/// `to_name`, `to_mobile`, ... with blanks replaced by the address default.
fn flatten_address(address: &PostalAddress, side: AddressSide) -> BTreeMap<String, String> {
    let prefix = match side {
        AddressSide::From => "from",
        AddressSide::To => "to",
    };
    [
        ("name", &address.name),
        ("mobile", &address.mobile),
        ("email", &address.email),
        ("address", &address.address_line),
        ("city", &address.city),
        ("state", &address.state),
        ("pincode", &address.postal_code),
        ("country", &address.country),
    ]
    .into_iter()
    .map(|(suffix, value)| {
        (
            format!("{prefix}_{suffix}"),
            text_or_default(Some(value), DefaultedField::BookingAddress),
        )
    })
    .collect()
}

/// The only default that is configured rather than fixed.
fn carrier_name(rate: Option<&SelectedRate>, config: &AppConfig) -> String {
    rate.map(|rate| rate.carrier_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(config.carrier_brand.as_str())
        .to_string()
}

fn booking_item(detail: &PackageDetail, kind: Option<PackageType>, cost: f64) -> BookingItem {
    let needs_dimensions = kind.map(PackageType::requires_dimensions).unwrap_or(true);
    let measure = |field: PackageField| {
        if field != PackageField::Weight && !needs_dimensions {
            return number_or_default(None, DefaultedField::Measurement);
        }
        number_or_default(parse_measure(detail.get(field)), DefaultedField::Measurement)
    };

    BookingItem {
        weight: measure(PackageField::Weight),
        length: measure(PackageField::Length),
        width: measure(PackageField::Width),
        height: measure(PackageField::Height),
        package_type: package_type_text(kind),
        package_cost: cost,
    }
}

fn quote_packages(state: &WizardState) -> Vec<QuotePackage> {
    state
        .package_details
        .iter()
        .map(|detail| QuotePackage::from_detail(detail, state.package_type))
        .collect()
}

fn iso_pickup(state: &WizardState) -> (String, String) {
    let date = text_or_default(
        state.pickup.as_ref().map(|slot| slot.date.as_str()),
        DefaultedField::PickupDate,
    );
    let time = text_or_default(
        state.pickup.as_ref().map(|slot| slot.iso_time()).as_deref(),
        DefaultedField::PickupTime,
    );
    (date, time)
}

fn package_type_text(kind: Option<PackageType>) -> String {
    text_or_default(kind.map(PackageType::as_str), DefaultedField::PackageType)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use time::macros::datetime;

    use super::*;
    use crate::domain::{
        package::PackageField,
        wizard::tests::{offer, ready_for_rates},
    };

    fn selected(state: &mut WizardState) {
        state
            .accept_rates(vec![offer(Some("Q-9"), "UPS Ground", "$42.50")])
            .unwrap();
        state.select_rate(0, "UPS");
    }

    #[test]
    fn rate_quote_has_one_entry_per_package() {
        let state = ready_for_rates();
        let request = rate_quote_request(&state);
        assert_eq!(request.package_count, 2);
        assert_eq!(request.package_details.len(), 2);
        assert!(request
            .package_details
            .iter()
            .all(|package| package.weight == "2.5" && package.package_type == "Non-Document"));
        assert_eq!(request.pickup_date, "20250305");
        assert_eq!(request.pickup_time, "143000");
        assert_eq!(request.status, STATUS_UNSAVED);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["ship_from_address"]["StateProvinceCode"], json!("CA"));
        assert_eq!(body["ship_to_address"]["CountryCode"], json!("US"));
        assert_eq!(body["package_details"][0]["weight_unit"], json!("lbs"));
    }

    #[test]
    fn rate_quote_without_pickup_uses_defaults() {
        let mut state = ready_for_rates();
        state.set_pickup("");
        let request = rate_quote_request(&state);
        assert_eq!(request.pickup_date, "");
        assert_eq!(request.pickup_time, "000000");
    }

    #[test]
    fn quotation_update_carries_selection_and_iso_pickup() {
        let mut state = ready_for_rates();
        selected(&mut state);
        let request = quotation_update_request(&state, "Q-9");
        assert_eq!(request.status, STATUS_SAVED);
        assert_eq!(request.quotation_id, "Q-9");
        assert_eq!(request.pickup_date, "2025-03-05");
        assert_eq!(request.pickup_time, "14:30:00");
        assert_eq!(
            request.selected_rate.as_ref().map(|rate| rate.total_charge),
            Some(42.5)
        );
    }

    #[test]
    fn booking_body_flattens_and_defaults() {
        let mut state = ready_for_rates();
        selected(&mut state);
        state.ship_to.email.clear();
        state.update_package(1, PackageField::Width, "abc".to_string());

        let config = AppConfig::default();
        let now = datetime!(2025-03-04 09:15:00 UTC);
        let body: Value = serde_json::to_value(booking_request(&state, &config, now)).unwrap();

        assert_eq!(body["customer_id"], json!(config.customer_id));
        assert_eq!(body["ship_to_address"]["to_email"], json!("-"));
        assert_eq!(body["ship_to_address"]["to_pincode"], json!("94105"));
        assert_eq!(body["ship_from_address"]["from_name"], json!("Sender"));
        assert_eq!(body["pickup_date"], json!("2025-03-05"));
        assert_eq!(body["pickup_time"], json!("14:30:00"));

        let details = &body["package_details"];
        assert_eq!(details["carrier_name"], json!("UPS"));
        assert_eq!(details["carrier_plan"], json!("UPS Ground"));
        assert_eq!(details["service_code"], json!("03"));
        assert_eq!(details["total_cost"], json!(42.5));
        assert_eq!(details["est_delivery_date"], json!("2025-03-07"));
        assert_eq!(details["booking_date"], json!("2025-03-04T09:15:00Z"));
        assert_eq!(details["booking_by"], json!("user"));

        let items = body["booking_items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["length"], json!(10.0));
        assert_eq!(items[1]["width"], json!(0.0));
        assert_eq!(items[1]["package_cost"], json!(42.5));
    }

    #[test]
    fn document_items_drop_dimensions() {
        let mut state = ready_for_rates();
        state.set_package_type(Some(PackageType::Document));
        selected(&mut state);
        let request = booking_request(&state, &AppConfig::default(), OffsetDateTime::UNIX_EPOCH);
        let item = &request.booking_items[0];
        assert_eq!(item.weight, 2.5);
        assert_eq!((item.length, item.width, item.height), (0.0, 0.0, 0.0));
        assert_eq!(item.package_type, "Document");
    }

    #[test]
    fn builders_are_total_on_empty_state() {
        let state = WizardState::default();
        let booking = booking_request(&state, &AppConfig::default(), OffsetDateTime::UNIX_EPOCH);
        assert_eq!(booking.package_details.carrier_plan, "N/A");
        assert_eq!(booking.package_details.service_code, "N/A");
        assert_eq!(booking.package_details.total_cost, 0.0);
        assert_eq!(booking.package_details.est_delivery_date, "");
        assert!(booking.ship_to_address.values().all(|value| value == "-"));
        assert_eq!(booking.booking_items[0].package_type, "");
        assert_eq!(rate_quote_request(&state).package_details.len(), 1);
    }

    #[test]
    fn transformation_is_idempotent() {
        let mut state = ready_for_rates();
        selected(&mut state);
        let config = AppConfig::default();
        let now = datetime!(2025-03-04 09:15:00 UTC);

        let first = serde_json::to_string(&booking_request(&state, &config, now)).unwrap();
        let second = serde_json::to_string(&booking_request(&state, &config, now)).unwrap();
        assert_eq!(first, second);

        let first = serde_json::to_string(&rate_quote_request(&state)).unwrap();
        let second = serde_json::to_string(&rate_quote_request(&state)).unwrap();
        assert_eq!(first, second);
    }
}
