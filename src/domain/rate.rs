use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use super::lenient::opt_string_from_json;

pub const NOT_AVAILABLE: &str = "N/A";

/// One carrier/service quote as returned by the rate endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RateOffer {
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub quotation_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub carrier_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub service_desc: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub service_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub total_charges: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub estimated_arrival_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub estimated_arrival_time: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub transit_time: Option<String>,
}

impl RateOffer {
    pub fn has_quotation_id(&self) -> bool {
        non_blank(self.quotation_id.as_deref()).is_some()
    }

    pub fn charge(&self) -> f64 {
        parse_charge(self.total_charges.as_deref())
    }

    pub fn plan_label(&self) -> &str {
        non_blank(self.service_name.as_deref())
            .or_else(|| non_blank(self.service_desc.as_deref()))
            .unwrap_or(NOT_AVAILABLE)
    }
}

/// A rate the user picked, with every field filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedRate {
    pub carrier_name: String,
    pub plan_name: String,
    pub service_code: String,
    pub total_charge: f64,
    pub estimated_arrival_date: String,
}

impl SelectedRate {
    pub fn from_offer(offer: &RateOffer, carrier_brand: &str) -> Self {
        let carrier_name = non_blank(offer.carrier_name.as_deref())
            .unwrap_or(carrier_brand)
            .to_string();

        Self {
            carrier_name,
            plan_name: offer.plan_label().to_string(),
            service_code: non_blank(offer.service_code.as_deref())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            total_charge: offer.charge(),
            estimated_arrival_date: offer
                .estimated_arrival_date
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Estimated delivery as `YYYY-MM-DD`, or `None` when the carrier text is not a date.
    pub fn delivery_date_iso(&self) -> Option<String> {
        delivery_date_iso(&self.estimated_arrival_date)
    }
}

/// Booking-creation response, before contract checks.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookingReceipt {
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub shipment_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub tracking_number: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub total_charges: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub base_service_charge: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub label_filename: Option<String>,
}

impl BookingReceipt {
    /// Fails with the names of the required fields that came back empty.
    pub fn into_confirmation(self) -> Result<BookingConfirmation, Vec<&'static str>> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            match value.filter(|text| !text.trim().is_empty()) {
                Some(text) => text,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let shipment_id = require(self.shipment_id, "shipment_id");
        let total_charges = require(self.total_charges, "total_charges");
        let base_service_charge = require(self.base_service_charge, "base_service_charge");
        let label_filename = require(self.label_filename, "label_filename");

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(BookingConfirmation {
            shipment_id,
            tracking_number: self.tracking_number.filter(|text| !text.trim().is_empty()),
            total_charges,
            base_service_charge,
            label_filename,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub shipment_id: String,
    pub tracking_number: Option<String>,
    pub total_charges: String,
    pub base_service_charge: String,
    pub label_filename: String,
}

impl BookingConfirmation {
    /// Host-relative path the label image is served from.
    pub fn label_path(&self) -> String {
        let basename = self
            .label_filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.label_filename);
        format!("/shipment_labels/{basename}")
    }
}

/// Strips a leading currency sign; anything unparseable is `0.0`.
pub fn parse_charge(raw: Option<&str>) -> f64 {
    raw.map(|text| text.trim().trim_start_matches('$').replace(',', ""))
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Accepts the carrier's `March 05, 2025`, ISO `2025-03-05` or compact `20250305`.
pub fn delivery_date_iso(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let date = Date::parse(
        raw,
        format_description!("[month repr:long] [day padding:none], [year]"),
    )
    .or_else(|_| Date::parse(raw, format_description!("[month repr:long] [day], [year]")))
    .or_else(|_| Date::parse(raw, format_description!("[year]-[month]-[day]")))
    .or_else(|_| Date::parse(raw, format_description!("[year][month][day]")))
    .ok()?;

    date.format(format_description!("[year]-[month]-[day]")).ok()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_carrier_name_uses_brand_default() {
        let offer: RateOffer = serde_json::from_str(
            r#"{"quotation_id": 91, "service_code": "03", "service_name": "UPS Ground",
                "total_charges": "$18.40", "estimated_arrival_date": "March 07, 2025"}"#,
        )
        .unwrap();
        let selected = SelectedRate::from_offer(&offer, "UPS");
        assert_eq!(selected.carrier_name, "UPS");
        assert_eq!(selected.plan_name, "UPS Ground");
        assert_eq!(selected.service_code, "03");
        assert!((selected.total_charge - 18.40).abs() < f64::EPSILON);
        assert_eq!(selected.delivery_date_iso().as_deref(), Some("2025-03-07"));
    }

    #[test]
    fn sparse_offer_normalizes_to_placeholders() {
        let offer = RateOffer {
            quotation_id: Some("Q1".into()),
            total_charges: Some("n/a".into()),
            ..RateOffer::default()
        };
        let selected = SelectedRate::from_offer(&offer, "UPS");
        assert_eq!(selected.plan_name, NOT_AVAILABLE);
        assert_eq!(selected.service_code, NOT_AVAILABLE);
        assert_eq!(selected.total_charge, 0.0);
        assert_eq!(selected.estimated_arrival_date, "");
        assert_eq!(selected.delivery_date_iso(), None);
    }

    #[test]
    fn plan_falls_back_to_service_description() {
        let offer = RateOffer {
            quotation_id: Some("Q1".into()),
            service_name: Some("  ".into()),
            service_desc: Some("UPS Next Day Air".into()),
            ..RateOffer::default()
        };
        assert_eq!(offer.plan_label(), "UPS Next Day Air");
        assert_eq!(SelectedRate::from_offer(&offer, "UPS").plan_name, "UPS Next Day Air");
    }

    #[test]
    fn delivery_dates_in_known_shapes() {
        assert_eq!(delivery_date_iso("March 7, 2025").as_deref(), Some("2025-03-07"));
        assert_eq!(delivery_date_iso("2025-03-07").as_deref(), Some("2025-03-07"));
        assert_eq!(delivery_date_iso("20250307").as_deref(), Some("2025-03-07"));
        assert_eq!(delivery_date_iso("next week"), None);
    }

    #[test]
    fn receipt_without_label_is_rejected() {
        let receipt: BookingReceipt = serde_json::from_str(
            r#"{"shipment_id": "1Z999", "total_charges": "20.10", "base_service_charge": "18.00"}"#,
        )
        .unwrap();
        assert_eq!(receipt.into_confirmation().unwrap_err(), vec!["label_filename"]);
    }

    #[test]
    fn label_path_uses_basename() {
        let receipt: BookingReceipt = serde_json::from_str(
            r#"{"shipment_id": "1Z999", "tracking_number": "1Z999AA10123456784",
                "total_charges": 20.1, "base_service_charge": "18.00",
                "label_filename": "labels/2025/label_1Z999.png"}"#,
        )
        .unwrap();
        let confirmation = receipt.into_confirmation().unwrap();
        assert_eq!(confirmation.label_path(), "/shipment_labels/label_1Z999.png");
        assert_eq!(confirmation.total_charges, "20.1");
    }
}
