//! Quotations stored on the backend, read back so they can be booked later.
//!
//! The records mirror what "Ship Later" sends: PascalCase addresses, string
//! measurements and the selected rate. Older records only carry
//! `quotation_items`, so both package lists are accepted.

use serde::Deserialize;

use super::{
    address::PostalAddress,
    lenient::{nullable_list, opt_string_from_json},
    rate::{parse_charge, RateOffer},
    validation::parse_measure,
};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SavedQuotation {
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub quotation_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub booking_status: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub ship_from_address: Option<QuotedAddress>,
    #[serde(default)]
    pub ship_to_address: Option<QuotedAddress>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub from_pincode: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub to_pincode: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub package_count: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub pickup_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub pickup_time: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub package_details: Vec<QuotedPackage>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub quotation_items: Vec<QuotedPackage>,
    #[serde(default, alias = "selectedRate")]
    pub selected_rate: Option<QuotedRate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuotedAddress {
    #[serde(default, alias = "name", deserialize_with = "opt_string_from_json")]
    pub name: Option<String>,
    #[serde(default, alias = "mobile", deserialize_with = "opt_string_from_json")]
    pub mobile: Option<String>,
    #[serde(default, alias = "email", deserialize_with = "opt_string_from_json")]
    pub email: Option<String>,
    #[serde(default, alias = "address", deserialize_with = "opt_string_from_json")]
    pub address: Option<String>,
    #[serde(default, alias = "city", deserialize_with = "opt_string_from_json")]
    pub city: Option<String>,
    #[serde(default, alias = "state", deserialize_with = "opt_string_from_json")]
    pub state_province_code: Option<String>,
    #[serde(default, alias = "postal_code", deserialize_with = "opt_string_from_json")]
    pub postal_code: Option<String>,
    #[serde(default, alias = "country", deserialize_with = "opt_string_from_json")]
    pub country_code: Option<String>,
}

impl QuotedAddress {
    /// The `"-"` placeholders written for blank fields come back as blanks.
    pub fn to_postal(&self) -> PostalAddress {
        PostalAddress {
            name: text(&self.name),
            mobile: text(&self.mobile),
            email: text(&self.email),
            address_line: text(&self.address),
            city: text(&self.city),
            state: text(&self.state_province_code),
            postal_code: text(&self.postal_code),
            country: text(&self.country_code),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct QuotedPackage {
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub width: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub package_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub weight_unit: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub dimension_unit: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub cost: Option<String>,
}

/// Keeps a measurement only when it is a positive number; zero-filled
/// dimensions of document items become blanks.
pub fn measure(raw: &Option<String>) -> String {
    let value = text(raw);
    match parse_measure(&value) {
        Some(_) => value,
        None => String::new(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuotedRate {
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub carrier_name: Option<String>,
    #[serde(default, alias = "carrier_plan", deserialize_with = "opt_string_from_json")]
    pub plan_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub service_code: Option<String>,
    #[serde(default, alias = "total_charges", deserialize_with = "opt_string_from_json")]
    pub total_charge: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub estimated_arrival_date: Option<String>,
}

impl QuotedRate {
    /// The stored selection as a one-row offer list entry.
    pub fn to_offer(&self, quotation_id: &str) -> RateOffer {
        RateOffer {
            quotation_id: Some(quotation_id.to_string()),
            carrier_name: self.carrier_name.clone(),
            service_name: self.plan_name.clone(),
            service_code: self.service_code.clone(),
            total_charges: self.total_charge.clone(),
            estimated_arrival_date: self.estimated_arrival_date.clone(),
            ..RateOffer::default()
        }
    }
}

impl SavedQuotation {
    pub fn id(&self) -> &str {
        self.quotation_id.as_deref().map(str::trim).unwrap_or_default()
    }

    /// `package_details` when present, else the backend's item rows.
    pub fn packages(&self) -> &[QuotedPackage] {
        if self.package_details.is_empty() {
            &self.quotation_items
        } else {
            &self.package_details
        }
    }

    pub fn package_total(&self) -> usize {
        self.package_count
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|count| *count > 0)
            .unwrap_or_else(|| self.packages().len().max(1))
    }

    pub fn route_label(&self) -> String {
        let end = |address: &Option<QuotedAddress>, pincode: &Option<String>| {
            let address = address.as_ref().map(QuotedAddress::to_postal).unwrap_or_default();
            [address.city, address.postal_code, text(pincode)]
                .into_iter()
                .find(|part| !part.is_empty())
                .unwrap_or_else(|| "?".to_string())
        };
        format!(
            "{} → {}",
            end(&self.ship_from_address, &self.from_pincode),
            end(&self.ship_to_address, &self.to_pincode)
        )
    }

    pub fn rate_label(&self) -> Option<String> {
        let rate = self.selected_rate.as_ref()?;
        let parts: Vec<String> = [&rate.carrier_name, &rate.plan_name]
            .into_iter()
            .map(text)
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" · "))
    }

    /// Selected rate charge, else the sum of item costs.
    pub fn total_charge(&self) -> Option<f64> {
        if let Some(rate) = &self.selected_rate {
            return Some(parse_charge(rate.total_charge.as_deref()));
        }
        let costs: Vec<f64> = self
            .packages()
            .iter()
            .filter_map(|package| package.cost.as_deref())
            .map(|cost| parse_charge(Some(cost)))
            .collect();
        (!costs.is_empty()).then(|| costs.iter().sum())
    }

    pub fn status_label(&self) -> String {
        [&self.status, &self.booking_status]
            .into_iter()
            .map(text)
            .find(|part| !part.is_empty())
            .unwrap_or_else(|| "Saved".to_string())
    }
}

fn text(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        None | Some("-") => String::new(),
        Some(trimmed) => trimmed.to_string(),
    }
}
