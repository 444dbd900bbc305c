//! reqwest client for the courier REST backend.
//!
//! - Rate quotes, quotation saves and booking creation.
//! - Address-book lookups for prefilling the address step.
//! - Listing and reading back saved quotations.
//! - Resolves label images against the backend host.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::AppConfig,
    domain::{
        address::SavedAddress,
        payload::{BookingCreateRequest, QuotationUpdateRequest, RateQuoteRequest},
        quotation::SavedQuotation,
        rate::{BookingConfirmation, BookingReceipt, RateOffer},
    },
    infra::backend::{confirm_booking, CourierClientError, ShippingBackend},
    util::version::user_agent,
};

const RATES_PATH: &str = "bookings/fetch-ups-rates/";
const BOOKING_PATH: &str = "bookings/create_booking/";
const QUOTATIONS_PATH: &str = "quotations/allquotations";
const RATE_LIST_KEYS: [&str; 3] = ["rates", "shipping_rates", "data"];
const QUOTATION_LIST_KEYS: [&str; 2] = ["quotations", "data"];

#[derive(Clone)]
pub struct CourierClient {
    http: Client,
    base_url: Url,
}

impl CourierClient {
    pub fn new(config: &AppConfig) -> Result<Self, CourierClientError> {
        let base_url = config.base_url()?;
        let http = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self { http, base_url })
    }

    /// Absolute URL of the label image, served from the backend host root.
    pub fn label_url(&self, confirmation: &BookingConfirmation) -> Option<Url> {
        self.base_url.join(&confirmation.label_path()).ok()
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    async fn fetch_json<T>(&self, builder: RequestBuilder) -> Result<T, CourierClientError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CourierClientError::Status {
                status: status.as_u16(),
                detail: error_detail(&body).unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                }),
            });
        }

        let value: Value = response.json().await?;
        serde_json::from_value(value)
            .map_err(|err| CourierClientError::Contract(format!("malformed body: {err}")))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ShippingBackend for CourierClient {
    async fn fetch_rates(
        &self,
        request: &RateQuoteRequest,
    ) -> Result<Vec<RateOffer>, CourierClientError> {
        let url = self.url(RATES_PATH)?;
        tracing::debug!(%url, packages = request.package_count, "requesting rate quote");
        let value: Value = self.fetch_json(self.http.post(url).json(request)).await?;
        let offers = parse_rate_offers(value)?;
        tracing::info!(count = offers.len(), "rate quote received");
        Ok(offers)
    }

    async fn save_quotation(
        &self,
        quotation_id: &str,
        request: &QuotationUpdateRequest,
    ) -> Result<(), CourierClientError> {
        let url = self.url(&format!("quotations/{quotation_id}/updatequotation/"))?;
        tracing::debug!(%url, "saving quotation");
        let _: Value = self.fetch_json(self.http.put(url).json(request)).await?;
        tracing::info!(quotation_id, "quotation saved");
        Ok(())
    }

    async fn create_booking(
        &self,
        request: &BookingCreateRequest,
    ) -> Result<BookingConfirmation, CourierClientError> {
        let url = self.url(BOOKING_PATH)?;
        tracing::debug!(%url, items = request.booking_items.len(), "creating booking");
        let receipt: BookingReceipt = self.fetch_json(self.http.post(url).json(request)).await?;
        let confirmation = confirm_booking(receipt)?;
        tracing::info!(shipment_id = %confirmation.shipment_id, "booking created");
        Ok(confirmation)
    }

    async fn saved_address(&self, address_id: &str) -> Result<SavedAddress, CourierClientError> {
        let url = self.url(&format!("addressbook/{address_id}/viewaddressbook/"))?;
        let value: Value = self.fetch_json(self.http.get(url)).await?;
        parse_saved_address(value)
    }

    async fn saved_quotations(&self) -> Result<Vec<SavedQuotation>, CourierClientError> {
        let url = self.url(QUOTATIONS_PATH)?;
        tracing::debug!(%url, "listing saved quotations");
        let value: Value = self.fetch_json(self.http.get(url)).await?;
        let quotations = parse_list(value, &QUOTATION_LIST_KEYS, "quotation")?;
        tracing::info!(count = quotations.len(), "saved quotations received");
        Ok(quotations)
    }

    async fn saved_quotation(
        &self,
        quotation_id: &str,
    ) -> Result<SavedQuotation, CourierClientError> {
        let url = self.url(&format!("quotations/{quotation_id}/viewquotation/"))?;
        tracing::debug!(%url, "loading saved quotation");
        self.fetch_json(self.http.get(url)).await
    }
}

fn parse_rate_offers(value: Value) -> Result<Vec<RateOffer>, CourierClientError> {
    parse_list(value, &RATE_LIST_KEYS, "rate")
}

/// Accepts a bare array or an object wrapping one under one of `keys`.
fn parse_list<T>(value: Value, keys: &[&str], what: &str) -> Result<Vec<T>, CourierClientError>
where
    T: DeserializeOwned,
{
    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| CourierClientError::Contract(format!("{what} response is not a list")))?,
        other => {
            return Err(CourierClientError::Contract(format!(
                "{what} response is not a list: {other}"
            )))
        }
    };

    list.into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|err| CourierClientError::Contract(format!("malformed {what}: {err}")))
        })
        .collect()
}

/// The lookup endpoint returns either one record or a list of them.
fn parse_saved_address(value: Value) -> Result<SavedAddress, CourierClientError> {
    let record = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| CourierClientError::Contract("address not found".into()))?,
        other => other,
    };
    serde_json::from_value(record)
        .map_err(|err| CourierClientError::Contract(format!("malformed address: {err}")))
}

/// Pulls a readable message out of an error body: `{"detail": "..."}`,
/// `{"detail": [{"loc": [..], "msg": ".."}]}`, `{"error": ".."}` or plain text.
fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.chars().take(200).collect());
    };

    let detail = value
        .get("detail")
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))?;
    match detail {
        Value::String(text) => Some(text.clone()),
        Value::Array(entries) => {
            let messages: Vec<String> = entries
                .iter()
                .filter_map(|entry| {
                    let msg = entry.get("msg")?.as_str()?;
                    let field = entry
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .and_then(Value::as_str);
                    Some(match field {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}
