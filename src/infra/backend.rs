use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    address::SavedAddress,
    payload::{BookingCreateRequest, QuotationUpdateRequest, RateQuoteRequest},
    quotation::SavedQuotation,
    rate::{BookingConfirmation, BookingReceipt, RateOffer},
};

#[derive(Debug, Error)]
pub enum CourierClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("unexpected response: {0}")]
    Contract(String),
}

impl CourierClientError {
    pub fn is_contract(&self) -> bool {
        matches!(self, CourierClientError::Contract(_))
    }
}

/// Applies the booking contract to a raw response.
pub fn confirm_booking(receipt: BookingReceipt) -> Result<BookingConfirmation, CourierClientError> {
    receipt.into_confirmation().map_err(|missing| {
        CourierClientError::Contract(format!(
            "Incomplete shipment response: missing {}",
            missing.join(", ")
        ))
    })
}

/// Remote operations the wizard depends on.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ShippingBackend: Send + Sync {
    /// Raw offers in backend order. Acceptance rules are applied by the caller.
    async fn fetch_rates(
        &self,
        request: &RateQuoteRequest,
    ) -> Result<Vec<RateOffer>, CourierClientError>;

    async fn save_quotation(
        &self,
        quotation_id: &str,
        request: &QuotationUpdateRequest,
    ) -> Result<(), CourierClientError>;

    /// A confirmation is returned only when every required response field is present.
    async fn create_booking(
        &self,
        request: &BookingCreateRequest,
    ) -> Result<BookingConfirmation, CourierClientError>;

    async fn saved_address(&self, address_id: &str) -> Result<SavedAddress, CourierClientError>;

    /// Every quotation stored on the backend.
    async fn saved_quotations(&self) -> Result<Vec<SavedQuotation>, CourierClientError>;

    async fn saved_quotation(
        &self,
        quotation_id: &str,
    ) -> Result<SavedQuotation, CourierClientError>;
}
