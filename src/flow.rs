//! Asynchronous wizard actions. Each one validates, talks to the backend
//! and/or the draft slot, and only then mutates the state it was handed.

use thiserror::Error;
use time::OffsetDateTime;

use crate::{
    config::AppConfig,
    domain::{
        address::AddressSide,
        payload::{booking_request, quotation_update_request, rate_quote_request},
        quotation::SavedQuotation,
        rate::BookingConfirmation,
        validation::FieldErrors,
        wizard::{RateRejection, SubmitBlocked, WizardState, RATES_ERROR_KEY},
    },
    infra::backend::{CourierClientError, ShippingBackend},
    util::persistence::{DraftError, DraftStore},
};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Please fix the highlighted fields ({} issue(s))", .0.len())]
    Validation(FieldErrors),
    #[error("Enter an address book id first")]
    MissingAddressId,
    #[error(transparent)]
    Blocked(#[from] SubmitBlocked),
    #[error("No quotation id yet; fetch rates again")]
    MissingQuotation,
    #[error("Choose a saved quotation first")]
    NoQuotationChosen,
    #[error(transparent)]
    Rejected(#[from] RateRejection),
    #[error(transparent)]
    Backend(#[from] CourierClientError),
    #[error("Could not store the draft: {0}")]
    Storage(#[from] DraftError),
}

/// Fills one side of the address step from the address book.
pub async fn prefill_address(
    state: &mut WizardState,
    side: AddressSide,
    address_id: &str,
    backend: &dyn ShippingBackend,
) -> Result<(), FlowError> {
    let address_id = address_id.trim();
    if address_id.is_empty() {
        return Err(FlowError::MissingAddressId);
    }
    let record = backend.saved_address(address_id).await?;
    tracing::info!(side = side.key(), address_id, "address prefilled from address book");
    state.apply_saved_address(side, &record);
    Ok(())
}

/// Package -> CarrierSelection. Sends at most one request, and only when the
/// package step validates. Returns the number of offers received.
pub async fn request_rates(
    state: &mut WizardState,
    backend: &dyn ShippingBackend,
) -> Result<usize, FlowError> {
    let errors = state.validate_package_step();
    if !errors.is_empty() {
        state.field_errors = errors.clone();
        return Err(FlowError::Validation(errors));
    }

    let request = rate_quote_request(state);
    let outcome = match backend.fetch_rates(&request).await {
        Ok(offers) => {
            let count = offers.len();
            state
                .accept_rates(offers)
                .map(|()| count)
                .map_err(FlowError::from)
        }
        Err(err) => Err(FlowError::from(err)),
    };

    match outcome {
        Ok(count) => {
            tracing::info!(
                count,
                quotation_id = state.quotation_id.as_deref().unwrap_or_default(),
                "rates accepted"
            );
            Ok(count)
        }
        Err(err) => {
            tracing::warn!("rate fetch failed: {err}");
            state.record_error(RATES_ERROR_KEY, err.to_string());
            Err(err)
        }
    }
}

/// "Ship Later": persists the selection on the quotation and closes the wizard.
/// Returns the saved quotation id.
pub async fn save_for_later(
    state: &mut WizardState,
    backend: &dyn ShippingBackend,
    store: &dyn DraftStore,
) -> Result<String, FlowError> {
    if state.selected_rate.is_none() {
        return Err(SubmitBlocked::MissingRate.into());
    }
    let quotation_id = state
        .quotation_id
        .clone()
        .ok_or(FlowError::MissingQuotation)?;

    let request = quotation_update_request(state, &quotation_id);
    backend.save_quotation(&quotation_id, &request).await?;

    if let Err(err) = store.clear() {
        tracing::warn!("quotation saved but the draft could not be cleared: {err}");
    }
    state.reset();
    Ok(quotation_id)
}

/// "Ship Now": snapshot to the draft slot and move to review.
///
/// The transition happens even when the snapshot cannot be written; the
/// storage error is still returned so it can be shown.
pub fn ship_now(state: &mut WizardState, store: &dyn DraftStore) -> Result<(), FlowError> {
    if state.selected_rate.is_none() {
        return Err(SubmitBlocked::MissingRate.into());
    }
    state.enter_review();
    state.field_errors.clear();
    store.save(state).map_err(|err| {
        tracing::warn!("draft snapshot failed: {err}");
        FlowError::Storage(err)
    })
}

/// Review -> Terminal. A booking is created at most once per call.
pub async fn submit_booking(
    state: &mut WizardState,
    backend: &dyn ShippingBackend,
    store: &dyn DraftStore,
    config: &AppConfig,
    now: OffsetDateTime,
) -> Result<BookingConfirmation, FlowError> {
    state.check_submittable()?;

    let request = booking_request(state, config, now);
    let confirmation = backend.create_booking(&request).await.map_err(|err| {
        tracing::warn!("booking failed: {err}");
        FlowError::from(err)
    })?;

    tracing::info!(shipment_id = %confirmation.shipment_id, "booking confirmed");
    state.complete_booking(confirmation.clone());
    if let Err(err) = store.clear() {
        tracing::warn!("booking created but the draft could not be cleared: {err}");
    }
    Ok(confirmation)
}

/// Saved quotations that carry an id, in backend order.
pub async fn saved_quotations(
    backend: &dyn ShippingBackend,
) -> Result<Vec<SavedQuotation>, FlowError> {
    let mut quotations = backend.saved_quotations().await?;
    quotations.retain(|quotation| !quotation.id().is_empty());
    tracing::info!(count = quotations.len(), "saved quotations listed");
    Ok(quotations)
}

/// Replaces the wizard with a booking pre-seeded from a saved quotation and
/// snapshots it to the draft slot. A storage failure is only logged.
pub async fn open_saved_quotation(
    state: &mut WizardState,
    quotation_id: &str,
    backend: &dyn ShippingBackend,
    store: &dyn DraftStore,
    config: &AppConfig,
) -> Result<(), FlowError> {
    let quotation_id = quotation_id.trim();
    if quotation_id.is_empty() {
        return Err(FlowError::NoQuotationChosen);
    }

    let mut record = backend.saved_quotation(quotation_id).await.map_err(|err| {
        tracing::warn!(quotation_id, "saved quotation could not be loaded: {err}");
        FlowError::from(err)
    })?;
    if record.id().is_empty() {
        record.quotation_id = Some(quotation_id.to_string());
    }

    *state = WizardState::from_saved_quotation(&record, &config.carrier_brand);
    tracing::info!(quotation_id, step = ?state.step, "saved quotation reopened");
    if let Err(err) = store.save(state) {
        tracing::warn!("saved quotation reopened but the draft could not be stored: {err}");
    }
    Ok(())
}

/// Explicit close: empty wizard, no draft.
pub fn close(state: &mut WizardState, store: &dyn DraftStore) -> Result<(), FlowError> {
    state.reset();
    store.clear()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use time::macros::datetime;
    use tokio::sync::Mutex;

    use super::*;
    use crate::{
        domain::{
            address::SavedAddress,
            payload::{BookingCreateRequest, QuotationUpdateRequest, RateQuoteRequest},
            quotation::tests::STORED,
            rate::{BookingReceipt, RateOffer},
            wizard::{
                tests::{offer, ready_for_rates},
                ShipmentIntent, WizardStep,
            },
        },
        infra::backend::confirm_booking,
        util::persistence::MemoryDraftStore,
    };

    #[derive(Default)]
    struct ScriptedBackend {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        rate_results: VecDeque<Result<Vec<RateOffer>, CourierClientError>>,
        save_results: VecDeque<Result<(), CourierClientError>>,
        booking_results: VecDeque<Result<BookingReceipt, CourierClientError>>,
        addresses: VecDeque<Result<SavedAddress, CourierClientError>>,
        quotation_lists: VecDeque<Result<Vec<SavedQuotation>, CourierClientError>>,
        quotations: VecDeque<Result<SavedQuotation, CourierClientError>>,
        opened: Vec<String>,
        rate_requests: Vec<RateQuoteRequest>,
        saved: Vec<(String, QuotationUpdateRequest)>,
        bookings: Vec<BookingCreateRequest>,
    }

    impl ScriptedBackend {
        fn with_rates(results: Vec<Result<Vec<RateOffer>, CourierClientError>>) -> Self {
            let backend = Self::default();
            backend.state.try_lock().unwrap().rate_results = results.into();
            backend
        }

        fn script(&self) -> tokio::sync::MutexGuard<'_, ScriptedState> {
            self.state.try_lock().unwrap()
        }
    }

    #[async_trait]
    impl ShippingBackend for ScriptedBackend {
        async fn fetch_rates(
            &self,
            request: &RateQuoteRequest,
        ) -> Result<Vec<RateOffer>, CourierClientError> {
            let mut state = self.state.lock().await;
            state.rate_requests.push(request.clone());
            state.rate_results.pop_front().unwrap_or(Ok(Vec::new()))
        }

        async fn save_quotation(
            &self,
            quotation_id: &str,
            request: &QuotationUpdateRequest,
        ) -> Result<(), CourierClientError> {
            let mut state = self.state.lock().await;
            state.saved.push((quotation_id.to_owned(), request.clone()));
            state.save_results.pop_front().unwrap_or(Ok(()))
        }

        async fn create_booking(
            &self,
            request: &BookingCreateRequest,
        ) -> Result<BookingConfirmation, CourierClientError> {
            let mut state = self.state.lock().await;
            state.bookings.push(request.clone());
            state
                .booking_results
                .pop_front()
                .unwrap_or_else(|| Err(CourierClientError::Contract("no booking scripted".to_owned())))
                .and_then(confirm_booking)
        }

        async fn saved_address(
            &self,
            _address_id: &str,
        ) -> Result<SavedAddress, CourierClientError> {
            let mut state = self.state.lock().await;
            state
                .addresses
                .pop_front()
                .unwrap_or_else(|| Err(CourierClientError::Contract("address not found".into())))
        }

        async fn saved_quotations(&self) -> Result<Vec<SavedQuotation>, CourierClientError> {
            let mut state = self.state.lock().await;
            state.quotation_lists.pop_front().unwrap_or(Ok(Vec::new()))
        }

        async fn saved_quotation(
            &self,
            quotation_id: &str,
        ) -> Result<SavedQuotation, CourierClientError> {
            let mut state = self.state.lock().await;
            state.opened.push(quotation_id.to_owned());
            state.quotations.pop_front().unwrap_or_else(|| {
                Err(CourierClientError::Status {
                    status: 404,
                    detail: "Quotation not found".to_owned(),
                })
            })
        }
    }

    fn status_error() -> CourierClientError {
        CourierClientError::Status {
            status: 502,
            detail: "Bad Gateway".to_owned(),
        }
    }

    fn receipt() -> BookingReceipt {
        BookingReceipt {
            shipment_id: Some("1Z999AA1".to_owned()),
            tracking_number: Some("1Z999AA10123456784".to_owned()),
            total_charges: Some("42.50".to_owned()),
            base_service_charge: Some("38.00".to_owned()),
            label_filename: Some("label_1Z999AA1.gif".to_owned()),
        }
    }

    async fn on_review(backend: &ScriptedBackend, store: &MemoryDraftStore) -> WizardState {
        let mut state = ready_for_rates();
        backend
            .script()
            .rate_results
            .push_back(Ok(vec![offer(Some("Q-5"), "UPS Ground", "42.50")]));
        request_rates(&mut state, backend).await.unwrap();
        state.select_rate(0, "UPS");
        ship_now(&mut state, store).unwrap();
        state
    }

    #[tokio::test]
    async fn invalid_packages_never_reach_the_backend() {
        let backend = ScriptedBackend::default();
        let mut state = ready_for_rates();
        state.update_package(0, crate::domain::package::PackageField::Weight, String::new());

        let err = request_rates(&mut state, &backend).await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(ref errors) if errors.contains("packages[0].weight")));
        assert!(backend.script().rate_requests.is_empty());
        assert_eq!(state.step, WizardStep::Package);
    }

    #[tokio::test]
    async fn two_packages_produce_two_entries_and_reach_carrier_selection() {
        let backend = ScriptedBackend::with_rates(vec![Ok(vec![
            offer(Some("Q-1"), "UPS Ground", "18.40"),
            offer(Some("Q-1"), "UPS 2nd Day Air", "41.00"),
        ])]);
        let mut state = ready_for_rates();

        assert_eq!(request_rates(&mut state, &backend).await.unwrap(), 2);
        assert_eq!(state.step, WizardStep::CarrierSelection);
        assert_eq!(state.quotation_id.as_deref(), Some("Q-1"));

        let script = backend.script();
        assert_eq!(script.rate_requests.len(), 1);
        let sent = &script.rate_requests[0];
        assert_eq!(sent.package_details.len(), 2);
        assert!(sent.package_details.iter().all(|package| package.height == "4"));
    }

    #[tokio::test]
    async fn empty_rate_response_keeps_package_step() {
        let backend = ScriptedBackend::with_rates(vec![Ok(Vec::new())]);
        let mut state = ready_for_rates();

        let err = request_rates(&mut state, &backend).await.unwrap_err();
        assert!(matches!(err, FlowError::Rejected(RateRejection::Empty)));
        assert_eq!(state.step, WizardStep::Package);
        assert!(state.candidate_rates.is_empty());
        assert!(state.quotation_id.is_none());
        assert!(state.error(RATES_ERROR_KEY).is_some());
    }

    #[tokio::test]
    async fn transport_failure_keeps_previous_rates() {
        let backend = ScriptedBackend::with_rates(vec![
            Ok(vec![offer(Some("Q-1"), "UPS Ground", "18.40")]),
            Err(status_error()),
            Ok(vec![offer(None, "UPS Ground", "18.40")]),
        ]);
        let mut state = ready_for_rates();
        request_rates(&mut state, &backend).await.unwrap();
        state.go_previous();

        let err = request_rates(&mut state, &backend).await.unwrap_err();
        assert!(matches!(err, FlowError::Backend(CourierClientError::Status { status: 502, .. })));
        assert_eq!(state.step, WizardStep::Package);
        assert_eq!(state.quotation_id.as_deref(), Some("Q-1"));
        assert_eq!(state.candidate_rates.len(), 1);

        let err = request_rates(&mut state, &backend).await.unwrap_err();
        assert!(matches!(err, FlowError::Rejected(RateRejection::MissingQuotationId)));
        assert_eq!(state.step, WizardStep::Package);
        assert_eq!(backend.script().rate_requests.len(), 3);
    }

    #[tokio::test]
    async fn ship_later_saves_and_resets() {
        let backend = ScriptedBackend::with_rates(vec![Ok(vec![offer(Some("Q-7"), "Ground", "9")])]);
        let store = MemoryDraftStore::holding(&ready_for_rates());
        let mut state = ready_for_rates();

        assert!(matches!(
            save_for_later(&mut state, &backend, &store).await,
            Err(FlowError::Blocked(SubmitBlocked::MissingRate))
        ));

        request_rates(&mut state, &backend).await.unwrap();
        state.select_rate(0, "UPS");
        let saved = save_for_later(&mut state, &backend, &store).await.unwrap();

        assert_eq!(saved, "Q-7");
        assert_eq!(state, WizardState::new(state.intent));
        assert!(store.is_empty());
        let script = backend.script();
        assert_eq!(script.saved.len(), 1);
        assert_eq!(script.saved[0].0, "Q-7");
        assert_eq!(script.saved[0].1.status, "Saved");
    }

    #[tokio::test]
    async fn ship_later_failure_changes_nothing() {
        let backend = ScriptedBackend::with_rates(vec![Ok(vec![offer(Some("Q-7"), "Ground", "9")])]);
        backend.script().save_results.push_back(Err(status_error()));
        let store = MemoryDraftStore::default();
        let mut state = ready_for_rates();
        request_rates(&mut state, &backend).await.unwrap();
        state.select_rate(0, "UPS");
        let before = state.clone();

        assert!(save_for_later(&mut state, &backend, &store).await.is_err());
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn ship_now_snapshots_and_survives_storage_failure() {
        let backend = ScriptedBackend::default();
        let store = MemoryDraftStore::default();
        let state = on_review(&backend, &store).await;
        assert_eq!(state.step, WizardStep::Review);
        assert_eq!(store.load().map(|draft| draft.step), Some(WizardStep::Review));

        let mut state = state;
        state.go_previous();
        let failing = MemoryDraftStore::failing();
        let err = ship_now(&mut state, &failing).unwrap_err();
        assert!(matches!(err, FlowError::Storage(_)));
        assert_eq!(state.step, WizardStep::Review);
    }

    #[tokio::test]
    async fn booking_success_reaches_terminal_and_clears_draft() {
        let backend = ScriptedBackend::default();
        let store = MemoryDraftStore::default();
        let mut state = on_review(&backend, &store).await;
        backend.script().booking_results.push_back(Ok(receipt()));

        let config = AppConfig::default();
        let now = datetime!(2025-03-04 09:15:00 UTC);
        let booked = submit_booking(&mut state, &backend, &store, &config, now)
            .await
            .unwrap();

        assert_eq!(booked.shipment_id, "1Z999AA1");
        assert_eq!(state.step, WizardStep::Terminal);
        assert_eq!(state.booking.as_ref(), Some(&booked));
        assert!(store.is_empty());

        let script = backend.script();
        assert_eq!(script.bookings.len(), 1);
        assert_eq!(script.bookings[0].package_details.carrier_name, "UPS");
        assert_eq!(script.bookings[0].package_details.total_cost, 42.5);
    }

    #[tokio::test]
    async fn booking_without_label_stays_on_review() {
        let backend = ScriptedBackend::default();
        let store = MemoryDraftStore::default();
        let mut state = on_review(&backend, &store).await;

        backend.script().booking_results.push_back(Ok(BookingReceipt {
            label_filename: None,
            ..receipt()
        }));

        let err = submit_booking(
            &mut state,
            &backend,
            &store,
            &AppConfig::default(),
            OffsetDateTime::UNIX_EPOCH,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FlowError::Backend(ref inner) if inner.is_contract()));
        assert!(err.to_string().contains("label_filename"));
        assert_eq!(state.step, WizardStep::Review);
        assert!(state.booking.is_none());
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn booking_requires_rate_and_addresses() {
        let backend = ScriptedBackend::default();
        let store = MemoryDraftStore::default();
        let mut state = ready_for_rates();

        let err = submit_booking(
            &mut state,
            &backend,
            &store,
            &AppConfig::default(),
            OffsetDateTime::UNIX_EPOCH,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FlowError::Blocked(SubmitBlocked::MissingRate)));
        assert!(backend.script().bookings.is_empty());
    }

    #[tokio::test]
    async fn prefill_copies_record_or_leaves_state_alone() {
        let backend = ScriptedBackend::default();
        backend.script().addresses.push_back(Ok(SavedAddress {
            name: "Depot".to_owned(),
            address_line_1: "9 Pier".to_owned(),
            city: "Austin".to_owned(),
            state: "TX".to_owned(),
            postal_code: "73301".to_owned(),
            country: "US".to_owned(),
            mobile: "5125550100".to_owned(),
            ..SavedAddress::default()
        }));
        let mut state = WizardState::default();

        prefill_address(&mut state, AddressSide::From, "12", &backend)
            .await
            .unwrap();
        assert_eq!(state.ship_from.city, "Austin");

        let before = state.clone();
        assert!(prefill_address(&mut state, AddressSide::To, "99", &backend)
            .await
            .is_err());
        assert!(matches!(
            prefill_address(&mut state, AddressSide::To, "  ", &backend).await,
            Err(FlowError::MissingAddressId)
        ));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn saved_quotation_list_skips_records_without_id() {
        let backend = ScriptedBackend::default();
        backend.script().quotation_lists.push_back(Ok(vec![
            SavedQuotation {
                quotation_id: Some("41".to_owned()),
                ..SavedQuotation::default()
            },
            SavedQuotation {
                quotation_id: Some("  ".to_owned()),
                ..SavedQuotation::default()
            },
            SavedQuotation::default(),
        ]));

        let listed = saved_quotations(&backend).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), "41");

        backend.script().quotation_lists.push_back(Err(status_error()));
        assert!(matches!(
            saved_quotations(&backend).await,
            Err(FlowError::Backend(CourierClientError::Status { status: 502, .. }))
        ));
    }

    #[tokio::test]
    async fn saved_quotation_is_booked_later() {
        let backend = ScriptedBackend::default();
        let store = MemoryDraftStore::default();
        let config = AppConfig::default();
        backend
            .script()
            .quotations
            .push_back(Ok(serde_json::from_str(STORED).unwrap()));
        let mut state = WizardState::new(ShipmentIntent::Quotation);

        open_saved_quotation(&mut state, " 41 ", &backend, &store, &config)
            .await
            .unwrap();
        assert_eq!(backend.script().opened, vec!["41".to_owned()]);
        assert_eq!(state.intent, ShipmentIntent::Booking);
        assert_eq!(state.step, WizardStep::Review);
        assert_eq!(store.load().map(|draft| draft.step), Some(WizardStep::Review));

        backend.script().booking_results.push_back(Ok(receipt()));
        let now = datetime!(2025-03-04 09:15:00 UTC);
        submit_booking(&mut state, &backend, &store, &config, now)
            .await
            .unwrap();

        assert_eq!(state.step, WizardStep::Terminal);
        assert!(store.is_empty());
        let script = backend.script();
        let booked = &script.bookings[0];
        assert_eq!(booked.booking_items.len(), 2);
        assert_eq!(booked.package_details.carrier_plan, "UPS Ground");
        assert_eq!(booked.package_details.total_cost, 42.5);
        assert_eq!(booked.pickup_date, "2025-03-05");
    }

    #[tokio::test]
    async fn saved_quotation_failures_leave_state_alone() {
        let backend = ScriptedBackend::default();
        let store = MemoryDraftStore::default();
        let config = AppConfig::default();
        let mut state = ready_for_rates();
        let before = state.clone();

        assert!(matches!(
            open_saved_quotation(&mut state, "  ", &backend, &store, &config).await,
            Err(FlowError::NoQuotationChosen)
        ));
        let err = open_saved_quotation(&mut state, "404", &backend, &store, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Backend(CourierClientError::Status { status: 404, .. })));
        assert_eq!(state, before);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn saved_quotation_without_id_keeps_requested_id() {
        let backend = ScriptedBackend::default();
        backend.script().quotations.push_back(Ok(SavedQuotation {
            package_count: Some("1".to_owned()),
            ..SavedQuotation::default()
        }));
        let mut state = WizardState::default();

        open_saved_quotation(
            &mut state,
            "77",
            &backend,
            &MemoryDraftStore::failing(),
            &AppConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(state.quotation_id.as_deref(), Some("77"));
        assert_eq!(state.step, WizardStep::Package);
    }

    #[test]
    fn close_resets_and_clears_draft() {
        let store = MemoryDraftStore::holding(&ready_for_rates());
        let mut state = ready_for_rates();
        close(&mut state, &store).unwrap();
        assert_eq!(state.step, WizardStep::Address);
        assert!(store.is_empty());
    }
}
