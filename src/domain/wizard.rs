use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    address::{AddressField, AddressSide, PostalAddress, SavedAddress, REQUIRED_MESSAGE},
    package::{
        resize_packages, DimensionUnit, PackageDetail, PackageField, PackageType, PickupSlot,
        WeightUnit, MAX_PACKAGES,
    },
    quotation::{measure, QuotedAddress, SavedQuotation},
    rate::{BookingConfirmation, RateOffer, SelectedRate},
    validation::{is_blank, FieldErrors},
};

/// Key under which rate-fetch failures are recorded.
pub const RATES_ERROR_KEY: &str = "rates";

/// Which entry point opened the wizard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipmentIntent {
    #[default]
    Booking,
    Quotation,
}

impl ShipmentIntent {
    pub fn title(&self) -> &'static str {
        match self {
            ShipmentIntent::Booking => "Create Booking",
            ShipmentIntent::Quotation => "Create Quotation",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ShipmentIntent::Booking => "📦",
            ShipmentIntent::Quotation => "🧾",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShipmentIntent::Booking => "Quote, pick a carrier and print a label in one pass.",
            ShipmentIntent::Quotation => "Collect rates now and save the quotation for later.",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Address,
    Package,
    CarrierSelection,
    Review,
    Terminal,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Address,
        WizardStep::Package,
        WizardStep::CarrierSelection,
        WizardStep::Review,
        WizardStep::Terminal,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Address => "Address",
            WizardStep::Package => "Package",
            WizardStep::CarrierSelection => "Carrier",
            WizardStep::Review => "Review",
            WizardStep::Terminal => "Label",
        }
    }

    /// Step reached by "Previous"; `None` on the first step and after booking.
    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Package => Some(WizardStep::Address),
            WizardStep::CarrierSelection => Some(WizardStep::Package),
            WizardStep::Review => Some(WizardStep::CarrierSelection),
            WizardStep::Address | WizardStep::Terminal => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateRejection {
    #[error("No rates were returned for this shipment")]
    Empty,
    #[error("Rate response did not include a quotation id")]
    MissingQuotationId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitBlocked {
    #[error("Select a carrier rate first")]
    MissingRate,
    #[error("{0} address is incomplete")]
    IncompleteAddress(AddressSide),
}

/// Everything the wizard has collected so far. Serialized as the draft snapshot.
///
/// While `busy` is set an action is in flight on a copy of this state and the
/// user-facing setters below do nothing, so the copy written back when the
/// action finishes cannot overwrite an edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardState {
    pub intent: ShipmentIntent,
    pub step: WizardStep,
    pub ship_from: PostalAddress,
    pub ship_to: PostalAddress,
    pub package_type: Option<PackageType>,
    pub package_count: usize,
    pub package_details: Vec<PackageDetail>,
    pub pickup: Option<PickupSlot>,
    pub quotation_id: Option<String>,
    pub candidate_rates: Vec<RateOffer>,
    pub selected_rate: Option<SelectedRate>,
    pub field_errors: FieldErrors,
    pub booking: Option<BookingConfirmation>,
    #[serde(skip)]
    pub busy: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(ShipmentIntent::default())
    }
}

impl WizardState {
    pub fn new(intent: ShipmentIntent) -> Self {
        Self {
            intent,
            step: WizardStep::Address,
            ship_from: PostalAddress::default(),
            ship_to: PostalAddress::default(),
            package_type: None,
            package_count: 1,
            package_details: vec![PackageDetail::default()],
            pickup: None,
            quotation_id: None,
            candidate_rates: Vec::new(),
            selected_rate: None,
            field_errors: FieldErrors::new(),
            booking: None,
            busy: false,
        }
    }

    pub fn address(&self, side: AddressSide) -> &PostalAddress {
        match side {
            AddressSide::From => &self.ship_from,
            AddressSide::To => &self.ship_to,
        }
    }

    pub fn address_mut(&mut self, side: AddressSide) -> &mut PostalAddress {
        match side {
            AddressSide::From => &mut self.ship_from,
            AddressSide::To => &mut self.ship_to,
        }
    }

    pub fn set_address_field(&mut self, side: AddressSide, field: AddressField, value: String) {
        if self.busy {
            return;
        }
        self.address_mut(side).set(field, value);
        self.field_errors.remove(&field.error_key(side));
    }

    pub fn apply_saved_address(&mut self, side: AddressSide, record: &SavedAddress) {
        self.address_mut(side).apply_saved(record);
        for field in AddressField::ALL {
            self.field_errors.remove(&field.error_key(side));
        }
    }

    pub fn validate_addresses(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for side in AddressSide::ALL {
            self.address(side).validate(side, &mut errors);
        }
        errors
    }

    /// Address -> Package when both addresses pass; otherwise errors are recorded and returned.
    pub fn advance_from_address(&mut self) -> Result<(), FieldErrors> {
        let errors = self.validate_addresses();
        if !errors.is_empty() {
            self.field_errors = errors.clone();
            return Err(errors);
        }
        self.field_errors.clear();
        self.step = WizardStep::Package;
        Ok(())
    }

    pub fn set_package_type(&mut self, kind: Option<PackageType>) {
        if self.busy {
            return;
        }
        self.package_type = kind;
        self.field_errors.remove("package_type");
    }

    /// Clamps to `1..=MAX_PACKAGES` and resizes the detail list to match.
    /// Asking for more than the cap also records a `package_count` error.
    pub fn set_package_count(&mut self, count: usize) {
        if self.busy {
            return;
        }
        self.field_errors.remove("package_count");
        if count > MAX_PACKAGES {
            self.field_errors.insert(
                "package_count",
                format!("At most {MAX_PACKAGES} packages per shipment"),
            );
        }
        let count = count.clamp(1, MAX_PACKAGES);
        self.package_count = count;
        resize_packages(&mut self.package_details, count);
    }

    pub fn update_package(&mut self, index: usize, field: PackageField, value: String) {
        if self.busy {
            return;
        }
        if let Some(detail) = self.package_details.get_mut(index) {
            detail.set(field, value);
            self.field_errors.remove(&field.error_key(index));
        }
    }

    pub fn set_weight_unit(&mut self, index: usize, unit: WeightUnit) {
        if self.busy {
            return;
        }
        if let Some(detail) = self.package_details.get_mut(index) {
            detail.weight_unit = unit;
        }
    }

    pub fn set_dimension_unit(&mut self, index: usize, unit: DimensionUnit) {
        if self.busy {
            return;
        }
        if let Some(detail) = self.package_details.get_mut(index) {
            detail.dimension_unit = unit;
        }
    }

    /// Blank input clears the pickup. Returns false when the input did not parse.
    pub fn set_pickup(&mut self, raw: &str) -> bool {
        if self.busy {
            return false;
        }
        if raw.trim().is_empty() {
            self.pickup = None;
            return true;
        }
        match PickupSlot::parse_local(raw) {
            Some(slot) => {
                self.pickup = Some(slot);
                true
            }
            None => false,
        }
    }

    pub fn validate_package_step(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.package_type.is_none() {
            errors.insert("package_type", "Package type is required");
        }
        if self.package_count < 1 {
            errors.insert("package_count", "At least one package is required");
        } else if self.package_count > MAX_PACKAGES {
            errors.insert(
                "package_count",
                format!("At most {MAX_PACKAGES} packages per shipment"),
            );
        }
        for side in AddressSide::ALL {
            if is_blank(&self.address(side).country) {
                errors.insert(AddressField::Country.error_key(side), REQUIRED_MESSAGE);
            }
        }
        for (index, detail) in self.package_details.iter().enumerate() {
            detail.validate(index, self.package_type, &mut errors);
        }
        errors
    }

    /// Installs a fresh rate response and moves to carrier selection.
    /// Nothing changes when the response is rejected.
    pub fn accept_rates(&mut self, offers: Vec<RateOffer>) -> Result<(), RateRejection> {
        let first = offers.first().ok_or(RateRejection::Empty)?;
        if !first.has_quotation_id() {
            return Err(RateRejection::MissingQuotationId);
        }
        let quotation_id = first
            .quotation_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        self.quotation_id = Some(quotation_id);
        self.candidate_rates = offers;
        self.selected_rate = None;
        self.field_errors.clear();
        self.step = WizardStep::CarrierSelection;
        Ok(())
    }

    pub fn select_rate(&mut self, index: usize, carrier_brand: &str) -> bool {
        if self.busy {
            return false;
        }
        match self.candidate_rates.get(index) {
            Some(offer) => {
                self.selected_rate = Some(SelectedRate::from_offer(offer, carrier_brand));
                self.field_errors.remove(RATES_ERROR_KEY);
                true
            }
            None => false,
        }
    }

    pub fn selected_rate_index(&self, carrier_brand: &str) -> Option<usize> {
        let selected = self.selected_rate.as_ref()?;
        self.candidate_rates
            .iter()
            .position(|offer| &SelectedRate::from_offer(offer, carrier_brand) == selected)
    }

    pub fn check_submittable(&self) -> Result<(), SubmitBlocked> {
        if self.selected_rate.is_none() {
            return Err(SubmitBlocked::MissingRate);
        }
        for side in AddressSide::ALL {
            if !self.address(side).is_submittable() {
                return Err(SubmitBlocked::IncompleteAddress(side));
            }
        }
        Ok(())
    }

    pub fn enter_review(&mut self) {
        self.step = WizardStep::Review;
    }

    pub fn complete_booking(&mut self, confirmation: BookingConfirmation) {
        self.booking = Some(confirmation);
        self.field_errors.clear();
        self.step = WizardStep::Terminal;
    }

    pub fn go_previous(&mut self) -> bool {
        if self.busy {
            return false;
        }
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                self.field_errors.clear();
                true
            }
            None => false,
        }
    }

    /// Back to an empty wizard, keeping the intent.
    pub fn reset(&mut self) {
        *self = WizardState::new(self.intent);
    }

    /// Whether a stored snapshot holds anything worth offering for resume.
    pub fn is_resumable(&self) -> bool {
        self.step != WizardStep::Terminal
            && (self.step != WizardStep::Address
                || !self.ship_from.is_empty()
                || !self.ship_to.is_empty())
    }

    /// A booking wizard pre-seeded from a quotation saved earlier. Lands on
    /// Review when the quotation carries a selected rate, on Package otherwise.
    pub fn from_saved_quotation(record: &SavedQuotation, carrier_brand: &str) -> Self {
        let mut state = WizardState::new(ShipmentIntent::Booking);
        let address = |quoted: &Option<QuotedAddress>| {
            quoted.as_ref().map(QuotedAddress::to_postal).unwrap_or_default()
        };
        state.ship_from = address(&record.ship_from_address);
        state.ship_to = address(&record.ship_to_address);
        if state.ship_from.postal_code.is_empty() {
            state.ship_from.postal_code = record.from_pincode.clone().unwrap_or_default();
        }
        if state.ship_to.postal_code.is_empty() {
            state.ship_to.postal_code = record.to_pincode.clone().unwrap_or_default();
        }

        let packages = record.packages();
        state.package_type = packages
            .iter()
            .find_map(|package| package.package_type.as_deref().and_then(PackageType::parse));
        state.package_details = packages
            .iter()
            .map(|package| PackageDetail {
                weight: measure(&package.weight),
                length: measure(&package.length),
                width: measure(&package.width),
                height: measure(&package.height),
                weight_unit: package
                    .weight_unit
                    .as_deref()
                    .and_then(WeightUnit::parse)
                    .unwrap_or_default(),
                dimension_unit: package
                    .dimension_unit
                    .as_deref()
                    .and_then(DimensionUnit::parse)
                    .unwrap_or_default(),
            })
            .collect();
        state.set_package_count(record.package_total());

        state.pickup = PickupSlot::from_wire(
            record.pickup_date.as_deref().unwrap_or_default(),
            record.pickup_time.as_deref().unwrap_or_default(),
        );

        let quotation_id = record.id();
        if !quotation_id.is_empty() {
            state.quotation_id = Some(quotation_id.to_string());
        }
        if let Some(rate) = &record.selected_rate {
            let offer = rate.to_offer(quotation_id);
            state.selected_rate = Some(SelectedRate::from_offer(&offer, carrier_brand));
            state.candidate_rates = vec![offer];
            state.step = WizardStep::Review;
        } else {
            state.step = WizardStep::Package;
        }
        state.restored()
    }

    /// Repairs a snapshot read from storage so the invariants hold again.
    pub fn restored(mut self) -> Self {
        self.busy = false;
        self.field_errors.clear();
        self.set_package_count(self.package_count);
        if self.step >= WizardStep::CarrierSelection && self.quotation_id.is_none() {
            self.step = WizardStep::Package;
        }
        if self.step >= WizardStep::Review && self.selected_rate.is_none() {
            self.step = WizardStep::CarrierSelection.min(self.step);
        }
        if self.step == WizardStep::Terminal && self.booking.is_none() {
            self.step = WizardStep::Review;
        }
        self
    }

    pub fn record_error(&mut self, key: &str, message: impl Into<String>) {
        self.field_errors.remove(key);
        self.field_errors.insert(key, message);
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::address::tests::filled;

    pub(crate) fn offer(quotation_id: Option<&str>, service: &str, charge: &str) -> RateOffer {
        RateOffer {
            quotation_id: quotation_id.map(str::to_string),
            service_name: Some(service.to_string()),
            service_code: Some("03".to_string()),
            total_charges: Some(charge.to_string()),
            estimated_arrival_date: Some("March 07, 2025".to_string()),
            ..RateOffer::default()
        }
    }

    /// Two valid Non-Document packages with filled addresses, parked on Package.
    pub(crate) fn ready_for_rates() -> WizardState {
        let mut state = WizardState::new(ShipmentIntent::Booking);
        state.ship_from = filled("Sender");
        state.ship_to = filled("Receiver");
        state.advance_from_address().unwrap();
        state.set_package_type(Some(PackageType::NonDocument));
        state.set_package_count(2);
        for index in 0..2 {
            for (field, value) in [
                (PackageField::Weight, "2.5"),
                (PackageField::Length, "10"),
                (PackageField::Width, "8"),
                (PackageField::Height, "4"),
            ] {
                state.update_package(index, field, value.to_string());
            }
        }
        assert!(state.set_pickup("2025-03-05T14:30"));
        state
    }

    #[test]
    fn address_step_blocks_until_valid() {
        let mut state = WizardState::default();
        let errors = state.advance_from_address().unwrap_err();
        assert_eq!(state.step, WizardStep::Address);
        assert!(errors.contains("ship_from.name"));
        assert_eq!(state.field_errors, errors);

        state.ship_from = filled("A");
        state.ship_to = filled("B");
        state.advance_from_address().unwrap();
        assert_eq!(state.step, WizardStep::Package);
        assert!(state.field_errors.is_empty());
    }

    #[test]
    fn package_count_is_clamped_and_resizes_details() {
        let mut state = WizardState::default();
        state.set_package_count(3);
        state.update_package(1, PackageField::Weight, "7".to_string());
        assert_eq!(state.package_details.len(), 3);

        state.set_package_count(0);
        assert_eq!(state.package_count, 1);
        assert_eq!(state.package_details.len(), 1);

        state.set_package_count(2);
        assert_eq!(state.package_details[1], PackageDetail::default());
    }

    #[test]
    fn huge_package_count_is_capped_with_an_error() {
        let mut state = WizardState::default();
        state.set_package_count(usize::MAX);
        assert_eq!(state.package_count, MAX_PACKAGES);
        assert_eq!(state.package_details.len(), MAX_PACKAGES);
        assert_eq!(
            state.error("package_count"),
            Some("At most 50 packages per shipment")
        );

        state.set_package_count(100_000_000);
        assert_eq!(state.package_details.len(), MAX_PACKAGES);

        state.set_package_count(4);
        assert_eq!(state.package_details.len(), 4);
        assert_eq!(state.error("package_count"), None);

        state.package_count = MAX_PACKAGES + 1;
        assert!(state.validate_package_step().contains("package_count"));
    }

    #[test]
    fn edits_are_ignored_while_an_action_is_in_flight() {
        let mut state = ready_for_rates();
        state.accept_rates(vec![offer(Some("Q-1"), "Ground", "10")]).unwrap();
        state.busy = true;
        let before = state.clone();

        state.set_address_field(AddressSide::From, AddressField::City, "Elsewhere".to_string());
        state.set_package_type(Some(PackageType::Document));
        state.set_package_count(7);
        state.update_package(0, PackageField::Weight, "99".to_string());
        state.set_weight_unit(0, WeightUnit::Kg);
        state.set_dimension_unit(0, DimensionUnit::Cm);
        assert!(!state.set_pickup("2030-01-01T08:00"));
        assert!(!state.select_rate(0, "UPS"));
        assert!(!state.go_previous());
        assert_eq!(state, before);

        state.busy = false;
        assert!(state.select_rate(0, "UPS"));
    }

    #[test]
    fn package_validation_follows_type_rule() {
        let mut state = ready_for_rates();
        assert!(state.validate_package_step().is_empty());

        state.update_package(1, PackageField::Height, String::new());
        assert!(state.validate_package_step().contains("packages[1].height"));

        state.set_package_type(Some(PackageType::Document));
        assert!(state.validate_package_step().is_empty());

        state.set_package_type(None);
        state.ship_to.country.clear();
        let errors = state.validate_package_step();
        assert!(errors.contains("package_type"));
        assert!(errors.contains("ship_to.country"));
    }

    #[test]
    fn rates_need_quotation_id_on_first_offer() {
        let mut state = ready_for_rates();
        assert_eq!(state.accept_rates(Vec::new()), Err(RateRejection::Empty));
        assert_eq!(
            state.accept_rates(vec![offer(None, "Ground", "10")]),
            Err(RateRejection::MissingQuotationId)
        );
        assert_eq!(state.step, WizardStep::Package);
        assert!(state.candidate_rates.is_empty());
        assert!(state.quotation_id.is_none());

        state
            .accept_rates(vec![offer(Some("Q-1"), "Ground", "10"), offer(None, "Air", "30")])
            .unwrap();
        assert_eq!(state.step, WizardStep::CarrierSelection);
        assert_eq!(state.quotation_id.as_deref(), Some("Q-1"));
        assert_eq!(state.candidate_rates.len(), 2);
    }

    #[test]
    fn new_rates_clear_previous_selection() {
        let mut state = ready_for_rates();
        state.accept_rates(vec![offer(Some("Q-1"), "Ground", "10")]).unwrap();
        assert!(state.select_rate(0, "UPS"));
        assert_eq!(state.selected_rate_index("UPS"), Some(0));

        state.go_previous();
        state.accept_rates(vec![offer(Some("Q-2"), "Air", "30")]).unwrap();
        assert!(state.selected_rate.is_none());
        assert!(!state.select_rate(5, "UPS"));
    }

    #[test]
    fn submission_requires_rate_and_complete_addresses() {
        let mut state = ready_for_rates();
        assert_eq!(state.check_submittable(), Err(SubmitBlocked::MissingRate));

        state.accept_rates(vec![offer(Some("Q-1"), "Ground", "10")]).unwrap();
        state.select_rate(0, "UPS");
        state.ship_to.postal_code = "  ".to_string();
        assert_eq!(
            state.check_submittable(),
            Err(SubmitBlocked::IncompleteAddress(AddressSide::To))
        );
        state.ship_to.postal_code = "10001".to_string();
        assert_eq!(state.check_submittable(), Ok(()));
    }

    #[test]
    fn previous_walks_back_and_stops() {
        let mut state = ready_for_rates();
        assert!(state.go_previous());
        assert_eq!(state.step, WizardStep::Address);
        assert!(!state.go_previous());

        state.step = WizardStep::Terminal;
        assert!(!state.go_previous());
    }

    #[test]
    fn reset_keeps_intent_only() {
        let mut state = ready_for_rates();
        state.intent = ShipmentIntent::Quotation;
        state.reset();
        assert_eq!(state, WizardState::new(ShipmentIntent::Quotation));
    }

    #[test]
    fn saved_quotation_reopens_on_review() {
        let record: SavedQuotation =
            serde_json::from_str(crate::domain::quotation::tests::STORED).unwrap();
        let state = WizardState::from_saved_quotation(&record, "UPS");

        assert_eq!(state.intent, ShipmentIntent::Booking);
        assert_eq!(state.step, WizardStep::Review);
        assert_eq!(state.quotation_id.as_deref(), Some("41"));
        assert_eq!(state.ship_from.city, "Austin");
        assert_eq!(state.ship_to.postal_code, "10001");
        assert_eq!(state.package_type, Some(PackageType::NonDocument));
        assert_eq!(state.package_count, 2);
        assert_eq!(state.package_details[1].weight, "3");
        assert_eq!(state.package_details[0].weight_unit, WeightUnit::Kg);
        assert_eq!(state.package_details[0].dimension_unit, DimensionUnit::Cm);
        assert_eq!(state.pickup.as_ref().map(PickupSlot::input_value).as_deref(), Some("2025-03-05T14:30"));

        let rate = state.selected_rate.as_ref().unwrap();
        assert_eq!(rate.plan_name, "UPS Ground");
        assert_eq!(rate.total_charge, 42.5);
        assert_eq!(state.selected_rate_index("UPS"), Some(0));
        assert_eq!(state.check_submittable(), Ok(()));
        assert!(state.validate_package_step().is_empty());
    }

    #[test]
    fn saved_quotation_without_rate_reopens_on_package() {
        let record: SavedQuotation = serde_json::from_str(
            r#"{"quotation_id": 8, "package_count": 500,
                "quotation_items": [{"weight": 1, "length": 0, "width": 0, "height": 0,
                                     "package_type": "Document", "cost": 5}]}"#,
        )
        .unwrap();
        let state = WizardState::from_saved_quotation(&record, "UPS");
        assert_eq!(state.step, WizardStep::Package);
        assert_eq!(state.quotation_id.as_deref(), Some("8"));
        assert_eq!(state.package_count, MAX_PACKAGES);
        assert_eq!(state.package_details.len(), MAX_PACKAGES);
        assert_eq!(state.package_details[0].weight, "1");
        assert_eq!(state.package_details[0].length, "");
        assert!(state.selected_rate.is_none());
        assert!(state.pickup.is_none());
    }

    #[test]
    fn restored_snapshot_is_repaired() {
        let mut state = ready_for_rates();
        state.step = WizardStep::Review;
        state.busy = true;
        state.package_details.truncate(1);

        let json = serde_json::to_string(&state).unwrap();
        let restored = serde_json::from_str::<WizardState>(&json).unwrap().restored();
        assert!(!restored.busy);
        assert_eq!(restored.package_details.len(), restored.package_count);
        assert_eq!(restored.step, WizardStep::Package);
        assert!(restored.is_resumable());
        assert!(!WizardState::default().is_resumable());
    }
}
