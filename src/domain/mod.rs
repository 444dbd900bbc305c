//! Booking/quotation wizard model. Nothing in here touches the network,
//! the filesystem or the UI.

pub mod address;
pub mod lenient;
pub mod package;
pub mod payload;
pub mod quotation;
pub mod rate;
pub mod validation;
pub mod wizard;

pub use address::{AddressField, AddressSide, PostalAddress, SavedAddress};
pub use package::{DimensionUnit, PackageDetail, PackageField, PackageType, PickupSlot, WeightUnit};
pub use quotation::SavedQuotation;
pub use rate::{BookingConfirmation, RateOffer, SelectedRate};
pub use validation::FieldErrors;
pub use wizard::{ShipmentIntent, WizardState, WizardStep};
