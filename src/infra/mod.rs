pub mod backend;
pub mod courier;

pub use backend::{CourierClientError, ShippingBackend};
pub use courier::CourierClient;
