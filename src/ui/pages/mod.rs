pub mod intent_select;
pub mod quotations;
pub mod settings;
pub mod wizard;

pub use intent_select::IntentSelectPage;
pub use quotations::QuotationsPage;
pub use settings::SettingsPage;
pub use wizard::WizardPage;
