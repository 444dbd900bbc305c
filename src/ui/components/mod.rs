pub mod address_form;
pub mod field;
pub mod progress_bar;
pub mod rate_table;
pub mod shipping_label;
pub mod summary_card;
pub mod toast;
