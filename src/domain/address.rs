use serde::{Deserialize, Serialize};

use super::{
    lenient::{opt_string_from_json, string_from_json},
    validation::{is_blank, is_valid_email, is_valid_mobile, FieldErrors},
};

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const MOBILE_MESSAGE: &str = "Phone number must be between 10 to 15 digits";
pub const EMAIL_MESSAGE: &str = "Enter a valid email address";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressSide {
    From,
    To,
}

impl AddressSide {
    pub const ALL: [AddressSide; 2] = [AddressSide::From, AddressSide::To];

    /// Prefix used for field-error keys.
    pub fn key(self) -> &'static str {
        match self {
            AddressSide::From => "ship_from",
            AddressSide::To => "ship_to",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AddressSide::From => "Ship From",
            AddressSide::To => "Ship To",
        }
    }
}

impl std::fmt::Display for AddressSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressField {
    Name,
    Mobile,
    Email,
    AddressLine,
    City,
    State,
    PostalCode,
    Country,
}

impl AddressField {
    pub const ALL: [AddressField; 8] = [
        AddressField::Name,
        AddressField::Mobile,
        AddressField::Email,
        AddressField::AddressLine,
        AddressField::City,
        AddressField::State,
        AddressField::PostalCode,
        AddressField::Country,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AddressField::Name => "name",
            AddressField::Mobile => "mobile",
            AddressField::Email => "email",
            AddressField::AddressLine => "address",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::PostalCode => "postal_code",
            AddressField::Country => "country",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressField::Name => "Name",
            AddressField::Mobile => "Mobile",
            AddressField::Email => "Email",
            AddressField::AddressLine => "Address",
            AddressField::City => "City",
            AddressField::State => "State / Province code",
            AddressField::PostalCode => "Postal code",
            AddressField::Country => "Country code",
        }
    }

    pub fn error_key(self, side: AddressSide) -> String {
        format!("{}.{}", side.key(), self.key())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalAddress {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl PostalAddress {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Name => &self.name,
            AddressField::Mobile => &self.mobile,
            AddressField::Email => &self.email,
            AddressField::AddressLine => &self.address_line,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::PostalCode => &self.postal_code,
            AddressField::Country => &self.country,
        }
    }

    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::Name => self.name = value,
            AddressField::Mobile => self.mobile = value,
            AddressField::Email => self.email = value,
            AddressField::AddressLine => self.address_line = value,
            AddressField::City => self.city = value,
            AddressField::State => self.state = value,
            AddressField::PostalCode => self.postal_code = value,
            AddressField::Country => self.country = value,
        }
    }

    /// Every field is required; mobile and email are also format-checked.
    pub fn validate(&self, side: AddressSide, errors: &mut FieldErrors) {
        for field in AddressField::ALL {
            let value = self.get(field);
            let key = field.error_key(side);
            if is_blank(value) {
                errors.insert(key, REQUIRED_MESSAGE);
                continue;
            }
            match field {
                AddressField::Mobile if !is_valid_mobile(value) => {
                    errors.insert(key, MOBILE_MESSAGE);
                }
                AddressField::Email if !is_valid_email(value) => {
                    errors.insert(key, EMAIL_MESSAGE);
                }
                _ => {}
            }
        }
    }

    /// The subset a booking cannot be created without.
    pub fn is_submittable(&self) -> bool {
        [
            &self.name,
            &self.address_line,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|value| !is_blank(value))
    }

    pub fn is_empty(&self) -> bool {
        AddressField::ALL
            .iter()
            .all(|field| is_blank(self.get(*field)))
    }

    /// Copies an address-book record in. Email is not part of a record and stays as typed.
    pub fn apply_saved(&mut self, record: &SavedAddress) {
        self.name = record.name.clone();
        self.mobile = record.mobile.clone();
        self.address_line = record.address_line();
        self.city = record.city.clone();
        self.state = record.state.clone();
        self.postal_code = record.postal_code.clone();
        self.country = record.country.clone();
    }

    /// One-line rendering for summaries.
    pub fn summary_line(&self) -> String {
        [
            self.address_line.trim(),
            self.city.trim(),
            self.state.trim(),
            self.postal_code.trim(),
            self.country.trim(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Address-book record as served by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SavedAddress {
    #[serde(default, deserialize_with = "opt_string_from_json")]
    pub address_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, deserialize_with = "string_from_json")]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, deserialize_with = "string_from_json")]
    pub mobile: String,
}

impl SavedAddress {
    pub fn address_line(&self) -> String {
        match self.address_line_2.as_deref().map(str::trim) {
            Some(second) if !second.is_empty() => {
                format!("{}, {}", self.address_line_1.trim(), second)
            }
            _ => self.address_line_1.trim().to_string(),
        }
    }
}
