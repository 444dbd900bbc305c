use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Time};

use super::validation::{is_blank, parse_measure, FieldErrors};

pub const POSITIVE_MESSAGE: &str = "Must be a positive number";

/// Upper bound on packages in one shipment.
pub const MAX_PACKAGES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageType {
    #[serde(rename = "Document")]
    Document,
    #[serde(rename = "Non-Document")]
    NonDocument,
}

impl PackageType {
    pub const ALL: [PackageType; 2] = [PackageType::Document, PackageType::NonDocument];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::Document => "Document",
            PackageType::NonDocument => "Non-Document",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        PackageType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn requires_dimensions(self) -> bool {
        matches!(self, PackageType::NonDocument)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lbs" | "lb" => Some(WeightUnit::Lbs),
            "kg" | "kgs" => Some(WeightUnit::Kg),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    In,
    Cm,
}

impl DimensionUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DimensionUnit::In => "in",
            DimensionUnit::Cm => "cm",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" => Some(DimensionUnit::In),
            "cm" => Some(DimensionUnit::Cm),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackageField {
    Weight,
    Length,
    Width,
    Height,
}

impl PackageField {
    pub const ALL: [PackageField; 4] = [
        PackageField::Weight,
        PackageField::Length,
        PackageField::Width,
        PackageField::Height,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PackageField::Weight => "weight",
            PackageField::Length => "length",
            PackageField::Width => "width",
            PackageField::Height => "height",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageField::Weight => "Weight",
            PackageField::Length => "Length",
            PackageField::Width => "Width",
            PackageField::Height => "Height",
        }
    }

    pub fn error_key(self, index: usize) -> String {
        format!("packages[{index}].{}", self.key())
    }
}

/// Measurements exactly as typed; parsing happens in validation and payload building.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageDetail {
    pub weight: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub weight_unit: WeightUnit,
    pub dimension_unit: DimensionUnit,
}

impl PackageDetail {
    pub fn get(&self, field: PackageField) -> &str {
        match field {
            PackageField::Weight => &self.weight,
            PackageField::Length => &self.length,
            PackageField::Width => &self.width,
            PackageField::Height => &self.height,
        }
    }

    pub fn set(&mut self, field: PackageField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PackageField::Weight => self.weight = value,
            PackageField::Length => self.length = value,
            PackageField::Width => self.width = value,
            PackageField::Height => self.height = value,
        }
    }

    /// Weight is always required; dimensions only when the type needs them.
    /// Anything supplied must parse as a positive number.
    pub fn validate(&self, index: usize, kind: Option<PackageType>, errors: &mut FieldErrors) {
        let needs_dimensions = kind.map(PackageType::requires_dimensions).unwrap_or(false);
        for field in PackageField::ALL {
            let value = self.get(field);
            let required = field == PackageField::Weight || needs_dimensions;
            if is_blank(value) {
                if required {
                    errors.insert(
                        field.error_key(index),
                        format!("{} is required for package {}", field.label(), index + 1),
                    );
                }
            } else if parse_measure(value).is_none() {
                errors.insert(field.error_key(index), POSITIVE_MESSAGE);
            }
        }
    }
}

/// Reads the package-count input. Digit strings too large for `usize`
/// saturate so they are clamped rather than ignored.
pub fn parse_package_count(raw: &str) -> Option<usize> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

/// Truncates or pads with empty records; overlapping entries are left alone.
pub fn resize_packages(details: &mut Vec<PackageDetail>, count: usize) {
    details.resize_with(count, PackageDetail::default);
}

/// Requested pickup, normalized to `YYYY-MM-DD` and `HH:MM`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupSlot {
    pub date: String,
    pub time: String,
}

impl PickupSlot {
    /// Parses a `datetime-local` value (`2025-03-05T14:30`, seconds optional).
    /// A bare date means midnight.
    pub fn parse_local(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (date_part, time_part) = match raw.split_once(['T', ' ']) {
            Some((date, time)) => (date, Some(time)),
            None => (raw, None),
        };

        let date = Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()?;
        let time = match time_part {
            Some(text) => Time::parse(text, format_description!("[hour]:[minute]:[second]"))
                .or_else(|_| Time::parse(text, format_description!("[hour]:[minute]")))
                .ok()?,
            None => Time::MIDNIGHT,
        };
        Self::from_parts(date, time)
    }

    /// Reads the pickup fields of a stored quotation. Dates may be ISO,
    /// compact or carry a time suffix; times may be `HH:MM:SS`, `HH:MM` or
    /// `HHMMSS`. A blank time means midnight.
    pub fn from_wire(date: &str, time: &str) -> Option<Self> {
        let date_part = date.trim().split(['T', ' ']).next().unwrap_or_default();
        let date = Date::parse(date_part, format_description!("[year]-[month]-[day]"))
            .or_else(|_| Date::parse(date_part, format_description!("[year][month][day]")))
            .ok()?;

        let time = time.trim();
        let time = if time.is_empty() {
            Time::MIDNIGHT
        } else {
            Time::parse(time, format_description!("[hour]:[minute]:[second]"))
                .or_else(|_| Time::parse(time, format_description!("[hour]:[minute]")))
                .or_else(|_| Time::parse(time, format_description!("[hour][minute][second]")))
                .ok()?
        };
        Self::from_parts(date, time)
    }

    fn from_parts(date: Date, time: Time) -> Option<Self> {
        Some(Self {
            date: date
                .format(format_description!("[year]-[month]-[day]"))
                .ok()?,
            time: time.format(format_description!("[hour]:[minute]")).ok()?,
        })
    }

    /// Value for a `datetime-local` input.
    pub fn input_value(&self) -> String {
        format!("{}T{}", self.date, self.time)
    }

    pub fn compact_date(&self) -> String {
        self.date.replace('-', "")
    }

    pub fn compact_time(&self) -> String {
        format!("{}00", self.time.replace(':', ""))
    }

    pub fn iso_time(&self) -> String {
        format!("{}:00", self.time)
    }
}

impl std::fmt::Display for PickupSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}
