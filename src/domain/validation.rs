use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field-level validation messages keyed by a dotted field path
/// (`ship_from.mobile`, `packages[1].weight`, `package_type`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    entries: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `key`. The first message for a key wins so the
    /// most basic problem ("required") is the one shown.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.entry(key.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Optional leading `+`, then 10 to 15 ASCII digits.
pub fn is_valid_mobile(value: &str) -> bool {
    let digits = value.trim();
    let digits = digits.strip_prefix('+').unwrap_or(digits);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    value.contains('@') && value.contains('.')
}

/// Parses a user-typed measurement. Only finite, strictly positive numbers count.
pub fn parse_measure(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite() && *number > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_accepts_ten_to_fifteen_digits() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("+919876543210"));
        assert!(is_valid_mobile("123456789012345"));
        assert!(!is_valid_mobile("987654321"));
        assert!(!is_valid_mobile("1234567890123456"));
        assert!(!is_valid_mobile("98765-43210"));
        assert!(!is_valid_mobile(""));
    }

    #[test]
    fn email_needs_at_and_dot() {
        assert!(is_valid_email("ops@courier.io"));
        assert!(!is_valid_email("ops@courier"));
        assert!(!is_valid_email("ops.courier.io"));
    }

    #[test]
    fn measure_rejects_non_positive_and_garbage() {
        assert_eq!(parse_measure(" 2.5 "), Some(2.5));
        assert_eq!(parse_measure("0"), None);
        assert_eq!(parse_measure("-1"), None);
        assert_eq!(parse_measure("abc"), None);
        assert_eq!(parse_measure("NaN"), None);
    }

    #[test]
    fn first_message_per_key_is_kept() {
        let mut errors = FieldErrors::new();
        errors.insert("ship_to.mobile", "This field is required");
        errors.insert("ship_to.mobile", "Phone number must be between 10 to 15 digits");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("ship_to.mobile"), Some("This field is required"));
        assert!(!errors.is_empty());
    }
}
