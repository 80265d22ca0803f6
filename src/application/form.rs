//! Table-driven field validation.
//!
//! Each payload variant declares its fields as a slice of [`FieldSpec`]s. [`clean`]
//! walks the table once, parsing every raw value into a typed [`FieldValue`] and
//! collecting every failure, so a caller sees all problems of a payload at once.

use crate::config::Settings;
use crate::domain::messages::{ValidationErrors, ValidationMessage};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use validator::ValidateEmail;

/// Raw form data as received: wire field name to submitted text.
pub type RawPayload = HashMap<String, String>;

/// Extra rule run on a successfully parsed value.
pub type FieldCheck = fn(&FieldValue, &Settings) -> Result<(), ValidationMessage>;

#[derive(Clone, Copy)]
pub enum Presence {
    Required,
    Optional,
    /// Required only under some settings, e.g. `hash` when requests are signed.
    RequiredWhen(fn(&Settings) -> bool),
}

impl Presence {
    fn is_required(&self, settings: &Settings) -> bool {
        match self {
            Presence::Required => true,
            Presence::Optional => false,
            Presence::RequiredWhen(rule) => rule(settings),
        }
    }
}

#[derive(Clone, Copy)]
pub enum FieldKind {
    Text {
        max_length: Option<usize>,
    },
    Email,
    Decimal {
        max_digits: u32,
        decimal_places: u32,
    },
    Choice {
        accepts: fn(&str) -> bool,
    },
    /// A choice whose values are integers, written exactly as in the choice list.
    IntChoice {
        accepts: fn(i64) -> bool,
    },
    DateTime {
        formats: &'static [&'static str],
        /// Also accept a bare `%Y-%m-%d`, meaning midnight.
        date_only: bool,
    },
    Boolean,
}

#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub check: Option<FieldCheck>,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            check: None,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text { max_length: None })
    }

    pub const fn bounded_text(name: &'static str, max_length: usize) -> Self {
        Self::new(
            name,
            FieldKind::Text {
                max_length: Some(max_length),
            },
        )
    }

    pub const fn email(name: &'static str) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub const fn decimal(name: &'static str, max_digits: u32, decimal_places: u32) -> Self {
        Self::new(
            name,
            FieldKind::Decimal {
                max_digits,
                decimal_places,
            },
        )
    }

    pub const fn choice(name: &'static str, accepts: fn(&str) -> bool) -> Self {
        Self::new(name, FieldKind::Choice { accepts })
    }

    pub const fn int_choice(name: &'static str, accepts: fn(i64) -> bool) -> Self {
        Self::new(name, FieldKind::IntChoice { accepts })
    }

    pub const fn datetime(
        name: &'static str,
        formats: &'static [&'static str],
        date_only: bool,
    ) -> Self {
        Self::new(name, FieldKind::DateTime { formats, date_only })
    }

    pub const fn boolean(name: &'static str) -> Self {
        let mut spec = Self::new(name, FieldKind::Boolean);
        spec.presence = Presence::Optional;
        spec
    }

    pub const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub const fn required_when(mut self, rule: fn(&Settings) -> bool) -> Self {
        self.presence = Presence::RequiredWhen(rule);
        self
    }

    pub const fn with_check(mut self, check: FieldCheck) -> Self {
        self.check = Some(check);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Decimal(Decimal),
    Int(i64),
    DateTime(NaiveDateTime),
    Bool(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Typed values of the fields that passed validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanedData {
    values: HashMap<&'static str, FieldValue>,
}

impl CleanedData {
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(FieldValue::as_text)
            .map(str::to_string)
    }

    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        match self.get(name) {
            Some(FieldValue::Decimal(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(FieldValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn datetime(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name) {
            Some(FieldValue::DateTime(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(FieldValue::Bool(true)))
    }
}

/// Unwraps a value that validation guaranteed, reporting it as missing otherwise.
pub fn require<T>(name: &str, value: Option<T>) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| ValidationErrors::single(name, ValidationMessage::Required))
}

/// Validates `raw` against the field table, returning the typed values of the
/// fields that passed and every error found. Surrounding whitespace is ignored
/// and an empty value counts as absent.
pub fn clean<'a>(
    fields: impl IntoIterator<Item = &'a FieldSpec>,
    raw: &RawPayload,
    settings: &Settings,
) -> (CleanedData, ValidationErrors) {
    let mut cleaned = CleanedData::default();
    let mut errors = ValidationErrors::new();

    for spec in fields {
        let value = raw.get(spec.name).map(|v| v.trim()).unwrap_or_default();
        if value.is_empty() {
            if spec.presence.is_required(settings) {
                errors.add_field(spec.name, ValidationMessage::Required);
            } else if matches!(spec.kind, FieldKind::Boolean) {
                cleaned.values.insert(spec.name, FieldValue::Bool(false));
            }
            continue;
        }

        let parsed = parse_value(&spec.kind, value).and_then(|parsed| {
            match spec.check {
                Some(check) => check(&parsed, settings).map(|()| parsed),
                None => Ok(parsed),
            }
        });
        match parsed {
            Ok(parsed) => {
                cleaned.values.insert(spec.name, parsed);
            }
            Err(message) => errors.add_field(spec.name, message),
        }
    }

    (cleaned, errors)
}

fn parse_value(kind: &FieldKind, value: &str) -> Result<FieldValue, ValidationMessage> {
    match *kind {
        FieldKind::Text { max_length } => {
            let actual = value.chars().count();
            match max_length {
                Some(max) if actual > max => Err(ValidationMessage::MaxLength { max, actual }),
                _ => Ok(FieldValue::Text(value.to_string())),
            }
        }
        FieldKind::Email => {
            if value.validate_email() {
                Ok(FieldValue::Text(value.to_string()))
            } else {
                Err(ValidationMessage::InvalidEmail)
            }
        }
        FieldKind::Decimal {
            max_digits,
            decimal_places,
        } => parse_decimal(value, max_digits, decimal_places).map(FieldValue::Decimal),
        FieldKind::Choice { accepts } => {
            if accepts(value) {
                Ok(FieldValue::Text(value.to_string()))
            } else {
                Err(invalid_choice(value))
            }
        }
        FieldKind::IntChoice { accepts } => match value.parse::<i64>() {
            Ok(code) if code.to_string() == value && accepts(code) => Ok(FieldValue::Int(code)),
            _ => Err(invalid_choice(value)),
        },
        FieldKind::DateTime { formats, date_only } => {
            parse_datetime(value, formats, date_only).map(FieldValue::DateTime)
        }
        FieldKind::Boolean => Ok(FieldValue::Bool(!matches!(
            value.to_ascii_lowercase().as_str(),
            "false" | "0"
        ))),
    }
}

fn invalid_choice(value: &str) -> ValidationMessage {
    ValidationMessage::InvalidChoice {
        value: value.to_string(),
    }
}

fn parse_decimal(
    value: &str,
    max_digits: u32,
    decimal_places: u32,
) -> Result<Decimal, ValidationMessage> {
    let number = Decimal::from_str(value).map_err(|_| ValidationMessage::InvalidNumber)?;

    let decimals = number.scale();
    let mut digits = number
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |log| log + 1);
    if decimals > digits {
        digits = decimals;
    }
    let whole_digits = digits - decimals;

    if digits > max_digits {
        Err(ValidationMessage::MaxDigits { max: max_digits })
    } else if decimals > decimal_places {
        Err(ValidationMessage::MaxDecimalPlaces {
            max: decimal_places,
        })
    } else if whole_digits > max_digits - decimal_places {
        Err(ValidationMessage::MaxWholeDigits {
            max: max_digits - decimal_places,
        })
    } else {
        Ok(number)
    }
}

fn parse_datetime(
    value: &str,
    formats: &[&str],
    date_only: bool,
) -> Result<NaiveDateTime, ValidationMessage> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            date_only
                .then(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
                .flatten()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or(ValidationMessage::InvalidDateTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const STRICT: &[&str] = &["%Y-%m-%d %H:%M:%S"];

    fn settings() -> Settings {
        Settings::new("450000", "secret")
    }

    fn raw(pairs: &[(&str, &str)]) -> RawPayload {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn clean_one(spec: FieldSpec, value: &str) -> Result<FieldValue, Vec<ValidationMessage>> {
        let (cleaned, errors) = clean([&spec], &raw(&[(spec.name, value)]), &settings());
        match cleaned.get(spec.name) {
            Some(value) if errors.is_empty() => Ok(value.clone()),
            _ => Err(errors.field(spec.name).to_vec()),
        }
    }

    #[test]
    fn test_required_and_optional() {
        let fields = [FieldSpec::text("orderId"), FieldSpec::text("serviceName").optional()];
        let (cleaned, errors) = clean(&fields, &raw(&[("serviceName", "  ")]), &settings());

        assert_eq!(errors.field("orderId"), &[ValidationMessage::Required]);
        assert!(!errors.has_field("serviceName"));
        assert!(!cleaned.contains("serviceName"));
    }

    #[test]
    fn test_required_when_follows_settings() {
        let fields = [FieldSpec::text("hash").required_when(|s| s.require_hash)];
        let mut settings = settings();

        let (_, errors) = clean(&fields, &raw(&[]), &settings);
        assert!(errors.is_empty());

        settings.require_hash = true;
        let (_, errors) = clean(&fields, &raw(&[]), &settings);
        assert!(errors.has_field("hash"));
    }

    #[test]
    fn test_text_is_trimmed_and_bounded() {
        assert_eq!(
            clean_one(FieldSpec::bounded_text("orderId", 5), "  A-1 "),
            Ok(FieldValue::Text("A-1".to_string()))
        );
        assert_eq!(
            clean_one(FieldSpec::bounded_text("orderId", 5), "ABCDEF"),
            Err(vec![ValidationMessage::MaxLength { max: 5, actual: 6 }])
        );
        // Length is counted in characters, not bytes.
        assert!(clean_one(FieldSpec::bounded_text("userName", 4), "Иван").is_ok());
    }

    #[test]
    fn test_email() {
        assert!(clean_one(FieldSpec::email("userEmail"), "ivan@example.com").is_ok());
        assert_eq!(
            clean_one(FieldSpec::email("userEmail"), "not-an-email"),
            Err(vec![ValidationMessage::InvalidEmail])
        );
    }

    #[test]
    fn test_decimal_limits() {
        let amount = FieldSpec::decimal("recipientAmount", 10, 2);
        assert_eq!(
            clean_one(amount, "10.00"),
            Ok(FieldValue::Decimal(dec!(10.00)))
        );
        assert_eq!(
            clean_one(amount, "12345678.99"),
            Ok(FieldValue::Decimal(dec!(12345678.99)))
        );
        assert_eq!(
            clean_one(amount, "abc"),
            Err(vec![ValidationMessage::InvalidNumber])
        );
        assert_eq!(
            clean_one(amount, "1.005"),
            Err(vec![ValidationMessage::MaxDecimalPlaces { max: 2 }])
        );
        assert_eq!(
            clean_one(amount, "123456789.9"),
            Err(vec![ValidationMessage::MaxWholeDigits { max: 8 }])
        );
        assert_eq!(
            clean_one(amount, "12345678901"),
            Err(vec![ValidationMessage::MaxDigits { max: 10 }])
        );
    }

    #[test]
    fn test_choices() {
        let currency = FieldSpec::choice("recipientCurrency", |v| matches!(v, "RUB" | "TST"));
        assert!(clean_one(currency, "RUB").is_ok());
        assert_eq!(
            clean_one(currency, "USD"),
            Err(vec![ValidationMessage::InvalidChoice {
                value: "USD".to_string()
            }])
        );
    }

    #[test]
    fn test_int_choice_needs_exact_spelling() {
        let status = FieldSpec::int_choice("paymentStatus", |c| (3..=7).contains(&c));
        assert_eq!(clean_one(status, "5"), Ok(FieldValue::Int(5)));
        assert!(clean_one(status, "05").is_err());
        assert!(clean_one(status, "8").is_err());
        assert!(clean_one(status, "five").is_err());
    }

    #[test]
    fn test_strict_datetime() {
        let field = FieldSpec::datetime("paymentData", STRICT, false);
        assert!(clean_one(field, "2024-03-01 12:30:00").is_ok());
        assert!(clean_one(field, "2024-03-01T12:30:00").is_err());
        assert!(clean_one(field, "01.03.2024 12:30:00").is_err());
        assert!(clean_one(field, "2024-03-01").is_err());
    }

    #[test]
    fn test_datetime_date_only_means_midnight() {
        let field = FieldSpec::datetime("expireDate", STRICT, true);
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(
            clean_one(field, "2024-03-01"),
            Ok(FieldValue::DateTime(midnight))
        );
    }

    #[test]
    fn test_boolean() {
        let field = FieldSpec::boolean("holdMode");
        assert_eq!(clean_one(field, "true"), Ok(FieldValue::Bool(true)));
        assert_eq!(clean_one(field, "on"), Ok(FieldValue::Bool(true)));
        assert_eq!(clean_one(field, "False"), Ok(FieldValue::Bool(false)));
        assert_eq!(clean_one(field, "0"), Ok(FieldValue::Bool(false)));

        let (cleaned, errors) = clean([&field], &raw(&[]), &settings());
        assert!(errors.is_empty());
        assert!(!cleaned.flag("holdMode"));
    }

    #[test]
    fn test_check_runs_after_parsing() {
        fn only_a1(value: &FieldValue, _: &Settings) -> Result<(), ValidationMessage> {
            match value.as_text() {
                Some("A-1") => Ok(()),
                _ => Err(ValidationMessage::WrongShopId),
            }
        }
        let field = FieldSpec::text("orderId").with_check(only_a1);
        assert!(clean_one(field, "A-1").is_ok());
        assert_eq!(
            clean_one(field, "B-2"),
            Err(vec![ValidationMessage::WrongShopId])
        );
    }

    #[test]
    fn test_all_errors_are_collected() {
        let fields = [
            FieldSpec::text("orderId"),
            FieldSpec::email("userEmail").optional(),
            FieldSpec::decimal("recipientAmount", 10, 2),
        ];
        let (_, errors) = clean(
            &fields,
            &raw(&[("userEmail", "nope"), ("recipientAmount", "x")]),
            &settings(),
        );
        assert!(errors.has_field("orderId"));
        assert!(errors.has_field("userEmail"));
        assert!(errors.has_field("recipientAmount"));
    }
}
