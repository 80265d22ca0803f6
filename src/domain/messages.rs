use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Language used when rendering validation messages for people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// A single validation failure, kept as data so callers can render or inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationMessage {
    Required,
    MaxLength { max: usize, actual: usize },
    InvalidEmail,
    InvalidNumber,
    MaxDigits { max: u32 },
    MaxDecimalPlaces { max: u32 },
    MaxWholeDigits { max: u32 },
    AmountNotPositive,
    InvalidChoice { value: String },
    InvalidDateTime,
    WrongShopId,
    WrongSecretKey,
    HashMismatch,
}

impl ValidationMessage {
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.render_en(),
            Locale::Ru => self.render_ru(),
        }
    }

    fn render_en(&self) -> String {
        match self {
            Self::Required => "This field is required.".to_string(),
            Self::MaxLength { max, actual } => format!(
                "Ensure this value has at most {max} characters (it has {actual})."
            ),
            Self::InvalidEmail => "Enter a valid email address.".to_string(),
            Self::InvalidNumber => "Enter a number.".to_string(),
            Self::MaxDigits { max } => {
                format!("Ensure that there are no more than {max} digits in total.")
            }
            Self::MaxDecimalPlaces { max } => {
                format!("Ensure that there are no more than {max} decimal places.")
            }
            Self::MaxWholeDigits { max } => {
                format!("Ensure that there are no more than {max} digits before the decimal point.")
            }
            Self::AmountNotPositive => "Amount must be positive.".to_string(),
            Self::InvalidChoice { value } => format!(
                "Select a valid choice. {value} is not one of the available choices."
            ),
            Self::InvalidDateTime => "Enter a valid date/time.".to_string(),
            Self::WrongShopId => "Invalid eshopId.".to_string(),
            Self::WrongSecretKey => "Invalid value.".to_string(),
            Self::HashMismatch => "Invalid hash: payload integrity check failed.".to_string(),
        }
    }

    fn render_ru(&self) -> String {
        match self {
            Self::Required => "Обязательное поле.".to_string(),
            Self::MaxLength { max, actual } => format!(
                "Убедитесь, что это значение содержит не более {max} символов (сейчас {actual})."
            ),
            Self::InvalidEmail => "Введите правильный адрес электронной почты.".to_string(),
            Self::InvalidNumber => "Введите число.".to_string(),
            Self::MaxDigits { max } => format!("Убедитесь, что вы ввели не более {max} цифр."),
            Self::MaxDecimalPlaces { max } => {
                format!("Убедитесь, что вы ввели не более {max} цифр после запятой.")
            }
            Self::MaxWholeDigits { max } => {
                format!("Убедитесь, что вы ввели не более {max} цифр перед запятой.")
            }
            Self::AmountNotPositive => "Сумма должна быть больше нуля.".to_string(),
            Self::InvalidChoice { value } => format!(
                "Выберите корректный вариант. {value} нет среди допустимых значений."
            ),
            Self::InvalidDateTime => "Введите правильную дату и время.".to_string(),
            Self::WrongShopId => "Неверный eshopId".to_string(),
            Self::WrongSecretKey => "Неверное значение".to_string(),
            Self::HashMismatch => "Неверный hash".to_string(),
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Locale::En))
    }
}

/// Every failure found while validating one payload.
///
/// Field errors are keyed by the wire name of the field (`eshopId`, `paymentStatus`, ...).
/// Object-level failures such as an integrity mismatch live in `non_field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<ValidationMessage>>,
    non_field: Vec<ValidationMessage>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a set holding one field error.
    pub fn single(field: &str, message: ValidationMessage) -> Self {
        let mut errors = Self::new();
        errors.add_field(field, message);
        errors
    }

    pub fn add_field(&mut self, field: &str, message: ValidationMessage) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message);
    }

    pub fn add_non_field(&mut self, message: ValidationMessage) {
        self.non_field.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> &[ValidationMessage] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[ValidationMessage])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    pub fn non_field(&self) -> &[ValidationMessage] {
        &self.non_field
    }

    /// Flattens the set into human readable lines, object-level messages first.
    pub fn render(&self, locale: Locale) -> Vec<String> {
        let object_level = self.non_field.iter().map(|m| m.render(locale));
        let field_level = self.fields.iter().flat_map(|(name, messages)| {
            messages
                .iter()
                .map(move |m| format!("{name}: {}", m.render(locale)))
        });
        object_level.chain(field_level).collect()
    }

    /// Turns an empty set into `Ok(value)`, anything else into `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Locale::En).join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
