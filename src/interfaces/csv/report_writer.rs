use crate::application::form::RawPayload;
use crate::domain::messages::{Locale, ValidationErrors};
use crate::domain::payloads::{AdminAction, PaymentResult};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One line of the payment-result report.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub order_id: String,
    pub payment_id: String,
    pub status: String,
    pub valid: bool,
    pub errors: String,
}

impl ResultReport {
    pub fn accepted(result: &PaymentResult) -> Self {
        Self {
            order_id: result.order.order_id.clone(),
            payment_id: result.payment_id.clone(),
            status: result.payment_status.code().to_string(),
            valid: true,
            errors: String::new(),
        }
    }

    /// Echoes the identifying raw fields of a payload that failed validation.
    pub fn rejected(raw: &RawPayload, errors: &ValidationErrors, locale: Locale) -> Self {
        Self {
            order_id: raw_field(raw, "orderId"),
            payment_id: raw_field(raw, "paymentId"),
            status: raw_field(raw, "paymentStatus"),
            valid: false,
            errors: errors.render(locale).join("; "),
        }
    }
}

/// One line of the admin-action report.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub order_id: String,
    pub action: String,
    pub valid: bool,
    pub errors: String,
}

impl ActionReport {
    pub fn accepted(action: &AdminAction) -> Self {
        Self {
            order_id: action.order.order_id.clone(),
            action: action.action.as_str().to_string(),
            valid: true,
            errors: String::new(),
        }
    }

    pub fn rejected(raw: &RawPayload, errors: &ValidationErrors, locale: Locale) -> Self {
        Self {
            order_id: raw_field(raw, "orderId"),
            action: raw_field(raw, "action"),
            valid: false,
            errors: errors.render(locale).join("; "),
        }
    }
}

fn raw_field(raw: &RawPayload, name: &str) -> String {
    raw.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Writes report rows as CSV, header first.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write<T: Serialize>(&mut self, row: &T) -> Result<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
