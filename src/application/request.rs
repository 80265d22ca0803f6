use super::fields::{
    self, ESHOP_ID, HASH, PAYMENT_FIELDS, RECIPIENT_AMOUNT, RECIPIENT_CURRENCY, SHOP_ORDER_FIELDS,
};
use super::form::{clean, FieldSpec, RawPayload};
use super::gateway::{request_hash_fields, IntellectMoney};
use crate::config::Settings;
use crate::domain::choices::{Currency, Preference};
use crate::domain::messages::ValidationErrors;
use crate::domain::payloads::{PaymentRequest, DATETIME_FORMAT};
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

pub const SUCCESS_URL: &str = "successUrl";
pub const FAIL_URL: &str = "failUrl";
pub const PREFERENCE: &str = "preference";
pub const EXPIRE_DATE: &str = "expireDate";
pub const HOLD_MODE: &str = "holdMode";
pub const MERCHANT_RECEIPT: &str = "merchantReceipt";
pub const CUSTOMER_CONTRACT: &str = "customerContract";

const EXPIRE_DATE_FORMATS: &[&str] = &[DATETIME_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Fields specific to an outgoing payment request.
pub const PAYMENT_REQUEST_FIELDS: &[FieldSpec] = &[
    FieldSpec::bounded_text(SUCCESS_URL, 512).optional(),
    FieldSpec::bounded_text(FAIL_URL, 512).optional(),
    FieldSpec::choice(PREFERENCE, is_preference).optional(),
    FieldSpec::datetime(EXPIRE_DATE, EXPIRE_DATE_FORMATS, true).optional(),
    FieldSpec::boolean(HOLD_MODE),
    FieldSpec::text(HASH).required_when(signs_requests),
    FieldSpec::text(MERCHANT_RECEIPT).optional(),
    FieldSpec::text(CUSTOMER_CONTRACT).optional(),
];

fn is_preference(value: &str) -> bool {
    value.parse::<Preference>().is_ok()
}

fn signs_requests(settings: &Settings) -> bool {
    settings.require_hash
}

impl IntellectMoney {
    /// Builds and validates a payment request from caller-supplied initial values.
    pub fn build_payment_request(
        &self,
        initial: &RawPayload,
    ) -> Result<PaymentRequest, ValidationErrors> {
        self.build_payment_request_at(initial, Local::now().naive_local())
    }

    /// Same as [`build_payment_request`](Self::build_payment_request), with `now`
    /// as the base of the hold-mode expiry.
    pub fn build_payment_request_at(
        &self,
        initial: &RawPayload,
        now: NaiveDateTime,
    ) -> Result<PaymentRequest, ValidationErrors> {
        let values = self.request_initial_values(initial, now);
        let specs = SHOP_ORDER_FIELDS
            .iter()
            .chain(PAYMENT_FIELDS)
            .chain(PAYMENT_REQUEST_FIELDS);
        let (cleaned, errors) = clean(specs, &values, &self.settings);
        let cleaned = errors.into_result(cleaned).inspect_err(|errors| {
            debug!(
                order_id = values.get(fields::ORDER_ID).map(String::as_str),
                errors = %errors,
                "payment request rejected"
            );
        })?;

        let request = PaymentRequest {
            order: fields::shop_order(&cleaned)?,
            payment: fields::payment_details(&cleaned)?,
            success_url: cleaned.text(SUCCESS_URL),
            fail_url: cleaned.text(FAIL_URL),
            preference: cleaned
                .text(PREFERENCE)
                .and_then(|value| value.parse().ok()),
            expire_date: cleaned.datetime(EXPIRE_DATE),
            hold_mode: cleaned.flag(HOLD_MODE),
            hash: cleaned.text(HASH),
            merchant_receipt: cleaned.text(MERCHANT_RECEIPT),
            customer_contract: cleaned.text(CUSTOMER_CONTRACT),
        };
        debug!(
            order_id = %request.order.order_id,
            signed = request.hash.is_some(),
            "payment request built"
        );
        Ok(request)
    }

    /// Fills the configured defaults into `initial`: shop id, currency, return URLs
    /// and hold mode. In hold mode the expiry is forced to `now` plus the configured
    /// offset; when requests are signed the computed `hash` replaces any supplied one.
    pub fn request_initial_values(&self, initial: &RawPayload, now: NaiveDateTime) -> RawPayload {
        let settings = &self.settings;
        let mut values = initial.clone();

        set_default(&mut values, ESHOP_ID, &settings.shop_id);
        set_default(
            &mut values,
            RECIPIENT_CURRENCY,
            Currency::default_for(settings.debug).as_str(),
        );
        set_default(&mut values, SUCCESS_URL, &settings.success_url);
        set_default(&mut values, FAIL_URL, &settings.fail_url);
        if settings.hold_mode {
            set_default(&mut values, HOLD_MODE, "true");
            let expire_date = now + settings.expire_date_offset();
            values.insert(
                EXPIRE_DATE.to_string(),
                expire_date.format(DATETIME_FORMAT).to_string(),
            );
        }

        // The hash covers the amount as rendered, so canonicalise it first.
        if let Some(amount) = values.get(RECIPIENT_AMOUNT)
            && let Ok(amount) = Decimal::from_str(amount.trim())
        {
            values.insert(RECIPIENT_AMOUNT.to_string(), amount.to_string());
        }

        if settings.require_hash {
            let hash = self.request_hash(&request_hash_fields(&values));
            values.insert(HASH.to_string(), hash);
        }
        values
    }
}

fn set_default(values: &mut RawPayload, name: &str, default: &str) {
    if default.is_empty() {
        return;
    }
    let current = values.entry(name.to_string()).or_default();
    if current.trim().is_empty() {
        *current = default.to_string();
    }
}
