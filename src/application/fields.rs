//! Field tables shared by every payload variant.

use super::form::{require, CleanedData, FieldSpec, FieldValue};
use crate::config::Settings;
use crate::domain::choices::Currency;
use crate::domain::messages::{ValidationErrors, ValidationMessage};
use crate::domain::payloads::{Amount, PaymentDetails, ShopOrder};
use crate::domain::ports::constant_time_eq;
use rust_decimal::Decimal;

pub const ESHOP_ID: &str = "eshopId";
pub const ORDER_ID: &str = "orderId";
pub const SERVICE_NAME: &str = "serviceName";
pub const RECIPIENT_AMOUNT: &str = "recipientAmount";
pub const RECIPIENT_CURRENCY: &str = "recipientCurrency";
pub const USER_NAME: &str = "userName";
pub const USER_EMAIL: &str = "userEmail";
pub const SECRET_KEY: &str = "secretKey";
pub const HASH: &str = "hash";

/// Merchant and order identity.
pub const SHOP_ORDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(ESHOP_ID).with_check(matches_shop_id),
    FieldSpec::bounded_text(ORDER_ID, 50),
];

/// Amount, currency and payer, shared by requests and result callbacks.
pub const PAYMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(SERVICE_NAME).optional(),
    FieldSpec::decimal(RECIPIENT_AMOUNT, 10, 2).with_check(positive_amount),
    FieldSpec::choice(RECIPIENT_CURRENCY, is_currency),
    FieldSpec::bounded_text(USER_NAME, 255).optional(),
    FieldSpec::email(USER_EMAIL).optional(),
];

fn matches_shop_id(value: &FieldValue, settings: &Settings) -> Result<(), ValidationMessage> {
    match value.as_text() {
        Some(shop_id) if shop_id == settings.shop_id => Ok(()),
        _ => Err(ValidationMessage::WrongShopId),
    }
}

fn positive_amount(value: &FieldValue, _: &Settings) -> Result<(), ValidationMessage> {
    match value {
        FieldValue::Decimal(amount) if *amount > Decimal::ZERO => Ok(()),
        _ => Err(ValidationMessage::AmountNotPositive),
    }
}

fn is_currency(value: &str) -> bool {
    value.parse::<Currency>().is_ok()
}

/// `secretKey` must be the configured shared secret.
pub fn matches_secret_key(value: &FieldValue, settings: &Settings) -> Result<(), ValidationMessage> {
    match value.as_text() {
        Some(secret) if constant_time_eq(secret.as_bytes(), settings.secret_key.as_bytes()) => {
            Ok(())
        }
        _ => Err(ValidationMessage::WrongSecretKey),
    }
}

pub fn shop_order(cleaned: &CleanedData) -> Result<ShopOrder, ValidationErrors> {
    Ok(ShopOrder {
        eshop_id: require(ESHOP_ID, cleaned.text(ESHOP_ID))?,
        order_id: require(ORDER_ID, cleaned.text(ORDER_ID))?,
    })
}

pub fn payment_details(cleaned: &CleanedData) -> Result<PaymentDetails, ValidationErrors> {
    let amount = require(RECIPIENT_AMOUNT, cleaned.decimal(RECIPIENT_AMOUNT))?;
    let currency = require(RECIPIENT_CURRENCY, cleaned.text(RECIPIENT_CURRENCY))?;
    Ok(PaymentDetails {
        service_name: cleaned.text(SERVICE_NAME),
        recipient_amount: require(RECIPIENT_AMOUNT, Amount::new(amount))?,
        recipient_currency: require(RECIPIENT_CURRENCY, currency.parse().ok())?,
        user_name: cleaned.text(USER_NAME),
        user_email: cleaned.text(USER_EMAIL),
    })
}
