#![allow(dead_code)]

use intellectmoney::application::form::RawPayload;
use intellectmoney::config::{Settings, VerificationMode};
use intellectmoney::domain::ports::{HashScheme, ResultHashFields};
use intellectmoney::infrastructure::md5_scheme::Md5HashScheme;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const SHOP_ID: &str = "450000";
pub const SECRET: &str = "s3cret";

pub fn settings() -> Settings {
    Settings::new(SHOP_ID, SECRET)
}

pub fn secret_key_settings() -> Settings {
    let mut settings = settings();
    settings.verification = VerificationMode::SecretKey;
    settings
}

pub fn payload(pairs: &[(&str, &str)]) -> RawPayload {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A well-formed, unsigned result callback for `order_id`.
pub fn result_payload(order_id: &str, status: &str) -> RawPayload {
    payload(&[
        ("eshopId", SHOP_ID),
        ("orderId", order_id),
        ("serviceName", "Subscription"),
        ("recipientAmount", "150.00"),
        ("recipientCurrency", "RUB"),
        ("userName", "Ivan Petrov"),
        ("userEmail", "ivan@example.com"),
        ("paymentId", "P-1001"),
        ("paymentData", "2024-03-01 12:30:00"),
        ("paymentStatus", status),
        ("eshopAccount", "1000000001"),
    ])
}

/// Adds the hash the gateway would compute for `raw` under `secret`.
pub fn sign_result(raw: &mut RawPayload, secret: &str) {
    let get = |name: &str| raw.get(name).cloned().unwrap_or_default();
    let fields = ResultHashFields {
        eshop_id: get("eshopId"),
        order_id: get("orderId"),
        service_name: get("serviceName"),
        eshop_account: get("eshopAccount"),
        recipient_amount: get("recipientAmount"),
        recipient_currency: get("recipientCurrency"),
        payment_status: get("paymentStatus"),
        user_name: get("userName"),
        user_email: get("userEmail"),
        payment_data: get("paymentData"),
    };
    let hash = Md5HashScheme::new().result_hash(&fields, secret);
    raw.insert("hash".to_string(), hash);
}

pub fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(())
}
