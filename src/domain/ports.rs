use super::payloads::{PaymentRequest, PaymentResult, DATETIME_FORMAT};

/// Values covered by the integrity hash of an outgoing payment request, in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestHashFields {
    pub eshop_id: String,
    pub order_id: String,
    pub service_name: String,
    pub recipient_amount: String,
    pub recipient_currency: String,
}

impl From<&PaymentRequest> for RequestHashFields {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            eshop_id: request.order.eshop_id.clone(),
            order_id: request.order.order_id.clone(),
            service_name: request.payment.service_name.clone().unwrap_or_default(),
            recipient_amount: request.payment.recipient_amount.to_string(),
            recipient_currency: request.payment.recipient_currency.to_string(),
        }
    }
}

/// Values covered by the integrity hash of a payment-result callback, in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultHashFields {
    pub eshop_id: String,
    pub order_id: String,
    pub service_name: String,
    pub eshop_account: String,
    pub recipient_amount: String,
    pub recipient_currency: String,
    pub payment_status: String,
    pub user_name: String,
    pub user_email: String,
    pub payment_data: String,
}

impl From<&PaymentResult> for ResultHashFields {
    fn from(result: &PaymentResult) -> Self {
        Self {
            eshop_id: result.order.eshop_id.clone(),
            order_id: result.order.order_id.clone(),
            service_name: result.payment.service_name.clone().unwrap_or_default(),
            eshop_account: result.eshop_account.clone(),
            recipient_amount: result.payment.recipient_amount.to_string(),
            recipient_currency: result.payment.recipient_currency.to_string(),
            payment_status: result.payment_status.code().to_string(),
            user_name: result.payment.user_name.clone().unwrap_or_default(),
            user_email: result.payment.user_email.clone().unwrap_or_default(),
            payment_data: result.payment_data.format(DATETIME_FORMAT).to_string(),
        }
    }
}

/// Keyed digest used to sign requests and authenticate result callbacks.
///
/// Implementations must be deterministic functions of the field values and the
/// shared secret.
pub trait HashScheme: Send + Sync {
    fn request_hash(&self, fields: &RequestHashFields, secret_key: &str) -> String;

    fn result_hash(&self, fields: &ResultHashFields, secret_key: &str) -> String;

    fn request_matches(&self, fields: &RequestHashFields, secret_key: &str, supplied: &str) -> bool {
        digests_match(&self.request_hash(fields, secret_key), supplied)
    }

    fn result_matches(&self, fields: &ResultHashFields, secret_key: &str, supplied: &str) -> bool {
        digests_match(&self.result_hash(fields, secret_key), supplied)
    }
}

pub type HashSchemeBox = Box<dyn HashScheme>;

/// Hex digests compare case-insensitively, in time independent of the first mismatch.
pub fn digests_match(expected: &str, supplied: &str) -> bool {
    constant_time_eq(
        expected.to_ascii_lowercase().as_bytes(),
        supplied.trim().to_ascii_lowercase().as_bytes(),
    )
}

/// Byte equality whose running time depends only on the lengths.
pub fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}
