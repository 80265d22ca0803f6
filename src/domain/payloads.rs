use super::choices::{AdminActionKind, Currency, PaymentStatus, Preference};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Wire format of every timestamp exchanged with the gateway.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A positive payment amount.
///
/// Keeps the scale it was parsed with, so `10.00` renders back as `10.00`; the
/// integrity hash is computed over that rendering.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Merchant and order identity, shared by every payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopOrder {
    pub eshop_id: String,
    pub order_id: String,
}

/// What is being paid, by whom, and how much.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDetails {
    pub service_name: Option<String>,
    pub recipient_amount: Amount,
    pub recipient_currency: Currency,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// A validated outgoing payment request, ready to be posted to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub order: ShopOrder,
    pub payment: PaymentDetails,
    pub success_url: Option<String>,
    pub fail_url: Option<String>,
    pub preference: Option<Preference>,
    pub expire_date: Option<NaiveDateTime>,
    pub hold_mode: bool,
    pub hash: Option<String>,
    pub merchant_receipt: Option<String>,
    pub customer_contract: Option<String>,
}

impl PaymentRequest {
    /// Renders the request as ordered wire `(name, value)` pairs. Absent optional
    /// fields are omitted.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("eshopId", self.order.eshop_id.clone()),
            ("orderId", self.order.order_id.clone()),
        ];
        push_opt(&mut fields, "serviceName", self.payment.service_name.as_deref());
        fields.push((
            "recipientAmount",
            self.payment.recipient_amount.to_string(),
        ));
        fields.push((
            "recipientCurrency",
            self.payment.recipient_currency.to_string(),
        ));
        push_opt(&mut fields, "userName", self.payment.user_name.as_deref());
        push_opt(&mut fields, "userEmail", self.payment.user_email.as_deref());
        push_opt(&mut fields, "successUrl", self.success_url.as_deref());
        push_opt(&mut fields, "failUrl", self.fail_url.as_deref());
        push_opt(
            &mut fields,
            "preference",
            self.preference.as_ref().map(Preference::as_str),
        );
        if let Some(expire_date) = self.expire_date {
            fields.push(("expireDate", expire_date.format(DATETIME_FORMAT).to_string()));
        }
        if self.hold_mode {
            fields.push(("holdMode", "true".to_string()));
        }
        push_opt(&mut fields, "hash", self.hash.as_deref());
        push_opt(&mut fields, "merchantReceipt", self.merchant_receipt.as_deref());
        push_opt(&mut fields, "customerContract", self.customer_contract.as_deref());
        fields
    }
}

fn push_opt(fields: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        fields.push((name, value.to_string()));
    }
}

/// How a result callback was authenticated. The secret itself is never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "hash", rename_all = "snake_case")]
pub enum CallbackProof {
    Hash(String),
    SecretKey,
}

/// A validated and authenticated payment-result callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentResult {
    pub order: ShopOrder,
    pub payment: PaymentDetails,
    pub payment_id: String,
    pub payment_data: NaiveDateTime,
    pub payment_status: PaymentStatus,
    pub eshop_account: String,
    pub proof: CallbackProof,
    pub recurring_state: Option<String>,
}

/// A validated administrative accept/refund request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminAction {
    pub order: ShopOrder,
    pub action: AdminActionKind,
}
