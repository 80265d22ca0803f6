use super::fields::{
    ESHOP_ID, ORDER_ID, RECIPIENT_AMOUNT, RECIPIENT_CURRENCY, SERVICE_NAME,
};
use super::form::RawPayload;
use crate::config::Settings;
use crate::domain::ports::{HashSchemeBox, RequestHashFields, ResultHashFields};
use crate::infrastructure::md5_scheme::Md5HashScheme;

/// Validation and integrity layer for the IntellectMoney hosted payment page.
///
/// Holds the merchant [`Settings`] and the [`HashScheme`](crate::domain::ports::HashScheme)
/// used for signing. Every operation is a pure function of its input and this
/// read-only state, so one instance can be shared across threads.
pub struct IntellectMoney {
    pub(super) settings: Settings,
    pub(super) hash_scheme: HashSchemeBox,
}

impl IntellectMoney {
    /// Creates a validator using the gateway's MD5 signing scheme.
    pub fn new(settings: Settings) -> Self {
        Self::with_hash_scheme(settings, Box::new(Md5HashScheme::new()))
    }

    pub fn with_hash_scheme(settings: Settings, hash_scheme: HashSchemeBox) -> Self {
        Self {
            settings,
            hash_scheme,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn request_hash(&self, fields: &RequestHashFields) -> String {
        self.hash_scheme
            .request_hash(fields, &self.settings.secret_key)
    }

    /// Checks the `hash` of rendered request values, e.g. those produced by
    /// [`PaymentRequest::to_fields`](crate::domain::payloads::PaymentRequest::to_fields).
    pub fn verify_request_hash(&self, values: &RawPayload) -> bool {
        let supplied = raw_text(values, "hash");
        !supplied.is_empty()
            && self.hash_scheme.request_matches(
                &request_hash_fields(values),
                &self.settings.secret_key,
                supplied,
            )
    }

    pub fn result_hash(&self, fields: &ResultHashFields) -> String {
        self.hash_scheme
            .result_hash(fields, &self.settings.secret_key)
    }

    /// Recomputes the result digest over `fields` and compares it with `supplied`.
    pub fn verify_result_hash(&self, fields: &ResultHashFields, supplied: &str) -> bool {
        self.hash_scheme
            .result_matches(fields, &self.settings.secret_key, supplied)
    }
}

pub(super) fn raw_text<'a>(values: &'a RawPayload, name: &str) -> &'a str {
    values.get(name).map(|v| v.trim()).unwrap_or_default()
}

pub(super) fn request_hash_fields(values: &RawPayload) -> RequestHashFields {
    RequestHashFields {
        eshop_id: raw_text(values, ESHOP_ID).to_string(),
        order_id: raw_text(values, ORDER_ID).to_string(),
        service_name: raw_text(values, SERVICE_NAME).to_string(),
        recipient_amount: raw_text(values, RECIPIENT_AMOUNT).to_string(),
        recipient_currency: raw_text(values, RECIPIENT_CURRENCY).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::HashScheme;

    struct FixedScheme;

    impl HashScheme for FixedScheme {
        fn request_hash(&self, fields: &RequestHashFields, _: &str) -> String {
            format!("req-{}", fields.order_id)
        }

        fn result_hash(&self, fields: &ResultHashFields, _: &str) -> String {
            format!("res-{}", fields.order_id)
        }
    }

    fn values(pairs: &[(&str, &str)]) -> RawPayload {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_injected_scheme_is_used() {
        let gateway =
            IntellectMoney::with_hash_scheme(Settings::new("1", "s"), Box::new(FixedScheme));
        assert!(gateway.verify_request_hash(&values(&[("orderId", "7"), ("hash", "req-7")])));
        assert!(!gateway.verify_request_hash(&values(&[("orderId", "7"), ("hash", "req-8")])));

        let fields = ResultHashFields {
            order_id: "7".to_string(),
            ..Default::default()
        };
        assert_eq!(gateway.result_hash(&fields), "res-7");
        assert!(gateway.verify_result_hash(&fields, "RES-7"));
    }

    #[test]
    fn test_missing_hash_never_verifies() {
        let gateway = IntellectMoney::new(Settings::new("1", "s"));
        assert!(!gateway.verify_request_hash(&values(&[("orderId", "7")])));
    }

    #[test]
    fn test_gateway_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IntellectMoney>();
    }
}
