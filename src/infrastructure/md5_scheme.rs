use crate::domain::ports::{HashScheme, RequestHashFields, ResultHashFields};
use md5::{Digest, Md5};

/// Separator placed between field values before hashing.
pub const SEPARATOR: &str = "::";

/// The gateway's merchant-protocol digest: lowercase hex MD5 over the `::`-joined
/// field values, with the shared secret as the last value.
#[derive(Debug, Default, Clone, Copy)]
pub struct Md5HashScheme;

impl Md5HashScheme {
    pub fn new() -> Self {
        Self
    }
}

impl HashScheme for Md5HashScheme {
    fn request_hash(&self, fields: &RequestHashFields, secret_key: &str) -> String {
        digest_joined(&[
            &fields.eshop_id,
            &fields.order_id,
            &fields.service_name,
            &fields.recipient_amount,
            &fields.recipient_currency,
            secret_key,
        ])
    }

    fn result_hash(&self, fields: &ResultHashFields, secret_key: &str) -> String {
        digest_joined(&[
            &fields.eshop_id,
            &fields.order_id,
            &fields.service_name,
            &fields.eshop_account,
            &fields.recipient_amount,
            &fields.recipient_currency,
            &fields.payment_status,
            &fields.user_name,
            &fields.user_email,
            &fields.payment_data,
            secret_key,
        ])
    }
}

fn digest_joined(values: &[&str]) -> String {
    md5_hex(&values.join(SEPARATOR))
}

pub fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_fields() -> RequestHashFields {
        RequestHashFields {
            eshop_id: "450000".to_string(),
            order_id: "A-1".to_string(),
            service_name: String::new(),
            recipient_amount: "10.00".to_string(),
            recipient_currency: "RUB".to_string(),
        }
    }

    #[test]
    fn test_md5_known_vectors() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_request_hash_field_order() {
        let hash = Md5HashScheme.request_hash(&request_fields(), "secret");
        assert_eq!(hash, md5_hex("450000::A-1::::10.00::RUB::secret"));
        assert_eq!(hash.len(), 32);
    }

    #[test]
    fn test_result_hash_field_order() {
        let fields = ResultHashFields {
            eshop_id: "450000".to_string(),
            order_id: "A-1".to_string(),
            service_name: "Book".to_string(),
            eshop_account: "1000000001".to_string(),
            recipient_amount: "10.00".to_string(),
            recipient_currency: "RUB".to_string(),
            payment_status: "5".to_string(),
            user_name: "Ivan".to_string(),
            user_email: "ivan@example.com".to_string(),
            payment_data: "2024-03-01 12:30:00".to_string(),
        };
        assert_eq!(
            Md5HashScheme.result_hash(&fields, "secret"),
            md5_hex(
                "450000::A-1::Book::1000000001::10.00::RUB::5::Ivan::ivan@example.com::2024-03-01 12:30:00::secret"
            )
        );
    }

    #[test]
    fn test_secret_changes_digest() {
        let fields = request_fields();
        assert_ne!(
            Md5HashScheme.request_hash(&fields, "one"),
            Md5HashScheme.request_hash(&fields, "two")
        );
    }

    #[test]
    fn test_request_matches_uppercase_hex() {
        let fields = request_fields();
        let hash = Md5HashScheme.request_hash(&fields, "secret").to_uppercase();
        assert!(Md5HashScheme.request_matches(&fields, "secret", &hash));
        assert!(!Md5HashScheme.request_matches(&fields, "other", &hash));
    }
}
