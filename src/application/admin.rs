use super::fields::{self, matches_secret_key, SECRET_KEY, SHOP_ORDER_FIELDS};
use super::form::{clean, require, FieldSpec, RawPayload};
use super::gateway::IntellectMoney;
use crate::domain::choices::AdminActionKind;
use crate::domain::messages::ValidationErrors;
use crate::domain::payloads::AdminAction;
use tracing::{debug, warn};

pub const ACTION: &str = "action";

/// Fields of an administrative accept/refund request. No hashing: the shared
/// secret is sent in clear.
pub const ADMIN_ACTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::choice(ACTION, is_admin_action),
    FieldSpec::text(SECRET_KEY).with_check(matches_secret_key),
];

fn is_admin_action(value: &str) -> bool {
    value.parse::<AdminActionKind>().is_ok()
}

impl IntellectMoney {
    pub fn validate_admin_action(&self, data: &RawPayload) -> Result<AdminAction, ValidationErrors> {
        let specs = SHOP_ORDER_FIELDS.iter().chain(ADMIN_ACTION_FIELDS);
        let (cleaned, errors) = clean(specs, data, &self.settings);
        let cleaned = errors.into_result(cleaned).inspect_err(|errors| {
            if errors.has_field(SECRET_KEY) {
                warn!(
                    order_id = data.get(fields::ORDER_ID).map(String::as_str),
                    "admin action rejected: secret key mismatch"
                );
            }
            debug!(errors = %errors, "admin action rejected");
        })?;

        let action = require(ACTION, cleaned.text(ACTION))?;
        let action = AdminAction {
            order: fields::shop_order(&cleaned)?,
            action: require(ACTION, action.parse().ok())?,
        };
        debug!(
            order_id = %action.order.order_id,
            action = action.action.as_str(),
            "admin action accepted"
        );
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::domain::messages::ValidationMessage;

    fn payload(action: &str, secret: &str) -> RawPayload {
        [
            ("eshopId", "450000"),
            ("orderId", "A-1"),
            ("action", action),
            ("secretKey", secret),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_to_paid_accepted() {
        let gateway = IntellectMoney::new(Settings::new("450000", "secret"));
        let action = gateway
            .validate_admin_action(&payload("ToPaid", "secret"))
            .unwrap();
        assert_eq!(action.action, AdminActionKind::ToPaid);
        assert_eq!(action.order.order_id, "A-1");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let gateway = IntellectMoney::new(Settings::new("450000", "secret"));
        let errors = gateway
            .validate_admin_action(&payload("Refund", "guess"))
            .unwrap_err();
        assert_eq!(errors.field("secretKey"), &[ValidationMessage::WrongSecretKey]);
        assert!(!errors.has_field("action"));
    }

    #[test]
    fn test_action_is_case_sensitive() {
        let gateway = IntellectMoney::new(Settings::new("450000", "secret"));
        let errors = gateway
            .validate_admin_action(&payload("refund", "secret"))
            .unwrap_err();
        assert!(errors.has_field("action"));
    }
}
