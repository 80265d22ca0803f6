use super::fields::{
    self, matches_secret_key, HASH, PAYMENT_FIELDS, SECRET_KEY, SHOP_ORDER_FIELDS,
};
use super::form::{clean, require, CleanedData, FieldSpec, FieldValue, RawPayload};
use super::gateway::IntellectMoney;
use crate::config::{Settings, VerificationMode};
use crate::domain::choices::PaymentStatus;
use crate::domain::messages::{ValidationErrors, ValidationMessage};
use crate::domain::payloads::{CallbackProof, PaymentResult, DATETIME_FORMAT};
use crate::domain::ports::ResultHashFields;
use tracing::{debug, warn};

pub const PAYMENT_ID: &str = "paymentId";
pub const PAYMENT_DATA: &str = "paymentData";
pub const PAYMENT_STATUS: &str = "paymentStatus";
pub const ESHOP_ACCOUNT: &str = "eshopAccount";
pub const RECURRING_STATE: &str = "reccurringState";

const PAYMENT_DATA_FORMATS: &[&str] = &[DATETIME_FORMAT];

/// Fields specific to a payment-result callback. Which of `hash` and `secretKey`
/// is required follows the configured [`VerificationMode`].
pub const PAYMENT_RESULT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text(PAYMENT_ID),
    FieldSpec::datetime(PAYMENT_DATA, PAYMENT_DATA_FORMATS, false),
    FieldSpec::int_choice(PAYMENT_STATUS, is_payment_status),
    FieldSpec::text(ESHOP_ACCOUNT),
    FieldSpec::text(HASH).required_when(uses_hash),
    FieldSpec::text(SECRET_KEY)
        .required_when(uses_secret_key)
        .with_check(secret_key_when_enabled),
    FieldSpec::text(RECURRING_STATE).optional(),
];

fn is_payment_status(code: i64) -> bool {
    PaymentStatus::try_from(code).is_ok()
}

fn uses_hash(settings: &Settings) -> bool {
    settings.verification == VerificationMode::Hash
}

fn uses_secret_key(settings: &Settings) -> bool {
    settings.verification == VerificationMode::SecretKey
}

fn secret_key_when_enabled(
    value: &FieldValue,
    settings: &Settings,
) -> Result<(), ValidationMessage> {
    if uses_secret_key(settings) {
        matches_secret_key(value, settings)
    } else {
        Ok(())
    }
}

impl IntellectMoney {
    /// Validates and authenticates a payment-result callback.
    ///
    /// In [`VerificationMode::Hash`] the digest is recomputed over the cleaned
    /// values and a mismatch is reported as an object-level error. In
    /// [`VerificationMode::SecretKey`] the `secretKey` field must equal the shared
    /// secret and `hash` is ignored.
    pub fn validate_payment_result(
        &self,
        data: &RawPayload,
    ) -> Result<PaymentResult, ValidationErrors> {
        let specs = SHOP_ORDER_FIELDS
            .iter()
            .chain(PAYMENT_FIELDS)
            .chain(PAYMENT_RESULT_FIELDS);
        let (cleaned, errors) = clean(specs, data, &self.settings);
        let cleaned = errors.into_result(cleaned).inspect_err(|errors| {
            if errors.has_field(SECRET_KEY) && uses_secret_key(&self.settings) {
                warn!(
                    order_id = data.get(fields::ORDER_ID).map(String::as_str),
                    "payment result rejected: secret key mismatch"
                );
            }
            debug!(errors = %errors, "payment result rejected");
        })?;

        let result = self.payment_result(&cleaned)?;
        if let CallbackProof::Hash(supplied) = &result.proof
            && !self.verify_result_hash(&ResultHashFields::from(&result), supplied)
        {
            warn!(
                order_id = %result.order.order_id,
                payment_id = %result.payment_id,
                "payment result rejected: hash mismatch"
            );
            let mut errors = ValidationErrors::new();
            errors.add_non_field(ValidationMessage::HashMismatch);
            return Err(errors);
        }

        debug!(
            order_id = %result.order.order_id,
            payment_id = %result.payment_id,
            status = result.payment_status.code(),
            "payment result accepted"
        );
        Ok(result)
    }

    fn payment_result(&self, cleaned: &CleanedData) -> Result<PaymentResult, ValidationErrors> {
        let status = require(PAYMENT_STATUS, cleaned.int(PAYMENT_STATUS))?;
        let proof = match self.settings.verification {
            VerificationMode::Hash => CallbackProof::Hash(require(HASH, cleaned.text(HASH))?),
            VerificationMode::SecretKey => CallbackProof::SecretKey,
        };
        Ok(PaymentResult {
            order: fields::shop_order(cleaned)?,
            payment: fields::payment_details(cleaned)?,
            payment_id: require(PAYMENT_ID, cleaned.text(PAYMENT_ID))?,
            payment_data: require(PAYMENT_DATA, cleaned.datetime(PAYMENT_DATA))?,
            payment_status: require(PAYMENT_STATUS, PaymentStatus::try_from(status).ok())?,
            eshop_account: require(ESHOP_ACCOUNT, cleaned.text(ESHOP_ACCOUNT))?,
            proof,
            recurring_state: cleaned.text(RECURRING_STATE),
        })
    }
}
