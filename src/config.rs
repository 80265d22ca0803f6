use crate::error::{GatewayError, Result};
use chrono::TimeDelta;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Environment variables with this prefix override file settings,
/// e.g. `INTELLECTMONEY_SHOP_ID`.
pub const ENV_PREFIX: &str = "INTELLECTMONEY";

const DEFAULT_EXPIRE_DATE_OFFSET_SECS: u64 = 3 * 24 * 60 * 60;
const MAX_EXPIRE_DATE_OFFSET_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// How the gateway proves that a payment-result callback is genuine.
///
/// Chosen once per deployment; the validator never accepts whichever proof the
/// caller happens to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// The callback carries a `hash` recomputed and compared on our side.
    #[default]
    Hash,
    /// The callback carries the shared `secretKey` in clear.
    SecretKey,
}

/// Merchant settings shared by every validator. Loaded once, read-only afterwards.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub shop_id: String,
    pub secret_key: String,
    /// Sign outgoing payment requests with a `hash` field.
    #[serde(default)]
    pub require_hash: bool,
    #[serde(default)]
    pub verification: VerificationMode,
    /// Deferred capture: requests get an `expireDate` for the reservation.
    #[serde(default)]
    pub hold_mode: bool,
    #[serde(default = "default_expire_date_offset_secs")]
    pub expire_date_offset_secs: u64,
    #[serde(default)]
    pub success_url: String,
    #[serde(default)]
    pub fail_url: String,
    /// Sandbox mode: requests default to the `TST` currency.
    #[serde(default)]
    pub debug: bool,
}

fn default_expire_date_offset_secs() -> u64 {
    DEFAULT_EXPIRE_DATE_OFFSET_SECS
}

impl Settings {
    /// Settings with every optional value at its default.
    pub fn new(shop_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            secret_key: secret_key.into(),
            require_hash: false,
            verification: VerificationMode::default(),
            hold_mode: false,
            expire_date_offset_secs: DEFAULT_EXPIRE_DATE_OFFSET_SECS,
            success_url: String::new(),
            fail_url: String::new(),
            debug: false,
        }
    }

    /// Loads settings from an optional TOML file, then `INTELLECTMONEY_*` variables.
    ///
    /// Values are kept as text until deserialised, so ids and secrets made of digits
    /// keep their leading zeros.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, ::config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, environment: ::config::Environment) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        let settings: Settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shop_id.trim().is_empty() {
            return Err(GatewayError::InvalidSettings(
                "shop_id must not be empty".to_string(),
            ));
        }
        if self.secret_key.is_empty() {
            return Err(GatewayError::InvalidSettings(
                "secret_key must not be empty".to_string(),
            ));
        }
        if self.hold_mode && self.expire_date_offset_secs == 0 {
            return Err(GatewayError::InvalidSettings(
                "expire_date_offset_secs must be positive when hold_mode is on".to_string(),
            ));
        }
        if self.expire_date_offset_secs > MAX_EXPIRE_DATE_OFFSET_SECS {
            return Err(GatewayError::InvalidSettings(format!(
                "expire_date_offset_secs must not exceed {MAX_EXPIRE_DATE_OFFSET_SECS}"
            )));
        }
        Ok(())
    }

    pub fn expire_date_offset(&self) -> TimeDelta {
        let secs = self.expire_date_offset_secs.min(MAX_EXPIRE_DATE_OFFSET_SECS);
        TimeDelta::seconds(secs as i64)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("shop_id", &self.shop_id)
            .field("secret_key", &"<redacted>")
            .field("require_hash", &self.require_hash)
            .field("verification", &self.verification)
            .field("hold_mode", &self.hold_mode)
            .field("expire_date_offset_secs", &self.expire_date_offset_secs)
            .field("success_url", &self.success_url)
            .field("fail_url", &self.fail_url)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_from_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "shop_id = \"450000\"").unwrap();
        writeln!(file, "secret_key = \"s3cret\"").unwrap();
        writeln!(file, "verification = \"secret_key\"").unwrap();
        writeln!(file, "hold_mode = true").unwrap();
        writeln!(file, "expire_date_offset_secs = 3600").unwrap();

        let settings = Settings::load_with(Some(file.path()), environment(&[])).unwrap();
        assert_eq!(settings.shop_id, "450000");
        assert_eq!(settings.verification, VerificationMode::SecretKey);
        assert!(settings.hold_mode);
        assert!(!settings.require_hash);
        assert_eq!(settings.expire_date_offset(), TimeDelta::hours(1));
    }

    fn environment(pairs: &[(&str, &str)]) -> ::config::Environment {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<::config::Map<String, String>>();
        ::config::Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn test_env_keeps_numeric_text_verbatim() {
        let settings = Settings::load_with(
            None,
            environment(&[
                ("INTELLECTMONEY_SHOP_ID", "0450000"),
                ("INTELLECTMONEY_SECRET_KEY", "00123.50"),
                ("INTELLECTMONEY_HOLD_MODE", "true"),
                ("INTELLECTMONEY_EXPIRE_DATE_OFFSET_SECS", "3600"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.shop_id, "0450000");
        assert_eq!(settings.secret_key, "00123.50");
        assert!(settings.hold_mode);
        assert_eq!(settings.expire_date_offset(), TimeDelta::hours(1));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "shop_id = \"450000\"").unwrap();
        writeln!(file, "secret_key = \"from-file\"").unwrap();

        let settings = Settings::load_with(
            Some(file.path()),
            environment(&[("INTELLECTMONEY_SECRET_KEY", "007")]),
        )
        .unwrap();
        assert_eq!(settings.shop_id, "450000");
        assert_eq!(settings.secret_key, "007");
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let settings = Settings::new("450000", "");
        assert!(matches!(
            settings.validate(),
            Err(GatewayError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_hold_mode_needs_offset() {
        let mut settings = Settings::new("450000", "secret");
        settings.hold_mode = true;
        settings.expire_date_offset_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = Settings::new("450000", "top-secret");
        let printed = format!("{settings:?}");
        assert!(printed.contains("450000"));
        assert!(!printed.contains("top-secret"));
    }
}
