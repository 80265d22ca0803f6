use crate::application::form::RawPayload;
use crate::domain::messages::{Locale, ValidationErrors};
use crate::domain::payloads::PaymentRequest;
use crate::error::Result;
use serde_json::{json, Map, Value};
use std::io::Write;

/// Writes built payment requests as JSON lines, one object per input row.
///
/// A built request becomes `{"orderId": .., "valid": true, "fields": {..}}` where
/// `fields` is the form to post to the gateway; a rejected one becomes
/// `{"orderId": .., "valid": false, "errors": [..]}`.
pub struct RequestWriter<W: Write> {
    sink: W,
    locale: Locale,
}

impl<W: Write> RequestWriter<W> {
    pub fn new(sink: W, locale: Locale) -> Self {
        Self { sink, locale }
    }

    pub fn write_built(&mut self, request: &PaymentRequest) -> Result<()> {
        let fields: Map<String, Value> = request
            .to_fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::String(value)))
            .collect();
        self.write_line(&json!({
            "orderId": request.order.order_id,
            "valid": true,
            "fields": fields,
        }))
    }

    pub fn write_rejected(&mut self, raw: &RawPayload, errors: &ValidationErrors) -> Result<()> {
        self.write_line(&json!({
            "orderId": raw.get("orderId").map(|v| v.trim()),
            "valid": false,
            "errors": errors.render(self.locale),
        }))
    }

    fn write_line(&mut self, value: &Value) -> Result<()> {
        serde_json::to_writer(&mut self.sink, value)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messages::ValidationMessage;

    #[test]
    fn test_rejected_line() {
        let raw: RawPayload = [("orderId".to_string(), "A-1".to_string())].into();
        let errors = ValidationErrors::single("recipientAmount", ValidationMessage::Required);

        let mut buffer = Vec::new();
        RequestWriter::new(&mut buffer, Locale::En)
            .write_rejected(&raw, &errors)
            .unwrap();

        let line: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(line["orderId"], "A-1");
        assert_eq!(line["valid"], false);
        assert_eq!(line["errors"][0], "recipientAmount: This field is required.");
    }
}
