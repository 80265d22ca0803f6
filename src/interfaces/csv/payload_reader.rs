use crate::application::form::RawPayload;
use crate::error::{GatewayError, Result};
use std::collections::HashMap;
use std::io::Read;

/// Reads raw gateway payloads from a CSV source.
///
/// The header row holds the wire field names (`eshopId`, `orderId`, ...); every
/// following row is one payload. Cells are trimmed and rows may be shorter than the
/// header. Empty cells and missing trailing cells are both left out of the payload.
pub struct PayloadReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PayloadReader<R> {
    /// Creates a new `PayloadReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads one payload per row.
    pub fn payloads(self) -> impl Iterator<Item = Result<RawPayload>> {
        self.reader
            .into_deserialize::<HashMap<String, Option<String>>>()
            .map(|result| {
                result
                    .map(|row| {
                        row.into_iter()
                            .filter_map(|(name, value)| value.map(|value| (name, value)))
                            .collect::<RawPayload>()
                    })
                    .map_err(GatewayError::from)
            })
    }
}
