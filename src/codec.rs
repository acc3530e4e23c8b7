//! Codec - wire form for ledger commitment and API responses
//!
//! Bidirectional mapping between an in-memory [`RequestRecord`] and its
//! JSON wire representation. Decoding checks structure only: a record
//! that parses but fails [`RequestRecord::validate`] is accepted here and
//! must be validated by the caller before use.

use crate::error::Result;
use crate::models::RequestRecord;

/// Encode a record snapshot into its JSON wire form.
pub fn encode(record: &RequestRecord) -> Result<String> {
    let snapshot = record.to_snapshot()?;
    Ok(snapshot.to_string())
}

/// Decode a record from its JSON wire form.
///
/// Malformed input (bad JSON, missing structural fields, unknown enum
/// tags, unparsable timestamps) fails without partially populating
/// anything.
pub fn decode(wire: &str) -> Result<RequestRecord> {
    let snapshot: serde_json::Value = serde_json::from_str(wire)?;
    RequestRecord::from_snapshot(snapshot)
}
