use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use telemeter_core::error::{Result, TelemeterError};

/// One raw provider record: a creation timestamp plus string-encoded field
/// values keyed `field1`..`field8`. Missing and explicit-null fields are
/// both "no reading".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RawRecord {
    pub created_at: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Option<String>>,
}

impl RawRecord {
    pub fn field(&self, index: u8) -> Option<&str> {
        self.fields
            .get(&format!("field{index}"))
            .and_then(|v| v.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Envelope { feeds: Vec<RawRecord> },
    Records(Vec<RawRecord>),
}

/// Parses a provider feed document: either a bare JSON array of records or
/// the `{"channel": ..., "feeds": [...]}` envelope the channel API returns.
pub fn parse_feed(raw: &str) -> Result<Vec<RawRecord>> {
    let doc: FeedDocument = serde_json::from_str(raw)
        .map_err(|e| TelemeterError::Parse(format!("invalid feed document: {e}")))?;
    Ok(match doc {
        FeedDocument::Envelope { feeds } => feeds,
        FeedDocument::Records(records) => records,
    })
}
