//! Decoding of the bridge's tagged reply arrays.
//!
//! Mutating calls answer with a top-level JSON array whose entries are either
//! `{"success": ...}` or `{"error": {"type": .., "address": .., "description": ..}}`.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// A structured error entry from a bridge reply.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub code: i32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api {
            code: err.code,
            address: err.address,
            description: err.description,
        }
    }
}

/// One entry of a bridge reply array.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ApiResult {
    Success(Value),
    Error(ApiError),
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success(_))
    }
}

/// Decode a raw reply into its entries.
///
/// Fails with [`Error::Malformed`] when the reply is not the expected
/// single-object-per-entry array.
pub fn decode_reply(reply: &Value, context: &str) -> Result<Vec<ApiResult>> {
    let entries = reply
        .as_array()
        .ok_or_else(|| Error::malformed(context, "expected a top-level array"))?;
    entries
        .iter()
        .map(|entry| {
            serde_json::from_value(entry.clone())
                .map_err(|_| Error::malformed(context, "entry is neither success nor error"))
        })
        .collect()
}

/// Extract the first success payload, translating an error entry into
/// [`Error::Api`].
pub fn first_success(reply: &Value, context: &str) -> Result<Value> {
    for entry in decode_reply(reply, context)? {
        match entry {
            ApiResult::Success(payload) => return Ok(payload),
            ApiResult::Error(err) => return Err(err.into()),
        }
    }
    Err(Error::malformed(context, "empty reply array"))
}

/// Whether a reply acknowledges the operation.
///
/// Anything other than an array containing a success entry (including an
/// empty or malformed reply) counts as "not acknowledged", never as an error.
pub fn acknowledged(reply: &Value) -> bool {
    reply
        .as_array()
        .is_some_and(|entries| entries.iter().any(|e| e.get("success").is_some()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success_entry() {
        let reply = json!([{"success": {"username": "abc"}}]);
        let entries = decode_reply(&reply, "registration").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_success());
    }

    #[test]
    fn test_decode_error_entry() {
        let reply = json!([{"error": {"type": 101, "address": "", "description": "link button not pressed"}}]);
        let entries = decode_reply(&reply, "registration").unwrap();
        match &entries[0] {
            ApiResult::Error(err) => {
                assert_eq!(err.code, 101);
                assert_eq!(err.description, "link button not pressed");
            }
            other => panic!("expected error entry, got {other:?}"),
        }
    }

    #[test]
    fn test_first_success_maps_error() {
        let reply = json!([{"error": {"type": 7, "address": "/lights", "description": "invalid value"}}]);
        let err = first_success(&reply, "state").unwrap_err();
        assert_eq!(err.api_code(), Some(7));
    }

    #[test]
    fn test_non_array_reply_is_malformed() {
        assert!(decode_reply(&json!({"success": true}), "x").is_err());
    }

    #[test]
    fn test_acknowledged_shapes() {
        assert!(acknowledged(&json!([{"success": "/lights/1 deleted"}])));
        assert!(!acknowledged(&json!([])));
        assert!(!acknowledged(&json!(null)));
        assert!(!acknowledged(&json!([{"error": {"type": 3}}])));
    }
}
