/// All error types that can occur when interacting with a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request body could not be serialized to JSON. Reported by
    /// [`Transport`](crate::Transport) implementations.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// A response body could not be parsed as JSON. Reported by
    /// [`Transport`](crate::Transport) implementations.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The bridge answered with a structured error object.
    ///
    /// Error type 101 ("link button not pressed") during registration is
    /// *not* reported through this variant; see
    /// [`Bridge::request_username`](crate::Bridge::request_username).
    #[error("bridge error {code} at {address:?}: {description}")]
    Api {
        code: i32,
        address: String,
        description: String,
    },

    /// The requested light id is absent from the bridge's light list.
    #[error("light {0} not found on the bridge")]
    LightNotFound(u32),

    /// A response parsed as JSON but lacks fields required for the operation.
    #[error("malformed {context} response: {reason}")]
    Malformed { context: String, reason: String },

    /// A network operation in the transport collaborator failed.
    #[error("transport {action} error: {err:?}")]
    Transport { action: String, err: std::io::Error },

    /// Registration produced no username (link button not yet pressed).
    #[error("no username obtained; press the bridge link button and retry")]
    UsernameUnavailable,
}

impl Error {
    /// Create a new transport error
    pub fn transport(action: &str, err: std::io::Error) -> Self {
        Error::Transport {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new malformed-response error
    pub fn malformed(context: &str, reason: &str) -> Self {
        Error::Malformed {
            context: context.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The numeric bridge error code, if this is an API error.
    pub fn api_code(&self) -> Option<i32> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
