//! The network capability consumed by the core.
//!
//! The crate itself never opens a socket. Discovery and every bridge call go
//! through a [`Transport`] supplied by the embedding application, which keeps
//! the protocol logic testable and the HTTP/UDP stack swappable.

use std::time::Duration;

use serde_json::Value;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Blocking network operations required to talk to a Hue bridge.
///
/// Implementations should report failures through [`Error::Transport`]; the
/// core surfaces them unchanged and performs no retries of its own.
pub trait Transport: Send + Sync {
    /// Send `payload` to the multicast group `address:port` and collect every
    /// distinct response received within `window`.
    fn send_broadcast(
        &self,
        payload: &str,
        address: &str,
        port: u16,
        window: Duration,
    ) -> Result<Vec<String>>;

    /// HTTP GET returning the raw response body as text.
    fn get_text(
        &self,
        path: &str,
        accept: &str,
        body: &str,
        host: &str,
        port: u16,
    ) -> Result<String>;

    /// HTTP GET returning a parsed JSON body.
    fn get_json(&self, path: &str, query: &Value, host: &str, port: u16) -> Result<Value>;

    /// HTTP POST with a JSON body, returning the parsed JSON response.
    fn post_json(&self, path: &str, body: &Value, host: &str, port: u16) -> Result<Value>;

    /// HTTP PUT with a JSON body, returning the parsed JSON response.
    fn put_json(&self, path: &str, body: &Value, host: &str, port: u16) -> Result<Value>;

    /// HTTP DELETE with a JSON body, returning the parsed JSON response.
    fn delete_json(&self, path: &str, body: &Value, host: &str, port: u16) -> Result<Value>;
}
