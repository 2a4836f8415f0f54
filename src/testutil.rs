//! Scripted transport used by the crate's tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use crate::errors::Error;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub host: String,
}

/// A [`Transport`] whose responses are scripted per (method, path).
///
/// Queued responses are consumed in order; the last one queued keeps
/// repeating, so a single `respond` call services any number of requests.
/// Unscripted requests fail with a transport error, and every call is
/// recorded so tests can assert exact network traffic.
#[derive(Default)]
pub struct MockTransport {
    broadcast_replies: Mutex<Vec<String>>,
    texts: Mutex<HashMap<(String, String), String>>,
    replies: Mutex<HashMap<(&'static str, String), VecDeque<Value>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one broadcast response to be returned by `send_broadcast`.
    pub fn broadcast_reply(&self, reply: &str) {
        self.broadcast_replies
            .lock()
            .unwrap()
            .push(reply.to_string());
    }

    /// Script the text body served for `get_text` on (host, path).
    pub fn text(&self, host: &str, path: &str, body: &str) {
        self.texts
            .lock()
            .unwrap()
            .insert((host.to_string(), path.to_string()), body.to_string());
    }

    /// Queue a JSON reply for the given method ("GET", "POST", "PUT",
    /// "DELETE") and path.
    pub fn respond(&self, method: &'static str, path: &str, reply: Value) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls issued with this method and path.
    pub fn count(&self, method: &'static str, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn record(&self, method: &'static str, path: &str, host: &str) {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            host: host.to_string(),
        });
    }

    fn next_reply(&self, method: &'static str, path: &str) -> Result<Value> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(&(method, path.to_string()))
            .ok_or_else(|| unscripted(method, path))?;
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap_or(Value::Null))
        } else {
            queue.front().cloned().ok_or_else(|| unscripted(method, path))
        }
    }
}

fn unscripted(method: &str, path: &str) -> Error {
    Error::transport(
        "mock",
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("unscripted {method} {path}"),
        ),
    )
}

impl Transport for MockTransport {
    fn send_broadcast(
        &self,
        _payload: &str,
        address: &str,
        _port: u16,
        _window: Duration,
    ) -> Result<Vec<String>> {
        self.record("BROADCAST", "", address);
        Ok(self.broadcast_replies.lock().unwrap().clone())
    }

    fn get_text(
        &self,
        path: &str,
        _accept: &str,
        _body: &str,
        host: &str,
        _port: u16,
    ) -> Result<String> {
        self.record("GETTEXT", path, host);
        self.texts
            .lock()
            .unwrap()
            .get(&(host.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| unscripted("GETTEXT", path))
    }

    fn get_json(&self, path: &str, _query: &Value, host: &str, _port: u16) -> Result<Value> {
        self.record("GET", path, host);
        self.next_reply("GET", path)
    }

    fn post_json(&self, path: &str, _body: &Value, host: &str, _port: u16) -> Result<Value> {
        self.record("POST", path, host);
        self.next_reply("POST", path)
    }

    fn put_json(&self, path: &str, _body: &Value, host: &str, _port: u16) -> Result<Value> {
        self.record("PUT", path, host);
        self.next_reply("PUT", path)
    }

    fn delete_json(&self, path: &str, _body: &Value, host: &str, _port: u16) -> Result<Value> {
        self.record("DELETE", path, host);
        self.next_reply("DELETE", path)
    }
}
