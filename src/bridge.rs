//! The authenticated bridge session.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value, json};

use crate::credentials::CredentialStore;
use crate::discovery::BridgeIdentity;
use crate::errors::Error;
use crate::light::{Connection, Light};
use crate::models;
use crate::response::{self, ApiResult};
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// Error type the bridge reports while the link button has not been pressed.
const LINK_BUTTON_NOT_PRESSED: i32 = 101;

/// Application identifier sent during registration.
const DEVICE_TYPE: &str = "hue-lights-rs#user";

/// One connection to a Hue bridge, authenticated or pending authentication.
///
/// A `Bridge` owns a lazily-populated cache of [`Light`] entities keyed by
/// the bridge-assigned integer id. Light accessors return references into
/// that cache, never copies, and the cache is only ever refreshed on demand.
/// An empty username means every authenticated operation fails until
/// [`Bridge::request_username`] succeeds or a username is supplied.
///
/// A session is meant for single-owner access; callers needing concurrency
/// should use one session per thread.
#[derive(Clone)]
pub struct Bridge {
    ip: String,
    port: u16,
    username: String,
    transport: Arc<dyn Transport>,
    lights: HashMap<u32, Light>,
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("lights", &self.lights)
            .finish_non_exhaustive()
    }
}

impl Bridge {
    /// Create a session from explicit connection parameters. No network I/O
    /// happens until the first operation.
    pub fn new(ip: &str, port: u16, username: &str, transport: Arc<dyn Transport>) -> Self {
        Bridge {
            ip: ip.to_string(),
            port,
            username: username.to_string(),
            transport,
            lights: HashMap::new(),
        }
    }

    /// Create a session for a discovered bridge, looking its username up in
    /// the credential store. Defaults to unauthenticated when the store has
    /// no entry for the bridge's mac.
    pub fn from_identity(
        identity: &BridgeIdentity,
        credentials: &CredentialStore,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let username = credentials.get(&identity.mac).unwrap_or_default();
        Bridge::new(&identity.ip, identity.port, &username, transport)
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Change the target address for subsequent calls. Cached lights keep
    /// the connection they were constructed with.
    pub fn set_ip(&mut self, ip: &str) {
        self.ip = ip.to_string();
    }

    /// Change the target port for subsequent calls.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Perform the registration handshake against the bridge's user-creation
    /// endpoint.
    ///
    /// Three outcomes:
    /// - success: the issued username is stored on this session and returned;
    /// - error 101 (link button not pressed): returns `""` with the session
    ///   left unauthenticated, the caller retries after the button press;
    /// - any other error code: [`Error::Api`] carrying the code.
    ///
    /// Callers that want the credential to outlive this session should
    /// persist it in a [`CredentialStore`].
    pub fn request_username(&mut self) -> Result<String> {
        let body = json!({ "devicetype": DEVICE_TYPE });
        let reply = self.transport.post_json("/api", &body, &self.ip, self.port)?;
        match response::decode_reply(&reply, "registration")?.into_iter().next() {
            Some(ApiResult::Success(payload)) => {
                let username = payload
                    .get("username")
                    .and_then(|u| u.as_str())
                    .ok_or_else(|| {
                        Error::malformed("registration", "success entry without username")
                    })?;
                debug!("bridge {} issued a username", self.ip);
                self.username = username.to_string();
                Ok(self.username.clone())
            }
            Some(ApiResult::Error(err)) if err.code == LINK_BUTTON_NOT_PRESSED => {
                debug!("bridge {} link button not pressed yet", self.ip);
                Ok(String::new())
            }
            Some(ApiResult::Error(err)) => Err(err.into()),
            None => Err(Error::malformed("registration", "empty reply array")),
        }
    }

    /// Fetch the full authenticated light list and return references to
    /// every light, constructing entities for ids not yet cached.
    ///
    /// Entity identity is stable across calls: ids already cached keep their
    /// entity untouched. Ids that disappeared from the bridge are evicted.
    /// The returned references are only valid until the next structural
    /// cache mutation.
    pub fn get_all_lights(&mut self) -> Result<Vec<&mut Light>> {
        let records = self.fetch_light_records()?;
        let mut ids: Vec<u32> = records.keys().filter_map(|k| k.parse().ok()).collect();
        ids.sort_unstable();

        for &id in &ids {
            if !self.lights.contains_key(&id) {
                let light = Light::fetch(self.connection(), id)?;
                self.lights.insert(id, light);
            }
        }
        self.lights.retain(|id, _| ids.binary_search(id).is_ok());

        let mut lights: Vec<&mut Light> = self.lights.values_mut().collect();
        lights.sort_unstable_by_key(|light| light.id());
        Ok(lights)
    }

    /// Get one light by id.
    ///
    /// A cached id is returned directly without any network call. Otherwise
    /// the light list is re-fetched; an absent id is [`Error::LightNotFound`],
    /// a present one is fetched, classified and cached.
    pub fn get_light(&mut self, id: u32) -> Result<&mut Light> {
        if !self.lights.contains_key(&id) {
            let records = self.fetch_light_records()?;
            self.lights
                .retain(|cached, _| records.contains_key(&cached.to_string()));
            if !records.contains_key(&id.to_string()) {
                return Err(Error::LightNotFound(id));
            }
            debug!("cache miss for light {id}, fetching");
            let light = Light::fetch(self.connection(), id)?;
            self.lights.insert(id, light);
        }
        self.lights.get_mut(&id).ok_or(Error::LightNotFound(id))
    }

    /// Whether the bridge has a light with this id.
    ///
    /// A cached id answers true without network I/O; an uncached one is
    /// checked against a fresh light-list fetch. The check never populates
    /// the cache, so it is callable on a shared reference.
    pub fn light_exists(&self, id: u32) -> Result<bool> {
        if self.lights.contains_key(&id) {
            return Ok(true);
        }
        let records = self.fetch_light_records()?;
        Ok(records.contains_key(&id.to_string()))
    }

    /// Delete a light from the bridge.
    ///
    /// Returns whether the bridge acknowledged the deletion; an empty or
    /// otherwise unacknowledged reply is `false`, never an error, so removing
    /// an already-absent light is safe. Transport failures still propagate.
    pub fn remove_light(&mut self, id: u32) -> Result<bool> {
        let path = format!("{}/lights/{id}", self.api_path()?);
        let reply = self
            .transport
            .delete_json(&path, &json!({}), &self.ip, self.port)?;
        let removed = response::acknowledged(&reply);
        if removed {
            self.lights.remove(&id);
            debug!("removed light {id}");
        }
        Ok(removed)
    }

    /// Icon asset name for a cached light's model, `""` when the id is not
    /// cached or the model is unknown. Never touches the network.
    pub fn get_picture_of_light(&self, id: u32) -> String {
        self.lights
            .get(&id)
            .map(|light| models::picture_of_model(light.model_id()).to_string())
            .unwrap_or_default()
    }

    fn api_path(&self) -> Result<String> {
        if self.username.is_empty() {
            return Err(Error::UsernameUnavailable);
        }
        Ok(format!("/api/{}", self.username))
    }

    /// GET the full bridge state and pull out its `"lights"` object.
    fn fetch_light_records(&self) -> Result<Map<String, Value>> {
        let state = self
            .transport
            .get_json(&self.api_path()?, &json!({}), &self.ip, self.port)?;
        state
            .get("lights")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| Error::malformed("bridge state", "missing lights object"))
    }

    fn connection(&self) -> Connection {
        Connection {
            transport: Arc::clone(&self.transport),
            ip: self.ip.clone(),
            port: self.port,
            username: self.username.clone(),
        }
    }
}
