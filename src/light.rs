//! Individual light entities.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::errors::Error;
use crate::models::ColorType;
use crate::response::{self, ApiResult};
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// Connection parameters a light captures at construction.
///
/// Changing the parent session's target afterwards does not retarget
/// already-cached lights.
#[derive(Clone)]
pub(crate) struct Connection {
    pub transport: Arc<dyn Transport>,
    pub ip: String,
    pub port: u16,
    pub username: String,
}

impl Connection {
    fn light_path(&self, id: u32) -> String {
        format!("/api/{}/lights/{}", self.username, id)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// The `"state"` block of a light record as reported by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct LightState {
    pub on: bool,
    #[serde(default)]
    pub bri: Option<u8>,
    #[serde(default)]
    pub hue: Option<u16>,
    #[serde(default)]
    pub sat: Option<u8>,
    #[serde(default)]
    pub xy: Option<[f64; 2]>,
    #[serde(default)]
    pub ct: Option<u16>,
    #[serde(default)]
    pub alert: Option<String>,
    #[serde(default)]
    pub colormode: Option<String>,
    #[serde(default)]
    pub reachable: bool,
}

/// Raw light record from `/api/<username>/lights/<id>`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LightRecord {
    pub state: LightState,
    pub name: String,
    #[serde(rename = "modelid")]
    pub model_id: String,
    #[serde(rename = "uniqueid", default)]
    pub unique_id: Option<String>,
    #[serde(rename = "swversion", default)]
    pub software_version: Option<String>,
}

/// Represents a single light registered on a Hue bridge.
///
/// Lights live in the owning [`Bridge`](crate::Bridge)'s cache; sessions hand
/// out references into that cache rather than copies. The capability class
/// is derived from the model id once, at construction.
#[derive(Debug, Clone)]
pub struct Light {
    id: u32,
    name: String,
    model_id: String,
    unique_id: Option<String>,
    software_version: Option<String>,
    color_type: ColorType,
    state: LightState,
    conn: Connection,
}

impl Light {
    /// Fetch a light's sub-resource and build the typed entity.
    pub(crate) fn fetch(conn: Connection, id: u32) -> Result<Self> {
        let raw = conn
            .transport
            .get_json(&conn.light_path(id), &json!({}), &conn.ip, conn.port)?;
        let record: LightRecord = serde_json::from_value(raw)
            .map_err(|e| Error::malformed("light record", &e.to_string()))?;
        let color_type = ColorType::classify(&record.model_id);
        debug!(
            "light {id} ({}) model {} classified as {color_type:?}",
            record.name, record.model_id
        );
        Ok(Light {
            id,
            name: record.name,
            model_id: record.model_id,
            unique_id: record.unique_id,
            software_version: record.software_version,
            color_type,
            state: record.state,
            conn,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn software_version(&self) -> Option<&str> {
        self.software_version.as_deref()
    }

    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    /// Last known state. May be stale; call [`Light::refresh`] to re-query.
    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn is_on(&self) -> bool {
        self.state.on
    }

    pub fn reachable(&self) -> bool {
        self.state.reachable
    }

    /// Re-fetch this light's own sub-resource and update the local state.
    ///
    /// The capability class is never recomputed.
    pub fn refresh(&mut self) -> Result<()> {
        let raw = self.conn.transport.get_json(
            &self.conn.light_path(self.id),
            &json!({}),
            &self.conn.ip,
            self.conn.port,
        )?;
        let record: LightRecord = serde_json::from_value(raw)
            .map_err(|e| Error::malformed("light record", &e.to_string()))?;
        self.name = record.name;
        self.state = record.state;
        Ok(())
    }

    pub fn on(&mut self) -> Result<()> {
        self.put_state(json!({"on": true}))?;
        self.state.on = true;
        Ok(())
    }

    pub fn off(&mut self) -> Result<()> {
        self.put_state(json!({"on": false}))?;
        self.state.on = false;
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.state.on { self.off() } else { self.on() }
    }

    /// Set brightness in the bridge's native 0-254 range.
    ///
    /// Zero turns the light off, matching bridge behavior for `bri` at the
    /// bottom of the range.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<()> {
        if brightness == 0 {
            return self.off();
        }
        let brightness = brightness.min(254);
        self.put_state(json!({"on": true, "bri": brightness}))?;
        self.state.on = true;
        self.state.bri = Some(brightness);
        Ok(())
    }

    /// PUT a state change and translate any error entry in the reply.
    fn put_state(&self, body: Value) -> Result<()> {
        let path = format!("{}/state", self.conn.light_path(self.id));
        let reply = self
            .conn
            .transport
            .put_json(&path, &body, &self.conn.ip, self.conn.port)?;
        for entry in response::decode_reply(&reply, "light state")? {
            if let ApiResult::Error(err) = entry {
                return Err(err.into());
            }
        }
        Ok(())
    }
}
