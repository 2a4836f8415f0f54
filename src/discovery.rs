//! Bridge discovery via SSDP broadcast.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::bridge::Bridge;
use crate::credentials::CredentialStore;
use crate::descriptor;
use crate::errors::Error;
use crate::transport::Transport;

type Result<T> = std::result::Result<T, Error>;

/// The SSDP multicast group bridges answer on.
pub const SSDP_ADDRESS: &str = "239.255.255.250";
pub const SSDP_PORT: u16 = 1900;

/// Fixed multicast search probe. Bridges (among every other SSDP device on
/// the network) answer with their location; the descriptor fetch filters out
/// the rest.
const SSDP_PROBE: &str = "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nMAN: \
                          \"ssdp:discover\"\r\nMX: 5\r\nST: ssdp:all\r\n\r\n";

/// Response-collection window for a single probe.
const COLLECT_WINDOW: Duration = Duration::from_secs(5);

const DESCRIPTION_PATH: &str = "/description.xml";
const DESCRIPTION_ACCEPT: &str = "application/xml";

/// A bridge found on the local network.
///
/// Uniqueness is by `mac`; discovery collapses duplicate respondents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeIdentity {
    pub ip: String,
    pub port: u16,
    pub mac: String,
}

/// Finds bridges and turns them into authenticated [`Bridge`] sessions.
pub struct BridgeFinder {
    transport: Arc<dyn Transport>,
    credentials: CredentialStore,
}

impl BridgeFinder {
    /// Create a finder with its own private credential store.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_credentials(transport, CredentialStore::new())
    }

    /// Create a finder sharing an existing credential store, so usernames
    /// obtained here are visible to other finders and sessions.
    pub fn with_credentials(transport: Arc<dyn Transport>, credentials: CredentialStore) -> Self {
        BridgeFinder {
            transport,
            credentials,
        }
    }

    /// Probe the network once and resolve every respondent to a
    /// [`BridgeIdentity`].
    ///
    /// Candidates whose descriptor cannot be fetched or parsed are silently
    /// dropped; the call only fails when the broadcast itself does. The
    /// result is deduplicated by mac, first seen wins, and may be empty.
    pub fn find_bridges(&self) -> Result<Vec<BridgeIdentity>> {
        let replies =
            self.transport
                .send_broadcast(SSDP_PROBE, SSDP_ADDRESS, SSDP_PORT, COLLECT_WINDOW)?;

        let mut hosts: Vec<(String, u16)> = Vec::new();
        for reply in &replies {
            if let Some(host) = parse_location(reply)
                && !hosts.contains(&host)
            {
                hosts.push(host);
            }
        }

        let mut bridges: Vec<BridgeIdentity> = Vec::new();
        for (ip, port) in hosts {
            let Ok(text) =
                self.transport
                    .get_text(DESCRIPTION_PATH, DESCRIPTION_ACCEPT, "", &ip, port)
            else {
                debug!("dropping candidate {ip}:{port}: descriptor fetch failed");
                continue;
            };
            let Some(mac) = descriptor::parse_description(&text) else {
                debug!("dropping candidate {ip}:{port}: not a hue bridge descriptor");
                continue;
            };
            if bridges.iter().any(|b| b.mac == mac) {
                continue;
            }
            bridges.push(BridgeIdentity { ip, port, mac });
        }

        debug!("discovery resolved {} bridge(s)", bridges.len());
        Ok(bridges)
    }

    /// Build a session for a discovered bridge.
    ///
    /// Uses the stored username for the bridge's mac when one exists;
    /// otherwise performs the registration handshake once and records the
    /// issued credential. Fails with [`Error::UsernameUnavailable`] when the
    /// link button has not been pressed.
    pub fn get_bridge(&self, identity: &BridgeIdentity) -> Result<Bridge> {
        if let Some(username) = self.credentials.get(&identity.mac) {
            return Ok(Bridge::new(
                &identity.ip,
                identity.port,
                &username,
                Arc::clone(&self.transport),
            ));
        }

        let mut bridge = Bridge::new(&identity.ip, identity.port, "", Arc::clone(&self.transport));
        let username = bridge.request_username()?;
        if username.is_empty() {
            return Err(Error::UsernameUnavailable);
        }
        self.credentials.add(&identity.mac, &username);
        Ok(bridge)
    }

    /// Manually register a known username for a bridge.
    pub fn add_username(&self, mac: &str, username: &str) {
        self.credentials.add(mac, username);
    }

    /// Snapshot of every known mac to username mapping.
    pub fn all_usernames(&self) -> HashMap<String, String> {
        self.credentials.all()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}

/// Pull the candidate (ip, port) out of an SSDP reply's LOCATION header.
fn parse_location(reply: &str) -> Option<(String, u16)> {
    for line in reply.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("location") {
            continue;
        }
        let rest = value.trim().strip_prefix("http://")?;
        let host = rest.split('/').next()?;
        return match host.split_once(':') {
            Some((ip, port)) => Some((ip.to_string(), port.parse().ok()?)),
            None => Some((host.to_string(), 80)),
        };
    }
    None
}
