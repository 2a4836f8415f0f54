//! # hue_lights_rs
//!
//! A Rust library for controlling Philips Hue bridges over the local network.
//!
//! This crate covers the discovery-and-session layer of the Hue protocol:
//! finding bridges via SSDP broadcast, obtaining and sharing per-bridge
//! credentials, and talking to a bridge through a typed, cached view of its
//! lights. Raw networking is delegated to a [`Transport`] implementation
//! supplied by the embedding application.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use hue_lights_rs::{BridgeFinder, Transport};
//!
//! fn control_lights(transport: Arc<dyn Transport>) -> Result<(), hue_lights_rs::Error> {
//!     let finder = BridgeFinder::new(transport);
//!
//!     // One broadcast probe; duplicates collapse by bridge mac.
//!     let bridges = finder.find_bridges()?;
//!
//!     // Registers against the bridge on first use (press the link button),
//!     // reuses the stored username afterwards.
//!     let mut bridge = finder.get_bridge(&bridges[0])?;
//!
//!     for light in bridge.get_all_lights()? {
//!         println!("{}: {:?}", light.name(), light.color_type());
//!         light.toggle()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: find bridges with [`BridgeFinder::find_bridges`]; one
//!   probe, one bounded collection window, one identity per bridge
//! - **Registration**: link-button handshake via
//!   [`Bridge::request_username`], with error 101 treated as "retry after
//!   the button press" rather than a failure
//! - **Credential sharing**: a process-wide [`CredentialStore`] maps bridge
//!   macs to issued usernames across sessions
//! - **Typed lights**: [`Light`] entities carry their capability class
//!   ([`ColorType`]) derived from the model id, plus narrow on/off and
//!   brightness commands
//! - **Typed failures**: the bridge's JSON error protocol decodes into
//!   [`Error`] variants instead of ad-hoc field probing
//!
//! ## Communication
//!
//! All calls are synchronous and blocking; a [`Bridge`] session is intended
//! for single-owner access. Network I/O goes through the [`Transport`] trait,
//! so the crate works with whatever socket/HTTP stack the application
//! already uses (and with a scripted transport in tests).

mod bridge;
mod credentials;
mod descriptor;
mod discovery;
mod errors;
mod light;
mod models;
mod response;
#[cfg(test)]
mod testutil;
mod transport;

// Re-export public API
pub use bridge::Bridge;
pub use credentials::CredentialStore;
pub use descriptor::parse_description;
pub use discovery::{BridgeFinder, BridgeIdentity, SSDP_ADDRESS, SSDP_PORT};
pub use errors::Error;
pub use light::{Light, LightState};
pub use models::{ColorType, picture_of_model};
pub use response::{ApiError, ApiResult};
pub use transport::Transport;
