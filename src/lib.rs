//! # casambi_lights_rs
//!
//! Expose lights controlled by the Casambi cloud as light entities of a
//! home-automation host.
//!
//! The crate sits between two collaborators it does not implement:
//!
//! - a **vendor client** that speaks the Casambi cloud protocol, described by
//!   the [`Controller`] and [`Unit`] traits;
//! - a **host** that owns entity lifecycle and state writes, described by the
//!   [`Host`] and [`LightEntity`] traits.
//!
//! [`CasambiPlatform::setup`] validates the configuration, opens the cloud
//! session, and registers one [`CasambiLight`] per unit. Afterwards the
//! controller pushes unit changes into [`push::dispatch`], which routes them
//! through the [`UnitRegistry`] to the matching light.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use casambi_lights_rs::async_setup_platform;
//!
//! async fn setup(host: Arc<dyn casambi_lights_rs::Host>) -> bool {
//!     let config = json!({
//!         "email": "me@example.com",
//!         "api_key": "...",
//!         "user_password": "...",
//!         "network_password": "...",
//!     });
//!     // `MyController` implements `Controller` on top of a Casambi client.
//!     async_setup_platform(&config, host, MyController::new).await
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod config;
mod controller;
mod entity;
mod errors;
mod history;
mod light;
mod platform;
pub mod push;
mod registry;
pub mod runtime;
mod types;

#[cfg(test)]
mod testing;

// Re-export public API
pub use config::{
    CONF_API_KEY, CONF_EMAIL, CONF_NETWORK_PASSWORD, CONF_USER_PASSWORD, CONF_WIRE_ID,
    Credentials, DOMAIN, PlatformConfig, SCAN_INTERVAL, SETUP_TIMEOUT, WIRE_ID,
};
pub use controller::{Controller, ControllerOptions, Signal, SignalCallback, Unit};
pub use entity::{DeviceInfo, Host, LightEntity, SUPPORT_BRIGHTNESS, TurnOnParams};
pub use errors::Error;
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use light::{CasambiLight, LightState};
pub use platform::{CasambiPlatform, async_setup_platform};
pub use registry::UnitRegistry;
pub use types::{Brightness, PowerMode};
