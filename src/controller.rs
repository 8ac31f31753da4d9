//! Contract of the vendor client library.
//!
//! The Casambi wire protocol, session renewal and websocket framing live in the
//! vendor client. This crate only drives it through [`Controller`] and reads
//! lights through [`Unit`], so a real client and a test double are
//! interchangeable.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::config::Credentials;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Push callback handed to the controller.
///
/// Receives the raw signal name and its payload.
pub type SignalCallback = Box<dyn Fn(&str, &Value) + Send + Sync + 'static>;

/// Signals emitted by the controller's push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum Signal {
    /// Unit values changed; payload maps unit id to update.
    #[strum(serialize = "data")]
    Data,
    /// The push channel changed connection state.
    #[strum(serialize = "state")]
    ConnectionState,
}

/// One controllable light as seen by the vendor client.
pub trait Unit: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn unique_id(&self) -> &str;

    /// Current output level, 0.0 (off) to 1.0 (full).
    fn value(&self) -> f64;

    fn turn_on(&self) -> impl Future<Output = Result<()>> + Send;

    fn turn_off(&self) -> impl Future<Output = Result<()>> + Send;
}

/// An authenticated session with the Casambi cloud and its push channel.
///
/// Session calls report failures with [`Error::LoginRequired`],
/// [`Error::Unauthorized`], [`Error::Request`] or the catch-all
/// [`Error::Casambi`].
pub trait Controller: Send + Sync {
    type Unit: Unit + 'static;

    fn create_user_session(&self) -> impl Future<Output = Result<()>> + Send;

    fn create_network_session(&self) -> impl Future<Output = Result<()>> + Send;

    /// Open the push channel. Pushes go to the callback from [`ControllerOptions`].
    fn start_websocket(&self) -> impl Future<Output = Result<()>> + Send;

    /// Fetch the network state, including the unit list.
    fn initialize(&self) -> impl Future<Output = Result<()>> + Send;

    fn units(&self) -> Vec<Arc<Self::Unit>>;
}

/// Everything needed to construct a controller.
pub struct ControllerOptions {
    pub credentials: Credentials,
    pub wire_id: u8,
    pub callback: SignalCallback,
}

impl fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("credentials", &self.credentials)
            .field("wire_id", &self.wire_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_signal_names() {
        assert_eq!(Signal::from_str("data").unwrap(), Signal::Data);
        assert_eq!(Signal::from_str("state").unwrap(), Signal::ConnectionState);
        assert!(Signal::from_str("unit_pull").is_err());
        assert_eq!(Signal::Data.to_string(), "data");
        assert_eq!(Signal::ConnectionState.as_ref(), "state");
    }
}
