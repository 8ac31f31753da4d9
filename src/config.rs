//! Platform configuration and credential validation.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Integration domain, used as the namespace of device identifiers.
pub const DOMAIN: &str = "casambi";

/// Wire id the controller talks on unless the configuration overrides it.
pub const WIRE_ID: u8 = 1;

/// Budget shared by user-session, network-session and websocket start.
pub const SETUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Polling interval the host would use; lights are push-only so it stays idle.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(60);

pub const CONF_EMAIL: &str = "email";
pub const CONF_API_KEY: &str = "api_key";
pub const CONF_USER_PASSWORD: &str = "user_password";
pub const CONF_NETWORK_PASSWORD: &str = "network_password";
pub const CONF_WIRE_ID: &str = "wire_id";

const REQUIRED_KEYS: [&str; 4] = [
    CONF_USER_PASSWORD,
    CONF_NETWORK_PASSWORD,
    CONF_EMAIL,
    CONF_API_KEY,
];

/// Credentials for the Casambi cloud.
///
/// Read once during setup and handed to the controller; never mutated.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub user_password: String,
    pub network_password: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("user_password", &"<redacted>")
            .field("network_password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Validated platform configuration.
///
/// Unknown keys are tolerated and dropped.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default = "default_wire_id")]
    pub wire_id: u8,
}

fn default_wire_id() -> u8 {
    WIRE_ID
}

impl PlatformConfig {
    /// Validate a raw configuration mapping.
    ///
    /// Every required key must be present and hold a string. Checks run in a
    /// fixed order so the first offending key is reported.
    pub fn from_value(config: &Value) -> Result<Self> {
        let Some(map) = config.as_object() else {
            return Err(Error::invalid_config("<root>", "a mapping"));
        };

        for key in REQUIRED_KEYS {
            match map.get(key) {
                None | Some(Value::Null) => return Err(Error::MissingConfig(key.to_string())),
                Some(Value::String(_)) => {}
                Some(_) => return Err(Error::invalid_config(key, "a string")),
            }
        }

        if let Some(wire_id) = map.get(CONF_WIRE_ID) {
            let in_range = match wire_id {
                Value::Number(n) => n.as_u64().is_some_and(|n| n <= u64::from(u8::MAX)),
                Value::String(s) => s.parse::<u8>().is_ok(),
                _ => false,
            };
            if !in_range {
                return Err(Error::invalid_config(CONF_WIRE_ID, "an integer 0..=255"));
            }
        }

        serde_json::from_value(config.clone()).map_err(Error::JsonLoad)
    }
}
