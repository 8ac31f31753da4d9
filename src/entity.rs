//! Contract with the home-automation host.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DOMAIN;
use crate::errors::Error;
use crate::runtime::BoxFuture;

type Result<T> = std::result::Result<T, Error>;

/// Feature flag: the light reports and accepts a brightness.
pub const SUPPORT_BRIGHTNESS: u32 = 1;

/// Services the host offers to a platform.
pub trait Host: Send + Sync {
    /// Register entities. With `update_before_add` the host refreshes each
    /// entity before its first state write.
    fn add_entities(&self, entities: Vec<Arc<dyn LightEntity>>, update_before_add: bool);

    /// Ask the host to re-read an entity's state. With `force_refresh` the
    /// host calls [`LightEntity::update`] first.
    fn schedule_update(&self, unique_id: &str, force_refresh: bool);
}

/// A light entity as the host sees it.
pub trait LightEntity: Send + Sync {
    fn name(&self) -> &str;

    fn available(&self) -> bool;

    fn unique_id(&self) -> &str;

    fn supported_features(&self) -> u32;

    fn is_on(&self) -> bool;

    /// Brightness between 0 and 100, unset until first seen on.
    fn brightness_pct(&self) -> Option<u8>;

    fn device_info(&self) -> DeviceInfo;

    /// Whether the host should poll [`LightEntity::update`] on its scan interval.
    fn should_poll(&self) -> bool {
        true
    }

    fn turn_on(&self, params: TurnOnParams) -> BoxFuture<'_, Result<()>>;

    fn turn_off(&self) -> BoxFuture<'_, Result<()>>;

    /// Refresh cached state from the device.
    fn update(&self) -> BoxFuture<'_, Result<()>>;
}

/// Arguments the host passes along with a turn-on request.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnOnParams {
    pub brightness_pct: Option<u8>,
    pub transition: Option<f64>,
    /// Anything else the host sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TurnOnParams {
    pub fn with_brightness(brightness_pct: u8) -> Self {
        TurnOnParams {
            brightness_pct: Some(brightness_pct),
            ..Default::default()
        }
    }
}

/// Device registry metadata for an entity.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    /// Fixed metadata shared by every Casambi light.
    ///
    /// Serial and firmware are not read from the unit yet.
    pub fn casambi() -> Self {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), "fff".to_string())],
            name: "Casambi".to_string(),
            manufacturer: "Casambi".to_string(),
            model: "Casambi".to_string(),
            sw_version: Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_turn_on_params_from_host_kwargs() {
        let params: TurnOnParams =
            serde_json::from_value(json!({"brightness_pct": 40, "flash": "short"})).unwrap();
        assert_eq!(params.brightness_pct, Some(40));
        assert_eq!(params.extra.get("flash"), Some(&json!("short")));
        assert_eq!(params.transition, None);
    }

    #[test]
    fn test_turn_on_params_skips_unset() {
        let value = serde_json::to_value(TurnOnParams::with_brightness(70)).unwrap();
        assert_eq!(value, json!({"brightness_pct": 70}));
    }

    #[test]
    fn test_device_info_placeholder() {
        let info = DeviceInfo::casambi();
        assert_eq!(info.identifiers, vec![("casambi".to_string(), "fff".to_string())]);
        assert_eq!(info.manufacturer, "Casambi");
        assert_eq!(info.model, "Casambi");
        assert_eq!(info.sw_version.as_deref(), Some(""));
    }
}
