//! Light entity wrapping one Casambi unit.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use serde_json::{Value, json};

use crate::controller::Unit;
use crate::entity::{DeviceInfo, Host, LightEntity, SUPPORT_BRIGHTNESS, TurnOnParams};
use crate::errors::Error;
use crate::history::{MessageHistory, MessageType};
use crate::runtime::BoxFuture;
use crate::types::{Brightness, PowerMode};

type Result<T> = std::result::Result<T, Error>;

/// Display state cached between refreshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightState {
    brightness: Option<Brightness>,
    on: Option<bool>,
}

impl LightState {
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    /// `None` until the first refresh.
    pub fn on(&self) -> Option<bool> {
        self.on
    }

    /// Derive display state from a unit level.
    ///
    /// Going dark keeps the last brightness figure.
    fn apply_level(&mut self, level: f64) {
        if level > 0.0 {
            self.on = Some(true);
            self.brightness = Some(Brightness::from_level(level));
        } else {
            self.on = Some(false);
        }
    }
}

/// A Casambi unit exposed to the host as a dimmable light.
///
/// The light never polls. The controller pushes changes, the registry routes
/// them to [`CasambiLight::process_update`], and the host then calls
/// [`LightEntity::update`] to re-read the unit.
pub struct CasambiLight<U> {
    unit: Arc<U>,
    host: Arc<dyn Host>,
    available: bool,
    state: Mutex<LightState>,
    history: Mutex<MessageHistory>,
}

impl<U: Unit> CasambiLight<U> {
    pub fn new(unit: Arc<U>, host: Arc<dyn Host>) -> Self {
        CasambiLight {
            unit,
            host,
            available: true,
            state: Mutex::new(LightState::default()),
            history: Mutex::new(MessageHistory::new()),
        }
    }

    pub fn unit(&self) -> &Arc<U> {
        &self.unit
    }

    pub fn state(&self) -> LightState {
        self.lock_state().clone()
    }

    pub fn history(&self) -> MessageHistory {
        self.lock_history().clone()
    }

    /// Handle a push for this unit.
    ///
    /// The payload is only recorded; fresh state is read from the unit when
    /// the host runs the scheduled update.
    pub fn process_update(&self, data: &Value) {
        debug!("process_update {} data: {}", self, data);
        self.lock_history()
            .record(MessageType::Push, "process_update", data.clone());
        self.host.schedule_update(self.unit.unique_id(), true);
    }

    /// Re-derive on/off and brightness from the unit's current level.
    pub fn refresh(&self) {
        let level = self.unit.value();
        let state = {
            let mut state = self.lock_state();
            state.apply_level(level);
            state.clone()
        };
        self.lock_history().record(
            MessageType::Refresh,
            "update",
            json!({
                "value": level,
                "on": state.on,
                "brightness_pct": state.brightness.map(|b| b.value()),
            }),
        );
        debug!("update {}", self);
    }

    /// Returns diagnostics including cached state and history.
    pub fn diagnostics(&self) -> Value {
        let state = self.state();
        let history = self.lock_history().summary();
        json!({
            "name": self.unit.name(),
            "unique_id": self.unit.unique_id(),
            "available": self.available,
            "unit_value": self.unit.value(),
            "state": {
                "on": state.on,
                "brightness_pct": state.brightness.map(|b| b.value()),
            },
            "history": serde_json::to_value(history).unwrap_or(Value::Null),
        })
    }

    async fn send_power(&self, power: PowerMode) -> Result<()> {
        self.lock_history().record(
            MessageType::Command,
            power.as_ref(),
            json!({"state": power.to_string()}),
        );

        let result = match power {
            PowerMode::On => self.unit.turn_on().await,
            PowerMode::Off => self.unit.turn_off().await,
        };
        if let Err(e) = &result {
            self.lock_history().record_error(&e.to_string());
        }
        result
    }

    fn lock_state(&self) -> MutexGuard<'_, LightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, MessageHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<U: Unit> LightEntity for CasambiLight<U> {
    fn name(&self) -> &str {
        self.unit.name()
    }

    fn available(&self) -> bool {
        self.available
    }

    fn unique_id(&self) -> &str {
        self.unit.unique_id()
    }

    fn supported_features(&self) -> u32 {
        SUPPORT_BRIGHTNESS
    }

    fn is_on(&self) -> bool {
        self.lock_state().on.unwrap_or(false)
    }

    fn brightness_pct(&self) -> Option<u8> {
        self.lock_state().brightness.map(|b| b.value())
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::casambi()
    }

    fn should_poll(&self) -> bool {
        false
    }

    /// Switch the unit on. A requested brightness is not forwarded; the unit
    /// resumes its own level.
    fn turn_on(&self, params: TurnOnParams) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            debug!("turn_on {} params: {:?}", self, params);
            self.send_power(PowerMode::On).await
        })
    }

    fn turn_off(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            debug!("turn_off {}", self);
            self.send_power(PowerMode::Off).await
        })
    }

    fn update(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.refresh();
            Ok(())
        })
    }
}

impl<U: Unit> fmt::Display for CasambiLight<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Casambi light {}: unit={:?}>", self.unit.name(), self.unit)
    }
}

impl<U: Unit> fmt::Debug for CasambiLight<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CasambiLight")
            .field("unit", &self.unit)
            .field("available", &self.available)
            .field("state", &*self.lock_state())
            .finish_non_exhaustive()
    }
}
