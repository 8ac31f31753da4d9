//! Test doubles for the vendor and host contracts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::controller::{Controller, ControllerOptions, Unit};
use crate::entity::{Host, LightEntity};
use crate::errors::Error;
use crate::runtime;
use crate::types::PowerMode;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct MockUnit {
    id: String,
    name: String,
    value: Mutex<f64>,
    commands: Mutex<Vec<PowerMode>>,
    failure: Mutex<Option<String>>,
}

impl MockUnit {
    pub fn new(id: &str, name: &str, value: f64) -> Self {
        MockUnit {
            id: id.to_string(),
            name: name.to_string(),
            value: Mutex::new(value),
            commands: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub fn set_value(&self, value: f64) {
        *self.value.lock().unwrap() = value;
    }

    pub fn commands(&self) -> Vec<PowerMode> {
        self.commands.lock().unwrap().clone()
    }

    pub fn fail_commands(&self, msg: &str) {
        *self.failure.lock().unwrap() = Some(msg.to_string());
    }

    fn command(&self, power: PowerMode) -> Result<()> {
        if let Some(msg) = self.failure.lock().unwrap().clone() {
            return Err(Error::request(msg));
        }
        self.commands.lock().unwrap().push(power);
        Ok(())
    }
}

impl Unit for MockUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> f64 {
        *self.value.lock().unwrap()
    }

    async fn turn_on(&self) -> Result<()> {
        self.command(PowerMode::On)
    }

    async fn turn_off(&self) -> Result<()> {
        self.command(PowerMode::Off)
    }
}

/// Setup step a [`MockController`] is scripted to misbehave in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    UserSession,
    NetworkSession,
    Websocket,
    Initialize,
}

pub struct MockController {
    pub options: ControllerOptions,
    units: Vec<Arc<MockUnit>>,
    failure: Mutex<Option<(Step, Error)>>,
    stall: Option<Step>,
    calls: Mutex<Vec<Step>>,
}

impl MockController {
    pub fn new(options: ControllerOptions, units: Vec<Arc<MockUnit>>) -> Self {
        MockController {
            options,
            units,
            failure: Mutex::new(None),
            stall: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `step` return `err`.
    pub fn failing(self, step: Step, err: Error) -> Self {
        *self.failure.lock().unwrap() = Some((step, err));
        self
    }

    /// Make `step` hang for a minute.
    pub fn stalling(mut self, step: Step) -> Self {
        self.stall = Some(step);
        self
    }

    pub fn calls(&self) -> Vec<Step> {
        self.calls.lock().unwrap().clone()
    }

    /// Deliver a push as the websocket would.
    pub fn push(&self, signal: &str, data: &Value) {
        (self.options.callback)(signal, data)
    }

    async fn step(&self, step: Step) -> Result<()> {
        self.calls.lock().unwrap().push(step);
        if self.stall == Some(step) {
            runtime::sleep(Duration::from_secs(60)).await;
        }
        let failure = self.failure.lock().unwrap().take_if(|(s, _)| *s == step);
        match failure {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }
}

impl Controller for MockController {
    type Unit = MockUnit;

    async fn create_user_session(&self) -> Result<()> {
        self.step(Step::UserSession).await
    }

    async fn create_network_session(&self) -> Result<()> {
        self.step(Step::NetworkSession).await
    }

    async fn start_websocket(&self) -> Result<()> {
        self.step(Step::Websocket).await
    }

    async fn initialize(&self) -> Result<()> {
        self.step(Step::Initialize).await
    }

    fn units(&self) -> Vec<Arc<MockUnit>> {
        self.units.clone()
    }
}

/// Host that records what the platform asks of it.
#[derive(Default)]
pub struct RecordingHost {
    entities: Mutex<Vec<Arc<dyn LightEntity>>>,
    scheduled: Mutex<Vec<(String, bool)>>,
    add_calls: AtomicUsize,
    update_before_add: AtomicBool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> Vec<Arc<dyn LightEntity>> {
        self.entities.lock().unwrap().clone()
    }

    pub fn scheduled(&self) -> Vec<(String, bool)> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn update_before_add(&self) -> bool {
        self.update_before_add.load(Ordering::SeqCst)
    }

    /// Run the refreshes requested so far, as the host's event loop would.
    pub async fn run_scheduled(&self) {
        let scheduled: Vec<_> = self.scheduled.lock().unwrap().drain(..).collect();
        let entities = self.entities();
        for (id, force_refresh) in scheduled {
            if !force_refresh {
                continue;
            }
            if let Some(entity) = entities.iter().find(|e| e.unique_id() == id) {
                entity.update().await.unwrap();
            }
        }
    }
}

impl Host for RecordingHost {
    fn add_entities(&self, entities: Vec<Arc<dyn LightEntity>>, update_before_add: bool) {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.update_before_add
            .store(update_before_add, Ordering::SeqCst);
        self.entities.lock().unwrap().extend(entities);
    }

    fn schedule_update(&self, unique_id: &str, force_refresh: bool) {
        self.scheduled
            .lock()
            .unwrap()
            .push((unique_id.to_string(), force_refresh));
    }
}
