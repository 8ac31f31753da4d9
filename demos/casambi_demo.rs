//! Drive the Casambi platform against a simulated network.
//!
//! This example demonstrates:
//! - Platform setup with credential validation and error mapping
//! - Push notifications flowing from the controller to light entities
//! - On/off commands forwarded to units
//!
//! Run with: cargo run --example casambi_demo -- --help

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use casambi_lights_rs::{
    CasambiPlatform, Controller, ControllerOptions, Error, Host, LightEntity, SignalCallback,
    TurnOnParams, Unit, runtime,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};

#[derive(Parser)]
#[command(name = "casambi-demo")]
#[command(about = "Exercise Casambi lights against a simulated network", long_about = None)]
struct Cli {
    #[arg(long, default_value = "demo@example.com")]
    email: String,

    #[arg(long, default_value = "demo-key")]
    api_key: String,

    #[arg(long, default_value = "user-secret")]
    user_password: String,

    #[arg(long, default_value = "network-secret")]
    network_password: String,

    /// Make session setup fail the given way
    #[arg(long, value_enum)]
    fail: Option<Failure>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Failure {
    Login,
    Unauthorized,
    Request,
    Timeout,
}

#[derive(Subcommand)]
enum Commands {
    /// List the lights found on the network
    List,

    /// Push a new level for a unit, as the cloud would
    Push {
        /// Unit id
        unit: String,
        /// Level between 0.0 and 1.0
        level: f64,
    },

    /// Turn a light on
    On {
        unit: String,
        /// Requested brightness (accepted but not sent to the unit)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        brightness: Option<u8>,
    },

    /// Turn a light off
    Off { unit: String },

    /// Get detailed diagnostics for a light
    Diagnostics { unit: String },
}

#[derive(Debug)]
struct SimUnit {
    id: String,
    name: String,
    level: AtomicU64,
    last_on: AtomicU64,
}

impl SimUnit {
    fn new(id: &str, name: &str, level: f64) -> Self {
        SimUnit {
            id: id.to_string(),
            name: name.to_string(),
            level: AtomicU64::new(level.to_bits()),
            last_on: AtomicU64::new(1.0f64.to_bits()),
        }
    }

    fn set_level(&self, level: f64) {
        if level > 0.0 {
            self.last_on.store(level.to_bits(), Ordering::SeqCst);
        }
        self.level.store(level.to_bits(), Ordering::SeqCst);
    }
}

impl Unit for SimUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> f64 {
        f64::from_bits(self.level.load(Ordering::SeqCst))
    }

    async fn turn_on(&self) -> Result<(), Error> {
        self.set_level(f64::from_bits(self.last_on.load(Ordering::SeqCst)));
        Ok(())
    }

    async fn turn_off(&self) -> Result<(), Error> {
        self.set_level(0.0);
        Ok(())
    }
}

struct SimController {
    callback: SignalCallback,
    units: Vec<Arc<SimUnit>>,
    fail: Option<Failure>,
}

impl SimController {
    fn new(options: ControllerOptions, fail: Option<Failure>) -> Self {
        println!("Connecting as {:?} on wire {}", options.credentials, options.wire_id);
        SimController {
            callback: options.callback,
            units: vec![
                Arc::new(SimUnit::new("1", "Hall", 0.0)),
                Arc::new(SimUnit::new("2", "Desk", 0.6)),
                Arc::new(SimUnit::new("3", "Porch", 1.0)),
            ],
            fail,
        }
    }

    /// Emit the data signal for a unit with its current level.
    fn notify(&self, unit: &SimUnit) {
        let mut data = Map::new();
        data.insert(unit.id.clone(), json!({ "value": unit.value() }));
        (self.callback)("data", &Value::Object(data));
    }
}

impl Controller for SimController {
    type Unit = SimUnit;

    async fn create_user_session(&self) -> Result<(), Error> {
        match self.fail {
            Some(Failure::Login) => Err(Error::LoginRequired("invalid user password".into())),
            Some(Failure::Timeout) => {
                runtime::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn create_network_session(&self) -> Result<(), Error> {
        match self.fail {
            Some(Failure::Unauthorized) => Err(Error::Unauthorized("network not shared".into())),
            _ => Ok(()),
        }
    }

    async fn start_websocket(&self) -> Result<(), Error> {
        match self.fail {
            Some(Failure::Request) => Err(Error::request("websocket handshake refused")),
            _ => Ok(()),
        }
    }

    async fn initialize(&self) -> Result<(), Error> {
        Ok(())
    }

    fn units(&self) -> Vec<Arc<SimUnit>> {
        self.units.clone()
    }
}

/// Host that runs scheduled refreshes as background tasks.
#[derive(Default)]
struct ConsoleHost {
    entities: Mutex<HashMap<String, Arc<dyn LightEntity>>>,
    pending: Mutex<Vec<runtime::JoinHandle<()>>>,
}

impl ConsoleHost {
    fn refresh(&self, entity: Arc<dyn LightEntity>) {
        let handle = runtime::spawn(async move {
            if let Err(e) = entity.update().await {
                eprintln!("Update of {} failed: {}", entity.unique_id(), e);
            }
        });
        self.pending.lock().unwrap().push(handle);
    }

    /// Wait for every scheduled refresh to finish.
    async fn settle(&self) {
        let pending: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        futures::future::join_all(pending).await;
    }

    fn entity(&self, id: &str) -> Option<Arc<dyn LightEntity>> {
        self.entities.lock().unwrap().get(id).cloned()
    }
}

impl Host for ConsoleHost {
    fn add_entities(&self, entities: Vec<Arc<dyn LightEntity>>, update_before_add: bool) {
        for entity in entities {
            if update_before_add {
                self.refresh(entity.clone());
            }
            self.entities
                .lock()
                .unwrap()
                .insert(entity.unique_id().to_string(), entity);
        }
    }

    fn schedule_update(&self, unique_id: &str, force_refresh: bool) {
        if !force_refresh {
            return;
        }
        if let Some(entity) = self.entity(unique_id) {
            self.refresh(entity);
        }
    }
}

fn print_light(entity: &dyn LightEntity) {
    let brightness = entity
        .brightness_pct()
        .map(|b| format!("{b}%"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  [{}] {:8} {:3}  brightness: {}",
        entity.unique_id(),
        entity.name(),
        if entity.is_on() { "ON" } else { "OFF" },
        brightness
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = json!({
        "email": cli.email,
        "api_key": cli.api_key,
        "user_password": cli.user_password,
        "network_password": cli.network_password,
    });

    let host = Arc::new(ConsoleHost::default());
    let fail = cli.fail;
    let platform =
        match CasambiPlatform::setup(&config, host.clone(), |options| SimController::new(options, fail))
            .await
        {
            Ok(platform) => platform,
            Err(e) => {
                eprintln!("Setup failed: {}", e);
                return Ok(());
            }
        };
    host.settle().await;

    let find = |id: &str| {
        platform
            .registry()
            .get(id)
            .ok_or_else(|| format!("No light with unit id {id}"))
    };

    match cli.command {
        Commands::List => {
            println!("Found {} light(s):", platform.registry().len());
            for id in platform.registry().ids() {
                if let Some(entity) = host.entity(&id) {
                    print_light(entity.as_ref());
                }
            }
        }

        Commands::Push { unit, level } => {
            let light = find(&unit)?;
            println!("Pushing level {} for {}...", level, light);
            light.unit().set_level(level);
            platform.controller().notify(light.unit());
            host.settle().await;
            print_light(light.as_ref());
        }

        Commands::On { unit, brightness } => {
            let light = find(&unit)?;
            let params = brightness.map(TurnOnParams::with_brightness).unwrap_or_default();
            match light.turn_on(params).await {
                Ok(()) => {
                    platform.controller().notify(light.unit());
                    host.settle().await;
                    print_light(light.as_ref());
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        Commands::Off { unit } => {
            let light = find(&unit)?;
            match light.turn_off().await {
                Ok(()) => {
                    platform.controller().notify(light.unit());
                    host.settle().await;
                    print_light(light.as_ref());
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        Commands::Diagnostics { unit } => {
            let light = find(&unit)?;
            println!("\nDiagnostics:\n{}", serde_json::to_string_pretty(&light.diagnostics())?);
        }
    }

    Ok(())
}
