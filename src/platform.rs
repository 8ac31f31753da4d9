//! Platform setup: session bootstrap and entity registration.

use std::sync::Arc;

use log::{debug, error, warn};
use serde_json::Value;

use crate::config::{PlatformConfig, SETUP_TIMEOUT};
use crate::controller::{Controller, ControllerOptions, Unit};
use crate::entity::{Host, LightEntity};
use crate::errors::Error;
use crate::light::CasambiLight;
use crate::push::signal_callback;
use crate::registry::UnitRegistry;
use crate::runtime;

type Result<T> = std::result::Result<T, Error>;

/// A set-up Casambi platform: the live controller and every registered light.
pub struct CasambiPlatform<C: Controller> {
    controller: Arc<C>,
    registry: Arc<UnitRegistry<C::Unit>>,
}

impl<C: Controller> std::fmt::Debug for CasambiPlatform<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CasambiPlatform").finish_non_exhaustive()
    }
}

impl<C: Controller> CasambiPlatform<C> {
    /// Validate `config`, open the Casambi session and register one light per unit.
    ///
    /// `connect` builds the controller; it is only called once the
    /// configuration is valid. User session, network session and websocket
    /// start share [`SETUP_TIMEOUT`]. Any failure aborts setup without retry
    /// and before any entity is added to `host`.
    pub async fn setup<F>(config: &Value, host: Arc<dyn Host>, connect: F) -> Result<Self>
    where
        F: FnOnce(ControllerOptions) -> C,
    {
        let config = PlatformConfig::from_value(config)?;

        let registry = Arc::new(UnitRegistry::new());
        let controller = Arc::new(connect(ControllerOptions {
            credentials: config.credentials,
            wire_id: config.wire_id,
            callback: signal_callback(Arc::clone(&registry)),
        }));

        runtime::timeout(SETUP_TIMEOUT, async {
            controller.create_user_session().await?;
            controller.create_network_session().await?;
            controller.start_websocket().await
        })
        .await
        .map_err(|_| Error::Timeout(SETUP_TIMEOUT))??;

        controller.initialize().await?;

        let units = controller.units();
        debug!("Casambi units: {}", units.len());

        for unit in units {
            if registry.contains(unit.unique_id()) {
                warn!("Duplicate Casambi unit id {}, skipping {:?}", unit.unique_id(), unit);
                continue;
            }

            let light = Arc::new(CasambiLight::new(unit, Arc::clone(&host)));
            host.add_entities(vec![light.clone() as Arc<dyn LightEntity>], true);
            registry.insert(light);
        }

        Ok(CasambiPlatform {
            controller,
            registry,
        })
    }

    pub fn controller(&self) -> &Arc<C> {
        &self.controller
    }

    pub fn registry(&self) -> &Arc<UnitRegistry<C::Unit>> {
        &self.registry
    }
}

/// Set up the platform and report success the way hosts expect.
///
/// Failures are logged and turned into `false`: credential problems at warn,
/// everything else at error.
pub async fn async_setup_platform<C, F>(config: &Value, host: Arc<dyn Host>, connect: F) -> bool
where
    C: Controller,
    F: FnOnce(ControllerOptions) -> C,
{
    match CasambiPlatform::setup(config, host, connect).await {
        Ok(platform) => {
            debug!("Casambi platform ready with {} lights", platform.registry.len());
            true
        }
        Err(e) => {
            log_setup_error(&e);
            false
        }
    }
}

fn log_setup_error(err: &Error) {
    match err {
        Error::LoginRequired(_) => warn!("Connected to casambi but couldn't log in: {}", err),
        Error::Unauthorized(_) => warn!("Connected to casambi but not registered: {}", err),
        e if e.is_transport_error() => error!("Error connecting to the Casambi: {:?}", e),
        e if e.is_config_error() => error!("Invalid Casambi configuration: {}", e),
        e => error!("Unknown Casambi communication error occurred: {:?}", e),
    }
}
