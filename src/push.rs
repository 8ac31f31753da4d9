//! Push notification dispatch from the controller to light entities.

use std::str::FromStr;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::controller::{Signal, SignalCallback, Unit};
use crate::registry::UnitRegistry;

/// Route one controller signal to the registered lights.
///
/// Only [`Signal::Data`] is handled; its payload maps unit ids to their update.
/// Ids missing from the registry are logged and skipped. Returns the number of
/// lights that were notified.
pub fn dispatch<U: Unit>(registry: &UnitRegistry<U>, signal: Signal, data: &Value) -> usize {
    debug!("dispatch signal: {} data: {}", signal, data);

    if signal != Signal::Data {
        return 0;
    }

    let Some(units) = data.as_object() else {
        warn!("Ignoring {} signal with non-mapping payload: {}", signal, data);
        return 0;
    };

    let mut notified = 0;
    for (id, value) in units {
        match registry.process_update(id, value) {
            Ok(()) => notified += 1,
            Err(e) => warn!("Dropping push update: {}", e),
        }
    }
    notified
}

/// Build the callback handed to the controller.
///
/// The callback owns a handle to the registry, so pushes arriving before the
/// registry is filled find nothing to notify.
pub fn signal_callback<U: Unit + 'static>(registry: Arc<UnitRegistry<U>>) -> SignalCallback {
    Box::new(move |name: &str, data: &Value| match Signal::from_str(name) {
        Ok(signal) => {
            dispatch(&registry, signal, data);
        }
        Err(_) => debug!("Unknown push signal: {:?}", name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::CasambiLight;
    use crate::testing::{MockUnit, RecordingHost};
    use serde_json::json;

    fn setup(ids: &[&str]) -> (Arc<UnitRegistry<MockUnit>>, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let registry = Arc::new(UnitRegistry::new());
        for id in ids {
            let unit = Arc::new(MockUnit::new(id, id, 0.0));
            registry.insert(Arc::new(CasambiLight::new(unit, host.clone())));
        }
        (registry, host)
    }

    #[test]
    fn test_data_signal_notifies_only_target() {
        let (registry, host) = setup(&["1", "2", "3"]);
        let notified = dispatch(&registry, Signal::Data, &json!({"2": {"value": 0.7}}));
        assert_eq!(notified, 1);
        assert_eq!(host.scheduled(), vec![("2".to_string(), true)]);
    }

    #[test]
    fn test_data_signal_many_units() {
        let (registry, host) = setup(&["1", "2"]);
        let notified = dispatch(&registry, Signal::Data, &json!({"1": 0.1, "2": 0.2}));
        assert_eq!(notified, 2);
        let mut scheduled = host.scheduled();
        scheduled.sort();
        assert_eq!(
            scheduled,
            vec![("1".to_string(), true), ("2".to_string(), true)]
        );
    }

    #[test]
    fn test_unknown_unit_skipped() {
        let (registry, host) = setup(&["1"]);
        let notified = dispatch(&registry, Signal::Data, &json!({"404": 1.0, "1": 1.0}));
        assert_eq!(notified, 1);
        assert_eq!(host.scheduled(), vec![("1".to_string(), true)]);
    }

    #[test]
    fn test_other_signals_ignored() {
        let (registry, host) = setup(&["1"]);
        assert_eq!(
            dispatch(&registry, Signal::ConnectionState, &json!({"1": 1.0})),
            0
        );
        assert!(host.scheduled().is_empty());
    }

    #[test]
    fn test_non_mapping_payload_ignored() {
        let (registry, host) = setup(&["1"]);
        assert_eq!(dispatch(&registry, Signal::Data, &json!(["1"])), 0);
        assert!(host.scheduled().is_empty());
    }

    #[test]
    fn test_callback_parses_signal_names() {
        let (registry, host) = setup(&["1"]);
        let callback = signal_callback(registry);
        callback("state", &json!("connected"));
        callback("bogus", &json!({"1": 1.0}));
        assert!(host.scheduled().is_empty());

        callback("data", &json!({"1": 1.0}));
        assert_eq!(host.scheduled(), vec![("1".to_string(), true)]);
    }
}
