use geogarden::api::format_coordinates;
use geogarden::gate::{indicator_decision, GeolocationProvider, LogNavigator, LogNotifier};
use geogarden::{ClientConfig, GateState, MockSensor, SensorEvent};
use log::{error, info, warn};
use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

const STATE_WAIT: Duration = Duration::from_secs(1);

fn usage() -> String {
    "usage: geogarden <events.json> [initial-route]".to_string()
}

fn load_events(path: &str) -> Result<Vec<SensorEvent>, Box<dyn Error>> {
    let content = fs::read_to_string(path).map_err(|e| format!("reading {}: {}", path, e))?;
    let events: Vec<SensorEvent> = serde_json::from_str(&content)?;
    Ok(events)
}

fn describe(state: &GateState, low_accuracy_route: &str) -> String {
    let position = match state.coordinates() {
        Some(c) => format_coordinates(c.latitude, c.longitude),
        None => "no position".to_string(),
    };
    format!(
        "{} | accuracy {} | within allowance: {} | view: {:?}",
        position,
        state.accuracy_status().label(),
        state.within_allowance,
        indicator_decision(state, low_accuracy_route)
    )
}

/// Replay recorded sensor events through the gate and log what happens
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or_else(usage)?;
    let initial_route = args.next().unwrap_or_else(|| "/plants".to_string());

    let config = ClientConfig::from_env()?;
    info!(
        "{:?} build, tolerance {} m, interaction radius {} m",
        config.environment, config.tolerance_m, config.interaction_radius_m
    );

    let events = load_events(&path)?;
    info!("replaying {} sensor events from {} on {}", events.len(), path, initial_route);

    let mut sensor = MockSensor::new();
    let provider = GeolocationProvider::mount(
        &mut sensor,
        &config,
        Arc::new(LogNavigator),
        Arc::new(LogNotifier),
        initial_route,
    );
    let mut handle = provider.handle();

    for (index, event) in events.into_iter().enumerate() {
        sensor.push_event(event);
        match tokio::time::timeout(STATE_WAIT, handle.next_state()).await {
            Ok(Some(state)) => info!("#{} {}", index + 1, describe(&state, &config.low_accuracy_route)),
            Ok(None) => {
                error!("gate closed unexpectedly");
                break;
            }
            Err(_) => warn!("#{} produced no state change", index + 1),
        }
    }

    let last = handle.snapshot();
    info!("final: {}", describe(&last, &config.low_accuracy_route));
    provider.unmount();
    Ok(())
}
