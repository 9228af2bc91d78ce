//! Geolocation gate: single-writer store of the latest reading
//!
//! `GeolocationGate` owns the state and is the only thing that can change it.
//! Consumers hold `GateHandle`s, which can read snapshots and wait for
//! changes but cannot write. `GeolocationProvider` wires a sensor watch into
//! a gate on a background task for the lifetime of a mounted view tree.

use crate::core::Coordinates;
use crate::gate::routing::{Navigator, Notifier, Reaction, RouteGuard};
use crate::gate::state::GateState;
use crate::sensor::{LocationSensor, SensorEvent};
use crate::utils::ClientConfig;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Read-only view of the gate
#[derive(Debug, Clone)]
pub struct GateHandle {
    receiver: watch::Receiver<GateState>,
}

impl GateHandle {
    /// Current state
    pub fn snapshot(&self) -> GateState {
        self.receiver.borrow().clone()
    }

    pub fn within_allowance(&self) -> bool {
        self.receiver.borrow().within_allowance
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.receiver.borrow().coordinates()
    }

    /// Wait until a new state is published. False once the gate is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Wait for the next published state. Returns `None` once the gate is gone.
    pub async fn next_state(&mut self) -> Option<GateState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Wait until `predicate` holds for the current state
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<GateState>
    where
        F: FnMut(&GateState) -> bool,
    {
        self.receiver
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| GateState::clone(&state))
    }
}

/// Owner of the gate state
pub struct GeolocationGate {
    sender: watch::Sender<GateState>,
    guard: RouteGuard,
    current_route: String,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl GeolocationGate {
    pub fn new(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        initial_route: impl Into<String>,
    ) -> Self {
        let (sender, _) = watch::channel(GateState::new(config.tolerance_m));
        Self {
            sender,
            guard: RouteGuard::from_config(config),
            current_route: initial_route.into(),
            navigator,
            notifier,
        }
    }

    pub fn handle(&self) -> GateHandle {
        GateHandle {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn state(&self) -> GateState {
        self.sender.borrow().clone()
    }

    pub fn current_route(&self) -> &str {
        &self.current_route
    }

    /// Apply a sensor event, publish the new state and run its side effects
    pub fn apply_event(&mut self, event: SensorEvent) {
        let mut next = self.sender.borrow().clone();
        let transition = next.apply(&event);

        if transition.allowance_changed {
            debug!(
                "within_allowance -> {} (accuracy {:?}, tolerance {} m)",
                next.within_allowance, next.reading.accuracy, next.tolerance_m
            );
        }

        self.sender.send_replace(next);

        if let SensorEvent::Error(err) = &event {
            warn!("location sensor error on {}: {}", self.current_route, err);
            let reaction = self.guard.react_to_new_error(err, &self.current_route);
            self.perform(reaction);
        }
    }

    /// Record a route change and re-check the current error against it
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.current_route = route.into();
        let reaction = {
            let state = self.sender.borrow();
            self.guard.react(state.reading.error.as_ref(), &self.current_route)
        };
        self.perform(reaction);
    }

    fn perform(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Stay => {}
            Reaction::Redirect(route) => {
                if route != self.current_route {
                    info!("location unavailable on {}, redirecting to {}", self.current_route, route);
                    self.navigator.navigate(&route);
                    self.current_route = route;
                }
            }
            Reaction::Notify(notice) => self.notifier.notify(notice),
        }
    }
}

/// A gate fed by a sensor on a background task
pub struct GeolocationProvider {
    handle: GateHandle,
    routes: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl GeolocationProvider {
    /// Open a watch on `sensor` and start feeding the gate. Must be called
    /// from within a tokio runtime.
    pub fn mount<S>(
        sensor: &mut S,
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        initial_route: impl Into<String>,
    ) -> Self
    where
        S: LocationSensor + ?Sized,
    {
        let mut gate = GeolocationGate::new(config, navigator, notifier, initial_route);
        let handle = gate.handle();
        let (routes, mut route_rx) = mpsc::unbounded_channel::<String>();

        let mut watch = match sensor.watch_position(&config.watch) {
            Ok(watch) => {
                debug!("watching {} with {:?}", sensor.name(), config.watch);
                Some(watch)
            }
            Err(err) => {
                gate.apply_event(SensorEvent::Error(err));
                None
            }
        };

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = async { watch.as_mut()?.next().await }, if watch.is_some() => {
                        match event {
                            Some(event) => gate.apply_event(event),
                            None => {
                                debug!("sensor watch closed");
                                watch = None;
                            }
                        }
                    }
                    route = route_rx.recv() => {
                        match route {
                            Some(route) => gate.set_route(route),
                            None => break,
                        }
                    }
                }
            }
        });

        Self { handle, routes, task }
    }

    pub fn handle(&self) -> GateHandle {
        self.handle.clone()
    }

    /// Tell the gate the user moved to another route
    pub fn set_route(&self, route: impl Into<String>) {
        // Fails only after unmount, when nobody is listening anyway
        let _ = self.routes.send(route.into());
    }

    /// Stop applying sensor events. The sensor may keep sampling into the
    /// dropped watch; those events are discarded.
    pub fn unmount(self) {
        self.task.abort();
    }
}
