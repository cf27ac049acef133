// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level heat pump and zone controller abstractions.
//!
//! A [`HeatPump`] represents one appliance behind a HeishaMon bridge. It owns
//! the transport, the topic layout and the reconciliation engine, and is the
//! single ingress for inbound status messages. [`ZoneClimate`] controllers are
//! created from it, one per heating circuit, and share the appliance-wide
//! reconciler.
//!
//! # Consistency model
//!
//! Writes are optimistic: a command is handed to the transport first, and the
//! local caches are updated only after a successful handoff, without waiting
//! for confirmation. The appliance's periodic status broadcasts are
//! authoritative and correct any divergence on arrival. All bitfield
//! read-decide-write cycles — status application and command planning — run
//! under one mutex per appliance, held across the publishes, so two zones can
//! never race on the shared heat flag.
//!
//! # Examples
//!
//! ```
//! use aquarea_lib::climate::HeatPump;
//! use aquarea_lib::types::{SetpointPolicy, ZoneId};
//! # use aquarea_lib::protocol::{ProtocolError, Transport};
//! # struct NullTransport;
//! # impl Transport for NullTransport {
//! #     async fn publish(&self, _: &str, _: &str, _: bool) -> Result<(), ProtocolError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> aquarea_lib::Result<()> {
//! let pump = HeatPump::new(NullTransport, "aquarea/");
//! let zone1 = pump.zone_climate(ZoneId::one(), SetpointPolicy::Direct);
//!
//! // Statuses route through the pump, commands through the controller.
//! pump.route("aquarea/main/Operating_Mode_State", "1").await?;
//! zone1.set_setpoint(21.0).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, mpsc};

use crate::command::{ClimateCommand, Command};
use crate::error::{Error, ParseError, Result};
use crate::protocol::{StatusMessage, StatusTopic, TopicScheme, Transport};
use crate::state::{Reconciler, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{OperatingMode, SetpointBounds, SetpointPolicy, ZoneId, ZoneSet};

/// Presentation-facing state of one zone.
#[derive(Debug, Clone, Copy)]
struct ZoneLocal {
    policy: SetpointPolicy,
    bounds: SetpointBounds,
    setpoint: Option<f32>,
    current_temperature: Option<f32>,
    hvac_on: bool,
}

/// State shared between a zone's controller handles and the pump's router.
struct ZoneShared {
    zone: ZoneId,
    local: RwLock<ZoneLocal>,
    callbacks: CallbackRegistry,
}

impl ZoneShared {
    fn new(zone: ZoneId, initial_policy: SetpointPolicy) -> Self {
        Self {
            zone,
            local: RwLock::new(ZoneLocal {
                policy: initial_policy,
                bounds: initial_policy.bounds(),
                setpoint: None,
                current_temperature: None,
                hvac_on: false,
            }),
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Recomputes the derived on/off state and notifies if it changed.
    fn refresh_hvac(&self, reconciler: &Reconciler) {
        let on = reconciler.is_zone_active(self.zone);
        let changed = {
            let mut local = self.local.write();
            if local.hvac_on == on {
                false
            } else {
                local.hvac_on = on;
                true
            }
        };
        if changed {
            tracing::debug!(zone = %self.zone, on, "Derived control state changed");
            self.callbacks
                .dispatch(&StateChange::hvac_power(self.zone, on));
        }
    }

    /// Applies a setpoint policy.
    ///
    /// Every application is observable, including a refresh of the unchanged
    /// policy, so listeners can re-advertise bounds idempotently.
    fn apply_policy(&self, policy: SetpointPolicy) {
        {
            let mut local = self.local.write();
            if local.policy == policy {
                tracing::debug!(zone = %self.zone, %policy, "Enforcing setpoint policy");
            } else {
                tracing::info!(zone = %self.zone, %policy, "Changing setpoint policy");
            }
            local.policy = policy;
            local.bounds = policy.bounds();
        }
        self.callbacks.dispatch(&StateChange::policy(self.zone, policy));
    }

    /// Records a setpoint reported by the appliance.
    fn apply_setpoint_status(&self, value: f32) {
        self.local.write().setpoint = Some(value);
        tracing::debug!(zone = %self.zone, value, "Received target temperature");
        self.callbacks
            .dispatch(&StateChange::setpoint(self.zone, value));
    }

    /// Records a measured temperature reported by the appliance.
    fn apply_current_temperature(&self, value: f32) {
        self.local.write().current_temperature = Some(value);
        self.callbacks
            .dispatch(&StateChange::current_temperature(self.zone, value));
    }
}

/// State shared by a pump and every controller created from it.
struct PumpShared<T: Transport> {
    transport: T,
    topics: TopicScheme,
    /// Serialization domain for all bitfield reads and writes of this
    /// appliance. Held across command publishes so plan, publish and commit
    /// cannot interleave with status application or the other zone's
    /// requests.
    reconciler: Mutex<Reconciler>,
    zones: RwLock<Vec<Arc<ZoneShared>>>,
}

impl<T: Transport> PumpShared<T> {
    fn refresh_derived(&self, reconciler: &Reconciler) {
        for zone in self.zones.read().iter() {
            zone.refresh_hvac(reconciler);
        }
    }

    fn zone_shared(&self, zone: ZoneId) -> Option<Arc<ZoneShared>> {
        self.zones
            .read()
            .iter()
            .find(|shared| shared.zone == zone)
            .cloned()
    }
}

/// One heat pump appliance behind a HeishaMon bridge.
///
/// The pump is the single ingress for status messages and the factory for
/// per-zone controllers. Cloning is cheap and yields a handle to the same
/// appliance.
pub struct HeatPump<T: Transport> {
    shared: Arc<PumpShared<T>>,
}

impl<T: Transport> Clone for HeatPump<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Transport> std::fmt::Debug for HeatPump<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeatPump")
            .field("prefix", &self.shared.topics.prefix())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> HeatPump<T> {
    /// Creates a heat pump for the given transport and discovery prefix.
    ///
    /// The prefix is the per-installation HeishaMon topic root (e.g.
    /// `"aquarea/"`), passed explicitly rather than read from any global
    /// configuration.
    pub fn new(transport: T, prefix: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(PumpShared {
                transport,
                topics: TopicScheme::new(prefix),
                reconciler: Mutex::new(Reconciler::new()),
                zones: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Returns the topic layout of this installation.
    #[must_use]
    pub fn topics(&self) -> &TopicScheme {
        &self.shared.topics
    }

    /// Creates the climate controller for one zone.
    ///
    /// Controllers are created once at startup per zone and live for the
    /// process lifetime. Creating a controller for a zone that already has
    /// one replaces the previous registration.
    pub fn zone_climate(&self, zone: ZoneId, initial_policy: SetpointPolicy) -> ZoneClimate<T> {
        tracing::debug!(zone = %zone, policy = %initial_policy, "Registering zone climate controller");
        let shared = Arc::new(ZoneShared::new(zone, initial_policy));
        {
            let mut zones = self.shared.zones.write();
            zones.retain(|existing| existing.zone != zone);
            zones.push(Arc::clone(&shared));
        }
        ZoneClimate {
            pump: Arc::clone(&self.shared),
            shared,
        }
    }

    /// Returns the last-known set of zones requesting heat.
    pub async fn zone_activity(&self) -> ZoneSet {
        self.shared.reconciler.lock().await.zones()
    }

    /// Returns the last-known globally enabled functions.
    pub async fn operating_mode(&self) -> OperatingMode {
        self.shared.reconciler.lock().await.operating_mode()
    }

    /// Routes one inbound status message.
    ///
    /// Returns `Ok(true)` if the topic belongs to this installation's status
    /// branch and was applied, `Ok(false)` for unrelated topics.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the payload cannot be parsed as the
    /// encoding the topic carries. All cached state is left untouched in
    /// that case; callers driving a message loop should log and drop the
    /// message rather than propagate (see [`HeatPump::attach`]).
    pub async fn route(&self, topic: &str, payload: &str) -> Result<bool> {
        let Some(status) = self.shared.topics.parse_status(topic) else {
            tracing::trace!(topic = %topic, "Ignoring topic outside scheme");
            return Ok(false);
        };

        match status {
            StatusTopic::Zones => {
                let zones: ZoneSet = payload.parse().map_err(Error::Parse)?;
                let mut reconciler = self.shared.reconciler.lock().await;
                if reconciler.apply_zones(zones) {
                    tracing::debug!(%zones, "Zone activity status applied");
                    self.dispatch_all(&StateChange::ZoneActivity(zones));
                }
                self.shared.refresh_derived(&reconciler);
            }
            StatusTopic::OperatingMode => {
                let mode: OperatingMode = payload.parse().map_err(Error::Parse)?;
                let mut reconciler = self.shared.reconciler.lock().await;
                if reconciler.apply_operating_mode(mode) {
                    tracing::debug!(%mode, "Operating mode status applied");
                    self.dispatch_all(&StateChange::OperatingMode(mode));
                }
                self.shared.refresh_derived(&reconciler);
            }
            StatusTopic::HeatingMode => {
                let policy: SetpointPolicy = payload.parse().map_err(Error::Parse)?;
                for zone in self.shared.zones.read().iter() {
                    zone.apply_policy(policy);
                }
            }
            StatusTopic::CurrentTemperature(zone) => {
                let value = parse_temperature(topic, payload)?;
                if let Some(shared) = self.shared.zone_shared(zone) {
                    shared.apply_current_temperature(value);
                } else {
                    tracing::trace!(zone = %zone, "No controller registered for zone");
                }
            }
            StatusTopic::TargetTemperature(zone) => {
                let value = parse_temperature(topic, payload)?;
                if let Some(shared) = self.shared.zone_shared(zone) {
                    shared.apply_setpoint_status(value);
                } else {
                    tracing::trace!(zone = %zone, "No controller registered for zone");
                }
            }
        }

        Ok(true)
    }

    /// Spawns a task draining a transport's inbound channel through
    /// [`route`](Self::route).
    ///
    /// Malformed payloads are absorbed with a diagnostic; the last-known
    /// state is retained and the loop keeps running.
    pub fn attach(&self, mut statuses: mpsc::Receiver<StatusMessage>) -> tokio::task::JoinHandle<()>
    where
        T: Send + Sync + 'static,
    {
        let pump = self.clone();
        tokio::spawn(async move {
            while let Some(message) = statuses.recv().await {
                if let Err(error) = pump.route(&message.topic, &message.payload).await {
                    tracing::warn!(
                        topic = %message.topic,
                        payload = %message.payload,
                        %error,
                        "Dropping malformed status"
                    );
                }
            }
        })
    }

    /// Dispatches an appliance-wide change to every zone's listeners.
    fn dispatch_all(&self, change: &StateChange) {
        for zone in self.shared.zones.read().iter() {
            zone.callbacks.dispatch(change);
        }
    }
}

/// Parses a temperature payload, rejecting non-numeric and non-finite input.
fn parse_temperature(topic: &str, payload: &str) -> Result<f32> {
    payload
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            Error::Parse(ParseError::MalformedPayload {
                topic: topic.to_string(),
                payload: payload.to_string(),
            })
        })
}

/// Climate controller for one heating circuit.
///
/// Bound to its zone id at creation; all controllers of one pump share the
/// appliance-wide reconciler. Cloning yields a handle to the same zone.
pub struct ZoneClimate<T: Transport> {
    pump: Arc<PumpShared<T>>,
    shared: Arc<ZoneShared>,
}

impl<T: Transport> Clone for ZoneClimate<T> {
    fn clone(&self) -> Self {
        Self {
            pump: Arc::clone(&self.pump),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Transport> std::fmt::Debug for ZoneClimate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let local = self.shared.local.read();
        f.debug_struct("ZoneClimate")
            .field("zone", &self.shared.zone)
            .field("policy", &local.policy)
            .field("hvac_on", &local.hvac_on)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ZoneClimate<T> {
    /// Returns the zone this controller is bound to.
    #[must_use]
    pub fn zone_id(&self) -> ZoneId {
        self.shared.zone
    }

    /// Returns the derived on/off control state.
    ///
    /// This reflects the last authoritative status, or the optimistic state
    /// after a successfully handed-off request.
    #[must_use]
    pub fn is_hvac_on(&self) -> bool {
        self.shared.local.read().hvac_on
    }

    /// Returns the current setpoint, if one is known.
    #[must_use]
    pub fn setpoint(&self) -> Option<f32> {
        self.shared.local.read().setpoint
    }

    /// Returns the last measured zone temperature, if one was received.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f32> {
        self.shared.local.read().current_temperature
    }

    /// Returns the active setpoint policy.
    #[must_use]
    pub fn policy(&self) -> SetpointPolicy {
        self.shared.local.read().policy
    }

    /// Returns the setpoint bounds under the active policy.
    #[must_use]
    pub fn bounds(&self) -> SetpointBounds {
        self.shared.local.read().bounds
    }

    /// Requests a new setpoint for this zone.
    ///
    /// The raw value is published as-is; whether the appliance treats it as
    /// an absolute target or a compensation offset depends on its active
    /// heating mode. No confirmation is expected for this field, so the
    /// local value is committed as soon as the publish is handed off.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value violates the active
    /// policy's bounds, or `ProtocolError` if the publish handoff fails —
    /// in both cases the local setpoint is left unchanged.
    pub async fn set_setpoint(&self, value: f32) -> Result<()> {
        let (policy, bounds) = {
            let local = self.shared.local.read();
            (local.policy, local.bounds)
        };
        bounds.validate(value).map_err(Error::Value)?;

        match policy {
            SetpointPolicy::Compensation => {
                tracing::info!(zone = %self.shared.zone, value, "Changing temperature offset");
            }
            SetpointPolicy::Direct => {
                tracing::info!(zone = %self.shared.zone, value, "Changing target temperature");
            }
        }

        let command = ClimateCommand::SetZoneTemperature {
            zone: self.shared.zone,
            value,
        };
        self.publish(&command).await?;

        self.shared.local.write().setpoint = Some(value);
        self.shared
            .callbacks
            .dispatch(&StateChange::setpoint(self.shared.zone, value));
        Ok(())
    }

    /// Applies a setpoint policy to this zone.
    ///
    /// Updates the advertised bounds and always notifies listeners, even
    /// when the policy is unchanged, so a re-application acts as an
    /// idempotent refresh. Nothing is published; the policy is appliance
    /// configuration reported on the `Heating_Mode` status.
    pub fn set_policy(&self, policy: SetpointPolicy) {
        self.shared.apply_policy(policy);
    }

    /// Requests this zone's heating to be turned on or off.
    ///
    /// Plans the minimal command delta against the last-known appliance
    /// state, publishes the commands in order (global enable before the
    /// per-zone request), then optimistically commits the result without
    /// waiting for confirmation. The next status broadcast corrects any
    /// divergence. Requesting the state the zone is already in publishes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if a publish handoff fails; the optimistic
    /// update is not applied in that case.
    pub async fn set_hvac(&self, on: bool) -> Result<()> {
        let mut reconciler = self.pump.reconciler.lock().await;
        let plan = if on {
            reconciler.plan_zone_on(self.shared.zone)
        } else {
            reconciler.plan_zone_off(self.shared.zone)
        };

        if plan.is_noop() {
            tracing::debug!(zone = %self.shared.zone, on, "Requested HVAC state already current");
            return Ok(());
        }

        for command in plan.commands() {
            tracing::debug!(
                zone = %self.shared.zone,
                command = %command.name(),
                payload = %command.mqtt_payload(),
                "Publishing climate command"
            );
            self.publish(command).await?;
        }

        reconciler.commit(&plan);
        self.pump.refresh_derived(&reconciler);
        Ok(())
    }

    async fn publish(&self, command: &ClimateCommand) -> Result<()> {
        let topic = self.pump.topics.command_topic(command);
        self.pump
            .transport
            .publish(&topic, &command.mqtt_payload(), false)
            .await
            .map_err(Error::Protocol)
    }
}

impl<T: Transport> Subscribable for ZoneClimate<T> {
    fn on_hvac_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_hvac_changed(callback)
    }

    fn on_setpoint_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_setpoint_changed(callback)
    }

    fn on_current_temperature<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_current_temperature(callback)
    }

    fn on_policy_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SetpointPolicy, SetpointBounds) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_policy_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}
