// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for zone state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Internal registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{SetpointBounds, SetpointPolicy};

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a zone controller's lifetime.
///
/// # Examples
///
/// ```ignore
/// let sub_id = zone.on_hvac_changed(|on| { /* ... */ });
///
/// // Later, unsubscribe
/// zone.unsubscribe(sub_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for derived on/off callbacks.
type HvacCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Type alias for setpoint callbacks.
type SetpointCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// Type alias for measured temperature callbacks.
type CurrentTemperatureCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// Type alias for policy callbacks (receives the refreshed bounds too).
type PolicyCallback = Arc<dyn Fn(SetpointPolicy, SetpointBounds) + Send + Sync>;

/// Type alias for generic state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for managing zone subscription callbacks.
///
/// This is an internal type used by zone controllers to store and dispatch
/// callbacks. It uses thread-safe interior mutability via
/// `parking_lot::RwLock` for high performance in async contexts.
///
/// # Thread Safety
///
/// The registry is fully thread-safe and can be accessed from multiple tasks
/// concurrently. Callbacks are wrapped in `Arc` so they can be cloned cheaply.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Derived on/off change callbacks.
    hvac_callbacks: RwLock<HashMap<SubscriptionId, HvacCallback>>,
    /// Setpoint change callbacks.
    setpoint_callbacks: RwLock<HashMap<SubscriptionId, SetpointCallback>>,
    /// Measured temperature callbacks.
    current_temperature_callbacks: RwLock<HashMap<SubscriptionId, CurrentTemperatureCallback>>,
    /// Policy application callbacks.
    policy_callbacks: RwLock<HashMap<SubscriptionId, PolicyCallback>>,
    /// Generic state change callbacks (receives all changes).
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            hvac_callbacks: RwLock::new(HashMap::new()),
            setpoint_callbacks: RwLock::new(HashMap::new()),
            current_temperature_callbacks: RwLock::new(HashMap::new()),
            policy_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for derived on/off changes.
    pub fn on_hvac_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.hvac_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for setpoint changes.
    pub fn on_setpoint_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.setpoint_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for measured temperature updates.
    pub fn on_current_temperature<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.current_temperature_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for policy applications.
    ///
    /// The callback receives the applied policy and the bounds it implies.
    /// It fires on every application, including idempotent refreshes of the
    /// same policy.
    pub fn on_policy_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SetpointPolicy, SetpointBounds) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.policy_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for all state changes.
    ///
    /// This is useful for logging or debugging, as it receives every change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.hvac_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.setpoint_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self
            .current_temperature_callbacks
            .write()
            .remove(&id)
            .is_some()
        {
            return true;
        }
        if self.policy_callbacks.write().remove(&id).is_some() {
            return true;
        }
        if self.state_changed_callbacks.write().remove(&id).is_some() {
            return true;
        }
        false
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.hvac_callbacks.write().clear();
        self.setpoint_callbacks.write().clear();
        self.current_temperature_callbacks.write().clear();
        self.policy_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to relevant callbacks.
    ///
    /// This method calls all registered callbacks that match the change type.
    /// Callbacks are called synchronously in an arbitrary order.
    pub fn dispatch(&self, change: &StateChange) {
        // Always dispatch to generic state_changed callbacks
        {
            let callbacks = self.state_changed_callbacks.read();
            for callback in callbacks.values() {
                callback(change);
            }
        }

        // Dispatch to specific callbacks based on change type
        match change {
            StateChange::HvacPower { on, .. } => {
                let callbacks = self.hvac_callbacks.read();
                for callback in callbacks.values() {
                    callback(*on);
                }
            }
            StateChange::Setpoint { value, .. } => {
                let callbacks = self.setpoint_callbacks.read();
                for callback in callbacks.values() {
                    callback(*value);
                }
            }
            StateChange::CurrentTemperature { value, .. } => {
                let callbacks = self.current_temperature_callbacks.read();
                for callback in callbacks.values() {
                    callback(*value);
                }
            }
            StateChange::Policy { policy, .. } => {
                let callbacks = self.policy_callbacks.read();
                for callback in callbacks.values() {
                    callback(*policy, policy.bounds());
                }
            }
            StateChange::ZoneActivity(_) | StateChange::OperatingMode(_) => {
                // Appliance-wide bitfield replacements have no specific
                // callbacks; the per-zone consequences arrive as HvacPower
                // changes, and generic state_changed callbacks see them.
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.hvac_callbacks.read().len()
            + self.setpoint_callbacks.read().len()
            + self.current_temperature_callbacks.read().len()
            + self.policy_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZoneId;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn subscription_id_equality() {
        let id1 = SubscriptionId::new(1);
        let id2 = SubscriptionId::new(1);
        let id3 = SubscriptionId::new(2);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_hvac_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_hvac_changed(move |_on| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!registry.is_empty());
        assert_eq!(registry.callback_count(), 1);

        registry.dispatch(&StateChange::hvac_power(ZoneId::one(), true));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // Unsubscribe
        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        // Dispatch again - counter should not change
        registry.dispatch(&StateChange::hvac_power(ZoneId::one(), false));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_setpoint_callback() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<f32>));
        let received_clone = received.clone();

        registry.on_setpoint_changed(move |value| {
            *received_clone.write() = Some(value);
        });

        registry.dispatch(&StateChange::setpoint(ZoneId::one(), 21.0));
        assert_eq!(*received.read(), Some(21.0));
    }

    #[test]
    fn registry_policy_callback_receives_bounds() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<(SetpointPolicy, SetpointBounds)>));
        let received_clone = received.clone();

        registry.on_policy_changed(move |policy, bounds| {
            *received_clone.write() = Some((policy, bounds));
        });

        registry.dispatch(&StateChange::policy(
            ZoneId::one(),
            SetpointPolicy::Compensation,
        ));

        let (policy, bounds) = (*received.read()).unwrap();
        assert_eq!(policy, SetpointPolicy::Compensation);
        assert_eq!(bounds.min, -5.0);
        assert_eq!(bounds.max, 5.0);
    }

    #[test]
    fn registry_state_changed_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_state_changed(move |_change| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Different types of changes all trigger the generic callback
        registry.dispatch(&StateChange::hvac_power(ZoneId::one(), true));
        registry.dispatch(&StateChange::setpoint(ZoneId::one(), 20.0));
        registry.dispatch(&StateChange::current_temperature(ZoneId::one(), 19.5));

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn registry_multiple_callbacks_same_type() {
        let registry = CallbackRegistry::new();
        let counter1 = Arc::new(AtomicU32::new(0));
        let counter2 = Arc::new(AtomicU32::new(0));
        let c1 = counter1.clone();
        let c2 = counter2.clone();

        registry.on_hvac_changed(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_hvac_changed(move |_| {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::hvac_power(ZoneId::two(), true));

        assert_eq!(counter1.load(Ordering::SeqCst), 1);
        assert_eq!(counter2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        let fake_id = SubscriptionId::new(999);

        assert!(!registry.unsubscribe(fake_id));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();

        registry.on_hvac_changed(|_| {});
        registry.on_setpoint_changed(|_| {});
        registry.on_policy_changed(|_, _| {});

        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_hvac_changed(|_| {});
        let id2 = registry.on_setpoint_changed(|_| {});
        let id3 = registry.on_current_temperature(|_| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_hvac_changed(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
