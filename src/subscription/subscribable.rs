// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for zone controllers.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::{SetpointBounds, SetpointPolicy};

/// Trait for types that support event subscriptions.
///
/// Every observable mutation of a zone — derived on/off state, setpoint,
/// measured temperature, policy and bounds — produces a notification that a
/// host application can consume to drive its own presentation layer.
///
/// # Examples
///
/// ```
/// use aquarea_lib::climate::HeatPump;
/// use aquarea_lib::subscription::Subscribable;
/// use aquarea_lib::types::{SetpointPolicy, ZoneId};
/// # use aquarea_lib::protocol::{ProtocolError, Transport};
/// # struct NullTransport;
/// # impl Transport for NullTransport {
/// #     async fn publish(&self, _: &str, _: &str, _: bool) -> Result<(), ProtocolError> {
/// #         Ok(())
/// #     }
/// # }
///
/// let pump = HeatPump::new(NullTransport, "aquarea/");
/// let zone = pump.zone_climate(ZoneId::one(), SetpointPolicy::Direct);
///
/// let sub_id = zone.on_hvac_changed(|on| {
///     println!("zone 1 heating: {on}");
/// });
///
/// // Later, unsubscribe
/// zone.unsubscribe(sub_id);
/// ```
pub trait Subscribable {
    /// Subscribes to derived on/off changes.
    ///
    /// The callback is called whenever the zone's derived control state
    /// changes, whether from an authoritative status or an optimistic local
    /// update.
    fn on_hvac_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Subscribes to setpoint changes.
    fn on_setpoint_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static;

    /// Subscribes to measured temperature updates.
    fn on_current_temperature<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f32) + Send + Sync + 'static;

    /// Subscribes to policy applications.
    ///
    /// The callback receives the applied policy and its bounds. It fires on
    /// every application, including a refresh of the unchanged policy.
    fn on_policy_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SetpointPolicy, SetpointBounds) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    ///
    /// This is useful for logging or when you need to react to any change.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
