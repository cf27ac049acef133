// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the notifications emitted towards the host application
//! whenever a zone's observable state mutates, either from an inbound status
//! message or from an optimistic local update after a command was handed to
//! the transport.
//!
//! # Change Types
//!
//! - [`StateChange::ZoneActivity`] - The appliance-wide zone set was replaced
//! - [`StateChange::OperatingMode`] - The global operating mode was replaced
//! - [`StateChange::HvacPower`] - A zone's derived on/off state changed
//! - [`StateChange::Setpoint`] - A zone's requested temperature changed
//! - [`StateChange::CurrentTemperature`] - A zone's measured temperature changed
//! - [`StateChange::Policy`] - A zone's setpoint policy was (re)applied

use crate::types::{OperatingMode, SetpointPolicy, ZoneId, ZoneSet};

/// A change in observable climate state.
///
/// # Examples
///
/// ```
/// use aquarea_lib::state::StateChange;
/// use aquarea_lib::types::ZoneId;
///
/// let change = StateChange::hvac_power(ZoneId::one(), true);
/// assert!(change.is_hvac_power());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateChange {
    /// The set of zones requesting heat was replaced wholesale.
    ZoneActivity(ZoneSet),

    /// The globally enabled appliance functions were replaced wholesale.
    OperatingMode(OperatingMode),

    /// A zone's derived on/off control state changed.
    HvacPower {
        /// The affected zone.
        zone: ZoneId,
        /// Whether the zone is now actively heating.
        on: bool,
    },

    /// A zone's requested temperature changed.
    Setpoint {
        /// The affected zone.
        zone: ZoneId,
        /// The new setpoint (absolute or offset, per the active policy).
        value: f32,
    },

    /// A zone's measured temperature changed.
    CurrentTemperature {
        /// The affected zone.
        zone: ZoneId,
        /// The new measured temperature in degrees Celsius.
        value: f32,
    },

    /// A zone's setpoint policy was applied.
    ///
    /// Emitted on every application, including a re-application of the same
    /// policy, so listeners can refresh advertised bounds idempotently.
    Policy {
        /// The affected zone.
        zone: ZoneId,
        /// The applied policy.
        policy: SetpointPolicy,
    },
}

impl StateChange {
    /// Creates a derived on/off change.
    #[must_use]
    pub const fn hvac_power(zone: ZoneId, on: bool) -> Self {
        Self::HvacPower { zone, on }
    }

    /// Creates a setpoint change.
    #[must_use]
    pub const fn setpoint(zone: ZoneId, value: f32) -> Self {
        Self::Setpoint { zone, value }
    }

    /// Creates a measured temperature change.
    #[must_use]
    pub const fn current_temperature(zone: ZoneId, value: f32) -> Self {
        Self::CurrentTemperature { zone, value }
    }

    /// Creates a policy application change.
    #[must_use]
    pub const fn policy(zone: ZoneId, policy: SetpointPolicy) -> Self {
        Self::Policy { zone, policy }
    }

    /// Returns `true` if this is a derived on/off change.
    #[must_use]
    pub const fn is_hvac_power(&self) -> bool {
        matches!(self, Self::HvacPower { .. })
    }

    /// Returns `true` if this is a setpoint change.
    #[must_use]
    pub const fn is_setpoint(&self) -> bool {
        matches!(self, Self::Setpoint { .. })
    }

    /// Returns `true` if this change was caused by one of the two appliance
    /// bitfield statuses.
    #[must_use]
    pub const fn is_bitfield_status(&self) -> bool {
        matches!(self, Self::ZoneActivity(_) | Self::OperatingMode(_))
    }

    /// Returns the zone this change applies to, or `None` for appliance-wide
    /// changes.
    #[must_use]
    pub const fn zone(&self) -> Option<ZoneId> {
        match self {
            Self::ZoneActivity(_) | Self::OperatingMode(_) => None,
            Self::HvacPower { zone, .. }
            | Self::Setpoint { zone, .. }
            | Self::CurrentTemperature { zone, .. }
            | Self::Policy { zone, .. } => Some(*zone),
        }
    }
}
