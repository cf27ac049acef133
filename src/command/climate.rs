// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate control commands.

use crate::command::Command;
use crate::types::{OperatingMode, ZoneId, ZoneSet};

/// Command to change the climate state of the appliance.
///
/// # Examples
///
/// ```
/// use aquarea_lib::command::{ClimateCommand, Command};
/// use aquarea_lib::types::{OperatingMode, ZoneId, ZoneSet};
///
/// // Globally enable heating
/// let cmd = ClimateCommand::SetOperatingMode(OperatingMode::HEAT);
/// assert_eq!(cmd.name(), "SetOperationMode");
/// assert_eq!(cmd.payload(), Some("1".to_string()));
///
/// // Request heat for zone 2 only
/// let cmd = ClimateCommand::SetZones(ZoneSet::from(ZoneId::two()));
/// assert_eq!(cmd.name(), "SetZones");
/// assert_eq!(cmd.payload(), Some("1".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimateCommand {
    /// Set the globally enabled appliance functions.
    SetOperatingMode(OperatingMode),

    /// Set the full set of zones requesting heat.
    ///
    /// The empty set has no wire representation and is never emitted by the
    /// reconciliation engine; a command holding it yields no payload.
    SetZones(ZoneSet),

    /// Set a zone's requested temperature.
    ///
    /// The payload carries the raw value; whether it is an absolute target or
    /// a compensation offset is decided by the appliance's active policy, not
    /// encoded in the message.
    SetZoneTemperature {
        /// The zone the setpoint applies to.
        zone: ZoneId,
        /// The requested setpoint.
        value: f32,
    },
}

impl Command for ClimateCommand {
    fn name(&self) -> String {
        match self {
            Self::SetOperatingMode(_) => "SetOperationMode".to_string(),
            Self::SetZones(_) => "SetZones".to_string(),
            Self::SetZoneTemperature { zone, .. } => {
                format!("SetZ{}HeatRequestTemperature", zone.value())
            }
        }
    }

    fn payload(&self) -> Option<String> {
        match self {
            Self::SetOperatingMode(mode) => Some(mode.to_wire()),
            Self::SetZones(zones) => zones.to_wire(),
            Self::SetZoneTemperature { value, .. } => Some(format!("{value}")),
        }
    }
}
