// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HeishaMon topic layout.
//!
//! The bridge publishes statuses under `<prefix>main/` and accepts commands
//! under `<prefix>commands/`. The prefix is per-installation configuration
//! and is passed explicitly to each [`TopicScheme`] instead of living in any
//! process-wide state.
//!
//! # Architecture
//!
//! ```text
//! MQTT message: aquarea/main/Zones_State → "2"
//!                     ↓
//!          TopicScheme::parse_status()
//!                     ↓
//!            StatusTopic::Zones
//!                     ↓
//!        HeatPump::route() applies it
//! ```

use crate::command::Command;
use crate::types::ZoneId;

/// Topic layout of one HeishaMon installation.
///
/// # Examples
///
/// ```
/// use aquarea_lib::protocol::{StatusTopic, TopicScheme};
///
/// let scheme = TopicScheme::new("aquarea/");
/// assert_eq!(scheme.subscription_filter(), "aquarea/main/+");
/// assert_eq!(
///     scheme.parse_status("aquarea/main/Zones_State"),
///     Some(StatusTopic::Zones)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScheme {
    prefix: String,
}

impl TopicScheme {
    /// Creates a scheme for the given discovery prefix.
    ///
    /// The prefix is used verbatim; HeishaMon prefixes conventionally end
    /// with `/` (e.g. `"aquarea/"`).
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the configured discovery prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the MQTT subscription filter covering all status topics.
    #[must_use]
    pub fn subscription_filter(&self) -> String {
        format!("{}main/+", self.prefix)
    }

    /// Returns the full command topic for a command.
    #[must_use]
    pub fn command_topic<C: Command>(&self, command: &C) -> String {
        format!("{}commands/{}", self.prefix, command.name())
    }

    /// Parses a full topic into the status it carries.
    ///
    /// Returns `None` for topics outside this scheme, including other
    /// installations' prefixes and unknown status leaves.
    #[must_use]
    pub fn parse_status(&self, topic: &str) -> Option<StatusTopic> {
        let leaf = topic.strip_prefix(&self.prefix)?.strip_prefix("main/")?;
        match leaf {
            "Zones_State" => Some(StatusTopic::Zones),
            "Operating_Mode_State" => Some(StatusTopic::OperatingMode),
            "Heating_Mode" => Some(StatusTopic::HeatingMode),
            _ => {
                let rest = leaf.strip_prefix('Z')?;
                if let Some(id) = rest.strip_suffix("_Heat_Request_Temp") {
                    let zone = ZoneId::new(id.parse().ok()?).ok()?;
                    Some(StatusTopic::TargetTemperature(zone))
                } else if let Some(id) = rest.strip_suffix("_Temp") {
                    let zone = ZoneId::new(id.parse().ok()?).ok()?;
                    Some(StatusTopic::CurrentTemperature(zone))
                } else {
                    None
                }
            }
        }
    }
}

/// A recognized status topic under the scheme's `main/` branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTopic {
    /// `Zones_State` - the full set of zones requesting heat.
    Zones,
    /// `Operating_Mode_State` - the globally enabled functions.
    OperatingMode,
    /// `Heating_Mode` - the setpoint policy, applies to both zones.
    HeatingMode,
    /// `Z<n>_Temp` - a zone's measured temperature.
    CurrentTemperature(ZoneId),
    /// `Z<n>_Heat_Request_Temp` - a zone's requested temperature.
    TargetTemperature(ZoneId),
}
