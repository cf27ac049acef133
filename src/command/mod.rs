// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HeishaMon command definitions.
//!
//! This module provides typed representations of the commands published to
//! the bridge's `commands/` topic branch.
//!
//! # Command Structure
//!
//! Each command consists of:
//! - A command name forming the topic leaf (e.g. `SetOperationMode`,
//!   `SetZ1HeatRequestTemperature`)
//! - A payload (a bare UTF-8 integer or decimal string)
//!
//! # Examples
//!
//! ```
//! use aquarea_lib::command::{ClimateCommand, Command};
//! use aquarea_lib::types::OperatingMode;
//!
//! let cmd = ClimateCommand::SetOperatingMode(OperatingMode::HEAT);
//! assert_eq!(cmd.name(), "SetOperationMode");
//! assert_eq!(cmd.payload(), Some("1".to_string()));
//! ```

mod climate;

pub use climate::ClimateCommand;

/// A command that can be published to the HeishaMon bridge.
pub trait Command {
    /// Returns the command name, which forms the command topic leaf.
    ///
    /// For example, `"SetOperationMode"` or `"SetZ2HeatRequestTemperature"`.
    fn name(&self) -> String;

    /// Returns the command payload, if the value is wire-representable.
    fn payload(&self) -> Option<String>;

    /// Returns the MQTT payload for this command.
    ///
    /// Returns an empty string when the value has no wire representation.
    fn mqtt_payload(&self) -> String {
        self.payload().unwrap_or_default()
    }
}
