// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for heat pump control.
//!
//! This module provides type-safe representations of the values exchanged
//! with the HeishaMon bridge. Flag sets expose explicit set operations and
//! their wire codecs; constrained values are validated at construction time.
//!
//! # Types
//!
//! - [`ZoneId`] - Identifier of one heating circuit (1 or 2)
//! - [`ZoneSet`] - Which zones are requesting heat
//! - [`OperatingMode`] - Globally enabled appliance functions
//! - [`SetpointPolicy`] - Absolute-target vs compensation-offset setpoints
//! - [`SetpointBounds`] - Min/max/step advertised under the active policy

mod operating_mode;
mod policy;
mod zone;

pub use operating_mode::OperatingMode;
pub use policy::{SetpointBounds, SetpointPolicy};
pub use zone::{ZoneId, ZoneSet};
