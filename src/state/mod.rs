// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance state management.
//!
//! The [`Reconciler`] caches the last-known appliance bitfields and computes
//! minimal command deltas; [`StateChange`] represents the observable
//! mutations dispatched to host callbacks.
//!
//! # Examples
//!
//! ```
//! use aquarea_lib::state::Reconciler;
//! use aquarea_lib::types::{OperatingMode, ZoneId, ZoneSet};
//!
//! let mut rec = Reconciler::new();
//! rec.apply_zones(ZoneSet::from(ZoneId::one()));
//! rec.apply_operating_mode(OperatingMode::HEAT);
//!
//! let plan = rec.plan_zone_off(ZoneId::one());
//! assert_eq!(plan.commands().len(), 1);
//! ```

mod reconciler;
mod state_change;

pub use reconciler::{Reconciler, TransitionPlan};
pub use state_change::StateChange;
