// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for zone state changes.
//!
//! This module provides a callback-based subscription system for receiving
//! notifications when a zone's observable state changes.
//!
//! # Overview
//!
//! The subscription system consists of:
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Internal registry that manages callbacks and dispatches events
//! - [`Subscribable`] - Trait for types that support event subscriptions
//!
//! # Usage
//!
//! Subscriptions are created through methods on zone controllers:
//!
//! ```
//! use aquarea_lib::climate::HeatPump;
//! use aquarea_lib::subscription::Subscribable;
//! use aquarea_lib::types::{SetpointPolicy, ZoneId};
//! # use aquarea_lib::protocol::{ProtocolError, Transport};
//! # struct NullTransport;
//! # impl Transport for NullTransport {
//! #     async fn publish(&self, _: &str, _: &str, _: bool) -> Result<(), ProtocolError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! let pump = HeatPump::new(NullTransport, "aquarea/");
//! let zone = pump.zone_climate(ZoneId::one(), SetpointPolicy::Direct);
//!
//! // Subscribe to derived on/off changes
//! let sub_id = zone.on_hvac_changed(|on| {
//!     println!("heating: {on}");
//! });
//!
//! // Later, unsubscribe
//! zone.unsubscribe(sub_id);
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
