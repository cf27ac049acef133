// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aquarea Lib - A Rust library to control Panasonic Aquarea heat pumps
//! through a HeishaMon MQTT bridge.
//!
//! The bridge publishes appliance statuses on a topic tree and accepts
//! commands on another. This library reconciles those out-of-order,
//! independently-arriving statuses into per-zone climate controllers with a
//! synchronous-looking read/command API, and derives the minimal outbound
//! commands needed for a requested change without disturbing state shared
//! between zones.
//!
//! # Supported Features
//!
//! - **Zone heating control**: Turn each of the two zones on/off with
//!   minimal-delta commands over the shared global heat flag
//! - **Setpoint control**: Absolute target or compensation-offset setpoints,
//!   validated against the active policy's bounds
//! - **Status tracking**: Zone activity, operating mode, setpoint, measured
//!   temperature and heating-mode statuses, applied in any arrival order
//! - **Change notifications**: Callback subscriptions for every observable
//!   mutation, for propagation into a host application
//!
//! # Consistency Model
//!
//! Commands are optimistic: local state is committed as soon as the publish
//! is handed to the transport, and the appliance's next periodic status
//! broadcast corrects any divergence. Malformed inbound payloads are logged
//! and dropped, never clearing last-known-good state.
//!
//! # Quick Start
//!
//! ```no_run
//! use aquarea_lib::climate::HeatPump;
//! use aquarea_lib::protocol::{MqttTransport, TopicScheme};
//! use aquarea_lib::subscription::Subscribable;
//! use aquarea_lib::types::{SetpointPolicy, ZoneId};
//!
//! #[tokio::main]
//! async fn main() -> aquarea_lib::Result<()> {
//!     let scheme = TopicScheme::new("aquarea/");
//!     let (transport, statuses) =
//!         MqttTransport::connect("mqtt://192.168.1.50:1883", &scheme).await?;
//!
//!     let pump = HeatPump::new(transport, "aquarea/");
//!     let zone1 = pump.zone_climate(ZoneId::one(), SetpointPolicy::Direct);
//!     pump.attach(statuses);
//!
//!     // React to authoritative state changes
//!     zone1.on_hvac_changed(|on| {
//!         println!("zone 1 heating: {on}");
//!     });
//!
//!     // Request heating and a target temperature
//!     zone1.set_hvac(true).await?;
//!     zone1.set_setpoint(21.0).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without a Broker
//!
//! The climate layer is generic over the [`protocol::Transport`] trait, so
//! reconciliation logic can be driven end-to-end with an in-memory transport:
//!
//! ```
//! use aquarea_lib::climate::HeatPump;
//! use aquarea_lib::protocol::{ProtocolError, Transport};
//! use aquarea_lib::types::{SetpointPolicy, ZoneId};
//!
//! struct NullTransport;
//!
//! impl Transport for NullTransport {
//!     async fn publish(&self, _: &str, _: &str, _: bool) -> Result<(), ProtocolError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> aquarea_lib::Result<()> {
//! let pump = HeatPump::new(NullTransport, "aquarea/");
//! let zone = pump.zone_climate(ZoneId::two(), SetpointPolicy::Compensation);
//! pump.route("aquarea/main/Operating_Mode_State", "1").await?;
//! # Ok(())
//! # }
//! ```

pub mod climate;
pub mod command;
pub mod error;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use climate::{HeatPump, ZoneClimate};
pub use command::{ClimateCommand, Command};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "mqtt")]
pub use protocol::MqttTransport;
pub use protocol::{StatusMessage, StatusTopic, TopicScheme, Transport};
pub use state::{Reconciler, StateChange, TransitionPlan};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{OperatingMode, SetpointBounds, SetpointPolicy, ZoneId, ZoneSet};
