// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport seam and topic plumbing for the HeishaMon bridge.
//!
//! This module provides the [`Transport`] trait the climate layer publishes
//! through, the [`TopicScheme`] describing the bridge's topic layout, and the
//! MQTT implementation behind the `mqtt` feature.
//!
//! The core of the library only depends on the trait, so the reconciliation
//! and controller logic compile and test without any broker.

#[cfg(feature = "mqtt")]
mod mqtt;
mod topic;

#[cfg(feature = "mqtt")]
pub use mqtt::MqttTransport;
pub use topic::{StatusTopic, TopicScheme};

pub use crate::error::ProtocolError;

/// An inbound status message from the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// The full topic the message arrived on.
    pub topic: String,
    /// The UTF-8 payload.
    pub payload: String,
}

/// Trait for transports that can hand off outbound messages.
///
/// Publication is fire-and-forget: a successful return means the message was
/// handed to the transport for delivery, not that the appliance received it.
/// Callers must not commit optimistic state updates until the handoff
/// succeeded.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Publishes a payload to a topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the message could not be queued for
    /// delivery.
    async fn publish(&self, topic: &str, payload: &str, retain: bool)
    -> Result<(), ProtocolError>;
}
