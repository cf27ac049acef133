// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport for the HeishaMon bridge.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tokio::sync::mpsc;

use crate::error::ProtocolError;
use crate::protocol::{StatusMessage, TopicScheme, Transport};

/// MQTT transport connected to the broker a HeishaMon bridge publishes to.
///
/// Connecting subscribes to the scheme's status filter and spawns a
/// background task that forwards every inbound status publish over the
/// returned channel. Feed that channel into
/// [`HeatPump::attach`](crate::climate::HeatPump::attach) to drive routing.
///
/// # Examples
///
/// ```ignore
/// use aquarea_lib::protocol::{MqttTransport, TopicScheme};
///
/// let scheme = TopicScheme::new("aquarea/");
/// let (transport, statuses) =
///     MqttTransport::connect("mqtt://192.168.1.50:1883", &scheme).await?;
/// ```
#[derive(Debug)]
pub struct MqttTransport {
    client: AsyncClient,
}

impl MqttTransport {
    /// Connects to an MQTT broker and subscribes to the scheme's statuses.
    ///
    /// # Arguments
    ///
    /// * `broker_url` - The MQTT broker URL (e.g. `mqtt://192.168.1.50:1883`)
    /// * `scheme` - The topic layout of the bridge to listen to
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the subscription handoff
    /// fails.
    pub async fn connect(
        broker_url: impl Into<String>,
        scheme: &TopicScheme,
    ) -> Result<(Self, mpsc::Receiver<StatusMessage>), ProtocolError> {
        let broker_url = broker_url.into();
        let (host, port) = parse_mqtt_url(&broker_url)?;

        // Generate a unique client ID (PID + counter to avoid conflicts)
        let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let client_id = format!("aquarea_{}_{}", std::process::id(), counter);

        let mut mqtt_options = MqttOptions::new(&client_id, host, port);
        mqtt_options.set_keep_alive(Duration::from_secs(30));
        mqtt_options.set_clean_session(true);

        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        // Channel carrying inbound statuses to the routing task
        let (status_tx, status_rx) = mpsc::channel::<StatusMessage>(32);

        client
            .subscribe(scheme.subscription_filter(), QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tokio::spawn(async move {
            handle_mqtt_events(event_loop, status_tx).await;
        });

        // Give time for connection establishment and subscription
        // acknowledgment before the caller starts publishing commands.
        tokio::time::sleep(Duration::from_millis(500)).await;

        Ok((Self { client }, status_rx))
    }
}

impl Transport for MqttTransport {
    async fn publish(
        &self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> Result<(), ProtocolError> {
        tracing::debug!(topic = %topic, payload = %payload, "Publishing MQTT command");

        self.client
            .publish(topic, QoS::AtLeastOnce, retain, payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }
}

/// Parses an MQTT URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), 1883)
    };

    Ok((host, port))
}

/// Handles MQTT events in the background.
async fn handle_mqtt_events(mut event_loop: EventLoop, status_tx: mpsc::Sender<StatusMessage>) {
    use rumqttc::{Event, Packet};

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connected");
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Ok(payload) = String::from_utf8(publish.payload.to_vec()) else {
                    tracing::warn!(topic = %publish.topic, "Dropping non-UTF-8 payload");
                    continue;
                };
                tracing::trace!(
                    topic = %publish.topic,
                    payload = %payload,
                    "Received MQTT message"
                );
                if status_tx
                    .send(StatusMessage {
                        topic: publish.topic,
                        payload,
                    })
                    .await
                    .is_err()
                {
                    // Receiver dropped; nothing left to route to.
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "MQTT event loop error");
                break;
            }
        }
    }
}
