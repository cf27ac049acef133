// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT transport using mockforge-mqtt.

#![cfg(feature = "mqtt")]

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::time::sleep;

use aquarea_lib::climate::HeatPump;
use aquarea_lib::protocol::{MqttTransport, TopicScheme, Transport};
use aquarea_lib::types::{SetpointPolicy, ZoneId};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(19350);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to start, bind to port, and be ready to accept connections
    sleep(Duration::from_millis(500)).await;
}

// ============================================================================
// MqttTransport Connection Tests
// ============================================================================

mod transport_connection {
    use super::*;

    #[tokio::test]
    async fn connect_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker_url = format!("mqtt://127.0.0.1:{port}");
        let scheme = TopicScheme::new("aquarea/");
        let result = MqttTransport::connect(&broker_url, &scheme).await;

        assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
    }

    #[tokio::test]
    async fn connect_with_tcp_scheme() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker_url = format!("tcp://127.0.0.1:{port}");
        let scheme = TopicScheme::new("aquarea/");
        let result = MqttTransport::connect(&broker_url, &scheme).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn connect_without_scheme() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker_url = format!("127.0.0.1:{port}");
        let scheme = TopicScheme::new("aquarea/");
        let result = MqttTransport::connect(&broker_url, &scheme).await;

        assert!(result.is_ok());
    }
}

// ============================================================================
// Publish Tests
// ============================================================================

mod transport_publish {
    use super::*;

    #[tokio::test]
    async fn publish_hands_off() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker_url = format!("mqtt://127.0.0.1:{port}");
        let scheme = TopicScheme::new("aquarea/");
        let (transport, _statuses) = MqttTransport::connect(&broker_url, &scheme).await.unwrap();

        let result = transport
            .publish("aquarea/commands/SetOperationMode", "1", false)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn zone_request_publishes_through_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker_url = format!("mqtt://127.0.0.1:{port}");
        let scheme = TopicScheme::new("aquarea/");
        let (transport, _statuses) = MqttTransport::connect(&broker_url, &scheme).await.unwrap();

        let pump = HeatPump::new(transport, "aquarea/");
        let zone = pump.zone_climate(ZoneId::one(), SetpointPolicy::Direct);

        zone.set_hvac(true).await.unwrap();
        assert!(zone.is_hvac_on());
    }
}

// ============================================================================
// Status Round-Trip Tests
// ============================================================================

mod status_round_trip {
    use super::*;

    #[tokio::test]
    async fn status_published_to_broker_reaches_the_pump() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let broker_url = format!("mqtt://127.0.0.1:{port}");
        let scheme = TopicScheme::new("aquarea/");

        // The pump's transport subscribes to the status branch.
        let (transport, statuses) = MqttTransport::connect(&broker_url, &scheme).await.unwrap();
        let pump = HeatPump::new(transport, "aquarea/");
        let zone = pump.zone_climate(ZoneId::one(), SetpointPolicy::Direct);
        pump.attach(statuses);

        // A second connection plays the HeishaMon bridge.
        let bridge_scheme = TopicScheme::new("bridge-side/");
        let (bridge, _bridge_statuses) = MqttTransport::connect(&broker_url, &bridge_scheme)
            .await
            .unwrap();
        bridge
            .publish("aquarea/main/Zones_State", "0", false)
            .await
            .unwrap();
        bridge
            .publish("aquarea/main/Operating_Mode_State", "1", false)
            .await
            .unwrap();

        // Wait for the broker to fan the statuses out and the pump to route
        // them.
        for _ in 0..20 {
            if zone.is_hvac_on() {
                break;
            }
            sleep(Duration::from_millis(100)).await;
        }

        assert!(zone.is_hvac_on());
    }
}
