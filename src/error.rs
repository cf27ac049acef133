// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Aquarea library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: value validation, wire payload parsing, and transport handoff.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with a HeishaMon-bridged heat pump.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while parsing a wire payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during transport communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained values
/// with invalid inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A zone identifier outside the fixed set of zones.
    ///
    /// The appliance has exactly two heating circuits, so this is a
    /// programmer error rather than a recoverable condition.
    #[error("no zone with id {0}")]
    InvalidZoneId(u8),

    /// A setpoint is outside the bounds of the active policy.
    #[error("setpoint {actual} is out of range [{min}, {max}] (step {step})")]
    OutOfRange {
        /// Minimum allowed setpoint.
        min: f32,
        /// Maximum allowed setpoint.
        max: f32,
        /// Setpoint granularity.
        step: f32,
        /// The value that was provided.
        actual: f32,
    },
}

/// Errors related to parsing inbound wire payloads.
///
/// Statuses carrying these errors are absorbed at the routing boundary with a
/// diagnostic; the last-known state is always retained.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A wire value outside the known encoding map for a bitfield.
    #[error("invalid {kind} encoding: {value:?}")]
    InvalidEncoding {
        /// Which bitfield the value was decoded for.
        kind: &'static str,
        /// The offending wire value.
        value: String,
    },

    /// A payload that cannot be parsed as the expected encoding.
    #[error("malformed payload {payload:?} on topic {topic:?}")]
    MalformedPayload {
        /// The topic the payload arrived on.
        topic: String,
        /// The raw payload.
        payload: String,
    },
}

/// Errors related to transport communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT publish or subscription handoff failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 15.0,
            max: 45.0,
            step: 1.0,
            actual: 46.0,
        };
        assert_eq!(
            err.to_string(),
            "setpoint 46 is out of range [15, 45] (step 1)"
        );
    }

    #[test]
    fn invalid_zone_id_display() {
        let err = ValueError::InvalidZoneId(3);
        assert_eq!(err.to_string(), "no zone with id 3");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidZoneId(0);
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidZoneId(0))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::InvalidEncoding {
            kind: "zone set",
            value: "3".to_string(),
        };
        assert_eq!(err.to_string(), "invalid zone set encoding: \"3\"");
    }

    #[test]
    fn malformed_payload_display() {
        let err = ParseError::MalformedPayload {
            topic: "aquarea/main/Z1_Temp".to_string(),
            payload: "warm".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed payload \"warm\" on topic \"aquarea/main/Z1_Temp\""
        );
    }
}
