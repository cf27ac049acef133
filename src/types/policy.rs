// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoint interpretation policies.
//!
//! The appliance interprets a zone's requested temperature either as an
//! absolute target or as a compensation-curve offset, depending on its
//! configured heating mode. The active policy determines the bounds the
//! consumer may set.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ValueError};

/// How a zone's setpoint is interpreted by the appliance.
///
/// The policy is reported on the `Heating_Mode` status topic and applies to
/// both zones at once. Exactly one policy is active per zone at any time.
///
/// # Examples
///
/// ```
/// use aquarea_lib::types::SetpointPolicy;
///
/// let direct = SetpointPolicy::Direct;
/// assert_eq!(direct.bounds().max, 45.0);
///
/// let comp = SetpointPolicy::Compensation;
/// assert_eq!(comp.bounds().min, -5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetpointPolicy {
    /// The setpoint is an offset from the compensation-curve target.
    Compensation,
    /// The setpoint is an absolute target temperature.
    Direct,
}

impl SetpointPolicy {
    /// Returns the setpoint bounds that apply under this policy.
    #[must_use]
    pub const fn bounds(self) -> SetpointBounds {
        match self {
            Self::Compensation => SetpointBounds {
                min: -5.0,
                max: 5.0,
                step: 1.0,
            },
            Self::Direct => SetpointBounds {
                min: 15.0,
                max: 45.0,
                step: 1.0,
            },
        }
    }

    /// Decodes a wire value into a policy.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidEncoding` for values outside the known map.
    pub fn decode(value: u8) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Self::Compensation),
            1 => Ok(Self::Direct),
            other => Err(ParseError::InvalidEncoding {
                kind: "setpoint policy",
                value: other.to_string(),
            }),
        }
    }

    /// Encodes the policy to its wire value.
    #[must_use]
    pub const fn encode(self) -> u8 {
        match self {
            Self::Compensation => 0,
            Self::Direct => 1,
        }
    }
}

impl FromStr for SetpointPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidEncoding {
                kind: "setpoint policy",
                value: s.to_string(),
            })?;
        Self::decode(value)
    }
}

impl fmt::Display for SetpointPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compensation => write!(f, "compensation"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// Setpoint bounds advertised for a zone under its active policy.
///
/// Under [`SetpointPolicy::Direct`] the unit is an absolute temperature in
/// degrees Celsius; under [`SetpointPolicy::Compensation`] it is a relative
/// offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetpointBounds {
    /// Minimum allowed setpoint.
    pub min: f32,
    /// Maximum allowed setpoint.
    pub max: f32,
    /// Setpoint granularity.
    pub step: f32,
}

impl SetpointBounds {
    /// Tolerance for step alignment of decimal wire values.
    const STEP_EPSILON: f32 = 1e-4;

    /// Validates a requested setpoint against these bounds.
    ///
    /// A value is valid when it lies within `[min, max]` and is aligned to
    /// `step` counted from `min`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if violated.
    pub fn validate(&self, value: f32) -> Result<(), ValueError> {
        let aligned = {
            let steps = (value - self.min) / self.step;
            (steps - steps.round()).abs() <= Self::STEP_EPSILON
        };
        if value < self.min || value > self.max || !aligned {
            return Err(ValueError::OutOfRange {
                min: self.min,
                max: self.max,
                step: self.step,
                actual: value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_bounds() {
        let bounds = SetpointPolicy::Direct.bounds();
        assert_eq!(bounds.min, 15.0);
        assert_eq!(bounds.max, 45.0);
        assert_eq!(bounds.step, 1.0);
    }

    #[test]
    fn compensation_bounds() {
        let bounds = SetpointPolicy::Compensation.bounds();
        assert_eq!(bounds.min, -5.0);
        assert_eq!(bounds.max, 5.0);
        assert_eq!(bounds.step, 1.0);
    }

    #[test]
    fn direct_validation() {
        let bounds = SetpointPolicy::Direct.bounds();
        assert!(bounds.validate(45.0).is_ok());
        assert!(bounds.validate(15.0).is_ok());
        assert!(matches!(
            bounds.validate(46.0),
            Err(ValueError::OutOfRange { .. })
        ));
        assert!(bounds.validate(14.0).is_err());
    }

    #[test]
    fn compensation_validation() {
        let bounds = SetpointPolicy::Compensation.bounds();
        assert!(bounds.validate(5.0).is_ok());
        assert!(bounds.validate(-5.0).is_ok());
        assert!(bounds.validate(0.0).is_ok());
        assert!(bounds.validate(6.0).is_err());
        assert!(bounds.validate(-6.0).is_err());
    }

    #[test]
    fn step_misalignment_is_out_of_range() {
        let bounds = SetpointPolicy::Direct.bounds();
        assert!(matches!(
            bounds.validate(20.5),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn wire_round_trip() {
        for v in 0..=1 {
            let policy = SetpointPolicy::decode(v).unwrap();
            assert_eq!(policy.encode(), v);
        }
    }

    #[test]
    fn from_str_wire_payloads() {
        assert_eq!(
            "0".parse::<SetpointPolicy>().unwrap(),
            SetpointPolicy::Compensation
        );
        assert_eq!(
            "1".parse::<SetpointPolicy>().unwrap(),
            SetpointPolicy::Direct
        );
        assert!("2".parse::<SetpointPolicy>().is_err());
        assert!("direct".parse::<SetpointPolicy>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(SetpointPolicy::Compensation.to_string(), "compensation");
        assert_eq!(SetpointPolicy::Direct.to_string(), "direct");
    }
}
