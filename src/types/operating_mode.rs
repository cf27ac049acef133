// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Global operating modes of the appliance.
//!
//! The heat pump runs appliance-wide functions independently of the per-zone
//! activity: space heating and domestic hot water production. HeishaMon
//! reports the enabled functions as one `Operating_Mode_State` value.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Set of globally enabled appliance functions.
///
/// Like [`ZoneSet`](crate::types::ZoneSet) this is an explicit flag-set value
/// type, but unlike the zone encoding its wire value is a plain bitmask that
/// round-trips every subset **including the empty set** ("0" = nothing
/// enabled).
///
/// # Examples
///
/// ```
/// use aquarea_lib::types::OperatingMode;
///
/// let mode = OperatingMode::HEAT.union(OperatingMode::DHW);
/// assert_eq!(mode.encode(), 3);
/// assert!(mode.contains(OperatingMode::HEAT));
///
/// assert_eq!(OperatingMode::empty().encode(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatingMode(u8);

/// Mask covering every function the appliance has.
const ALL_MODES: u8 = 0b11;

impl OperatingMode {
    /// Space heating is enabled.
    pub const HEAT: Self = Self(0b01);

    /// Domestic hot water production is enabled.
    pub const DHW: Self = Self(0b10);

    /// No function is globally enabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the union of the two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the intersection of the two sets.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns the complement within the known function universe.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(!self.0 & ALL_MODES)
    }

    /// Returns the set with every flag of `flags` removed.
    #[must_use]
    pub const fn remove(self, flags: Self) -> Self {
        Self(self.0 & !flags.0)
    }

    /// Returns `true` if every flag of `flags` is enabled.
    #[must_use]
    pub const fn contains(&self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Returns `true` if nothing is enabled.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Decodes a wire value into an operating mode set.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidEncoding` for values outside the known map.
    pub fn decode(value: u8) -> Result<Self, ParseError> {
        if value <= ALL_MODES {
            Ok(Self(value))
        } else {
            Err(ParseError::InvalidEncoding {
                kind: "operating mode",
                value: value.to_string(),
            })
        }
    }

    /// Encodes the set to its wire value.
    ///
    /// Every subset is representable, so this is total.
    #[must_use]
    pub const fn encode(&self) -> u8 {
        self.0
    }

    /// Returns the UTF-8 wire payload.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.encode().to_string()
    }
}

impl FromStr for OperatingMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidEncoding {
                kind: "operating mode",
                value: s.to_string(),
            })?;
        Self::decode(value)
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "off"),
            0b01 => write!(f, "heat"),
            0b10 => write!(f, "dhw"),
            _ => write!(f, "heat+dhw"),
        }
    }
}
