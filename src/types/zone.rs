// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone identifiers and the zone activity bitfield.
//!
//! An Aquarea heat pump drives up to two heating circuits ("zones"). The
//! HeishaMon bridge reports which zones are requesting heat as a single
//! `Zones_State` value covering the whole appliance, modeled here as the
//! [`ZoneSet`] flag set.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, ValueError};

/// Identifier of one heating circuit on the appliance.
///
/// Valid zone ids are 1 and 2; anything else is rejected at construction
/// time.
///
/// # Examples
///
/// ```
/// use aquarea_lib::types::ZoneId;
///
/// let zone = ZoneId::new(1).unwrap();
/// assert_eq!(zone.value(), 1);
///
/// assert!(ZoneId::new(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneId(u8);

impl ZoneId {
    /// Creates a zone id.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidZoneId` if `id` is not 1 or 2.
    pub fn new(id: u8) -> Result<Self, ValueError> {
        match id {
            1 | 2 => Ok(Self(id)),
            other => Err(ValueError::InvalidZoneId(other)),
        }
    }

    /// Zone 1.
    #[must_use]
    pub const fn one() -> Self {
        Self(1)
    }

    /// Zone 2.
    #[must_use]
    pub const fn two() -> Self {
        Self(2)
    }

    /// Returns the numeric zone id (1 or 2).
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Bit assigned to this zone inside a [`ZoneSet`].
    const fn bit(self) -> u8 {
        1 << (self.0 - 1)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone {}", self.0)
    }
}

/// Set of zones currently requesting heat.
///
/// This is an explicit flag-set value type: membership, union, intersection
/// and complement are methods rather than operators, and the universe is the
/// fixed two-zone enumeration.
///
/// # Wire encoding
///
/// HeishaMon transmits the full set as a single value:
///
/// | wire | set              |
/// |------|------------------|
/// | 0    | {zone 1}         |
/// | 1    | {zone 2}         |
/// | 2    | {zone 1, zone 2} |
///
/// The empty set is a valid in-memory value ("no zone heating") but has **no
/// wire representation**: [`ZoneSet::decode`] never produces it and
/// [`ZoneSet::encode`] returns `None` for it. This is a limitation of the
/// appliance protocol, preserved as-is.
///
/// # Examples
///
/// ```
/// use aquarea_lib::types::{ZoneId, ZoneSet};
///
/// let both = ZoneSet::from(ZoneId::one()).union(ZoneSet::from(ZoneId::two()));
/// assert_eq!(both.encode(), Some(2));
/// assert!(both.contains(ZoneId::one()));
///
/// assert_eq!(ZoneSet::empty().encode(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSet(u8);

/// Mask covering every zone the appliance has.
const ALL_ZONES: u8 = 0b11;

impl ZoneSet {
    /// The empty set: no zone is requesting heat.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set containing both zones.
    #[must_use]
    pub const fn all() -> Self {
        Self(ALL_ZONES)
    }

    /// Creates a single-zone set from a raw zone id.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidZoneId` if `id` is not a recognized zone.
    pub fn from_zone_id(id: u8) -> Result<Self, ValueError> {
        ZoneId::new(id).map(Self::from)
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

    /// Returns the complement within the two-zone universe.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(!self.0 & ALL_ZONES)
    }

    /// Returns the set with `zone` added.
    #[must_use]
    pub const fn insert(self, zone: ZoneId) -> Self {
        Self(self.0 | zone.bit())
    }

    /// Returns the set with `zone` removed.
    #[must_use]
    pub const fn remove(self, zone: ZoneId) -> Self {
        Self(self.0 & !zone.bit())
    }

    /// Returns `true` if `zone` is a member of the set.
    #[must_use]
    pub const fn contains(&self, zone: ZoneId) -> bool {
        self.0 & zone.bit() != 0
    }

    /// Returns `true` if no zone is in the set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Decodes a wire value into a zone set.
    ///
    /// Decoding never produces the empty set; only construction does.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidEncoding` for values outside the known map.
    pub fn decode(value: u8) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Self::from(ZoneId::one())),
            1 => Ok(Self::from(ZoneId::two())),
            2 => Ok(Self::all()),
            other => Err(ParseError::InvalidEncoding {
                kind: "zone set",
                value: other.to_string(),
            }),
        }
    }

    /// Encodes the set to its wire value.
    ///
    /// Returns `None` for the empty set, which the wire format cannot
    /// represent.
    #[must_use]
    pub const fn encode(&self) -> Option<u8> {
        match self.0 {
            0b01 => Some(0),
            0b10 => Some(1),
            0b11 => Some(2),
            _ => None,
        }
    }

    /// Returns the UTF-8 wire payload, or `None` for the empty set.
    #[must_use]
    pub fn to_wire(&self) -> Option<String> {
        self.encode().map(|v| v.to_string())
    }
}

impl From<ZoneId> for ZoneSet {
    fn from(zone: ZoneId) -> Self {
        Self(zone.bit())
    }
}

impl FromStr for ZoneSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidEncoding {
                kind: "zone set",
                value: s.to_string(),
            })?;
        Self::decode(value)
    }
}

impl fmt::Display for ZoneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "no zones"),
            0b01 => write!(f, "zone 1"),
            0b10 => write!(f, "zone 2"),
            _ => write!(f, "zones 1+2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_id_valid() {
        assert_eq!(ZoneId::new(1).unwrap(), ZoneId::one());
        assert_eq!(ZoneId::new(2).unwrap(), ZoneId::two());
    }

    #[test]
    fn zone_id_invalid() {
        for id in [0, 3, 255] {
            let result = ZoneId::new(id);
            assert!(matches!(result, Err(ValueError::InvalidZoneId(i)) if i == id));
        }
    }

    #[test]
    fn wire_round_trip() {
        for v in 0..=2 {
            let set = ZoneSet::decode(v).unwrap();
            assert_eq!(set.encode(), Some(v));
        }
    }

    #[test]
    fn decode_out_of_map() {
        let result = ZoneSet::decode(3);
        assert!(matches!(
            result,
            Err(ParseError::InvalidEncoding {
                kind: "zone set",
                ..
            })
        ));
    }

    #[test]
    fn decode_never_produces_empty() {
        for v in 0..=2 {
            assert!(!ZoneSet::decode(v).unwrap().is_empty());
        }
    }

    #[test]
    fn zones_are_disjoint() {
        let z1 = ZoneSet::from(ZoneId::one());
        let z2 = ZoneSet::from(ZoneId::two());
        assert!(z1.intersect(z2).is_empty());
        assert_eq!(z1.union(z2).encode(), Some(2));
    }

    #[test]
    fn empty_set_has_no_encoding() {
        assert_eq!(ZoneSet::empty().encode(), None);
        assert_eq!(ZoneSet::empty().to_wire(), None);
    }

    #[test]
    fn membership() {
        let set = ZoneSet::from(ZoneId::one());
        assert!(set.contains(ZoneId::one()));
        assert!(!set.contains(ZoneId::two()));
    }

    #[test]
    fn insert_remove() {
        let set = ZoneSet::empty().insert(ZoneId::two());
        assert!(set.contains(ZoneId::two()));
        assert!(set.remove(ZoneId::two()).is_empty());
        // Removing an absent zone is a no-op.
        assert_eq!(set.remove(ZoneId::one()), set);
    }

    #[test]
    fn complement_within_universe() {
        let z1 = ZoneSet::from(ZoneId::one());
        assert_eq!(z1.complement(), ZoneSet::from(ZoneId::two()));
        assert_eq!(ZoneSet::all().complement(), ZoneSet::empty());
        assert_eq!(ZoneSet::empty().complement(), ZoneSet::all());
    }

    #[test]
    fn from_zone_id_rejects_unknown() {
        assert!(ZoneSet::from_zone_id(1).is_ok());
        assert!(ZoneSet::from_zone_id(2).is_ok());
        assert!(matches!(
            ZoneSet::from_zone_id(5),
            Err(ValueError::InvalidZoneId(5))
        ));
    }

    #[test]
    fn from_str_wire_payloads() {
        assert_eq!(
            "0".parse::<ZoneSet>().unwrap(),
            ZoneSet::from(ZoneId::one())
        );
        assert_eq!(
            "1".parse::<ZoneSet>().unwrap(),
            ZoneSet::from(ZoneId::two())
        );
        assert_eq!("2".parse::<ZoneSet>().unwrap(), ZoneSet::all());
        assert!("3".parse::<ZoneSet>().is_err());
        assert!("on".parse::<ZoneSet>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(ZoneSet::empty().to_string(), "no zones");
        assert_eq!(ZoneSet::all().to_string(), "zones 1+2");
        assert_eq!(ZoneId::one().to_string(), "zone 1");
    }
}
