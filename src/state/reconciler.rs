// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone state reconciliation.
//!
//! The appliance broadcasts two independent statuses that jointly determine
//! whether a zone is heating: the set of zones requesting heat
//! (`Zones_State`) and the globally enabled functions
//! (`Operating_Mode_State`). The [`Reconciler`] caches the last-known value
//! of each, derives the per-zone on/off state, and plans the minimal set of
//! outbound commands needed to reach a requested state without disturbing
//! anything the request did not name — in particular the shared heat flag
//! while the other zone is still active, and unrelated global functions such
//! as hot water production.
//!
//! # Two-phase updates
//!
//! Planning is side-effect free. Callers publish the planned commands first
//! and [`commit`](Reconciler::commit) the plan only once every publish was
//! handed to the transport, so a failed handoff never leaves the cache
//! claiming a state the appliance was not asked for.

use crate::command::ClimateCommand;
use crate::types::{OperatingMode, ZoneId, ZoneSet};

/// Last-known appliance state and command planning.
///
/// Both bitfields start empty, meaning "unknown" until the first status
/// arrives on each topic. Statuses replace their field wholesale — the wire
/// always transmits full sets, never deltas — and each field updates
/// independently of whether the other has ever been received.
///
/// All reads and writes for one appliance must happen under a single
/// serialization domain; see [`HeatPump`](crate::climate::HeatPump), which
/// owns the reconciler behind a mutex held from planning through commit.
///
/// # Examples
///
/// ```
/// use aquarea_lib::state::Reconciler;
/// use aquarea_lib::types::{OperatingMode, ZoneId, ZoneSet};
///
/// let mut rec = Reconciler::new();
/// rec.apply_zones(ZoneSet::from(ZoneId::one()));
/// rec.apply_operating_mode(OperatingMode::HEAT);
/// assert!(rec.is_zone_active(ZoneId::one()));
/// assert!(!rec.is_zone_active(ZoneId::two()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciler {
    zones: ZoneSet,
    operating_mode: OperatingMode,
}

impl Reconciler {
    /// Creates a reconciler with both bitfields unknown (empty).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last-known zone set.
    #[must_use]
    pub const fn zones(&self) -> ZoneSet {
        self.zones
    }

    /// Returns the last-known operating mode.
    #[must_use]
    pub const fn operating_mode(&self) -> OperatingMode {
        self.operating_mode
    }

    /// Replaces the cached zone set with a freshly received status.
    ///
    /// Returns `true` if the cached value changed. Re-applying the same set
    /// (duplicate delivery) is a no-op.
    pub fn apply_zones(&mut self, zones: ZoneSet) -> bool {
        if self.zones == zones {
            return false;
        }
        self.zones = zones;
        true
    }

    /// Replaces the cached operating mode with a freshly received status.
    ///
    /// Returns `true` if the cached value changed.
    pub fn apply_operating_mode(&mut self, mode: OperatingMode) -> bool {
        if self.operating_mode == mode {
            return false;
        }
        self.operating_mode = mode;
        true
    }

    /// Derives a zone's on/off control state.
    ///
    /// A zone is heating exactly when it is requesting heat *and* heating is
    /// globally enabled. This is always recomputed from the two cached
    /// bitfields, never stored, so the two can never diverge.
    #[must_use]
    pub const fn is_zone_active(&self, zone: ZoneId) -> bool {
        self.zones.contains(zone) && self.operating_mode.contains(OperatingMode::HEAT)
    }

    /// Plans the commands needed to turn a zone on.
    ///
    /// The target state is `zones ∪ {zone}` with heating globally enabled.
    /// A command is emitted per field only when the target differs from the
    /// cached value, with the operating-mode command strictly first: the
    /// global enable must reach the appliance no later than the per-zone
    /// request, or the zone would transiently request heat while heating is
    /// disabled.
    ///
    /// Requesting a zone that is already on yields an empty plan, even when
    /// the cache is stale relative to the physical device — the last
    /// received status is always trusted.
    #[must_use]
    pub fn plan_zone_on(&self, zone: ZoneId) -> TransitionPlan {
        let zones = self.zones.insert(zone);
        let operating_mode = self.operating_mode.union(OperatingMode::HEAT);
        self.plan_towards(zones, operating_mode)
    }

    /// Plans the commands needed to turn a zone off.
    ///
    /// The target zone set is `zones \ {zone}`. Turning off the last active
    /// zone also disables heating globally (other functions such as hot
    /// water are untouched). An empty target zone set is never emitted as a
    /// command — the wire encoding cannot represent it — so that case relies
    /// on the appliance's default behavior when heating is globally
    /// disabled.
    #[must_use]
    pub fn plan_zone_off(&self, zone: ZoneId) -> TransitionPlan {
        let zones = self.zones.remove(zone);
        let operating_mode = if zones.is_empty() {
            self.operating_mode.remove(OperatingMode::HEAT)
        } else {
            self.operating_mode
        };
        self.plan_towards(zones, operating_mode)
    }

    /// Builds the ordered command delta from the cached state to a target.
    fn plan_towards(&self, zones: ZoneSet, operating_mode: OperatingMode) -> TransitionPlan {
        let mut commands = Vec::new();
        if operating_mode != self.operating_mode {
            commands.push(ClimateCommand::SetOperatingMode(operating_mode));
        }
        if zones != self.zones && !zones.is_empty() {
            commands.push(ClimateCommand::SetZones(zones));
        }
        TransitionPlan {
            commands,
            zones,
            operating_mode,
        }
    }

    /// Commits a plan's target state into the cache.
    ///
    /// Called after every command of the plan was handed to the transport.
    /// The update is optimistic: the next authoritative status broadcast
    /// corrects any divergence from what the appliance actually did.
    pub fn commit(&mut self, plan: &TransitionPlan) {
        self.zones = plan.zones;
        self.operating_mode = plan.operating_mode;
    }
}

/// A planned transition: the ordered outbound commands and the target state
/// to cache once they are published.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    commands: Vec<ClimateCommand>,
    zones: ZoneSet,
    operating_mode: OperatingMode,
}

impl TransitionPlan {
    /// The commands to publish, in order (0, 1 or 2 entries).
    #[must_use]
    pub fn commands(&self) -> &[ClimateCommand] {
        &self.commands
    }

    /// The zone set to cache on commit.
    #[must_use]
    pub const fn zones(&self) -> ZoneSet {
        self.zones
    }

    /// The operating mode to cache on commit.
    #[must_use]
    pub const fn operating_mode(&self) -> OperatingMode {
        self.operating_mode
    }

    /// Returns `true` if the requested state is already the cached state.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone1() -> ZoneId {
        ZoneId::one()
    }

    fn zone2() -> ZoneId {
        ZoneId::two()
    }

    #[test]
    fn starts_unknown() {
        let rec = Reconciler::new();
        assert!(rec.zones().is_empty());
        assert!(rec.operating_mode().is_empty());
        assert!(!rec.is_zone_active(zone1()));
    }

    #[test]
    fn derived_state_needs_both_fields() {
        let mut rec = Reconciler::new();

        rec.apply_zones(ZoneSet::from(zone1()));
        assert!(!rec.is_zone_active(zone1()), "heat not globally enabled");

        rec.apply_operating_mode(OperatingMode::HEAT);
        assert!(rec.is_zone_active(zone1()));
        assert!(!rec.is_zone_active(zone2()));
    }

    #[test]
    fn statuses_apply_independently_in_any_order() {
        let mut a = Reconciler::new();
        a.apply_zones(ZoneSet::from(zone2()));
        a.apply_operating_mode(OperatingMode::HEAT);

        let mut b = Reconciler::new();
        b.apply_operating_mode(OperatingMode::HEAT);
        b.apply_zones(ZoneSet::from(zone2()));

        assert_eq!(a, b);
        assert!(a.is_zone_active(zone2()));
    }

    #[test]
    fn duplicate_status_is_noop() {
        let mut rec = Reconciler::new();
        assert!(rec.apply_zones(ZoneSet::from(zone1())));
        assert!(!rec.apply_zones(ZoneSet::from(zone1())));
        assert!(rec.apply_operating_mode(OperatingMode::HEAT));
        assert!(!rec.apply_operating_mode(OperatingMode::HEAT));
    }

    #[test]
    fn zone_on_from_cold_emits_mode_then_zones() {
        let rec = Reconciler::new();
        let plan = rec.plan_zone_on(zone1());

        assert_eq!(
            plan.commands(),
            &[
                ClimateCommand::SetOperatingMode(OperatingMode::HEAT),
                ClimateCommand::SetZones(ZoneSet::from(zone1())),
            ]
        );
    }

    #[test]
    fn zone_on_is_idempotent_after_commit() {
        let mut rec = Reconciler::new();

        let plan = rec.plan_zone_on(zone1());
        assert_eq!(plan.commands().len(), 2);
        rec.commit(&plan);

        let again = rec.plan_zone_on(zone1());
        assert!(again.is_noop());
    }

    #[test]
    fn zone_on_with_heat_already_enabled_emits_only_zones() {
        let mut rec = Reconciler::new();
        rec.apply_zones(ZoneSet::from(zone1()));
        rec.apply_operating_mode(OperatingMode::HEAT);

        let plan = rec.plan_zone_on(zone2());
        assert_eq!(plan.commands(), &[ClimateCommand::SetZones(ZoneSet::all())]);
    }

    #[test]
    fn zone_member_but_heat_disabled_emits_only_mode() {
        let mut rec = Reconciler::new();
        rec.apply_zones(ZoneSet::from(zone1()));

        let plan = rec.plan_zone_on(zone1());
        assert_eq!(
            plan.commands(),
            &[ClimateCommand::SetOperatingMode(OperatingMode::HEAT)]
        );
    }

    #[test]
    fn last_zone_off_disables_heat_without_zone_command() {
        let mut rec = Reconciler::new();
        rec.apply_zones(ZoneSet::from(zone1()));
        rec.apply_operating_mode(OperatingMode::HEAT);

        let plan = rec.plan_zone_off(zone1());
        assert_eq!(
            plan.commands(),
            &[ClimateCommand::SetOperatingMode(OperatingMode::empty())]
        );
        assert!(plan.zones().is_empty());
    }

    #[test]
    fn mixed_zone_off_leaves_operating_mode_untouched() {
        let mut rec = Reconciler::new();
        rec.apply_zones(ZoneSet::all());
        rec.apply_operating_mode(OperatingMode::HEAT);

        let plan = rec.plan_zone_off(zone1());
        assert_eq!(
            plan.commands(),
            &[ClimateCommand::SetZones(ZoneSet::from(zone2()))]
        );
        assert_eq!(plan.operating_mode(), OperatingMode::HEAT);
    }

    #[test]
    fn zone_off_when_already_off_is_noop() {
        let rec = Reconciler::new();
        assert!(rec.plan_zone_off(zone1()).is_noop());

        let mut rec = Reconciler::new();
        rec.apply_zones(ZoneSet::from(zone2()));
        rec.apply_operating_mode(OperatingMode::HEAT);
        // Zone 1 is not in the set; nothing to do.
        assert!(rec.plan_zone_off(zone1()).is_noop());
    }

    #[test]
    fn dhw_survives_heat_toggling() {
        let mut rec = Reconciler::new();
        rec.apply_zones(ZoneSet::from(zone1()));
        rec.apply_operating_mode(OperatingMode::HEAT.union(OperatingMode::DHW));

        let plan = rec.plan_zone_off(zone1());
        assert_eq!(
            plan.commands(),
            &[ClimateCommand::SetOperatingMode(OperatingMode::DHW)]
        );
        rec.commit(&plan);
        assert!(rec.operating_mode().contains(OperatingMode::DHW));

        let plan = rec.plan_zone_on(zone1());
        assert_eq!(
            plan.commands(),
            &[
                ClimateCommand::SetOperatingMode(OperatingMode::HEAT.union(OperatingMode::DHW)),
                ClimateCommand::SetZones(ZoneSet::from(zone1())),
            ]
        );
    }

    #[test]
    fn commit_is_what_makes_the_update_visible() {
        let mut rec = Reconciler::new();
        let plan = rec.plan_zone_on(zone1());

        // Planning alone must not mutate the cache.
        assert!(rec.zones().is_empty());
        assert!(!rec.is_zone_active(zone1()));

        rec.commit(&plan);
        assert!(rec.is_zone_active(zone1()));
    }

    #[test]
    fn stale_cache_is_trusted_over_assumptions() {
        let mut rec = Reconciler::new();
        // The appliance reports both zones heating.
        rec.apply_zones(ZoneSet::all());
        rec.apply_operating_mode(OperatingMode::HEAT);

        // Zone 2 on: already on per the last status, so nothing is sent
        // regardless of what the physical device is doing right now.
        assert!(rec.plan_zone_on(zone2()).is_noop());
    }
}
