//! Attack resolution: hit chance, damage rolls, crits, and cover/armor mitigation.
//!
//! The resolver only computes an [`AttackOutcome`]. Spending AP and ammo, applying
//! hp and armor changes, and handling deaths are the caller's job.

use crate::config::CombatTuning;
use crate::content::Weapon;
use crate::game::visibility::line_of_sight;
use crate::rng::SimRng;
use crate::state::{Actor, Map};
use crate::types::{Pos, RejectReason, TileKind, chebyshev};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    pub hit: bool,
    pub damage: u32,
    pub crit: bool,
    pub accuracy: u32,
    pub cover_pct: u32,
}

/// Cover granted by the single tile next to the defender, one step toward the attacker.
/// Intervening cover further along the line does not count.
pub fn cover_pct(map: &Map, defender: Pos, attacker: Pos) -> u32 {
    let guard = Pos {
        y: defender.y + (attacker.y - defender.y).signum(),
        x: defender.x + (attacker.x - defender.x).signum(),
    };
    if guard == attacker || guard == defender {
        return 0;
    }
    match map.tile_at(guard) {
        TileKind::CoverFull => 50,
        TileKind::CoverHalf => 25,
        _ => 0,
    }
}

pub fn range_falloff(weapon: &Weapon, distance: u32, tuning: &CombatTuning) -> u32 {
    distance.saturating_sub(weapon.range / 2) * tuning.falloff_per_tile
}

pub fn accuracy(weapon: &Weapon, distance: u32, cover_pct: u32, tuning: &CombatTuning) -> u32 {
    let penalty = i64::from(range_falloff(weapon, distance, tuning))
        + i64::from(cover_pct * tuning.cover_accuracy_scale / 100);
    let raw = i64::from(weapon.base_accuracy) - penalty;
    raw.clamp(i64::from(tuning.min_accuracy), i64::from(tuning.max_accuracy)) as u32
}

/// Checks that run before any AP or ammo is spent.
pub fn validate_attack(attacker: &Actor, target: Pos, map: &Map) -> Result<(), RejectReason> {
    if !map.in_bounds(target) {
        return Err(RejectReason::OutOfBounds);
    }
    let weapon = attacker.weapon.template();
    if chebyshev(attacker.pos, target) > weapon.range {
        return Err(RejectReason::OutOfRange);
    }
    if !attacker.weapon.has_ammo() {
        return Err(RejectReason::NoAmmo);
    }
    if !line_of_sight(map, attacker.pos, target) {
        return Err(RejectReason::NoLineOfSight);
    }
    Ok(())
}

/// Applies cover and flat armor to a raw damage roll. Hits always deal at least 1.
pub fn mitigate(raw: u32, cover_pct: u32, armor_pct: u32) -> u32 {
    let kept = u64::from(raw)
        * u64::from(100 - cover_pct.min(100))
        * u64::from(100 - armor_pct.min(100))
        / 10_000;
    (kept as u32).max(1)
}

/// Splits incoming damage between the player's armor pool and hp.
/// Returns `(absorbed, to_hp)`.
pub fn armor_split(damage: u32, armor_pool: u32, absorb_pct: u32) -> (u32, u32) {
    let absorbed = (damage * absorb_pct / 100).min(armor_pool);
    (absorbed, damage - absorbed)
}

pub fn resolve_attack(
    attacker: &Actor,
    defender: &Actor,
    map: &Map,
    rng: &mut dyn SimRng,
    tuning: &CombatTuning,
) -> AttackOutcome {
    let weapon = attacker.weapon.template();
    let distance = chebyshev(attacker.pos, defender.pos);
    let cover = cover_pct(map, defender.pos, attacker.pos);
    let accuracy = accuracy(&weapon, distance, cover, tuning);

    let hit = rng.roll_percent() < accuracy;
    if !hit {
        return AttackOutcome { hit, damage: 0, crit: false, accuracy, cover_pct: cover };
    }

    let mut raw = rng.range_inclusive(weapon.damage_min, weapon.damage_max);
    let crit = rng.chance_pct(tuning.base_crit_pct + attacker.skill_bonus);
    if crit {
        raw = raw * 3 / 2;
    }
    let damage = mitigate(raw, cover, defender.armor_pct());
    AttackOutcome { hit, damage, crit, accuracy, cover_pct: cover }
}
