//! Tunable simulation parameters.
//! Every section deserializes with defaults, so a partial TOML file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::types::WeaponKind;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub player: PlayerTuning,
    pub combat: CombatTuning,
    pub ai: AiTuning,
    pub corruption: CorruptionTuning,
    pub items: ItemTuning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_hp: i32,
    pub max_ap: u32,
    pub max_armor: u32,
    pub weapon: WeaponKind,
    pub skill_bonus: u32,
    pub sight_radius: u32,
    pub move_ap_cost: u32,
    pub reload_ap_cost: u32,
    pub item_ap_cost: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_hp: 30,
            max_ap: 4,
            max_armor: 10,
            weapon: WeaponKind::Rifle,
            skill_bonus: 5,
            sight_radius: 8,
            move_ap_cost: 1,
            reload_ap_cost: 1,
            item_ap_cost: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub base_crit_pct: u32,
    /// Accuracy lost per whole unit of cover reduction.
    pub cover_accuracy_scale: u32,
    pub falloff_per_tile: u32,
    pub min_accuracy: u32,
    pub max_accuracy: u32,
    /// Share of incoming damage the player's armor pool may absorb.
    pub armor_absorb_pct: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            base_crit_pct: 5,
            cover_accuracy_scale: 40,
            falloff_per_tile: 3,
            min_accuracy: 5,
            max_accuracy: 95,
            armor_absorb_pct: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub alert_cooldown_turns: u8,
    pub teleport_chance_pct: u32,
    pub teleport_radius: u32,
    pub corpse_heal: u32,
    pub explosion_radius: u32,
    pub explosion_damage: u32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            alert_cooldown_turns: 3,
            teleport_chance_pct: 35,
            teleport_radius: 2,
            corpse_heal: 6,
            explosion_radius: 2,
            explosion_damage: 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionTuning {
    pub max: u32,
    pub per_turn: u32,
    pub heat_move: u32,
    pub heat_attack: u32,
    pub heat_explosive: u32,
    pub heat_hit_taken: u32,
    pub mutation_threshold: u32,
    pub spawn_threshold: u32,
    pub boss_threshold: u32,
    pub mutation_base_pct: u32,
    pub mutation_cap_pct: u32,
    pub spawn_base_pct: u32,
    pub spawn_cap_pct: u32,
    /// Corruption points above a threshold per extra percent of trigger chance.
    pub chance_step: u32,
    pub min_spawn_distance: u32,
    /// Enemy damage gains one percent per this many corruption points.
    pub damage_scaling_divisor: u32,
}

impl Default for CorruptionTuning {
    fn default() -> Self {
        Self {
            max: 1000,
            per_turn: 5,
            heat_move: 1,
            heat_attack: 4,
            heat_explosive: 10,
            heat_hit_taken: 3,
            mutation_threshold: 200,
            spawn_threshold: 400,
            boss_threshold: 1000,
            mutation_base_pct: 10,
            mutation_cap_pct: 35,
            spawn_base_pct: 8,
            spawn_cap_pct: 25,
            chance_step: 20,
            min_spawn_distance: 8,
            damage_scaling_divisor: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTuning {
    pub medkit_heal: u32,
    pub grenade_damage: u32,
    pub grenade_radius: u32,
    pub grenade_range: u32,
    pub grenade_burn_turns: u32,
    pub purge_amount: u32,
    pub stim_ap: u32,
}

impl Default for ItemTuning {
    fn default() -> Self {
        Self {
            medkit_heal: 12,
            grenade_damage: 14,
            grenade_radius: 1,
            grenade_range: 5,
            grenade_burn_turns: 2,
            purge_amount: 100,
            stim_ap: 2,
        }
    }
}
