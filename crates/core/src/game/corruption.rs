//! Global corruption counter and the escalation it drives at turn end:
//! enemy mutations, elevated spawns and the single boss.

use super::*;
use crate::config::CorruptionTuning;
use crate::content::{BOSS_KIND, ELEVATED_SPAWNS, Tier, enemy_template};
use crate::state::WeaponInstance;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatSource {
    Move,
    Attack,
    Explosive,
    HitTaken,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorruptionState {
    pub value: u32,
    /// Action heat recorded this turn, folded into `value` at turn end.
    pub pending_heat: u32,
    pub boss_spawned: bool,
}

impl CorruptionState {
    pub fn record_heat(&mut self, source: HeatSource, tuning: &CorruptionTuning) {
        self.pending_heat += match source {
            HeatSource::Move => tuning.heat_move,
            HeatSource::Attack => tuning.heat_attack,
            HeatSource::Explosive => tuning.heat_explosive,
            HeatSource::HitTaken => tuning.heat_hit_taken,
        };
    }

    /// Explicit reduction from a purge. Returns `(from, to)`.
    pub fn reduce(&mut self, amount: u32) -> (u32, u32) {
        let from = self.value;
        self.value = self.value.saturating_sub(amount);
        (from, self.value)
    }

    /// Percent applied to enemy damage; 100 at zero corruption.
    pub fn damage_multiplier_pct(&self, tuning: &CorruptionTuning) -> u32 {
        100 + self.value / tuning.damage_scaling_divisor.max(1)
    }
}

/// Base chance plus one percent per `chance_step` points past the threshold, capped.
pub fn escalation_chance(value: u32, threshold: u32, base: u32, cap: u32, step: u32) -> u32 {
    if value < threshold {
        return 0;
    }
    (base + (value - threshold) / step.max(1)).min(cap)
}

impl Game {
    pub(super) fn corruption_turn_end(&mut self, events: &mut Vec<SimEvent>) {
        let tuning = self.config.corruption.clone();
        let from = self.corruption.value;
        let to = (from + tuning.per_turn + self.corruption.pending_heat).min(tuning.max);
        self.corruption.pending_heat = 0;
        self.corruption.value = to;
        if to != from {
            events.push(SimEvent::CorruptionChanged { from, to });
        }
        let thresholds = [tuning.mutation_threshold, tuning.spawn_threshold, tuning.boss_threshold];
        for threshold in thresholds {
            if from < threshold && to >= threshold {
                tracing::debug!(threshold, "corruption threshold crossed");
                events.push(SimEvent::ThresholdCrossed { threshold });
            }
        }

        if to >= tuning.mutation_threshold {
            let chance = escalation_chance(
                to,
                tuning.mutation_threshold,
                tuning.mutation_base_pct,
                tuning.mutation_cap_pct,
                tuning.chance_step,
            );
            if self.rng.chance_pct(chance) {
                self.mutate_random_enemy(events);
            }
        }

        if to >= tuning.spawn_threshold {
            let chance = escalation_chance(
                to,
                tuning.spawn_threshold,
                tuning.spawn_base_pct,
                tuning.spawn_cap_pct,
                tuning.chance_step,
            );
            if self.rng.chance_pct(chance) {
                let kind = ELEVATED_SPAWNS[self.rng.pick_index(ELEVATED_SPAWNS.len())];
                if let Some(pos) = self.pick_spawn_tile(tuning.min_spawn_distance) {
                    let actor = self.state.spawn_enemy(kind, pos);
                    tracing::debug!(?kind, ?pos, "corruption spawn");
                    events.push(SimEvent::EnemySpawned { actor, kind, pos });
                }
            }
        }

        if to >= tuning.boss_threshold && !self.corruption.boss_spawned {
            match self.pick_spawn_tile(tuning.min_spawn_distance) {
                Some(pos) => {
                    let actor = self.state.spawn_enemy(BOSS_KIND, pos);
                    self.corruption.boss_spawned = true;
                    tracing::debug!(?pos, "boss spawned");
                    events.push(SimEvent::BossSpawned { actor, pos });
                }
                None => tracing::debug!("no tile qualifies for the boss; retrying next turn"),
            }
        }
    }

    fn mutate_random_enemy(&mut self, events: &mut Vec<SimEvent>) {
        let candidates: Vec<(ActorId, EnemyKind, EnemyKind)> = self
            .state
            .actors
            .iter()
            .filter_map(|actor| {
                let template = actor.template()?;
                let variant = template.variant?;
                (template.tier == Tier::Low).then_some((actor.id, template.kind, variant))
            })
            .collect();
        if candidates.is_empty() {
            return;
        }
        let (id, from, to) = candidates[self.rng.pick_index(candidates.len())];
        let Some(actor) = self.state.actors.get_mut(id) else {
            return;
        };

        let upgraded = enemy_template(to);
        let taken = actor.max_hp - actor.hp;
        actor.kind = ActorKind::Enemy(to);
        actor.max_hp = upgraded.hp;
        actor.hp = (upgraded.hp - taken).max(1);
        actor.max_ap = upgraded.ap;
        actor.ap = actor.ap.min(upgraded.ap);
        actor.weapon = WeaponInstance::new(upgraded.weapon);

        tracing::debug!(?from, ?to, "enemy mutated");
        events.push(SimEvent::EnemyTransformed { actor: id, from, to });
    }

    /// Vents first, then plain floor; only free tiles far enough from the player.
    fn pick_spawn_tile(&mut self, min_distance: u32) -> Option<Pos> {
        let player_pos = self.state.player_pos();
        let qualifies =
            |pos: Pos| self.state.is_free(pos) && chebyshev(pos, player_pos) >= min_distance;

        let vents: Vec<Pos> = self
            .state
            .map
            .positions()
            .filter(|pos| self.state.map.tile_at(*pos) == TileKind::Vent && qualifies(*pos))
            .collect();
        let candidates = if vents.is_empty() {
            self.state
                .map
                .positions()
                .filter(|pos| self.state.map.tile_at(*pos) == TileKind::Floor && qualifies(*pos))
                .collect()
        } else {
            vents
        };
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.rng.pick_index(candidates.len())])
    }
}
