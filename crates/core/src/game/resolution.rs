//! Applying attack outcomes and damage to the registry.
//!
//! Deaths can trigger more work (a bloater's blast, a howler's broadcast). That work
//! goes on an explicit FIFO [`Consequence`] queue which is drained before the
//! triggering call returns, so chains resolve synchronously in a fixed order.

use std::collections::VecDeque;

use super::*;
use crate::content::Abilities;
use crate::game::combat::{armor_split, resolve_attack};
use crate::game::status::apply_effect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consequence {
    Damage { target: ActorId, amount: u32, source: DamageSource },
    Explode { center: Pos, radius: u32, damage: u32, burn_turns: u32 },
    AlertAll { source: ActorId },
}

/// Full damage at the center, dropping linearly to zero one tile past `radius`.
pub fn explosion_falloff(damage: u32, radius: u32, distance: u32) -> u32 {
    if distance > radius {
        return 0;
    }
    damage * (radius + 1 - distance) / (radius + 1)
}

impl Game {
    pub(super) fn resolve(&mut self, first: Consequence, events: &mut Vec<SimEvent>) {
        self.drain_consequences(VecDeque::from([first]), events);
    }

    pub(super) fn drain_consequences(
        &mut self,
        mut queue: VecDeque<Consequence>,
        events: &mut Vec<SimEvent>,
    ) {
        while let Some(consequence) = queue.pop_front() {
            match consequence {
                Consequence::Damage { target, amount, source } => {
                    self.apply_damage(target, amount, source, &mut queue, events);
                }
                Consequence::Explode { center, radius, damage, burn_turns } => {
                    self.explode(center, radius, damage, burn_turns, &mut queue, events);
                }
                Consequence::AlertAll { source } => self.broadcast_alert(source, events),
            }
        }
    }

    /// Resolves one attack between two live actors. AP is the caller's concern;
    /// ammo is spent here whether or not the shot lands.
    pub(super) fn perform_attack(
        &mut self,
        attacker_id: ActorId,
        target_id: ActorId,
        events: &mut Vec<SimEvent>,
    ) {
        let (Some(attacker), Some(defender)) = (
            self.state.actors.get(attacker_id).cloned(),
            self.state.actors.get(target_id).cloned(),
        ) else {
            return;
        };

        let mut outcome = resolve_attack(
            &attacker,
            &defender,
            &self.state.map,
            self.rng.as_mut(),
            &self.config.combat,
        );
        if let Some(actor) = self.state.actors.get_mut(attacker_id)
            && let Some(ammo) = actor.weapon.ammo.as_mut()
        {
            *ammo = ammo.saturating_sub(1);
        }
        if outcome.hit && !attacker.is_player() {
            let scale = self.corruption.damage_multiplier_pct(&self.config.corruption);
            outcome.damage = (outcome.damage * scale / 100).max(1);
        }

        events.push(SimEvent::AttackResolved {
            attacker: attacker_id,
            target: target_id,
            hit: outcome.hit,
            crit: outcome.crit,
            damage: outcome.damage,
            accuracy: outcome.accuracy,
        });
        if !outcome.hit {
            return;
        }

        let weapon = attacker.weapon.template();
        self.resolve(
            Consequence::Damage {
                target: target_id,
                amount: outcome.damage,
                source: DamageSource::Attack { attacker: attacker_id },
            },
            events,
        );
        if let Some((effect, duration)) = weapon.on_hit {
            self.apply_status(target_id, effect, duration, events);
        }
        if weapon.melee && attacker.abilities().contains(Abilities::DESTROYS_COVER) {
            self.destroy_cover_around(defender.pos, events);
        }
    }

    pub(super) fn apply_status(
        &mut self,
        id: ActorId,
        effect: EffectKind,
        duration: u32,
        events: &mut Vec<SimEvent>,
    ) {
        let Some(actor) = self.state.actors.get_mut(id) else {
            return;
        };
        if actor.hp <= 0 || duration == 0 {
            return;
        }
        apply_effect(actor, effect, duration);
        events.push(SimEvent::StatusApplied { actor: id, effect, duration });
    }

    fn apply_damage(
        &mut self,
        target: ActorId,
        amount: u32,
        source: DamageSource,
        queue: &mut VecDeque<Consequence>,
        events: &mut Vec<SimEvent>,
    ) {
        let absorb_pct = self.config.combat.armor_absorb_pct;
        // Stale ids (already dead earlier in the chain) are skipped.
        let Some(actor) = self.state.actors.get_mut(target) else {
            return;
        };
        if actor.hp <= 0 {
            return;
        }

        let (absorbed, to_hp) = if actor.is_player() {
            armor_split(amount, actor.armor, absorb_pct)
        } else {
            (0, amount)
        };
        actor.armor -= absorbed;
        actor.hp = (actor.hp - to_hp as i32).max(0);
        let (is_player, hp, pos, kind) = (actor.is_player(), actor.hp, actor.pos, actor.kind);
        events.push(SimEvent::DamageTaken {
            actor: target,
            amount: to_hp,
            armor_absorbed: absorbed,
            source,
        });

        if is_player {
            // status ticks are not hits
            if source != DamageSource::Status {
                self.corruption.record_heat(HeatSource::HitTaken, &self.config.corruption);
            }
            if hp == 0 {
                events.push(SimEvent::ActorDied { actor: target, kind, pos });
                self.end_mission(RunOutcome::Defeat, events);
            }
            return;
        }
        if hp > 0 {
            return;
        }

        let Some(dead) = self.state.actors.remove(target) else {
            return;
        };
        self.state.corpses.push(pos);
        tracing::debug!(?kind, ?pos, "enemy died");
        events.push(SimEvent::ActorDied { actor: target, kind, pos });

        let abilities = dead.abilities();
        if abilities.contains(Abilities::EXPLODES) {
            queue.push_back(Consequence::Explode {
                center: pos,
                radius: self.config.ai.explosion_radius,
                damage: self.config.ai.explosion_damage,
                burn_turns: 0,
            });
        }
        if abilities.contains(Abilities::ALERTS_ALL) {
            queue.push_back(Consequence::AlertAll { source: target });
        }
    }

    fn explode(
        &mut self,
        center: Pos,
        radius: u32,
        damage: u32,
        burn_turns: u32,
        queue: &mut VecDeque<Consequence>,
        events: &mut Vec<SimEvent>,
    ) {
        events.push(SimEvent::Explosion { center, radius });
        let caught: Vec<(ActorId, u32)> = self
            .state
            .actors
            .iter()
            .map(|actor| {
                (actor.id, explosion_falloff(damage, radius, chebyshev(actor.pos, center)))
            })
            .filter(|(_, amount)| *amount > 0)
            .collect();
        for (target, amount) in caught {
            if burn_turns > 0 {
                self.apply_status(target, EffectKind::Burning, burn_turns, events);
            }
            let source = DamageSource::Explosion;
            queue.push_back(Consequence::Damage { target, amount, source });
        }
    }

    fn broadcast_alert(&mut self, source: ActorId, events: &mut Vec<SimEvent>) {
        let target = self.state.player_pos();
        events.push(SimEvent::AlertBroadcast { source, target });
        for id in self.state.actors.enemy_ids() {
            let Some(enemy) = self.state.actors.get_mut(id) else {
                continue;
            };
            enemy.last_known_target = Some(target);
            enemy.alert_cooldown = 0;
            if enemy.alert != AlertState::Chase {
                let from = enemy.alert;
                enemy.alert = AlertState::Chase;
                events.push(SimEvent::AlertChanged { actor: id, from, to: AlertState::Chase });
            }
        }
    }

    fn destroy_cover_around(&mut self, center: Pos, events: &mut Vec<SimEvent>) {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let pos = Pos { y: center.y + dy, x: center.x + dx };
                if pos == center {
                    continue;
                }
                let tile = self.state.map.tile_at(pos);
                if matches!(tile, TileKind::CoverHalf | TileKind::CoverFull) {
                    self.state.map.set_tile(pos, TileKind::Floor);
                    events.push(SimEvent::CoverDestroyed { pos });
                }
            }
        }
    }
}
