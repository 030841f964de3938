//! Status effect table: application and per-turn ticking.
//!
//! Ticking is not idempotent. A second tick in the same logical turn deals the
//! damage again, so the scheduler calls [`tick_and_collect_damage`] exactly once
//! per actor at its owning side's turn end.

use crate::state::Actor;
use crate::types::EffectKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    pub damage: u32,
    pub must_skip_turn: bool,
}

pub fn damage_per_tick(kind: EffectKind) -> u32 {
    match kind {
        EffectKind::Bleeding => 2,
        EffectKind::Poisoned => 1,
        EffectKind::Burning => 3,
        EffectKind::Stunned | EffectKind::Slowed => 0,
    }
}

/// Re-applying a kind refreshes to the longer duration instead of stacking.
pub fn apply_effect(actor: &mut Actor, kind: EffectKind, duration: u32) {
    if duration == 0 {
        return;
    }
    match actor.effects.iter_mut().find(|(effect, _)| *effect == kind) {
        Some((_, remaining)) => *remaining = (*remaining).max(duration),
        None => actor.effects.push((kind, duration)),
    }
}

pub fn remove_effect(actor: &mut Actor, kind: EffectKind) -> bool {
    let before = actor.effects.len();
    actor.effects.retain(|(effect, _)| *effect != kind);
    actor.effects.len() != before
}

pub fn tick_and_collect_damage(actor: &mut Actor) -> StatusTick {
    let mut tick = StatusTick::default();
    for (kind, remaining) in &mut actor.effects {
        tick.damage += damage_per_tick(*kind);
        if *kind == EffectKind::Stunned {
            tick.must_skip_turn = true;
        }
        *remaining = remaining.saturating_sub(1);
    }
    actor.effects.retain(|(_, remaining)| *remaining > 0);
    tick
}

pub fn movement_cost_multiplier(actor: &Actor) -> u32 {
    if actor.has_effect(EffectKind::Slowed) { 2 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnemyKind, Pos};

    fn crawler() -> Actor {
        Actor::enemy(EnemyKind::Crawler, Pos::new(2, 2))
    }

    #[test]
    fn reapplying_takes_the_longer_duration() {
        let mut actor = crawler();
        apply_effect(&mut actor, EffectKind::Poisoned, 3);
        apply_effect(&mut actor, EffectKind::Poisoned, 2);
        assert_eq!(actor.effects, vec![(EffectKind::Poisoned, 3)]);
        apply_effect(&mut actor, EffectKind::Poisoned, 5);
        assert_eq!(actor.effects, vec![(EffectKind::Poisoned, 5)]);
    }

    #[test]
    fn effects_keep_application_order() {
        let mut actor = crawler();
        apply_effect(&mut actor, EffectKind::Burning, 2);
        apply_effect(&mut actor, EffectKind::Slowed, 1);
        apply_effect(&mut actor, EffectKind::Burning, 4);
        assert_eq!(actor.effects, vec![(EffectKind::Burning, 4), (EffectKind::Slowed, 1)]);
    }

    #[test]
    fn tick_sums_damage_and_decrements_every_duration() {
        let mut actor = crawler();
        apply_effect(&mut actor, EffectKind::Bleeding, 3);
        apply_effect(&mut actor, EffectKind::Poisoned, 1);
        apply_effect(&mut actor, EffectKind::Burning, 2);
        apply_effect(&mut actor, EffectKind::Slowed, 4);

        let tick = tick_and_collect_damage(&mut actor);
        assert_eq!(tick, StatusTick { damage: 6, must_skip_turn: false });
        assert_eq!(
            actor.effects,
            vec![(EffectKind::Bleeding, 2), (EffectKind::Burning, 1), (EffectKind::Slowed, 3)]
        );
    }

    #[test]
    fn stun_with_one_turn_left_skips_and_expires() {
        let mut actor = crawler();
        apply_effect(&mut actor, EffectKind::Stunned, 1);
        let tick = tick_and_collect_damage(&mut actor);
        assert!(tick.must_skip_turn);
        assert_eq!(tick.damage, 0);
        assert!(actor.effects.is_empty());

        let next = tick_and_collect_damage(&mut actor);
        assert!(!next.must_skip_turn, "expired stun must not skip again");
    }

    #[test]
    fn ticking_twice_doubles_damage() {
        let mut actor = crawler();
        apply_effect(&mut actor, EffectKind::Burning, 5);
        let first = tick_and_collect_damage(&mut actor);
        let second = tick_and_collect_damage(&mut actor);
        assert_eq!(first.damage + second.damage, 6);
        assert_eq!(actor.effects, vec![(EffectKind::Burning, 3)]);
    }

    #[test]
    fn slowed_doubles_movement_cost() {
        let mut actor = crawler();
        assert_eq!(movement_cost_multiplier(&actor), 1);
        apply_effect(&mut actor, EffectKind::Slowed, 1);
        assert_eq!(movement_cost_multiplier(&actor), 2);
        assert!(remove_effect(&mut actor, EffectKind::Slowed));
        assert!(!remove_effect(&mut actor, EffectKind::Slowed));
    }
}
