//! The enemy phase and turn rollover.

use super::*;
use crate::game::resolution::Consequence;
use crate::game::status::{StatusTick, tick_and_collect_damage};

impl Game {
    /// Resolves the whole enemy phase atomically: every living enemy in registration
    /// order, then the player's status tick, the turn counter, corruption and the
    /// player's AP reset. A stunned player's turn is skipped here too, so control
    /// only returns once the player can act or the mission is over.
    pub(super) fn run_enemy_phase(&mut self, events: &mut Vec<SimEvent>) {
        self.set_phase(Phase::ResolvingEnemyTurn, events);
        while self.run_round(events) {}
    }

    /// One enemy round and turn rollover. Returns true when the player's coming
    /// turn is skipped and another round follows straight away.
    fn run_round(&mut self, events: &mut Vec<SimEvent>) -> bool {
        for id in self.state.actors.enemy_ids() {
            if self.turn.is_over() {
                return false;
            }
            let Some(enemy) = self.state.actors.get_mut(id) else {
                continue;
            };
            enemy.ap = enemy.max_ap;
            let tick = tick_and_collect_damage(enemy);
            if self.apply_tick(id, tick, events) {
                self.activate_enemy(id, events);
            }
        }
        if self.turn.is_over() {
            return false;
        }

        let player_id = self.state.player_id;
        let Some(player) = self.state.actors.get_mut(player_id) else {
            return false;
        };
        let tick = tick_and_collect_damage(player);
        let can_act = self.apply_tick(player_id, tick, events);
        if self.turn.is_over() {
            return false;
        }

        self.turn.turn_count += 1;
        events.push(SimEvent::TurnEnded { turn: self.turn.turn_count });
        self.corruption_turn_end(events);

        if let Some(player) = self.state.actors.get_mut(player_id) {
            player.ap = if can_act { player.max_ap } else { 0 };
        }
        if !can_act {
            return true;
        }
        self.set_phase(Phase::PlayerTurn, events);
        false
    }

    /// Applies status damage from a tick. Returns whether the actor is alive and free
    /// to act this turn.
    fn apply_tick(&mut self, id: ActorId, tick: StatusTick, events: &mut Vec<SimEvent>) -> bool {
        if tick.damage > 0 {
            let source = DamageSource::Status;
            self.resolve(Consequence::Damage { target: id, amount: tick.damage, source }, events);
        }
        let alive = self.state.actors.get(id).is_some_and(|actor| actor.hp > 0);
        if alive && tick.must_skip_turn {
            events.push(SimEvent::TurnSkipped { actor: id });
            return false;
        }
        alive
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn attacks_by(events: &[SimEvent], id: ActorId) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SimEvent::AttackResolved { attacker, .. } if *attacker == id))
            .count()
    }

    #[test]
    fn stunned_enemy_skips_exactly_one_activation() {
        let mut game = scripted_game("######\n#@c..#\n######", []);
        let crawler = enemy_at(&game, Pos::new(1, 2));
        actor_mut(&mut game, crawler).effects.push((EffectKind::Stunned, 1));

        let first = game.submit(Intent::EndTurn).expect("end turn applies");
        assert!(first.contains(&SimEvent::TurnSkipped { actor: crawler }));
        assert_eq!(attacks_by(&first, crawler), 0);
        assert!(game.state.actors.get(crawler).is_some_and(|e| e.effects.is_empty()));

        let second = game.submit(Intent::EndTurn).expect("end turn applies");
        assert!(!second.contains(&SimEvent::TurnSkipped { actor: crawler }));
        assert_eq!(attacks_by(&second, crawler), 3);
    }

    #[test]
    fn enemies_act_in_registration_order() {
        let mut game = scripted_game("#######\n#c@r..#\n#######", []);
        let crawler = enemy_at(&game, Pos::new(1, 1));
        let spitter = enemy_at(&game, Pos::new(1, 3));
        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        let order: Vec<ActorId> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::AttackResolved { attacker, .. } => Some(*attacker),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![crawler, crawler, crawler, spitter]);
    }

    #[test]
    fn status_damage_ticks_once_per_turn_and_can_kill() {
        let mut game = scripted_game("#########\n#@##...c#\n#########", []);
        let crawler = enemy_at(&game, Pos::new(1, 7));
        let enemy = actor_mut(&mut game, crawler);
        enemy.hp = 3;
        enemy.effects.push((EffectKind::Burning, 2));
        player_mut(&mut game).effects.push((EffectKind::Poisoned, 2));

        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        assert!(game.state.actors.get(crawler).is_none());
        assert_eq!(game.state.corpses, vec![Pos::new(1, 7)]);
        assert_eq!(player(&game).hp, 29);
        assert_eq!(player(&game).effects, vec![(EffectKind::Poisoned, 1)]);
        assert!(events.contains(&SimEvent::TurnEnded { turn: 1 }));
    }

    #[test]
    fn stunned_player_turn_is_skipped_within_the_same_call() {
        let mut game = scripted_game("######\n#@...#\n######", []);
        player_mut(&mut game).effects.push((EffectKind::Stunned, 1));

        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        let id = game.state.player_id;
        let skips = events.iter().filter(|e| **e == SimEvent::TurnSkipped { actor: id }).count();
        assert_eq!(skips, 1);
        let ended: Vec<&SimEvent> =
            events.iter().filter(|e| matches!(e, SimEvent::TurnEnded { .. })).collect();
        assert_eq!(ended, vec![&SimEvent::TurnEnded { turn: 1 }, &SimEvent::TurnEnded { turn: 2 }]);
        assert_eq!(game.turn.phase, Phase::PlayerTurn);
        assert_eq!(game.turn.turn_count, 2);
        assert_eq!(player(&game).ap, 4);
        game.submit(Intent::Move(Direction::East)).expect("the player acts again");
    }

    #[test]
    fn stun_landing_mid_phase_skips_the_following_turn_only() {
        let mut game = scripted_game(
            "#######\n#@.O..#\n#######",
            // first lash hits for minimum damage without a crit, the rest miss
            [0, 0, 99],
        );
        player_mut(&mut game).armor = 0;
        let id = game.state.player_id;

        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        let position = |wanted: &SimEvent| events.iter().position(|e| e == wanted);
        let stunned = position(&SimEvent::StatusApplied {
            actor: id,
            effect: EffectKind::Stunned,
            duration: 1,
        })
        .expect("the lash stuns");
        let skipped = position(&SimEvent::TurnSkipped { actor: id }).expect("the turn is skipped");
        let first_end = position(&SimEvent::TurnEnded { turn: 1 }).expect("turn 1 ends");
        let second_end = position(&SimEvent::TurnEnded { turn: 2 }).expect("turn 2 ends");
        assert!(stunned < skipped && skipped < first_end && first_end < second_end);
        assert_eq!(
            events.iter().filter(|e| matches!(e, SimEvent::TurnSkipped { .. })).count(),
            1,
            "no skip after the stun has worn off"
        );
        assert!(player(&game).effects.is_empty());
        assert_eq!(player(&game).ap, 4);
    }

    #[test]
    fn status_ticks_on_the_player_add_no_corruption_heat() {
        let mut game = scripted_game("######\n#@...#\n######", []);
        player_mut(&mut game).effects.push((EffectKind::Poisoned, 3));
        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        assert!(events.contains(&SimEvent::CorruptionChanged { from: 0, to: 5 }));
    }

    #[test]
    fn turn_end_feeds_corruption() {
        let mut game = scripted_game("######\n#@...#\n######", []);
        game.submit(Intent::Move(Direction::East)).expect("move applies");
        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        assert!(events.contains(&SimEvent::CorruptionChanged { from: 0, to: 6 }));
        assert_eq!(game.turn.turn_count, 1);
        assert_eq!(
            events.last(),
            Some(&SimEvent::PhaseChanged { phase: Phase::PlayerTurn }),
            "the phase returns to the player last"
        );
    }

    #[test]
    fn player_death_ends_the_enemy_phase_immediately() {
        let mut game = scripted_game(
            "#######\n#c@c..#\n#######",
            // first crawler: hit for 4 with no crit, then misses on fallback rolls
            [0, 2, 99],
        );
        let actor = player_mut(&mut game);
        actor.hp = 2;
        actor.armor = 0;
        let second = enemy_at(&game, Pos::new(1, 3));

        let events = game.submit(Intent::EndTurn).expect("end turn applies");
        assert_eq!(game.outcome(), Some(RunOutcome::Defeat));
        assert_eq!(player(&game).hp, 0);
        assert_eq!(attacks_by(&events, second), 0);
        assert!(!events.iter().any(|e| matches!(e, SimEvent::TurnEnded { .. })));
    }
}
