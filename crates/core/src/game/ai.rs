//! Enemy behavior: perception, the alert state machine and one activation.
//!
//! An activation re-evaluates after every action and keeps going until the enemy
//! is out of AP, cannot afford its next action, or its state ends the activation
//! early (patrol wanders at most once, alert only counts down).

use super::*;
use crate::content::Abilities;
use crate::game::combat::validate_attack;
use crate::game::status::movement_cost_multiplier;
use crate::game::visibility::can_see;

/// Greedy single step toward `target`: the axis with the larger gap first, then the
/// other one. `None` when both candidate tiles are blocked.
pub fn greedy_step(state: &GameState, from: Pos, target: Pos) -> Option<Direction> {
    let dy = target.y - from.y;
    let dx = target.x - from.x;
    let vertical = match dy.signum() {
        1 => Some(Direction::South),
        -1 => Some(Direction::North),
        _ => None,
    };
    let horizontal = match dx.signum() {
        1 => Some(Direction::East),
        -1 => Some(Direction::West),
        _ => None,
    };
    let order = if dx.abs() >= dy.abs() { [horizontal, vertical] } else { [vertical, horizontal] };
    order.into_iter().flatten().find(|dir| state.is_free(from.step(*dir)))
}

/// Next alert state from what the enemy perceives right now.
pub fn next_alert(enemy: &Actor, sees_player: bool, in_reach: bool) -> AlertState {
    if sees_player {
        return if in_reach { AlertState::Attack } else { AlertState::Chase };
    }
    let at_target = enemy.last_known_target.is_none_or(|target| target == enemy.pos);
    match enemy.alert {
        AlertState::Attack => AlertState::Chase,
        AlertState::Chase if at_target => AlertState::Alert,
        other => other,
    }
}

impl Game {
    pub(super) fn activate_enemy(&mut self, id: ActorId, events: &mut Vec<SimEvent>) {
        let mut fed = false;
        let mut wandered = false;
        loop {
            if self.turn.is_over() {
                return;
            }
            let Some(enemy) = self.state.actors.get(id).cloned() else {
                return;
            };
            let move_cost = movement_cost_multiplier(&enemy);
            if enemy.ap == 0 {
                return;
            }

            if !fed && enemy.ap >= move_cost && self.try_consume_corpse(&enemy, events) {
                fed = true;
                self.spend_ap(id, move_cost);
                continue;
            }

            match self.perceive(id, events) {
                AlertState::Patrol => {
                    if wandered || enemy.ap < move_cost || !self.wander(id, move_cost, events) {
                        return;
                    }
                    wandered = true;
                }
                AlertState::Alert => {
                    self.cool_down(id, events);
                    return;
                }
                AlertState::Attack => {
                    let cost = enemy.weapon.template().ap_cost;
                    if enemy.ap < cost {
                        return;
                    }
                    self.spend_ap(id, cost);
                    let player = self.state.player_id;
                    self.perform_attack(id, player, events);
                }
                AlertState::Chase => {
                    if enemy.ap < move_cost {
                        return;
                    }
                    if self.try_teleport(&enemy, events) {
                        self.spend_ap(id, move_cost);
                        continue;
                    }
                    // perceive may have just set the memory
                    let target = self.state.actors.get(id).and_then(|e| e.last_known_target);
                    let Some(target) = target else {
                        return;
                    };
                    match greedy_step(&self.state, enemy.pos, target) {
                        Some(dir) => {
                            self.spend_ap(id, move_cost);
                            self.move_actor(id, enemy.pos.step(dir), events);
                        }
                        None => {
                            tracing::debug!(?id, "chase blocked, forfeiting AP");
                            self.spend_ap(id, enemy.ap);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Updates target memory and alert state from current sight. Returns the new state.
    fn perceive(&mut self, id: ActorId, events: &mut Vec<SimEvent>) -> AlertState {
        let player_pos = self.state.player_pos();
        let cooldown = self.config.ai.alert_cooldown_turns;
        let Some(enemy) = self.state.actors.get(id) else {
            return AlertState::Patrol;
        };
        let radius = enemy.template().map_or(0, |template| template.detection_radius);
        let sees = can_see(&self.state.map, enemy.pos, radius, player_pos);
        let in_reach = sees && validate_attack(enemy, player_pos, &self.state.map).is_ok();
        let next = next_alert(enemy, sees, in_reach);

        let Some(enemy) = self.state.actors.get_mut(id) else {
            return AlertState::Patrol;
        };
        if sees {
            enemy.last_known_target = Some(player_pos);
        }
        if next != enemy.alert {
            let from = enemy.alert;
            enemy.alert = next;
            match next {
                AlertState::Alert => enemy.alert_cooldown = cooldown,
                AlertState::Patrol => enemy.last_known_target = None,
                AlertState::Chase | AlertState::Attack => enemy.alert_cooldown = 0,
            }
            tracing::debug!(?id, ?from, to = ?next, "alert transition");
            events.push(SimEvent::AlertChanged { actor: id, from, to: next });
        }
        next
    }

    fn cool_down(&mut self, id: ActorId, events: &mut Vec<SimEvent>) {
        let Some(enemy) = self.state.actors.get_mut(id) else {
            return;
        };
        enemy.alert_cooldown = enemy.alert_cooldown.saturating_sub(1);
        if enemy.alert_cooldown == 0 {
            enemy.alert = AlertState::Patrol;
            enemy.last_known_target = None;
            tracing::debug!(?id, "alert cooled down");
            events.push(SimEvent::AlertChanged {
                actor: id,
                from: AlertState::Alert,
                to: AlertState::Patrol,
            });
        }
    }

    /// One random step to a free 4-neighbour. Returns whether the enemy moved.
    fn wander(&mut self, id: ActorId, cost: u32, events: &mut Vec<SimEvent>) -> bool {
        let Some(from) = self.state.actors.get(id).map(|enemy| enemy.pos) else {
            return false;
        };
        let open: Vec<Pos> = Direction::ALL
            .iter()
            .map(|dir| from.step(*dir))
            .filter(|pos| self.state.is_free(*pos))
            .collect();
        if open.is_empty() {
            return false;
        }
        let to = open[self.rng.pick_index(open.len())];
        self.spend_ap(id, cost);
        self.move_actor(id, to, events);
        true
    }

    fn try_consume_corpse(&mut self, enemy: &Actor, events: &mut Vec<SimEvent>) -> bool {
        if !enemy.abilities().contains(Abilities::HEALS_FROM_CORPSES) || enemy.hp >= enemy.max_hp {
            return false;
        }
        let nearby = self.state.corpses.iter().position(|pos| chebyshev(*pos, enemy.pos) <= 1);
        let Some(index) = nearby else {
            return false;
        };
        let pos = self.state.corpses.remove(index);
        let amount = self.config.ai.corpse_heal;
        let Some(actor) = self.state.actors.get_mut(enemy.id) else {
            return false;
        };
        let healed = actor.heal(amount);
        events.push(SimEvent::CorpseConsumed { actor: enemy.id, pos, healed });
        true
    }

    fn try_teleport(&mut self, enemy: &Actor, events: &mut Vec<SimEvent>) -> bool {
        if !enemy.abilities().contains(Abilities::TELEPORT)
            || !self.rng.chance_pct(self.config.ai.teleport_chance_pct)
        {
            return false;
        }
        let anchor = self.state.player_pos();
        let r = self.config.ai.teleport_radius as i32;
        let mut landing = Vec::new();
        for y in (anchor.y - r)..=(anchor.y + r) {
            for x in (anchor.x - r)..=(anchor.x + r) {
                let pos = Pos { y, x };
                if pos != enemy.pos && self.state.map.in_bounds(pos) && self.state.is_free(pos) {
                    landing.push(pos);
                }
            }
        }
        if landing.is_empty() {
            return false;
        }
        let to = landing[self.rng.pick_index(landing.len())];
        if let Some(actor) = self.state.actors.get_mut(enemy.id) {
            actor.pos = to;
        }
        events.push(SimEvent::Teleported { actor: enemy.id, from: enemy.pos, to });
        if self.state.map.open_door(to) {
            events.push(SimEvent::DoorOpened { pos: to });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn activate(game: &mut Game, id: ActorId) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let max_ap = game.state.actors.get(id).map_or(0, |enemy| enemy.max_ap);
        actor_mut(game, id).ap = max_ap;
        game.activate_enemy(id, &mut events);
        events
    }

    fn moves(events: &[SimEvent]) -> usize {
        events.iter().filter(|e| matches!(e, SimEvent::ActorMoved { .. })).count()
    }

    #[test]
    fn greedy_step_closes_the_larger_gap_first_and_falls_back() {
        let game = scripted_game(
            "
            #######
            #.....#
            #..#..#
            #....@#
            #######
            ",
            [],
        );
        let state = &game.state;
        assert_eq!(greedy_step(state, Pos::new(1, 1), Pos::new(2, 5)), Some(Direction::East));
        assert_eq!(greedy_step(state, Pos::new(1, 1), Pos::new(3, 2)), Some(Direction::South));
        assert_eq!(
            greedy_step(state, Pos::new(2, 2), Pos::new(1, 5)),
            Some(Direction::North),
            "wall to the east, fall back to the other axis"
        );
        assert_eq!(greedy_step(state, Pos::new(2, 2), Pos::new(2, 5)), None);
    }

    #[test]
    fn alert_transitions_follow_sight_and_target_memory() {
        let mut enemy = Actor::enemy(EnemyKind::Crawler, Pos::new(3, 3));
        assert_eq!(next_alert(&enemy, true, false), AlertState::Chase);
        assert_eq!(next_alert(&enemy, true, true), AlertState::Attack);
        assert_eq!(next_alert(&enemy, false, false), AlertState::Patrol);

        enemy.alert = AlertState::Attack;
        assert_eq!(next_alert(&enemy, false, false), AlertState::Chase);

        enemy.alert = AlertState::Chase;
        enemy.last_known_target = Some(Pos::new(3, 6));
        assert_eq!(next_alert(&enemy, false, false), AlertState::Chase);
        enemy.last_known_target = Some(Pos::new(3, 3));
        assert_eq!(next_alert(&enemy, false, false), AlertState::Alert);

        enemy.alert = AlertState::Alert;
        assert_eq!(next_alert(&enemy, false, false), AlertState::Alert);
        assert_eq!(next_alert(&enemy, true, false), AlertState::Chase);
    }

    #[test]
    fn chasing_crawler_spends_all_ap_closing_in() {
        let mut game = scripted_game("########\n#@...c.#\n########", []);
        let crawler = enemy_at(&game, Pos::new(1, 5));
        let events = activate(&mut game, crawler);

        assert_eq!(moves(&events), 3);
        let enemy = game.state.actors.get(crawler).expect("crawler alive");
        assert_eq!(enemy.pos, Pos::new(1, 2));
        assert_eq!(enemy.ap, 0);
        assert_eq!(enemy.alert, AlertState::Chase);
        assert!(events.contains(&SimEvent::AlertChanged {
            actor: crawler,
            from: AlertState::Patrol,
            to: AlertState::Chase,
        }));
    }

    #[test]
    fn wandering_into_sight_turns_the_rest_of_the_activation_into_a_chase() {
        let mut game = scripted_game("##########\n#..@....c#\n##########", []);
        let crawler = enemy_at(&game, Pos::new(1, 8));
        let events = activate(&mut game, crawler);

        assert_eq!(moves(&events), 3, "one wander step, then two chase steps");
        let enemy = game.state.actors.get(crawler).expect("crawler alive");
        assert_eq!(enemy.pos, Pos::new(1, 5));
        assert_eq!(enemy.ap, 0);
        assert_eq!(enemy.alert, AlertState::Chase);
        assert_eq!(enemy.last_known_target, Some(Pos::new(1, 3)));
    }

    #[test]
    fn patrol_without_sight_wanders_once() {
        let mut game = scripted_game("#########\n#@#....c#\n#########", []);
        let crawler = enemy_at(&game, Pos::new(1, 7));
        let events = activate(&mut game, crawler);

        assert_eq!(moves(&events), 1);
        let enemy = game.state.actors.get(crawler).expect("crawler alive");
        assert_eq!(enemy.pos, Pos::new(1, 6));
        assert_eq!(enemy.ap, 2);
        assert_eq!(enemy.alert, AlertState::Patrol);
    }

    #[test]
    fn adjacent_crawler_attacks_with_every_ap() {
        let mut game = scripted_game("######\n#@c..#\n######", []);
        let crawler = enemy_at(&game, Pos::new(1, 2));
        let events = activate(&mut game, crawler);
        let misses = events
            .iter()
            .filter(|e| matches!(e, SimEvent::AttackResolved { hit: false, .. }))
            .count();
        assert_eq!(misses, 3, "fallback rolls of 99 always miss");
        assert_eq!(moves(&events), 0);
    }

    #[test]
    fn blocked_chase_forfeits_remaining_ap() {
        let mut game = scripted_game("#######\n#@#c..#\n#######", []);
        let crawler = enemy_at(&game, Pos::new(1, 3));
        let enemy = actor_mut(&mut game, crawler);
        enemy.alert = AlertState::Chase;
        enemy.last_known_target = Some(Pos::new(1, 1));

        let events = activate(&mut game, crawler);
        assert!(events.is_empty());
        let enemy = game.state.actors.get(crawler).expect("crawler alive");
        assert_eq!(enemy.ap, 0);
        assert_eq!(enemy.pos, Pos::new(1, 3));
    }

    #[test]
    fn lost_target_decays_through_alert_back_to_patrol() {
        let mut game = scripted_game("#########\n#@#..c..#\n#########", []);
        let crawler = enemy_at(&game, Pos::new(1, 5));
        let enemy = actor_mut(&mut game, crawler);
        enemy.alert = AlertState::Chase;
        enemy.last_known_target = Some(Pos::new(1, 4));

        let first = activate(&mut game, crawler);
        assert_eq!(moves(&first), 1);
        let enemy = game.state.actors.get(crawler).expect("crawler alive");
        assert_eq!(enemy.alert, AlertState::Alert);
        assert_eq!(enemy.alert_cooldown, 2, "the arriving activation already counts");

        activate(&mut game, crawler);
        assert_eq!(game.state.actors.get(crawler).map(|e| e.alert), Some(AlertState::Alert));

        let third = activate(&mut game, crawler);
        let enemy = game.state.actors.get(crawler).expect("crawler alive");
        assert_eq!(enemy.alert, AlertState::Patrol);
        assert_eq!(enemy.last_known_target, None);
        assert_eq!(moves(&third), 0, "cooling down ends the activation");
    }

    #[test]
    fn ghoul_eats_one_corpse_per_activation() {
        let mut game = scripted_game("#########\n#@##.o..#\n#########", []);
        let ghoul = enemy_at(&game, Pos::new(1, 5));
        actor_mut(&mut game, ghoul).hp = 2;
        game.state.corpses = vec![Pos::new(1, 4), Pos::new(1, 6)];

        let events = activate(&mut game, ghoul);
        assert!(events.contains(&SimEvent::CorpseConsumed {
            actor: ghoul,
            pos: Pos::new(1, 4),
            healed: 6,
        }));
        assert_eq!(game.state.corpses, vec![Pos::new(1, 6)]);
        assert_eq!(game.state.actors.get(ghoul).map(|e| e.hp), Some(8));
    }

    #[test]
    fn stalker_blinks_next_to_the_player() {
        let mut game = scripted_game(
            "
            ############
            #@........t#
            #..........#
            ############
            ",
            // teleport roll hits, first landing tile
            [0, 0],
        );
        let stalker = enemy_at(&game, Pos::new(1, 10));
        let enemy = actor_mut(&mut game, stalker);
        enemy.alert = AlertState::Chase;
        enemy.last_known_target = Some(Pos::new(1, 1));

        let events = activate(&mut game, stalker);
        assert!(events.contains(&SimEvent::Teleported {
            actor: stalker,
            from: Pos::new(1, 10),
            to: Pos::new(1, 2),
        }));
        let enemy = game.state.actors.get(stalker).expect("stalker alive");
        assert!(chebyshev(enemy.pos, Pos::new(1, 1)) <= 2);
        assert_eq!(enemy.alert, AlertState::Attack);
    }

    #[test]
    fn slowed_enemies_pay_double_per_step() {
        let mut game = scripted_game("##########\n#@.....c.#\n##########", []);
        let crawler = enemy_at(&game, Pos::new(1, 7));
        let enemy = actor_mut(&mut game, crawler);
        enemy.alert = AlertState::Chase;
        enemy.last_known_target = Some(Pos::new(1, 1));
        enemy.effects.push((EffectKind::Slowed, 2));

        let events = activate(&mut game, crawler);
        assert_eq!(moves(&events), 1, "3 AP buys one step at cost 2");
        assert_eq!(game.state.actors.get(crawler).map(|e| e.ap), Some(1));
    }
}
