//! Player intent validation and application.
//!
//! Every intent is fully validated before anything is touched, so a rejected intent
//! leaves the mission exactly as it was.

use super::*;
use crate::game::combat::validate_attack;
use crate::game::status::movement_cost_multiplier;

impl Game {
    /// Validates and applies one player intent. When the intent ends the turn (an
    /// explicit `EndTurn`, or AP drained to zero) the whole enemy phase resolves
    /// inside this call and its events are part of the returned list.
    pub fn submit(&mut self, intent: Intent) -> IntentResult {
        if let Err(err) = self.validate_intent(intent) {
            tracing::debug!(?intent, %err, "intent rejected");
            return Err(err);
        }

        let mut events = Vec::new();
        self.apply_intent(intent, &mut events);

        let drained = self.state.player().is_some_and(|player| player.ap == 0);
        if !self.turn.is_over() && (intent == Intent::EndTurn || drained) {
            self.run_enemy_phase(&mut events);
        }

        self.log.extend(events.iter().cloned());
        self.last_events = events.clone();
        Ok(events)
    }

    fn validate_intent(&self, intent: Intent) -> Result<(), GameError> {
        if self.turn.is_over() {
            return Err(RejectReason::MissionOver.into());
        }
        if self.turn.active_side() != Side::Player {
            return Err(RejectReason::NotPlayerTurn.into());
        }
        let player = self.state.player().ok_or(GameError::ActorNotFound(self.state.player_id))?;
        let map = &self.state.map;

        match intent {
            Intent::Move(dir) => {
                let to = player.pos.step(dir);
                if !map.in_bounds(to) {
                    return Err(RejectReason::OutOfBounds.into());
                }
                if !self.state.is_free(to) {
                    return Err(RejectReason::Blocked.into());
                }
                if player.ap < self.player_move_cost(player) {
                    return Err(RejectReason::InsufficientAp.into());
                }
            }
            Intent::Attack(target) => {
                if !map.in_bounds(target) {
                    return Err(RejectReason::OutOfBounds.into());
                }
                let has_enemy = self
                    .state
                    .actors
                    .occupant_at(target)
                    .and_then(|id| self.state.actors.get(id))
                    .is_some_and(|actor| !actor.is_player());
                if !has_enemy {
                    return Err(RejectReason::NoTarget.into());
                }
                validate_attack(player, target, map)?;
                if player.ap < player.weapon.template().ap_cost {
                    return Err(RejectReason::InsufficientAp.into());
                }
            }
            Intent::UseItem { item, target } => self.validate_item_use(player, item, target)?,
            Intent::Reload => {
                let capacity =
                    player.weapon.template().ammo_capacity.ok_or(RejectReason::AmmoFull)?;
                if player.weapon.ammo.is_some_and(|ammo| ammo >= capacity) {
                    return Err(RejectReason::AmmoFull.into());
                }
                if player.ap < self.config.player.reload_ap_cost {
                    return Err(RejectReason::InsufficientAp.into());
                }
            }
            Intent::EndTurn => {}
        }
        Ok(())
    }

    fn apply_intent(&mut self, intent: Intent, events: &mut Vec<SimEvent>) {
        let player_id = self.state.player_id;
        let Some(player) = self.state.player().cloned() else {
            return;
        };

        match intent {
            Intent::Move(dir) => {
                let to = player.pos.step(dir);
                self.spend_ap(player_id, self.player_move_cost(&player));
                self.move_actor(player_id, to, events);
                self.corruption.record_heat(HeatSource::Move, &self.config.corruption);
                self.pick_up_items(to, events);
                self.check_extraction(events);
            }
            Intent::Attack(target) => {
                let Some(enemy) = self.state.actors.occupant_at(target) else {
                    return;
                };
                self.spend_ap(player_id, player.weapon.template().ap_cost);
                self.corruption.record_heat(HeatSource::Attack, &self.config.corruption);
                self.perform_attack(player_id, enemy, events);
            }
            Intent::UseItem { item, target } => self.apply_item(item, target, events),
            Intent::Reload => {
                self.spend_ap(player_id, self.config.player.reload_ap_cost);
                let Some(actor) = self.state.actors.get_mut(player_id) else {
                    return;
                };
                let capacity = actor.weapon.template().ammo_capacity.unwrap_or(0);
                actor.weapon.ammo = Some(capacity);
                events.push(SimEvent::Reloaded { actor: player_id, ammo: capacity });
            }
            Intent::EndTurn => {}
        }
    }

    fn player_move_cost(&self, player: &Actor) -> u32 {
        self.config.player.move_ap_cost * movement_cost_multiplier(player)
    }

    fn check_extraction(&mut self, events: &mut Vec<SimEvent>) {
        let pos = self.state.player_pos();
        let keys = self.state.inventory.count(ItemKind::Keycard);
        if self.state.map.tile_at(pos) == TileKind::Extraction && keys >= self.state.required_keys {
            self.end_mission(RunOutcome::Victory, events);
        }
    }
}
