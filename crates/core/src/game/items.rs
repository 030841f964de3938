//! Ground pickups and `UseItem` effects.

use super::*;
use crate::game::resolution::Consequence;
use crate::game::status::remove_effect;
use crate::game::visibility::line_of_sight;

impl Game {
    pub(super) fn validate_item_use(
        &self,
        player: &Actor,
        item: ItemKind,
        target: Option<Pos>,
    ) -> Result<(), RejectReason> {
        if self.state.inventory.count(item) == 0 {
            return Err(RejectReason::NoSuchItem);
        }
        match item {
            // Keycards only count toward extraction.
            ItemKind::Keycard => return Err(RejectReason::NoTarget),
            ItemKind::Grenade => {
                let target = target.ok_or(RejectReason::NoTarget)?;
                if !self.state.map.in_bounds(target) {
                    return Err(RejectReason::OutOfBounds);
                }
                if chebyshev(player.pos, target) > self.config.items.grenade_range {
                    return Err(RejectReason::OutOfRange);
                }
                if !line_of_sight(&self.state.map, player.pos, target) {
                    return Err(RejectReason::NoLineOfSight);
                }
            }
            ItemKind::Medkit | ItemKind::PurgeVial | ItemKind::ArmorPlate | ItemKind::Stimpack => {}
        }
        if player.ap < self.config.player.item_ap_cost {
            return Err(RejectReason::InsufficientAp);
        }
        Ok(())
    }

    /// Applies a validated item use.
    pub(super) fn apply_item(
        &mut self,
        item: ItemKind,
        target: Option<Pos>,
        events: &mut Vec<SimEvent>,
    ) {
        let player_id = self.state.player_id;
        if !self.state.inventory.take(item) {
            return;
        }
        self.spend_ap(player_id, self.config.player.item_ap_cost);
        events.push(SimEvent::ItemUsed { item });
        let tuning = self.config.items.clone();

        match item {
            ItemKind::Medkit => {
                let Some(player) = self.state.actors.get_mut(player_id) else {
                    return;
                };
                let amount = player.heal(tuning.medkit_heal);
                let cured = remove_effect(player, EffectKind::Bleeding);
                events.push(SimEvent::Healed { actor: player_id, amount });
                if cured {
                    events.push(SimEvent::StatusCured {
                        actor: player_id,
                        effect: EffectKind::Bleeding,
                    });
                }
            }
            ItemKind::Grenade => {
                let Some(center) = target else {
                    return;
                };
                self.corruption.record_heat(HeatSource::Explosive, &self.config.corruption);
                self.resolve(
                    Consequence::Explode {
                        center,
                        radius: tuning.grenade_radius,
                        damage: tuning.grenade_damage,
                        burn_turns: tuning.grenade_burn_turns,
                    },
                    events,
                );
            }
            ItemKind::PurgeVial => {
                let (from, to) = self.corruption.reduce(tuning.purge_amount);
                if from != to {
                    events.push(SimEvent::CorruptionChanged { from, to });
                }
            }
            ItemKind::ArmorPlate => {
                if let Some(player) = self.state.actors.get_mut(player_id) {
                    player.armor = player.max_armor;
                }
            }
            ItemKind::Stimpack => {
                let Some(player) = self.state.actors.get_mut(player_id) else {
                    return;
                };
                player.ap = (player.ap + tuning.stim_ap).min(player.max_ap + tuning.stim_ap);
                if remove_effect(player, EffectKind::Slowed) {
                    events.push(SimEvent::StatusCured {
                        actor: player_id,
                        effect: EffectKind::Slowed,
                    });
                }
            }
            ItemKind::Keycard => {}
        }
    }

    /// Moves every ground item at `pos` into the inventory.
    pub(super) fn pick_up_items(&mut self, pos: Pos, events: &mut Vec<SimEvent>) {
        let (here, rest): (Vec<GroundItem>, Vec<GroundItem>) =
            self.state.ground_items.iter().partition(|item| item.pos == pos);
        self.state.ground_items = rest;
        for item in here {
            self.state.inventory.add(item.kind, 1);
            events.push(SimEvent::ItemPickedUp { item: item.kind, pos });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::setup::MissionSetup;

    fn with_loadout(layout: &str, loadout: &[(ItemKind, u32)], rolls: &[u32]) -> Game {
        let mut setup = MissionSetup::from_ascii(layout).expect("fixture layout should parse");
        for (item, count) in loadout {
            setup = setup.with_loadout(*item, *count);
        }
        let mut game = Game::new(1, setup, SimConfig::default());
        script_rolls(&mut game, rolls.iter().copied());
        game
    }

    fn use_item(game: &mut Game, item: ItemKind, target: Option<Pos>) -> IntentResult {
        game.submit(Intent::UseItem { item, target })
    }

    #[test]
    fn items_not_held_are_rejected_without_side_effects() {
        let mut game = with_loadout("######\n#@...#\n######", &[], &[]);
        let before = game.snapshot_hash();
        assert_eq!(
            use_item(&mut game, ItemKind::Medkit, None),
            Err(GameError::InvalidIntent(RejectReason::NoSuchItem))
        );
        assert_eq!(game.snapshot_hash(), before);
    }

    #[test]
    fn medkit_heals_and_stops_bleeding() {
        let mut game = with_loadout("######\n#@...#\n######", &[(ItemKind::Medkit, 1)], &[]);
        let actor = player_mut(&mut game);
        actor.hp = 10;
        actor.effects.push((EffectKind::Bleeding, 2));

        let events = use_item(&mut game, ItemKind::Medkit, None).expect("medkit should apply");
        let id = game.state.player_id;
        assert!(events.contains(&SimEvent::Healed { actor: id, amount: 12 }));
        let cured = SimEvent::StatusCured { actor: id, effect: EffectKind::Bleeding };
        assert!(events.contains(&cured));
        assert_eq!(player(&game).hp, 22);
        assert_eq!(player(&game).ap, 3);
        assert_eq!(game.state.inventory.count(ItemKind::Medkit), 0);
    }

    #[test]
    fn grenade_needs_a_reachable_visible_target() {
        let layout = "
            ###########
            #@...#...c#
            ###########
        ";
        let mut game = with_loadout(layout, &[(ItemKind::Grenade, 1)], &[]);
        let reject = |reason: RejectReason| -> IntentResult { Err(reason.into()) };
        assert_eq!(use_item(&mut game, ItemKind::Grenade, None), reject(RejectReason::NoTarget));
        assert_eq!(
            use_item(&mut game, ItemKind::Grenade, Some(Pos::new(1, 9))),
            reject(RejectReason::OutOfRange)
        );
        assert_eq!(
            use_item(&mut game, ItemKind::Grenade, Some(Pos::new(1, 6))),
            reject(RejectReason::NoLineOfSight)
        );
        assert_eq!(
            use_item(&mut game, ItemKind::Grenade, Some(Pos::new(9, 9))),
            reject(RejectReason::OutOfBounds)
        );
        assert_eq!(game.state.inventory.count(ItemKind::Grenade), 1);
    }

    #[test]
    fn grenade_blast_burns_and_sets_off_bloaters() {
        let layout = "
            ##########
            #@...cee.#
            #........#
            ##########
        ";
        let mut game = with_loadout(layout, &[(ItemKind::Grenade, 1)], &[]);
        let crawler = enemy_at(&game, Pos::new(1, 5));
        let bloater = enemy_at(&game, Pos::new(1, 6));
        let far_bloater = enemy_at(&game, Pos::new(1, 7));

        let events =
            use_item(&mut game, ItemKind::Grenade, Some(Pos::new(1, 5))).expect("grenade applies");
        assert!(events.contains(&SimEvent::Explosion { center: Pos::new(1, 5), radius: 1 }));
        assert!(events.contains(&SimEvent::Explosion { center: Pos::new(1, 6), radius: 2 }));
        for id in [crawler, bloater, far_bloater] {
            assert!(game.state.actors.get(id).is_none(), "chained blasts clear the corridor");
        }
        assert_eq!(game.corruption.pending_heat, 10);
    }

    #[test]
    fn purge_vial_lowers_corruption() {
        let mut game = with_loadout("######\n#@...#\n######", &[(ItemKind::PurgeVial, 1)], &[]);
        game.corruption.value = 350;
        let events = use_item(&mut game, ItemKind::PurgeVial, None).expect("purge applies");
        assert!(events.contains(&SimEvent::CorruptionChanged { from: 350, to: 250 }));
        assert_eq!(game.corruption.value, 250);
    }

    #[test]
    fn stimpack_and_armor_plate_restore_resources() {
        let mut game = with_loadout(
            "######\n#@...#\n######",
            &[(ItemKind::Stimpack, 1), (ItemKind::ArmorPlate, 1)],
            &[],
        );
        let actor = player_mut(&mut game);
        actor.armor = 1;
        actor.effects.push((EffectKind::Slowed, 3));

        use_item(&mut game, ItemKind::ArmorPlate, None).expect("plate applies");
        assert_eq!(player(&game).armor, 10);
        assert_eq!(player(&game).ap, 3);

        use_item(&mut game, ItemKind::Stimpack, None).expect("stim applies");
        assert_eq!(player(&game).ap, 4);
        assert!(!player(&game).has_effect(EffectKind::Slowed));
    }

    #[test]
    fn stimpack_ap_is_capped_above_max() {
        let mut game = with_loadout("######\n#@...#\n######", &[(ItemKind::Stimpack, 3)], &[]);
        use_item(&mut game, ItemKind::Stimpack, None).expect("stim applies");
        assert_eq!(player(&game).ap, 5);
        use_item(&mut game, ItemKind::Stimpack, None).expect("stim applies");
        assert_eq!(player(&game).ap, 6);
        use_item(&mut game, ItemKind::Stimpack, None).expect("stim applies");
        assert_eq!(player(&game).ap, 6, "capped at max AP plus the stim bonus");
    }

    #[test]
    fn keycards_are_passive() {
        let mut game = with_loadout("######\n#@...#\n######", &[(ItemKind::Keycard, 1)], &[]);
        assert_eq!(
            use_item(&mut game, ItemKind::Keycard, None),
            Err(GameError::InvalidIntent(RejectReason::NoTarget))
        );
    }
}
