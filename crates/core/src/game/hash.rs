//! Stable snapshot hashing for replay verification.
//!
//! Only fieldless enum discriminants and plain integers go into the hasher, so the
//! value does not depend on `Debug` output or slot key versions.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

fn actor_kind_code(kind: ActorKind) -> u8 {
    match kind {
        ActorKind::Player => 0,
        ActorKind::Enemy(enemy) => 1 + enemy as u8,
    }
}

fn phase_code(phase: Phase) -> u8 {
    match phase {
        Phase::PlayerTurn => 0,
        Phase::ResolvingEnemyTurn => 1,
        Phase::GameOver(RunOutcome::Victory) => 2,
        Phase::GameOver(RunOutcome::Defeat) => 3,
    }
}

fn write_pos(hasher: &mut Xxh3, pos: Pos) {
    hasher.write_i32(pos.y);
    hasher.write_i32(pos.x);
}

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.turn.turn_count);
        hasher.write_u8(phase_code(self.turn.phase));
        hasher.write_u32(self.corruption.value);
        hasher.write_u32(self.corruption.pending_heat);
        hasher.write_u8(u8::from(self.corruption.boss_spawned));

        hasher.write_usize(self.state.actors.len());
        for actor in self.state.actors.iter() {
            hasher.write_u8(actor_kind_code(actor.kind));
            write_pos(&mut hasher, actor.pos);
            hasher.write_i32(actor.hp);
            hasher.write_i32(actor.max_hp);
            hasher.write_u32(actor.ap);
            hasher.write_u32(actor.armor);
            hasher.write_u8(actor.weapon.kind as u8);
            hasher.write_u32(actor.weapon.ammo.unwrap_or(u32::MAX));
            hasher.write_u8(actor.alert as u8);
            hasher.write_u8(actor.alert_cooldown);
            match actor.last_known_target {
                Some(target) => write_pos(&mut hasher, target),
                None => hasher.write_u8(0xff),
            }
            hasher.write_usize(actor.effects.len());
            for (effect, remaining) in &actor.effects {
                hasher.write_u8(*effect as u8);
                hasher.write_u32(*remaining);
            }
        }

        hasher.write_usize(self.state.corpses.len());
        for corpse in &self.state.corpses {
            write_pos(&mut hasher, *corpse);
        }
        hasher.write_usize(self.state.ground_items.len());
        for item in &self.state.ground_items {
            hasher.write_u8(item.kind as u8);
            write_pos(&mut hasher, item.pos);
        }
        for (item, count) in self.state.inventory.iter() {
            hasher.write_u8(item as u8);
            hasher.write_u32(count);
        }

        let map = &self.state.map;
        for (tile, open) in map.tiles.iter().zip(&map.open_doors) {
            hasher.write_u8(*tile as u8);
            hasher.write_u8(u8::from(*open));
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    const ROOM: &str = "
        ########
        #@..+..#
        #...c..#
        ########
    ";

    #[test]
    fn identical_setups_hash_identically() {
        let a = scripted_game(ROOM, []);
        let b = scripted_game(ROOM, []);
        assert_eq!(a.snapshot_hash(), b.snapshot_hash());
    }

    #[test]
    fn hash_tracks_positions_effects_and_doors() {
        let base = scripted_game(ROOM, []);
        let before = base.snapshot_hash();

        let mut moved = scripted_game(ROOM, []);
        player_mut(&mut moved).pos = Pos::new(2, 1);
        assert_ne!(moved.snapshot_hash(), before);

        let mut burning = scripted_game(ROOM, []);
        player_mut(&mut burning).effects.push((EffectKind::Burning, 1));
        assert_ne!(burning.snapshot_hash(), before);

        let mut opened = scripted_game(ROOM, []);
        assert!(opened.state.map.open_door(Pos::new(1, 4)));
        assert_ne!(opened.snapshot_hash(), before);
    }

    #[test]
    fn seed_is_part_of_the_hash() {
        let setup = MissionSetup::from_ascii(ROOM).expect("fixture layout should parse");
        let a = Game::new(1, setup.clone(), SimConfig::default());
        let b = Game::new(2, setup, SimConfig::default());
        assert_ne!(a.snapshot_hash(), b.snapshot_hash());
    }
}
