//! Shared fixtures for the `game` submodule test suites.

use super::*;
use crate::rng::ScriptedRng;
use crate::state::Map;

pub(crate) fn open_room_fixture() -> (Map, Pos) {
    let map = Map::new(10, 10);
    let origin = Pos { y: 5, x: 5 };
    (map, origin)
}

pub(crate) fn wall_occlusion_fixture() -> (Map, Pos) {
    let mut map = Map::new(11, 11);
    for y in 1..10 {
        for x in 1..10 {
            map.set_tile(Pos { y, x }, TileKind::Wall);
        }
    }
    for x in 1..10 {
        map.set_tile(Pos { y: 5, x }, TileKind::Floor);
    }
    map.set_tile(Pos { y: 5, x: 6 }, TileKind::Wall);
    (map, Pos { y: 5, x: 3 })
}

pub(crate) fn scripted_game(layout: &str, rolls: impl IntoIterator<Item = u32>) -> Game {
    scripted_game_with_config(layout, SimConfig::default(), rolls)
}

pub(crate) fn scripted_game_with_config(
    layout: &str,
    config: SimConfig,
    rolls: impl IntoIterator<Item = u32>,
) -> Game {
    let setup = MissionSetup::from_ascii(layout).expect("fixture layout should parse");
    Game::with_rng(7, setup, config, Box::new(ScriptedRng::new(rolls)))
}

/// Replaces whatever rolls are left with a fresh script.
pub(crate) fn script_rolls(game: &mut Game, rolls: impl IntoIterator<Item = u32>) {
    game.rng = Box::new(ScriptedRng::new(rolls));
}

pub(crate) fn enemy_at(game: &Game, pos: Pos) -> ActorId {
    let id = game.state.actors.occupant_at(pos).expect("an actor should stand here");
    let is_player = game.state.actors.get(id).is_some_and(Actor::is_player);
    assert!(!is_player, "expected an enemy at {pos:?}");
    id
}

pub(crate) fn player(game: &Game) -> &Actor {
    game.state.player().expect("player stays registered")
}

pub(crate) fn player_mut(game: &mut Game) -> &mut Actor {
    let id = game.state.player_id;
    game.state.actors.get_mut(id).expect("player stays registered")
}

pub(crate) fn actor_mut(game: &mut Game, id: ActorId) -> &mut Actor {
    game.state.actors.get_mut(id).expect("actor should be alive")
}
