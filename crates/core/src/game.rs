use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::rng::{SeededRng, SimRng};
use crate::setup::MissionSetup;
use crate::state::{Actor, ActorRegistry, GameState, GroundItem, Inventory, TurnState};
use crate::types::*;

pub mod ai;
pub mod combat;
pub mod corruption;
pub mod hash;
pub mod intents;
pub mod items;
pub mod resolution;
pub mod scheduler;
pub mod status;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_support;

pub use corruption::{CorruptionState, HeatSource};
use visibility::visible_set;

/// One mission. Owns the world, the turn state, the corruption counter and
/// the random source; every component borrows from here for one call.
pub struct Game {
    seed: u64,
    config: SimConfig,
    rng: Box<dyn SimRng>,
    state: GameState,
    turn: TurnState,
    corruption: CorruptionState,
    log: Vec<SimEvent>,
    last_events: Vec<SimEvent>,
}

/// Read-only view for renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: u32,
    pub phase: Phase,
    pub corruption: u32,
    pub actors: Vec<ActorView>,
    pub ground_items: Vec<(ItemKind, Pos)>,
    pub corpses: Vec<Pos>,
    pub inventory: Vec<(ItemKind, u32)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorView {
    pub id: ActorId,
    pub kind: ActorKind,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub ap: u32,
    pub armor: u32,
    pub alert: AlertState,
    pub effects: Vec<(EffectKind, u32)>,
}

impl Game {
    pub fn new(seed: u64, setup: MissionSetup, config: SimConfig) -> Self {
        Self::with_rng(seed, setup, config, Box::new(SeededRng::new(seed)))
    }

    /// Same as [`Game::new`] with an injected random source; tests pass a `ScriptedRng`.
    pub fn with_rng(
        seed: u64,
        setup: MissionSetup,
        config: SimConfig,
        rng: Box<dyn SimRng>,
    ) -> Self {
        let mut actors = ActorRegistry::default();
        let player_id = actors.insert(Actor::player(setup.player_start, &config.player));

        let mut inventory = Inventory::default();
        for (item, count) in &setup.loadout {
            inventory.add(*item, *count);
        }

        let mut state = GameState {
            map: setup.map,
            actors,
            player_id,
            ground_items: setup
                .item_spawns
                .iter()
                .map(|spawn| GroundItem { kind: spawn.kind, pos: spawn.pos })
                .collect(),
            corpses: Vec::new(),
            inventory,
            required_keys: setup.required_keys,
        };
        for spawn in &setup.enemy_spawns {
            state.spawn_enemy(spawn.kind, spawn.pos);
        }

        Self {
            seed,
            config,
            rng,
            state,
            turn: TurnState::new(),
            corruption: CorruptionState::default(),
            log: Vec::new(),
            last_events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn corruption(&self) -> CorruptionState {
        self.corruption
    }

    /// Every event since mission start, in order.
    pub fn log(&self) -> &[SimEvent] {
        &self.log
    }

    /// Events produced by the most recent accepted intent, enemy phase included.
    pub fn last_events(&self) -> &[SimEvent] {
        &self.last_events
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.turn.phase {
            Phase::GameOver(outcome) => Some(outcome),
            Phase::PlayerTurn | Phase::ResolvingEnemyTurn => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn.turn_count,
            phase: self.turn.phase,
            corruption: self.corruption.value,
            actors: self
                .state
                .actors
                .iter()
                .map(|actor| ActorView {
                    id: actor.id,
                    kind: actor.kind,
                    pos: actor.pos,
                    hp: actor.hp,
                    max_hp: actor.max_hp,
                    ap: actor.ap,
                    armor: actor.armor,
                    alert: actor.alert,
                    effects: actor.effects.clone(),
                })
                .collect(),
            ground_items: self
                .state
                .ground_items
                .iter()
                .map(|item| (item.kind, item.pos))
                .collect(),
            corpses: self.state.corpses.clone(),
            inventory: self.state.inventory.iter().collect(),
        }
    }

    /// Tiles the player currently sees, for fog-of-war rendering.
    pub fn visible_tiles(&self) -> BTreeSet<Pos> {
        visible_set(&self.state.map, self.state.player_pos(), self.config.player.sight_radius)
    }

    fn set_phase(&mut self, phase: Phase, events: &mut Vec<SimEvent>) {
        if self.turn.phase != phase {
            self.turn.phase = phase;
            events.push(SimEvent::PhaseChanged { phase });
        }
    }

    fn end_mission(&mut self, outcome: RunOutcome, events: &mut Vec<SimEvent>) {
        if self.turn.is_over() {
            return;
        }
        tracing::info!(?outcome, turn = self.turn.turn_count, "mission ended");
        self.set_phase(Phase::GameOver(outcome), events);
        events.push(SimEvent::MissionEnded { outcome });
    }

    fn spend_ap(&mut self, id: ActorId, cost: u32) {
        if let Some(actor) = self.state.actors.get_mut(id) {
            actor.ap = actor.ap.saturating_sub(cost);
        }
    }

    /// Moves an actor one tile and opens a closed door it steps onto.
    fn move_actor(&mut self, id: ActorId, to: Pos, events: &mut Vec<SimEvent>) {
        let Some(actor) = self.state.actors.get_mut(id) else {
            return;
        };
        let from = actor.pos;
        actor.pos = to;
        events.push(SimEvent::ActorMoved { actor: id, from, to });
        if self.state.map.open_door(to) {
            events.push(SimEvent::DoorOpened { pos: to });
        }
    }
}
