use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::config::PlayerTuning;
use crate::content::{Abilities, EnemyTemplate, Weapon, enemy_template, weapon_template};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct Map {
    pub internal_width: usize,
    pub internal_height: usize,
    pub tiles: Vec<TileKind>,
    pub open_doors: Vec<bool>,
}

impl Map {
    /// Open floor enclosed by a one-tile wall border. A zero dimension gives an
    /// empty map where every position is out of bounds.
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = vec![TileKind::Floor; width * height];
        if !tiles.is_empty() {
            for x in 0..width {
                tiles[x] = TileKind::Wall;
                tiles[(height - 1) * width + x] = TileKind::Wall;
            }
            for y in 0..height {
                tiles[y * width] = TileKind::Wall;
                tiles[y * width + (width - 1)] = TileKind::Wall;
            }
        }
        Self {
            internal_width: width,
            internal_height: height,
            tiles,
            open_doors: vec![false; width * height],
        }
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.internal_width
            && (pos.y as usize) < self.internal_height
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        !matches!(self.tile_at(pos), TileKind::Wall | TileKind::CoverFull)
    }

    pub fn blocks_sight(&self, pos: Pos) -> bool {
        match self.tile_at(pos) {
            TileKind::Wall | TileKind::CoverFull => true,
            TileKind::Door => !self.is_door_open(pos),
            _ => false,
        }
    }

    pub fn is_door_open(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.open_doors[self.index(pos)]
    }

    /// Returns true when a closed door was opened.
    pub fn open_door(&mut self, pos: Pos) -> bool {
        if self.tile_at(pos) != TileKind::Door || self.is_door_open(pos) {
            return false;
        }
        let idx = self.index(pos);
        self.open_doors[idx] = true;
        true
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.internal_height).flat_map(move |y| {
            (0..self.internal_width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.internal_width + (pos.x as usize)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponInstance {
    pub kind: WeaponKind,
    pub ammo: Option<u32>,
}

impl WeaponInstance {
    pub fn new(kind: WeaponKind) -> Self {
        Self { kind, ammo: weapon_template(kind).ammo_capacity }
    }

    pub fn template(&self) -> Weapon {
        weapon_template(self.kind)
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo.is_none_or(|ammo| ammo > 0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub ap: u32,
    pub max_ap: u32,
    pub armor: u32,
    pub max_armor: u32,
    pub effects: Vec<(EffectKind, u32)>,
    pub weapon: WeaponInstance,
    pub skill_bonus: u32,
    pub alert: AlertState,
    pub last_known_target: Option<Pos>,
    pub alert_cooldown: u8,
}

impl Actor {
    pub fn player(pos: Pos, tuning: &PlayerTuning) -> Self {
        Self {
            id: ActorId::default(),
            kind: ActorKind::Player,
            pos,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            ap: tuning.max_ap,
            max_ap: tuning.max_ap,
            armor: tuning.max_armor,
            max_armor: tuning.max_armor,
            effects: Vec::new(),
            weapon: WeaponInstance::new(tuning.weapon),
            skill_bonus: tuning.skill_bonus,
            alert: AlertState::Patrol,
            last_known_target: None,
            alert_cooldown: 0,
        }
    }

    pub fn enemy(kind: EnemyKind, pos: Pos) -> Self {
        let template = enemy_template(kind);
        Self {
            id: ActorId::default(),
            kind: ActorKind::Enemy(kind),
            pos,
            hp: template.hp,
            max_hp: template.hp,
            ap: template.ap,
            max_ap: template.ap,
            armor: 0,
            max_armor: 0,
            effects: Vec::new(),
            weapon: WeaponInstance::new(template.weapon),
            skill_bonus: 0,
            alert: AlertState::Patrol,
            last_known_target: None,
            alert_cooldown: 0,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        match self.kind {
            ActorKind::Enemy(kind) => Some(kind),
            ActorKind::Player => None,
        }
    }

    pub fn template(&self) -> Option<EnemyTemplate> {
        self.enemy_kind().map(enemy_template)
    }

    /// Capability flags from the enemy template; empty for the player.
    pub fn abilities(&self) -> Abilities {
        self.template().map_or(Abilities::empty(), |template| template.abilities)
    }

    /// Flat damage reduction percentage from the enemy template.
    pub fn armor_pct(&self) -> u32 {
        self.template().map_or(0, |template| template.armor_pct)
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|(effect, _)| *effect == kind)
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = (self.hp + amount as i32).min(self.max_hp);
        (self.hp - before).max(0) as u32
    }
}

/// Authoritative actor storage. Slot keys stay stable across removals and
/// `order` keeps registration order for the enemy phase.
#[derive(Clone, Debug, Default)]
pub struct ActorRegistry {
    slots: SlotMap<ActorId, Actor>,
    order: Vec<ActorId>,
}

impl ActorRegistry {
    pub fn insert(&mut self, actor: Actor) -> ActorId {
        let id = self.slots.insert(actor);
        self.slots[id].id = id;
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.slots.remove(id)?;
        self.order.retain(|other| *other != id);
        Some(actor)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.slots.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Actors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.order.iter().filter_map(|id| self.slots.get(*id))
    }

    pub fn enemy_ids(&self) -> Vec<ActorId> {
        self.iter().filter(|actor| !actor.is_player()).map(|actor| actor.id).collect()
    }

    pub fn occupant_at(&self, pos: Pos) -> Option<ActorId> {
        self.iter().find(|actor| actor.pos == pos).map(|actor| actor.id)
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.occupant_at(pos).is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundItem {
    pub kind: ItemKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<ItemKind, u32>,
}

impl Inventory {
    pub fn add(&mut self, item: ItemKind, count: u32) {
        *self.counts.entry(item).or_insert(0) += count;
    }

    pub fn count(&self, item: ItemKind) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Returns false when none are held.
    pub fn take(&mut self, item: ItemKind) -> bool {
        match self.counts.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.counts.iter().map(|(item, count)| (*item, *count))
    }
}

/// Mission world state. The scheduler (`Game`) owns it exclusively; components
/// receive borrows of the parts they need for the duration of one call.
#[derive(Clone, Debug)]
pub struct GameState {
    pub map: Map,
    pub actors: ActorRegistry,
    pub player_id: ActorId,
    pub ground_items: Vec<GroundItem>,
    pub corpses: Vec<Pos>,
    pub inventory: Inventory,
    pub required_keys: u32,
}

impl GameState {
    pub fn player(&self) -> Option<&Actor> {
        self.actors.get(self.player_id)
    }

    pub fn player_pos(&self) -> Pos {
        self.player().map_or(Pos::default(), |player| player.pos)
    }

    /// Single creation path for every enemy: initial population and corruption spawns.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Pos) -> ActorId {
        self.actors.insert(Actor::enemy(kind, pos))
    }

    /// Walkable and not occupied by any living actor.
    pub fn is_free(&self, pos: Pos) -> bool {
        self.map.is_walkable(pos) && !self.actors.is_occupied(pos)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub turn_count: u32,
    pub phase: Phase,
}

impl TurnState {
    pub fn new() -> Self {
        Self { turn_count: 0, phase: Phase::PlayerTurn }
    }

    pub fn active_side(&self) -> Side {
        match self.phase {
            Phase::ResolvingEnemyTurn => Side::Enemy,
            Phase::PlayerTurn | Phase::GameOver(_) => Side::Player,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
