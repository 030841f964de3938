//! Mission hand-off from the map generator: a finished grid plus actor and item placements.
//! The core does not validate connectivity; it trusts the generator.

use thiserror::Error;

use crate::state::Map;
use crate::types::{EnemyKind, ItemKind, Pos, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSpawn {
    pub kind: ItemKind,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct MissionSetup {
    pub map: Map,
    pub player_start: Pos,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub item_spawns: Vec<ItemSpawn>,
    /// Keycards the player must carry onto an extraction tile to win.
    pub required_keys: u32,
    /// Items the player starts with.
    pub loadout: Vec<(ItemKind, u32)>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("layout is empty")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },
    #[error("unknown glyph {glyph:?} at {pos:?}")]
    UnknownGlyph { glyph: char, pos: Pos },
    #[error("layout has no player start")]
    MissingPlayer,
    #[error("layout has more than one player start")]
    DuplicatePlayer,
}

impl MissionSetup {
    pub fn new(map: Map, player_start: Pos) -> Self {
        Self {
            map,
            player_start,
            enemy_spawns: Vec::new(),
            item_spawns: Vec::new(),
            required_keys: 0,
            loadout: Vec::new(),
        }
    }

    pub fn with_enemy(mut self, kind: EnemyKind, pos: Pos) -> Self {
        self.enemy_spawns.push(EnemySpawn { kind, pos });
        self
    }

    pub fn with_item(mut self, kind: ItemKind, pos: Pos) -> Self {
        self.item_spawns.push(ItemSpawn { kind, pos });
        self
    }

    pub fn with_loadout(mut self, kind: ItemKind, count: u32) -> Self {
        self.loadout.push((kind, count));
        self
    }

    pub fn with_required_keys(mut self, keys: u32) -> Self {
        self.required_keys = keys;
        self
    }

    /// Parses a fixture layout, one character per tile:
    ///
    /// ```text
    /// #  wall        .  floor       +  door        h  half cover   H  full cover
    /// X  extraction  v  vent        @  player      k  keycard      m  medkit
    /// g  grenade     p  purge vial  a  armor plate s  stimpack
    /// c  crawler     r  spitter     b  brute       t  stalker      w  howler
    /// o  ghoul       e  bloater     R  ravager     V  venomspitter J  juggernaut
    /// O  overseer
    /// ```
    ///
    /// Actors and items stand on floor.
    pub fn from_ascii(layout: &str) -> Result<Self, SetupError> {
        let rows: Vec<&str> =
            layout.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(SetupError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();

        let mut map = Map::new(width, height);
        let mut player_start = None;
        let mut enemy_spawns = Vec::new();
        let mut item_spawns = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(SetupError::RaggedRow { row: y, found, expected: width });
            }
            for (x, glyph) in row.chars().enumerate() {
                let pos = Pos { y: y as i32, x: x as i32 };
                let tile = match glyph {
                    '#' => TileKind::Wall,
                    '+' => TileKind::Door,
                    'h' => TileKind::CoverHalf,
                    'H' => TileKind::CoverFull,
                    'X' => TileKind::Extraction,
                    'v' => TileKind::Vent,
                    _ => TileKind::Floor,
                };
                map.set_tile(pos, tile);

                if glyph == '@' {
                    if player_start.replace(pos).is_some() {
                        return Err(SetupError::DuplicatePlayer);
                    }
                } else if let Some(kind) = enemy_glyph(glyph) {
                    enemy_spawns.push(EnemySpawn { kind, pos });
                } else if let Some(kind) = item_glyph(glyph) {
                    item_spawns.push(ItemSpawn { kind, pos });
                } else if !matches!(glyph, '#' | '.' | '+' | 'h' | 'H' | 'X' | 'v') {
                    return Err(SetupError::UnknownGlyph { glyph, pos });
                }
            }
        }

        let player_start = player_start.ok_or(SetupError::MissingPlayer)?;
        let required_keys =
            item_spawns.iter().filter(|spawn| spawn.kind == ItemKind::Keycard).count() as u32;
        Ok(Self {
            map,
            player_start,
            enemy_spawns,
            item_spawns,
            required_keys,
            loadout: Vec::new(),
        })
    }
}

fn enemy_glyph(glyph: char) -> Option<EnemyKind> {
    Some(match glyph {
        'c' => EnemyKind::Crawler,
        'r' => EnemyKind::Spitter,
        'b' => EnemyKind::Brute,
        't' => EnemyKind::Stalker,
        'w' => EnemyKind::Howler,
        'o' => EnemyKind::Ghoul,
        'e' => EnemyKind::Bloater,
        'R' => EnemyKind::Ravager,
        'V' => EnemyKind::Venomspitter,
        'J' => EnemyKind::Juggernaut,
        'O' => EnemyKind::Overseer,
        _ => return None,
    })
}

fn item_glyph(glyph: char) -> Option<ItemKind> {
    Some(match glyph {
        'k' => ItemKind::Keycard,
        'm' => ItemKind::Medkit,
        'g' => ItemKind::Grenade,
        'p' => ItemKind::PurgeVial,
        'a' => ItemKind::ArmorPlate,
        's' => ItemKind::Stimpack,
        _ => return None,
    })
}
