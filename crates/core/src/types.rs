use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

new_key_type! {
    pub struct ActorId;
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dy, dx) = dir.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }
}

/// Grid distance used for weapon ranges and spawn spacing.
pub fn chebyshev(a: Pos, b: Pos) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
    Door,
    CoverHalf,
    CoverFull,
    Extraction,
    Vent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Crawler,
    Spitter,
    Brute,
    Stalker,
    Howler,
    Ghoul,
    Bloater,
    Ravager,
    Venomspitter,
    Juggernaut,
    Overseer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy(EnemyKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertState {
    Patrol,
    Alert,
    Chase,
    Attack,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Bleeding,
    Poisoned,
    Stunned,
    Burning,
    Slowed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Rifle,
    Pistol,
    Shotgun,
    Claws,
    AcidGlob,
    Cleaver,
    Maw,
    RendingClaws,
    VenomLance,
    SiegeFists,
    VoidLash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Medkit,
    Grenade,
    PurgeVial,
    ArmorPlate,
    Stimpack,
    Keycard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Move(Direction),
    Attack(Pos),
    UseItem { item: ItemKind, target: Option<Pos> },
    Reload,
    EndTurn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    PlayerTurn,
    ResolvingEnemyTurn,
    GameOver(RunOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    InsufficientAp,
    OutOfRange,
    NoAmmo,
    AmmoFull,
    NoLineOfSight,
    OutOfBounds,
    Blocked,
    NoTarget,
    NoSuchItem,
    NotPlayerTurn,
    MissionOver,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::InsufficientAp => "insufficient action points",
            RejectReason::OutOfRange => "target out of range",
            RejectReason::NoAmmo => "no ammo",
            RejectReason::AmmoFull => "magazine already full",
            RejectReason::NoLineOfSight => "no line of sight",
            RejectReason::OutOfBounds => "target out of bounds",
            RejectReason::Blocked => "destination blocked",
            RejectReason::NoTarget => "no target",
            RejectReason::NoSuchItem => "item not in inventory",
            RejectReason::NotPlayerTurn => "not the player's turn",
            RejectReason::MissionOver => "mission is over",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid intent: {0}")]
    InvalidIntent(RejectReason),
    #[error("actor {0:?} not found")]
    ActorNotFound(ActorId),
}

impl From<RejectReason> for GameError {
    fn from(reason: RejectReason) -> Self {
        GameError::InvalidIntent(reason)
    }
}

/// Accepted intents return the events they produced; rejected ones leave state untouched.
pub type IntentResult = Result<Vec<SimEvent>, GameError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    Attack { attacker: ActorId },
    Status,
    Explosion,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    PhaseChanged { phase: Phase },
    ActorMoved { actor: ActorId, from: Pos, to: Pos },
    DoorOpened { pos: Pos },
    Teleported { actor: ActorId, from: Pos, to: Pos },
    AttackResolved {
        attacker: ActorId,
        target: ActorId,
        hit: bool,
        crit: bool,
        damage: u32,
        accuracy: u32,
    },
    DamageTaken { actor: ActorId, amount: u32, armor_absorbed: u32, source: DamageSource },
    ActorDied { actor: ActorId, kind: ActorKind, pos: Pos },
    StatusApplied { actor: ActorId, effect: EffectKind, duration: u32 },
    StatusCured { actor: ActorId, effect: EffectKind },
    TurnSkipped { actor: ActorId },
    AlertChanged { actor: ActorId, from: AlertState, to: AlertState },
    AlertBroadcast { source: ActorId, target: Pos },
    Explosion { center: Pos, radius: u32 },
    CoverDestroyed { pos: Pos },
    CorpseConsumed { actor: ActorId, pos: Pos, healed: u32 },
    Reloaded { actor: ActorId, ammo: u32 },
    ItemPickedUp { item: ItemKind, pos: Pos },
    ItemUsed { item: ItemKind },
    Healed { actor: ActorId, amount: u32 },
    CorruptionChanged { from: u32, to: u32 },
    ThresholdCrossed { threshold: u32 },
    EnemyTransformed { actor: ActorId, from: EnemyKind, to: EnemyKind },
    EnemySpawned { actor: ActorId, kind: EnemyKind, pos: Pos },
    BossSpawned { actor: ActorId, pos: Pos },
    TurnEnded { turn: u32 },
    MissionEnded { outcome: RunOutcome },
}
