pub mod config;
pub mod content;
pub mod game;
pub mod journal;
pub mod replay;
pub mod rng;
pub mod setup;
pub mod state;
pub mod types;

pub use config::SimConfig;
pub use game::{ActorView, Game, Snapshot};
pub use journal::IntentJournal;
pub use replay::{ReplayError, ReplayResult, record, replay};
pub use rng::{ScriptedRng, SeededRng, SimRng};
pub use setup::{MissionSetup, SetupError};
pub use state::{GameState, Map};
pub use types::*;
