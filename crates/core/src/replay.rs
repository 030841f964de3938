use thiserror::Error;

use crate::config::SimConfig;
use crate::game::Game;
use crate::journal::{IntentJournal, JOURNAL_FORMAT_VERSION};
use crate::setup::MissionSetup;
use crate::types::{GameError, Intent, RunOutcome, SimEvent};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("journal format version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("journal intent #{index} was rejected: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: GameError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub snapshot_hash: u64,
    pub outcome: Option<RunOutcome>,
    pub turn: u32,
    pub log: Vec<SimEvent>,
}

impl ReplayResult {
    fn capture(game: &Game) -> Self {
        Self {
            snapshot_hash: game.snapshot_hash(),
            outcome: game.outcome(),
            turn: game.turn().turn_count,
            log: game.log().to_vec(),
        }
    }
}

/// Rebuilds a mission from its setup and re-submits every journaled intent.
/// A journal only ever records accepted intents, so any rejection means the
/// setup, config or build differs from the recording.
pub fn replay(
    setup: MissionSetup,
    config: SimConfig,
    journal: &IntentJournal,
) -> Result<ReplayResult, ReplayError> {
    if journal.format_version != JOURNAL_FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion {
            found: journal.format_version,
            expected: JOURNAL_FORMAT_VERSION,
        });
    }
    let mut game = Game::new(journal.seed, setup, config);
    for (index, intent) in journal.intents.iter().enumerate() {
        game.submit(*intent).map_err(|source| ReplayError::Rejected { index, source })?;
    }
    tracing::debug!(intents = journal.len(), turn = game.turn().turn_count, "replay finished");
    Ok(ReplayResult::capture(&game))
}

/// Plays `intents` against a fresh mission, journaling the accepted ones and
/// skipping rejections. Returns the journal with the live game's final state.
pub fn record(
    seed: u64,
    setup: MissionSetup,
    config: SimConfig,
    intents: impl IntoIterator<Item = Intent>,
) -> (IntentJournal, ReplayResult) {
    let mut game = Game::new(seed, setup, config);
    let mut journal = IntentJournal::new(seed);
    for intent in intents {
        if game.outcome().is_some() {
            break;
        }
        if game.submit(intent).is_ok() {
            journal.push(intent);
        }
    }
    (journal, ReplayResult::capture(&game))
}
