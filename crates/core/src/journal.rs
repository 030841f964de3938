use serde::{Deserialize, Serialize};

use crate::types::Intent;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Accepted player intents in submission order. Together with the seed and the
/// mission setup this is everything needed to reproduce a mission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentJournal {
    pub format_version: u16,
    pub seed: u64,
    pub intents: Vec<Intent>,
}

impl IntentJournal {
    pub fn new(seed: u64) -> Self {
        Self { format_version: JOURNAL_FORMAT_VERSION, seed, intents: Vec::new() }
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
