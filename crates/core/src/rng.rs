//! Injectable random source for every draw the simulation makes.
//! Accuracy rolls, AI probability checks and spawn placement all go through [`SimRng`],
//! so a seed (or a scripted sequence in tests) fully determines a mission.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub trait SimRng {
    fn next_u32(&mut self) -> u32;

    /// Uniform draw in `[0, 100)`.
    fn roll_percent(&mut self) -> u32 {
        self.next_u32() % 100
    }

    /// Uniform draw in `[min, max]`; returns `min` when the range is empty.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.next_u32() % (max - min + 1)
    }

    fn chance_pct(&mut self, pct: u32) -> bool {
        self.roll_percent() < pct
    }

    /// Index into a non-empty slice of length `len`.
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.next_u32() as usize % len
    }
}

pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl SimRng for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}

/// Replays a fixed sequence of raw values, then a fallback forever.
/// Percent rolls see `value % 100`, so pushing `0` forces a hit and `99` forces a miss.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    queue: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self { queue: values.into_iter().collect(), fallback: 99 }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl SimRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
