//! Key hashing and per-table seeds.

use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;

const DJB2_INIT: u64 = 5381;

/// djb2 (xor variant) over every byte of the key.
#[inline]
pub(crate) fn djb2(key: &[u8]) -> u64 {
    key.iter()
        .fold(DJB2_INIT, |h, &b| h.wrapping_mul(33) ^ u64::from(b))
}

/// Index of the slot a key hashes to before any displacement.
#[inline]
pub(crate) fn home_index(key: &[u8], seed: u64, capacity: usize) -> usize {
    ((djb2(key) ^ seed) % capacity as u64) as usize
}

/// `⌊log2(capacity)⌋`; callers guarantee `capacity >= 2`.
#[inline]
pub(crate) fn probe_bound(capacity: usize) -> usize {
    capacity.ilog2() as usize
}

/// Where a table draws its seeds from.
///
/// A table draws one seed at construction and another on every resize, so
/// the same key lands on a different home after each growth.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SeedSource {
    /// Each seed comes from a freshly keyed `RandomState`.
    #[default]
    Random,
    /// Deterministic splitmix64 sequence starting at the given state.
    Fixed(u64),
}

impl SeedSource {
    pub(crate) fn draw(&mut self) -> u64 {
        match self {
            SeedSource::Random => RandomState::new().hash_one(DJB2_INIT),
            SeedSource::Fixed(state) => {
                *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
                splitmix64(*state)
            }
        }
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
