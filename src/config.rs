//! Construction parameters for [`RobinHoodTable`].

use crate::error::{Result, TableError};
use crate::hash::SeedSource;
use crate::robin_hood_table::RobinHoodTable;

const DEFAULT_INITIAL_CAPACITY: usize = 16;
const DEFAULT_MAX_OCCUPANCY: usize = 12;

/// How `remove` vacates a slot.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RemovalPolicy {
    /// Shift the following displaced entries back by one slot. Keeps every
    /// recorded distance exact and leaves no markers behind.
    #[default]
    BackwardShift,
    /// Leave a tombstone in the slot. Inserts reuse tombstones; a resize
    /// discards them.
    Tombstone,
}

/// Builder for [`RobinHoodTable`].
///
/// ```
/// use robin_table::{RemovalPolicy, TableConfig};
///
/// let mut table = TableConfig::new(32, 24)
///     .removal_policy(RemovalPolicy::Tombstone)
///     .seed(42)
///     .build::<u32>()
///     .unwrap();
/// table.insert("answer", 42).unwrap();
/// assert_eq!(table.search("answer"), Some(&42));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub(crate) initial_capacity: usize,
    pub(crate) max_occupancy: usize,
    pub(crate) removal: RemovalPolicy,
    pub(crate) seeds: SeedSource,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_OCCUPANCY)
    }
}

impl TableConfig {
    pub fn new(initial_capacity: usize, max_occupancy: usize) -> Self {
        Self {
            initial_capacity,
            max_occupancy,
            removal: RemovalPolicy::default(),
            seeds: SeedSource::Random,
        }
    }

    pub fn removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal = policy;
        self
    }

    /// Use a deterministic seed sequence instead of random seeds.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seeds = SeedSource::Fixed(seed);
        self
    }

    pub fn seed_source(mut self, seeds: SeedSource) -> Self {
        self.seeds = seeds;
        self
    }

    /// Rejects parameters that would make the probe bound meaningless or
    /// force growth before the first insert completes.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity <= 1 {
            return Err(TableError::InvalidConfiguration(
                "initial capacity must be at least 2",
            ));
        }
        if self.max_occupancy == 0 {
            return Err(TableError::InvalidConfiguration(
                "max occupancy must be positive",
            ));
        }
        if self.max_occupancy > self.initial_capacity {
            return Err(TableError::InvalidConfiguration(
                "max occupancy must not exceed initial capacity",
            ));
        }
        Ok(())
    }

    pub fn build<'k, V>(self) -> Result<RobinHoodTable<'k, V>> {
        RobinHoodTable::with_config(self)
    }
}
