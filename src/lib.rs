//! robin-table: an open-addressing hash table with linear probing and
//! Robin Hood displacement, keyed by borrowed byte strings.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable associative container for symbol tables
//!   and small caches, where worst-case probe length matters more than
//!   generality.
//! - Layers:
//!   - `hash`: djb2 over the key bytes, xored with a per-table seed and
//!     reduced modulo the capacity to give the home index.
//!   - `slot`: `Empty | Tombstone | Occupied(Bucket)`; the probe distance
//!     lives inside the occupied bucket and nowhere else.
//!   - `RobinHoodTable<'k, V>`: search, upsert, removal and growth.
//!
//! Layout
//! - `capacity` home slots followed by `probe_bound = ⌊log2 capacity⌋`
//!   guard slots. No entry sits further than `probe_bound - 1` from its
//!   home, so a probe chain never wraps around the array.
//!
//! Insertion
//! - The walk is planned on distances alone before any slot is written.
//!   If the plan would push some entry to the probe bound, the table grows
//!   and the insert restarts from the original key with a fresh home.
//! - Each growth doubles the capacity, so the probe bound grows by exactly
//!   one and the retry loop terminates.
//! - Inserting an existing key replaces its value and returns the old one.
//!
//! Removal
//! - `RemovalPolicy::BackwardShift` (default) pulls displaced successors
//!   back one slot; every recorded distance stays exact and no markers
//!   accumulate.
//! - `RemovalPolicy::Tombstone` leaves a marker that inserts reclaim and
//!   growth discards.
//!
//! Growth
//! - Doubles capacity and occupancy threshold and draws a new seed, so a
//!   key set that clusters under one seed is scattered under the next.
//! - Live entries are laid out by index in a scratch table first; values
//!   only move once every allocation has succeeded.
//!
//! Ownership
//! - Keys are borrowed for `'k`; the table never copies or frees them.
//! - Values are owned. Store `&T` to keep values external.
//!
//! Notes and non-goals
//! - Single-threaded; share behind a lock if needed.
//! - No shrinking on removal.
//! - Iteration order is unspecified and changes on every growth.
//! - Keys are byte strings only; there is no `Hash`-based key support.

mod config;
mod error;
mod hash;
mod robin_hood_table;
mod robin_hood_table_proptest;
mod slot;

// Public surface
pub use config::{RemovalPolicy, TableConfig};
pub use error::{Result, TableError};
pub use hash::SeedSource;
pub use robin_hood_table::{Iter, IterMut, RobinHoodTable};
