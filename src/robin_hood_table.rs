//! RobinHoodTable: open addressing with linear probing and Robin Hood
//! displacement, keyed by borrowed byte strings.

use crate::config::{RemovalPolicy, TableConfig};
use crate::error::{Result, TableError};
use crate::hash::{self, SeedSource};
use crate::slot::{Bucket, Slot};
use core::fmt;
use core::mem;

/// Outcome of walking a probe chain without touching any slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Plan {
    /// The key is already stored at this index.
    Update(usize),
    /// The walk ends by filling this vacant index.
    Place(usize),
    /// Some entry on the walk would reach the probe bound.
    Overflow,
}

/// Open-addressing hash table mapping borrowed byte-string keys to values.
///
/// Keys are borrowed for `'k` and never copied; values are owned by the
/// table. The slot array holds `capacity + probe_bound` slots so a probe
/// chain starting at any home index fits without wrapping.
pub struct RobinHoodTable<'k, V> {
    slots: Vec<Slot<'k, V>>,
    capacity: usize,
    probe_bound: usize,
    len: usize,
    tombstones: usize,
    max_occupancy: usize,
    seed: u64,
    removal: RemovalPolicy,
    seeds: SeedSource,
}

/// Iterator over live entries in unspecified order.
pub struct Iter<'a, 'k, V> {
    it: core::slice::Iter<'a, Slot<'k, V>>,
}

impl<'a, 'k, V> Iterator for Iter<'a, 'k, V> {
    type Item = (&'k [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .find_map(|slot| slot.bucket().map(|b| (b.key, &b.value)))
    }
}

/// Mutable iterator over live entries in unspecified order.
pub struct IterMut<'a, 'k, V> {
    it: core::slice::IterMut<'a, Slot<'k, V>>,
}

impl<'a, 'k, V> Iterator for IterMut<'a, 'k, V> {
    type Item = (&'k [u8], &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .find_map(|slot| slot.bucket_mut().map(|b| (b.key, &mut b.value)))
    }
}

impl<'a, 'k, V> IntoIterator for &'a RobinHoodTable<'k, V> {
    type Item = (&'k [u8], &'a V);
    type IntoIter = Iter<'a, 'k, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for RobinHoodTable<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn empty_slots<'k, V>(total: usize) -> Result<Vec<Slot<'k, V>>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(total)
        .map_err(|_| TableError::Allocation { slots: total })?;
    slots.resize_with(total, || Slot::Empty);
    Ok(slots)
}

impl<'k, V> RobinHoodTable<'k, V> {
    /// Creates a table with `initial_capacity` home slots that grows once
    /// more than `max_occupancy` entries would be stored.
    pub fn new(initial_capacity: usize, max_occupancy: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(initial_capacity, max_occupancy))
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let table = Self::allocate(
            config.initial_capacity,
            config.max_occupancy,
            config.removal,
            config.seeds,
        )?;
        tracing::debug!(
            capacity = table.capacity,
            probe_bound = table.probe_bound,
            max_occupancy = table.max_occupancy,
            removal = ?table.removal,
            "created robin hood table"
        );
        Ok(table)
    }

    fn allocate(
        capacity: usize,
        max_occupancy: usize,
        removal: RemovalPolicy,
        mut seeds: SeedSource,
    ) -> Result<Self> {
        let probe_bound = hash::probe_bound(capacity);
        let total = capacity
            .checked_add(probe_bound)
            .ok_or(TableError::CapacityOverflow)?;
        let slots = empty_slots(total)?;
        let seed = seeds.draw();
        Ok(Self {
            slots,
            capacity,
            probe_bound,
            len: 0,
            tombstones: 0,
            max_occupancy,
            seed,
            removal,
            seeds,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of addressable home slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest displacement an entry may have, plus one.
    pub fn probe_bound(&self) -> usize {
        self.probe_bound
    }

    pub fn max_occupancy(&self) -> usize {
        self.max_occupancy
    }

    /// Tombstones currently in the slot array. Always zero under
    /// [`RemovalPolicy::BackwardShift`].
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.removal
    }

    #[inline]
    fn home(&self, key: &[u8]) -> usize {
        hash::home_index(key, self.seed, self.capacity)
    }

    fn find_index(&self, key: &[u8]) -> Option<usize> {
        let home = self.home(key);
        for (dist, slot) in self.slots[home..]
            .iter()
            .take(self.probe_bound)
            .enumerate()
        {
            match slot {
                Slot::Empty => return None,
                Slot::Occupied(b) if b.dist == dist && b.key == key => {
                    return Some(home + dist)
                }
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
        None
    }

    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let idx = self.find_index(key.as_ref())?;
        self.slots[idx].bucket().map(|b| &b.value)
    }

    pub fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let idx = self.find_index(key.as_ref())?;
        self.slots[idx].bucket_mut().map(|b| &mut b.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.find_index(key.as_ref()).is_some()
    }

    /// Inserts or updates `key`.
    ///
    /// Returns the previous value when the key was already present (the
    /// entry is updated in place and `len` is unchanged), `None` for a new
    /// entry. Growth happens transparently; only allocation failure is
    /// reported as an error, and no stored entry is lost in that case.
    ///
    /// Only a new entry counts against the occupancy threshold: updating a
    /// key that is already stored never grows the table, even when `len`
    /// equals `max_occupancy`.
    pub fn insert<Q>(&mut self, key: &'k Q, value: V) -> Result<Option<V>>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        self.insert_bytes(key.as_ref(), value)
    }

    fn insert_bytes(&mut self, key: &'k [u8], value: V) -> Result<Option<V>> {
        loop {
            match self.plan(key) {
                Plan::Update(idx) => {
                    let prev = self.slots[idx]
                        .bucket_mut()
                        .map(|b| mem::replace(&mut b.value, value));
                    return Ok(prev);
                }
                Plan::Place(_) if self.len >= self.max_occupancy => self.grow()?,
                Plan::Place(end) => {
                    let placed = self.commit(key, value);
                    debug_assert_eq!(placed, end);
                    return Ok(None);
                }
                Plan::Overflow => {
                    tracing::trace!(
                        capacity = self.capacity,
                        probe_bound = self.probe_bound,
                        len = self.len,
                        "probe bound exceeded"
                    );
                    self.grow()?;
                }
            }
        }
    }

    /// Replays the insertion walk on distances only.
    fn plan(&self, key: &[u8]) -> Plan {
        // Reclaimed tombstones break the distance ordering along a chain, so
        // the walk alone cannot tell whether the key is stored further on.
        if self.removal == RemovalPolicy::Tombstone {
            if let Some(idx) = self.find_index(key) {
                return Plan::Update(idx);
            }
        }

        let mut idx = self.home(key);
        let mut dist = 0;
        let mut carrying_key = true;
        loop {
            if dist >= self.probe_bound {
                return Plan::Overflow;
            }
            let Some(slot) = self.slots.get(idx) else {
                return Plan::Overflow;
            };
            match slot {
                Slot::Empty | Slot::Tombstone => return Plan::Place(idx),
                Slot::Occupied(resident) => {
                    if resident.dist < dist {
                        dist = resident.dist;
                        carrying_key = false;
                    } else if carrying_key && resident.dist == dist && resident.key == key {
                        return Plan::Update(idx);
                    }
                }
            }
            idx += 1;
            dist += 1;
        }
    }

    /// Performs the walk `plan` approved. Returns the index of the vacant
    /// slot that absorbed the last carried entry.
    fn commit(&mut self, key: &'k [u8], value: V) -> usize {
        let mut carried = Bucket {
            key,
            value,
            dist: 0,
        };
        let mut idx = self.home(key);
        loop {
            let slot = &mut self.slots[idx];
            match slot {
                Slot::Occupied(resident) => {
                    if resident.dist < carried.dist {
                        mem::swap(resident, &mut carried);
                    }
                }
                _ => {
                    if matches!(slot, Slot::Tombstone) {
                        self.tombstones -= 1;
                    }
                    *slot = Slot::Occupied(carried);
                    self.len += 1;
                    return idx;
                }
            }
            idx += 1;
            carried.dist += 1;
        }
    }

    /// Doubles capacity and occupancy threshold, reseeds, and reinserts
    /// every live entry. Tombstones are dropped.
    fn grow(&mut self) -> Result<()> {
        let capacity = self
            .capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;
        self.grow_to(capacity, self.max_occupancy.saturating_mul(2))
    }

    /// Rehashes once into `capacity` home slots with a fresh seed.
    fn grow_to(&mut self, capacity: usize, max_occupancy: usize) -> Result<()> {
        // Lay the entries out by slot index first; values move only once the
        // new array is allocated and final. The layout never removes, so it
        // needs no tombstone lookups.
        let mut layout: RobinHoodTable<'k, usize> = RobinHoodTable::allocate(
            capacity,
            max_occupancy,
            RemovalPolicy::BackwardShift,
            self.seeds.clone(),
        )?;
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(b) = slot.bucket() {
                layout.insert_bytes(b.key, idx)?;
            }
        }
        debug_assert!(layout.probe_bound > self.probe_bound);
        debug_assert_eq!(layout.len, self.len);

        let total = layout.slots.len();
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(total)
            .map_err(|_| TableError::Allocation { slots: total })?;
        let old = &mut self.slots;
        slots.extend(layout.slots.into_iter().map(|slot| {
            let Some(placed) = slot.into_bucket() else {
                return Slot::Empty;
            };
            match mem::replace(&mut old[placed.value], Slot::Empty).into_bucket() {
                Some(live) => Slot::Occupied(Bucket {
                    key: placed.key,
                    value: live.value,
                    dist: placed.dist,
                }),
                None => Slot::Empty,
            }
        }));

        tracing::debug!(
            old_capacity = self.capacity,
            new_capacity = layout.capacity,
            probe_bound = layout.probe_bound,
            len = self.len,
            dropped_tombstones = self.tombstones,
            "grew robin hood table"
        );

        self.slots = slots;
        self.capacity = layout.capacity;
        self.probe_bound = layout.probe_bound;
        self.max_occupancy = layout.max_occupancy;
        self.seed = layout.seed;
        self.seeds = layout.seeds;
        self.tombstones = 0;
        Ok(())
    }

    /// Removes `key`, returning its value. Absent keys leave the table
    /// untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let idx = self.find_index(key.as_ref())?;
        let removed = match self.removal {
            RemovalPolicy::BackwardShift => {
                let removed = mem::replace(&mut self.slots[idx], Slot::Empty);
                self.shift_back(idx);
                removed
            }
            RemovalPolicy::Tombstone => {
                self.tombstones += 1;
                mem::replace(&mut self.slots[idx], Slot::Tombstone)
            }
        };
        self.len -= 1;
        removed.into_bucket().map(|b| b.value)
    }

    /// Pulls displaced successors of an emptied slot one step back toward
    /// their homes.
    fn shift_back(&mut self, mut hole: usize) {
        while let Some(next) = self.slots.get_mut(hole + 1).and_then(Slot::bucket_mut) {
            if next.dist == 0 {
                break;
            }
            next.dist -= 1;
            self.slots.swap(hole, hole + 1);
            hole += 1;
        }
    }

    /// Grows until `additional` more entries fit under the occupancy
    /// threshold, so later inserts do not pay for a load-triggered resize.
    /// The target capacity is computed up front and reached with a single
    /// rehash.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let wanted = self
            .len
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;
        if self.max_occupancy >= wanted {
            return Ok(());
        }
        let (mut capacity, mut max_occupancy) = (self.capacity, self.max_occupancy);
        while max_occupancy < wanted {
            capacity = capacity
                .checked_mul(2)
                .ok_or(TableError::CapacityOverflow)?;
            max_occupancy = max_occupancy.saturating_mul(2);
        }
        self.grow_to(capacity, max_occupancy)
    }

    /// Drops every entry; capacity and seed are kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
    }

    /// Releases the slot array. Dropping the table does the same.
    pub fn destroy(self) {}

    pub fn iter(&self) -> Iter<'_, 'k, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, 'k, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// Panics if any structural invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        assert_eq!(self.slots.len(), self.capacity + self.probe_bound);
        assert_eq!(self.probe_bound, hash::probe_bound(self.capacity));
        assert!(self.len <= self.max_occupancy, "load bound exceeded");

        let mut keys = HashSet::new();
        let mut tombstones = 0;
        for (idx, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => {}
                Slot::Tombstone => tombstones += 1,
                Slot::Occupied(b) => {
                    assert!(b.dist < self.probe_bound, "distance beyond probe bound");
                    assert_eq!(self.home(b.key) + b.dist, idx, "distance mismatch");
                    assert!(keys.insert(b.key), "duplicate key");
                    // The chain from home to here has no gap.
                    for between in &self.slots[idx - b.dist..idx] {
                        assert!(!matches!(between, Slot::Empty), "gap in probe chain");
                    }
                    if self.removal == RemovalPolicy::BackwardShift && b.dist > 0 {
                        let prev = self.slots[idx - 1].bucket().expect("occupied predecessor");
                        assert!(prev.dist + 1 >= b.dist, "robin hood order violated");
                    }
                }
            }
        }
        assert_eq!(keys.len(), self.len);
        assert_eq!(tombstones, self.tombstones);
        if self.removal == RemovalPolicy::BackwardShift {
            assert_eq!(self.tombstones, 0);
        }
    }
}
