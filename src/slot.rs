//! Slot storage: the state of a slot and the entry it may hold.

/// A live entry together with its displacement from the key's home index.
#[derive(Debug)]
pub(crate) struct Bucket<'k, V> {
    pub(crate) key: &'k [u8],
    pub(crate) value: V,
    pub(crate) dist: usize,
}

#[derive(Debug)]
pub(crate) enum Slot<'k, V> {
    Empty,
    /// Left behind by a remove under [`RemovalPolicy::Tombstone`](crate::RemovalPolicy).
    Tombstone,
    Occupied(Bucket<'k, V>),
}

impl<'k, V> Slot<'k, V> {
    #[inline]
    pub(crate) fn bucket(&self) -> Option<&Bucket<'k, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self) -> Option<&mut Bucket<'k, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn into_bucket(self) -> Option<Bucket<'k, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }
}
