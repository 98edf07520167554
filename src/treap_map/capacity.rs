use super::TreapMap;
use crate::raw::{RawTreapMap, XorShift32};

impl<K, V> TreapMap<K, V> {
    /// Creates an empty map with room for at least `capacity` elements before the node
    /// storage has to grow.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map: TreapMap<i32, i32> = TreapMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_seed(capacity, XorShift32::DEFAULT_SEED)
    }

    /// Creates an empty map with room for at least `capacity` elements whose node priorities
    /// come from a generator seeded with `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map: TreapMap<u8, u8> = TreapMap::with_capacity_and_seed(8, 7);
    /// assert!(map.capacity() >= 8);
    /// ```
    #[must_use]
    pub fn with_capacity_and_seed(capacity: usize, seed: u32) -> Self {
        TreapMap {
            raw: RawTreapMap::with_capacity(capacity, seed),
        }
    }

    /// Returns the number of elements the map can hold without growing its storage.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API. Storage freed by
    /// [`clear`](TreapMap::clear) still counts towards the capacity.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
