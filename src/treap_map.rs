use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::Index;

use crate::raw::{Handle, RawTreapMap, Side, XorShift32};

mod capacity;
mod cursor;
mod entry;
mod structure;

pub use cursor::{Cursor, CursorMut};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use structure::Structure;

/// An ordered map based on a [treap].
///
/// Given a key type with a [total order], an ordered map stores its entries in key order.
/// That means that keys must be of a type that implements the [`Ord`] trait.
///
/// Every entry lives in its own node. Nodes are arranged as a binary search tree on the key
/// and, at the same time, as a max-heap on a 32-bit priority drawn from the map's own
/// xorshift generator when the node is created. The random priorities make the tree shaped
/// like a random binary search tree, so lookups, insertions and successor queries take
/// expected O(log n) time. There is no deterministic balance guarantee.
///
/// Unlike `BTreeMap`, [`insert`](TreapMap::insert) never overwrites: inserting a key that is
/// already present leaves the stored value untouched and reports `false`. Use
/// [`get_or_insert_default`](TreapMap::get_or_insert_default), [`get_mut`](TreapMap::get_mut)
/// or the [`entry`](TreapMap::entry) API to update a value. Individual keys cannot be removed;
/// [`clear`](TreapMap::clear) tears the whole tree down.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map.
///
/// # Examples
///
/// ```
/// use treap_map::TreapMap;
///
/// let mut movie_reviews = TreapMap::new();
///
/// movie_reviews.insert("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert("The Godfather", "Very enjoyable.");
///
/// // A second review for the same movie is ignored.
/// let (_, inserted) = movie_reviews.insert("Pulp Fiction", "Meh.");
/// assert!(!inserted);
/// assert_eq!(movie_reviews["Pulp Fiction"], "Masterpiece.");
///
/// // Successor lookup.
/// let next = movie_reviews.upper_bound("Office Space");
/// assert_eq!(next.key(), Some(&"Pulp Fiction"));
///
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// [treap]: https://en.wikipedia.org/wiki/Treap
/// [total order]: https://en.wikipedia.org/wiki/Total_order
#[derive(Clone)]
pub struct TreapMap<K, V> {
    raw: RawTreapMap<K, V>,
}

/// An iterator over the entries of a `TreapMap`.
///
/// This `struct` is created by the [`iter`] method on [`TreapMap`]. Each step runs a
/// successor (or predecessor) query from the root, so a step costs O(log n).
///
/// # Examples
///
/// ```
/// use treap_map::TreapMap;
///
/// let map = TreapMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: TreapMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawTreapMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `TreapMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`TreapMap`].
///
/// # Examples
///
/// ```
/// use treap_map::TreapMap;
///
/// let mut map = TreapMap::from([(1, 10), (2, 20)]);
/// for (_, value) in map.iter_mut() {
///     *value += 1;
/// }
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, [11, 21]);
/// ```
///
/// [`iter_mut`]: TreapMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    tree: *mut RawTreapMap<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a mut (K, V)>,
}

// SAFETY: IterMut behaves as &mut RawTreapMap<K, V>, so it is Send when K and V are Send.
// It is NOT Sync because mutable iterators should not be shared across threads.
unsafe impl<K: Send, V: Send> Send for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a `TreapMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`TreapMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `TreapMap`.
///
/// This `struct` is created by the [`keys`] method on [`TreapMap`].
///
/// [`keys`]: TreapMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `TreapMap`.
///
/// This `struct` is created by the [`values`] method on [`TreapMap`].
///
/// [`values`]: TreapMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `TreapMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`TreapMap`].
///
/// [`values_mut`]: TreapMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<K, V> TreapMap<K, V> {
    /// Makes a new, empty `TreapMap`.
    ///
    /// Does not allocate anything on its own. Priorities come from the default seed, so two
    /// maps fed the same insertions end up with the same shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> TreapMap<K, V> {
        Self::with_seed(XorShift32::DEFAULT_SEED)
    }

    /// Makes a new, empty `TreapMap` whose node priorities are drawn from a xorshift
    /// generator seeded with `seed`.
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
    /// let mut map = TreapMap::with_seed(0x9e37_79b9);
    /// map.insert("a", 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub const fn with_seed(seed: u32) -> TreapMap<K, V> {
        TreapMap {
            raw: RawTreapMap::new(seed),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut a = TreapMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut a = TreapMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    ///
    /// Nodes are released bottom-up (children before their parent). The freed storage is
    /// kept and reused by later insertions.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut a = TreapMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the end cursor, positioned one past the last element.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map: TreapMap<i32, i32> = TreapMap::new();
    /// assert!(map.end().is_end());
    /// assert_eq!(map.begin(), map.end());
    /// ```
    #[must_use]
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, None)
    }

    /// Returns a cursor at the first (smallest-key) element, or the end cursor if the map
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// assert_eq!(map.begin().get(), (&1, &"a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns a mutable cursor at the first element, or at the end if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::from([(1, 10), (2, 20)]);
    /// let mut cursor = map.begin_mut();
    /// while !cursor.is_end() {
    ///     *cursor.get_mut().1 *= 2;
    ///     cursor.move_next();
    /// }
    /// assert_eq!(map[&2], 40);
    /// ```
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V> {
        let first = self.raw.first();
        CursorMut::new(&mut self.raw, first)
    }

    /// Returns the first key-value pair in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.raw.key_value(handle))
    }

    /// Returns the last key-value pair in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.raw.key_value(handle))
    }

    /// Returns a [`Debug`](fmt::Debug) view of the tree itself.
    ///
    /// The output lists the nodes in pre-order, one per line, as
    /// `[key = .., value = .., priority = ..]`, with `[]` standing for an empty subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(1, 'a')]);
    /// let dump = format!("{:?}", map.structure());
    /// assert!(dump.starts_with("[key = 1, value = 'a', priority = "));
    /// assert!(dump.ends_with("]\n[]\n[]\n"));
    /// ```
    #[must_use]
    pub fn structure(&self) -> Structure<'_, K, V> {
        Structure::new(&self.raw)
    }
}

impl<K: Ord, V> TreapMap<K, V> {
    /// Inserts a key-value pair into the map unless the key is already present.
    ///
    /// Returns a cursor at the entry holding `key` together with `true` if a new entry was
    /// created. If the key was already present the map is left unchanged, `value` is dropped,
    /// and the cursor points at the existing entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// let (cursor, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    /// assert_eq!(cursor.get(), (&37, &"a"));
    ///
    /// let (cursor, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(cursor.get(), (&37, &"a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    pub fn insert(&mut self, key: K, value: V) -> (CursorMut<'_, K, V>, bool) {
        let (handle, inserted) = self.raw.insert(key, value);
        (CursorMut::new(&mut self.raw, Some(handle)), inserted)
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first if
    /// the key is absent.
    ///
    /// This is the upsert operation: assigning through the returned reference replaces the
    /// stored value.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// *map.get_or_insert_default("a") = 1;
    /// *map.get_or_insert_default("a") = 2;
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map["a"], 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (cursor, _) = self.insert(key, V::default());
        cursor.into_value_mut()
    }

    /// Returns a cursor at the entry for `key`, or the end cursor if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(1, "a")]);
    /// assert_eq!(map.find(&1).get(), (&1, &"a"));
    /// assert_eq!(map.find(&2), map.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.search(key))
    }

    /// Returns a mutable cursor at the entry for `key`, or at the end if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::from([(1, 10), (2, 20), (3, 30)]);
    /// let mut cursor = map.find_mut(&2);
    /// while !cursor.is_end() {
    ///     *cursor.get_mut().1 = 0;
    ///     cursor.move_next();
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [10, 0, 0]);
    /// ```
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key);
        CursorMut::new(&mut self.raw, handle)
    }

    /// Returns a cursor at the entry with the smallest key strictly greater than `key`, or
    /// the end cursor if there is none. `key` itself need not be present.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(10, "a"), (20, "b")]);
    /// assert_eq!(map.upper_bound(&5).key(), Some(&10));
    /// assert_eq!(map.upper_bound(&10).key(), Some(&20));
    /// assert_eq!(map.upper_bound(&20), map.end());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Cursor::new(&self.raw, self.raw.upper_bound(key))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).map(|handle| self.raw.key_value(handle))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        Some(self.raw.value_mut(handle))
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut count: TreapMap<&str, usize> = TreapMap::new();
    ///
    /// for x in ["a", "b", "a", "c", "a", "b"] {
    ///     count.entry(x).and_modify(|curr| *curr += 1).or_insert(1);
    /// }
    ///
    /// assert_eq!(count["a"], 3);
    /// assert_eq!(count["b"], 2);
    /// assert_eq!(count["c"], 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.raw.search(&key) {
            Some(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree: &mut self.raw,
            }),
            None => Entry::Vacant(VacantEntry {
                key,
                tree: &mut self.raw,
            }),
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::from([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [1, 12, 13]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
            tree: &raw mut self.raw,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<_> = map.values().copied().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let mut map = TreapMap::from([(1, String::from("hello")), (2, String::from("goodbye"))]);
    /// for value in map.values_mut() {
    ///     value.push('!');
    /// }
    /// assert_eq!(map[&1], "hello!");
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }
}

impl<K, V> Default for TreapMap<K, V> {
    /// Creates an empty `TreapMap`.
    fn default() -> TreapMap<K, V> {
        TreapMap::new()
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for TreapMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for TreapMap<K, V> {
    fn eq(&self, other: &TreapMap<K, V>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ord, V: Eq> Eq for TreapMap<K, V> {}

impl<K, Q, V> Index<&Q> for TreapMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `TreapMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreapMap<K, V> {
    /// Inserts every pair in order. Pairs whose key is already present are skipped, so the
    /// first value seen for a key wins.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for TreapMap<K, V> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreapMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> TreapMap<K, V> {
        let mut map = TreapMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for TreapMap<K, V> {
    /// Converts a `[(K, V); N]` into a `TreapMap<K, V>`.
    ///
    /// If the array holds several pairs with the same key, the first one is kept.
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map1 = TreapMap::from([(1, 2), (3, 4), (1, 9)]);
    /// let map2: TreapMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        TreapMap::from_iter(arr)
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a TreapMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a mut TreapMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for TreapMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let map = TreapMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let pairs: Vec<_> = map.into_iter().collect();
    /// assert_eq!(pairs, [(1, "a"), (2, "b"), (3, "c")]);
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        let tree = self.tree;
        let (key, value) = tree.key_value(handle);
        self.remaining -= 1;
        self.front = if self.remaining == 0 { None } else { tree.upper_bound(key) };
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        let tree = self.tree;
        let (key, value) = tree.key_value(handle);
        self.remaining -= 1;
        self.back = if self.remaining == 0 { None } else { tree.predecessor(key) };
        Some((key, value))
    }
}

impl<K: Ord, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K: Ord, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K: Ord, V> IterMut<'a, K, V> {
    /// Yields the entry at `handle` and moves the end of the iterator on `side` to its
    /// neighbour.
    fn step(&mut self, handle: Handle, side: Side) -> (&'a K, &'a mut V) {
        // SAFETY: `tree` came from a live `&mut` borrow held for 'a. Keys and links are read
        // through the node arena only, and every handle is yielded once, so the `&mut V`
        // handed out are disjoint.
        unsafe {
            let key = RawTreapMap::node_ptr(self.tree, handle).key();
            let value = RawTreapMap::value_mut_ptr(self.tree, handle);
            self.remaining -= 1;
            let next = if self.remaining == 0 { None } else { RawTreapMap::neighbor_ptr(self.tree, key, side) };
            match side {
                Side::Left => self.back = next,
                Side::Right => self.front = next,
            }
            (key, value)
        }
    }
}

impl<'a, K: Ord, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        Some(self.step(handle, Side::Right))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        Some(self.step(handle, Side::Left))
    }
}

impl<K: Ord, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K: Ord, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish_non_exhaustive()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K: Ord, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K: Ord, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K: Ord, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K: Ord, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K: Ord, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K: Ord, V> FusedIterator for Values<'_, K, V> {}

impl<'a, K: Ord, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K: Ord, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K: Ord, V> FusedIterator for ValuesMut<'_, K, V> {}
