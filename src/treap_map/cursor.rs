use core::fmt;
use core::ptr;

use crate::raw::{Handle, RawTreapMap};

/// A position in a `TreapMap`: either an entry or the end sentinel.
///
/// Cursors are created by [`begin`], [`end`], [`find`] and [`upper_bound`]. Moving a cursor
/// forward runs a successor query for the current key from the root of the tree, so each
/// step costs O(log n) and the cursor keeps no path.
///
/// Two cursors are equal when both are at the end, or when both point at the same entry of
/// the same map. Entries holding equal keys or values in different maps never compare equal;
/// use [`value_eq`](Cursor::value_eq) for that.
///
/// # Examples
///
/// ```
/// use treap_map::TreapMap;
///
/// let map = TreapMap::from([(3, "c"), (1, "a"), (4, "d")]);
///
/// let mut cursor = map.begin();
/// let mut keys = Vec::new();
/// while cursor != map.end() {
///     keys.push(*cursor.get().0);
///     cursor.move_next();
/// }
/// assert_eq!(keys, [1, 3, 4]);
/// ```
///
/// [`begin`]: crate::TreapMap::begin
/// [`end`]: crate::TreapMap::end
/// [`find`]: crate::TreapMap::find
/// [`upper_bound`]: crate::TreapMap::upper_bound
pub struct Cursor<'a, K, V> {
    tree: &'a RawTreapMap<K, V>,
    node: Option<Handle>,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(tree: &'a RawTreapMap<K, V>, node: Option<Handle>) -> Self {
        Cursor { tree, node }
    }

    /// Returns `true` if the cursor is the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns the entry under the cursor, or `None` at the end.
    #[must_use]
    pub fn peek(&self) -> Option<(&'a K, &'a V)> {
        self.node.map(|handle| self.tree.key_value(handle))
    }

    /// Returns the key under the cursor, or `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.peek().map(|(key, _)| key)
    }

    /// Returns the value under the cursor, or `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.peek().map(|(_, value)| value)
    }

    /// Returns the entry under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[must_use]
    pub fn get(&self) -> (&'a K, &'a V) {
        self.peek().expect("`Cursor::get()` - cursor is at the end!")
    }

    /// Compares the entries under two cursors instead of their positions.
    ///
    /// Two end cursors are equal, an end cursor never equals a cursor at an entry, and two
    /// cursors at entries are equal when their keys and values are equal, even if they belong
    /// to different maps.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_map::TreapMap;
    ///
    /// let a = TreapMap::from([(1, "x")]);
    /// let b = TreapMap::from([(1, "x")]);
    /// assert_ne!(a.begin(), b.begin());
    /// assert!(a.begin().value_eq(&b.begin()));
    /// ```
    #[must_use]
    pub fn value_eq(&self, other: &Cursor<'_, K, V>) -> bool
    where
        K: PartialEq,
        V: PartialEq,
    {
        self.peek() == other.peek()
    }
}

impl<K: Ord, V> Cursor<'_, K, V> {
    /// Moves the cursor to the entry with the next larger key, or to the end if the
    /// current entry holds the largest key.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the end.
    pub fn move_next(&mut self) {
        let (key, _) = self.peek().expect("`Cursor::move_next()` - cannot advance past the end!");
        self.node = self.tree.upper_bound(key);
    }
}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self.node, other.node) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b && ptr::eq(self.tree, other.tree),
            _ => false,
        }
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.peek()).finish()
    }
}

/// A position in a `TreapMap` with mutable access to the value under it.
///
/// This `struct` is created by [`insert`], [`begin_mut`] and [`find_mut`]. It borrows the
/// map exclusively, so the tree cannot be restructured while the cursor is alive.
///
/// # Examples
///
/// ```
/// use treap_map::TreapMap;
///
/// let mut map = TreapMap::new();
/// let (mut cursor, inserted) = map.insert("a", 1);
/// assert!(inserted);
/// *cursor.get_mut().1 += 1;
/// assert_eq!(map["a"], 2);
/// ```
///
/// [`insert`]: crate::TreapMap::insert
/// [`begin_mut`]: crate::TreapMap::begin_mut
/// [`find_mut`]: crate::TreapMap::find_mut
pub struct CursorMut<'a, K, V> {
    tree: &'a mut RawTreapMap<K, V>,
    node: Option<Handle>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut RawTreapMap<K, V>, node: Option<Handle>) -> Self {
        CursorMut { tree, node }
    }

    /// Returns `true` if the cursor is the end sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Returns a read-only cursor at the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self.tree, self.node)
    }

    /// Returns the entry under the cursor, or `None` at the end.
    #[must_use]
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.node.map(|handle| self.tree.key_value(handle))
    }

    /// Returns the key and a mutable value under the cursor, or `None` at the end.
    pub fn peek_mut(&mut self) -> Option<(&K, &mut V)> {
        self.node.map(|handle| self.tree.key_value_mut(handle))
    }

    /// Returns the entry under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[must_use]
    pub fn get(&self) -> (&K, &V) {
        self.peek().expect("`CursorMut::get()` - cursor is at the end!")
    }

    /// Returns the key and a mutable value under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    pub fn get_mut(&mut self) -> (&K, &mut V) {
        self.peek_mut().expect("`CursorMut::get_mut()` - cursor is at the end!")
    }

    /// Converts the cursor into a mutable reference to the value under it, bound to the
    /// lifetime of the map borrow.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end.
    #[must_use]
    pub fn into_value_mut(self) -> &'a mut V {
        let handle = self.node.expect("`CursorMut::into_value_mut()` - cursor is at the end!");
        let tree = self.tree;
        tree.value_mut(handle)
    }
}

impl<K: Ord, V> CursorMut<'_, K, V> {
    /// Moves the cursor to the entry with the next larger key, or to the end if the
    /// current entry holds the largest key.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the end.
    pub fn move_next(&mut self) {
        let handle = self.node.expect("`CursorMut::move_next()` - cannot advance past the end!");
        let (key, _) = self.tree.key_value(handle);
        self.node = self.tree.upper_bound(key);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.peek()).finish()
    }
}
