use core::fmt;

use crate::raw::RawTreapMap;

/// A [`Debug`](fmt::Debug) view of the nodes of a `TreapMap`.
///
/// This `struct` is created by the [`structure`] method on [`TreapMap`]. Its debug output
/// is a pre-order walk: one `[key = .., value = .., priority = ..]` line per node, followed
/// by its left and right subtrees, with `[]` for an empty subtree.
///
/// # Examples
///
/// ```
/// use treap_map::TreapMap;
///
/// let map: TreapMap<i32, i32> = TreapMap::new();
/// assert_eq!(format!("{:?}", map.structure()), "[]\n");
/// ```
///
/// [`structure`]: crate::TreapMap::structure
/// [`TreapMap`]: crate::TreapMap
pub struct Structure<'a, K, V> {
    tree: &'a RawTreapMap<K, V>,
}

impl<'a, K, V> Structure<'a, K, V> {
    pub(crate) fn new(tree: &'a RawTreapMap<K, V>) -> Self {
        Structure { tree }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Structure<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt_structure(f, self.tree.root())
    }
}
