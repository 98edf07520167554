use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;

use alloc::vec::Vec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::priority::XorShift32;

/// The treap backing `TreapMap`.
///
/// Nodes are ordered by key (binary search tree) and by priority (max-heap). There are
/// no parent links: every structural change is made by a recursive call that returns the
/// new root of the subtree it was given.
#[derive(Clone)]
pub(crate) struct RawTreapMap<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values, kept apart so `&mut V` never aliases node links.
    values: Arena<V>,
    root: Option<Handle>,
    priorities: XorShift32,
}

impl<K, V> RawTreapMap<K, V> {
    /// Creates a new, empty tree drawing priorities from `seed`.
    pub(crate) const fn new(seed: u32) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            priorities: XorShift32::new(seed),
        }
    }

    pub(crate) fn with_capacity(capacity: usize, seed: u32) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            priorities: XorShift32::new(seed),
        }
    }

    /// Number of bindings; every live node holds exactly one.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreapMap<K, V>`.
    /// - The node arena must not be mutated while the returned reference is alive.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: Only the `nodes` field is touched, so live `&mut V` borrows into
        // `values` are not aliased.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), handle) }
    }

    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get(node.value()))
    }

    /// Returns the key and a mutable value for a node.
    pub(crate) fn key_value_mut(&mut self, handle: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(handle);
        (node.key(), self.values.get_mut(node.value()))
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.nodes.get(handle).value();
        self.values.get_mut(value)
    }

    /// Returns a mutable reference to the value of a node from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreapMap<K, V>`.
    /// - The caller must have logical exclusive access to the value of `handle`, and no
    ///   other mutable reference to the node arena may exist.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: The node arena is read, the value arena is written; the two fields
        // never overlap, and only the one value slot is borrowed.
        unsafe {
            let value = Self::node_ptr(ptr, handle).value();
            Arena::get_mut_ptr(core::ptr::addr_of_mut!((*ptr).values), value)
        }
    }

    /// Handle of the leftmost node.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.extreme(Side::Left)
    }

    /// Handle of the rightmost node.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.extreme(Side::Right)
    }

    fn extreme(&self, side: Side) -> Option<Handle> {
        let mut current = self.root?;
        while let Some(next) = self.nodes.get(current).child(side) {
            current = next;
        }
        Some(current)
    }

    /// Single rotation of the subtree rooted at `top`.
    ///
    /// The child on the side opposite `direction` becomes the subtree root and `top`
    /// becomes its child on `direction`. In-order key sequence is unchanged.
    fn rotate(&mut self, top: Handle, direction: Side) -> Handle {
        let up = direction.opposite();
        let pivot = self.nodes.get(top).child(up).expect("`RawTreapMap::rotate()` - `top` has no child to promote!");
        let inner = self.nodes.get(pivot).child(direction);
        self.nodes.get_mut(top).set_child(up, inner);
        self.nodes.get_mut(pivot).set_child(direction, Some(top));
        pivot
    }

    /// Releases every node, leaving an empty tree.
    ///
    /// Freed slots stay in the arenas and are reused by later insertions.
    pub(crate) fn clear(&mut self) {
        let root = self.root.take();
        self.destroy(root);
    }

    /// Post-order teardown of a subtree: both children first, then the node itself.
    fn destroy(&mut self, subtree: Option<Handle>) {
        let Some(handle) = subtree else {
            return;
        };
        let [left, right] = self.nodes.get_mut(handle).take_children();
        self.destroy(left);
        self.destroy(right);
        let (_, value) = self.nodes.take(handle).into_parts();
        self.values.free(value);
    }

    /// Moves every binding out in key order, leaving an empty tree.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len());
        let root = self.root.take();
        self.drain_into(root, &mut result);
        result
    }

    fn drain_into(&mut self, subtree: Option<Handle>, out: &mut Vec<(K, V)>) {
        let Some(handle) = subtree else {
            return;
        };
        let [left, right] = self.nodes.get_mut(handle).take_children();
        self.drain_into(left, out);
        let (key, value) = self.nodes.take(handle).into_parts();
        out.push((key, self.values.take(value)));
        self.drain_into(right, out);
    }

    /// Writes the pre-order node dump used by `Structure`.
    pub(crate) fn fmt_structure(&self, f: &mut fmt::Formatter<'_>, subtree: Option<Handle>) -> fmt::Result
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let Some(handle) = subtree else {
            return f.write_str("[]\n");
        };
        let node = self.nodes.get(handle);
        writeln!(
            f,
            "[key = {:?}, value = {:?}, priority = {}]",
            node.key(),
            self.values.get(node.value()),
            node.priority()
        )?;
        self.fmt_structure(f, node.left())?;
        self.fmt_structure(f, node.right())
    }
}

impl<K: Ord, V> RawTreapMap<K, V> {
    /// Returns the handle of the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Returns the node holding the smallest key strictly greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        // SAFETY: `self` is a live shared borrow of the whole tree.
        unsafe { Self::neighbor_ptr(self, key, Side::Right) }
    }

    /// Returns the node holding the largest key strictly less than `key`.
    pub(crate) fn predecessor<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        // SAFETY: `self` is a live shared borrow of the whole tree.
        unsafe { Self::neighbor_ptr(self, key, Side::Left) }
    }

    /// Nearest node strictly beyond `key` towards `side`: the successor for `Right`, the
    /// predecessor for `Left`.
    ///
    /// Whenever a node lies beyond `key` it becomes the candidate and the descent turns
    /// back towards `key`, where a closer one may still exist. Otherwise the node and
    /// everything on its near side are ruled out. Only the node arena is read, so this
    /// is usable while values are mutably borrowed.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreapMap<K, V>`.
    /// - The node arena and `root` must not be mutated during the call.
    pub(crate) unsafe fn neighbor_ptr<Q>(ptr: *const Self, key: &Q, side: Side) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let beyond = match side {
            Side::Left => Ordering::Greater,
            Side::Right => Ordering::Less,
        };
        let mut candidate = None;
        // SAFETY: Caller guarantees `ptr` is valid; `root` is copied out.
        let mut current = unsafe { (*ptr).root };
        while let Some(handle) = current {
            // SAFETY: Forwarded from the caller.
            let node = unsafe { Self::node_ptr(ptr, handle) };
            if key.cmp(node.key().borrow()) == beyond {
                candidate = Some(handle);
                current = node.child(side.opposite());
            } else {
                current = node.child(side);
            }
        }
        candidate
    }

    /// Inserts `key` unless it is already present.
    ///
    /// Returns the handle of the node now holding `key` and whether it was created. On a
    /// duplicate the tree is untouched and `value` is dropped.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        let (root, target, inserted) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        (target, inserted)
    }

    /// Recursive insertion into the subtree rooted at `subtree`.
    ///
    /// Returns `(new subtree root, node holding key, inserted)`. On the way back up, a
    /// child that outranks its parent is rotated above it, so the heap order holds on the
    /// whole path from the new leaf to the returned root.
    fn insert_at(&mut self, subtree: Option<Handle>, key: K, value: V) -> (Handle, Handle, bool) {
        let Some(handle) = subtree else {
            let leaf = self.alloc_node(key, value);
            return (leaf, leaf, true);
        };

        let node = self.nodes.get(handle);
        let side = match key.cmp(node.key()) {
            Ordering::Equal => return (handle, handle, false),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };

        let child = node.child(side);
        let (child, target, inserted) = self.insert_at(child, key, value);
        self.nodes.get_mut(handle).set_child(side, Some(child));

        let root = if self.nodes.get(handle).priority() < self.nodes.get(child).priority() {
            self.rotate(handle, side.opposite())
        } else {
            handle
        };
        (root, target, inserted)
    }

    fn alloc_node(&mut self, key: K, value: V) -> Handle {
        // Checked up front so a full node arena cannot strand a value slot.
        assert!(
            self.nodes.has_vacancy(),
            "`RawTreapMap::insert()` - map is at maximum capacity ({})",
            Handle::MAX + 1
        );
        let priority = self.priorities.next_priority();
        let value = self.values.alloc(value);
        self.nodes.alloc(Node::new(key, priority, value))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    extern crate std;

    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<K: Ord + fmt::Debug, V> RawTreapMap<K, V> {
        /// Checks key order, heap order on priority, reachability of every live node, and
        /// `len`. Panics with every violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut keys: Vec<&K> = Vec::new();
            self.validate_node(self.root, None, &mut keys, &mut errors);

            for pair in keys.windows(2) {
                if pair[0] >= pair[1] {
                    errors.push(format!("keys out of order: {:?} before {:?}", pair[0], pair[1]));
                }
            }
            if keys.len() != self.len() {
                errors.push(format!("len mismatch: len()={}, reachable={}", self.len(), keys.len()));
            }
            if self.values.len() != self.nodes.len() {
                errors.push(format!("arena mismatch: nodes={}, values={}", self.nodes.len(), self.values.len()));
            }
            if self.is_empty() != keys.is_empty() {
                errors.push(format!("is_empty()={} with {} reachable nodes", self.is_empty(), keys.len()));
            }

            assert!(errors.is_empty(), "treap invariants violated:\n{}", errors.join("\n"));
        }

        fn validate_node<'a>(
            &'a self,
            subtree: Option<Handle>,
            parent_priority: Option<u32>,
            keys: &mut Vec<&'a K>,
            errors: &mut Vec<String>,
        ) {
            let Some(handle) = subtree else {
                return;
            };
            let node = self.nodes.get(handle);
            if let Some(parent) = parent_priority
                && node.priority() > parent
            {
                errors.push(format!(
                    "heap order violated at {:?}: priority {} under parent priority {}",
                    node.key(),
                    node.priority(),
                    parent
                ));
            }
            self.validate_node(node.left(), Some(node.priority()), keys, errors);
            keys.push(node.key());
            self.validate_node(node.right(), Some(node.priority()), keys, errors);
        }

        fn node(&self, handle: Handle) -> &Node<K> {
            self.nodes.get(handle)
        }

        fn height(&self, subtree: Option<Handle>) -> usize {
            subtree.map_or(0, |handle| {
                let node = self.nodes.get(handle);
                1 + self.height(node.left()).max(self.height(node.right()))
            })
        }
    }

    fn keys_in_order<V>(tree: &RawTreapMap<i32, V>) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut current = tree.first();
        while let Some(handle) = current {
            let key = *tree.key_value(handle).0;
            keys.push(key);
            current = tree.upper_bound(&key);
        }
        keys
    }

    #[test]
    fn insert_into_empty_tree_becomes_root() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        let (handle, inserted) = tree.insert(5, "five");
        assert!(inserted);
        assert_eq!(tree.root(), Some(handle));
        assert_eq!(tree.key_value(handle), (&5, &"five"));
        tree.validate_invariants();
    }

    #[test]
    fn duplicate_insert_keeps_first_value_and_node() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        let (first, _) = tree.insert(1, 10);
        tree.insert(2, 20);
        let (again, inserted) = tree.insert(1, 99);
        assert!(!inserted);
        assert_eq!(again, first);
        assert_eq!(tree.key_value(first), (&1, &10));
        assert_eq!(tree.len(), 2);
        tree.validate_invariants();
    }

    #[test]
    fn rotate_preserves_in_order_sequence() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        for key in [4, 2, 6, 1, 3, 5, 7] {
            tree.insert(key, ());
        }
        let before = keys_in_order(&tree);
        let root = tree.root().unwrap();
        let expected = if tree.node(root).left().is_some() { Side::Right } else { Side::Left };
        let new_root = tree.rotate(root, expected);
        tree.root = Some(new_root);

        assert_ne!(new_root, root);
        assert_eq!(tree.node(new_root).child(expected), Some(root));
        assert_eq!(keys_in_order(&tree), before);
    }

    #[test]
    fn upper_bound_and_predecessor_skip_missing_keys() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        for key in [10, 20, 30] {
            tree.insert(key, ());
        }
        let key_of = |handle: Option<Handle>| handle.map(|h| *tree.key_value(h).0);

        assert_eq!(key_of(tree.upper_bound(&5)), Some(10));
        assert_eq!(key_of(tree.upper_bound(&10)), Some(20));
        assert_eq!(key_of(tree.upper_bound(&25)), Some(30));
        assert_eq!(key_of(tree.upper_bound(&30)), None);

        assert_eq!(key_of(tree.predecessor(&35)), Some(30));
        assert_eq!(key_of(tree.predecessor(&20)), Some(10));
        assert_eq!(key_of(tree.predecessor(&10)), None);
    }

    #[test]
    fn clear_releases_every_node_and_reuses_slots() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        for key in 0..100 {
            tree.insert(key, String::from("v"));
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        tree.validate_invariants();

        let (handle, inserted) = tree.insert(7, String::from("again"));
        assert!(inserted);
        assert!(handle.to_index() < 100);
        tree.validate_invariants();
    }

    #[test]
    fn drain_to_vec_yields_sorted_pairs() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        for key in [3, 1, 4, 1, 5, 9, 2, 6] {
            tree.insert(key, key * 10);
        }
        assert_eq!(
            tree.drain_to_vec(),
            vec![(1, 10), (2, 20), (3, 30), (4, 40), (5, 50), (6, 60), (9, 90)]
        );
        assert!(tree.is_empty());
        tree.validate_invariants();
    }

    #[test]
    fn sorted_insertion_stays_shallow() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        for key in 0..4096 {
            tree.insert(key, ());
        }
        tree.validate_invariants();
        // A degenerate list would be 4096 deep; a random BST averages about 2.99 * ln n.
        assert!(tree.height(tree.root()) < 64, "height {}", tree.height(tree.root()));
    }

    #[test]
    fn equal_seeds_build_equal_shapes() {
        let mut a = RawTreapMap::new(77);
        let mut b = RawTreapMap::new(77);
        for key in [8, 3, 10, 1, 6, 14, 4, 7, 13] {
            a.insert(key, ());
            b.insert(key, ());
        }
        assert_eq!(format!("{:?}", Dump(&a)), format!("{:?}", Dump(&b)));
    }

    #[test]
    fn insert_into_full_map_keeps_arenas_in_step() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        for key in 0..=Handle::MAX {
            tree.insert(key, ());
        }
        let overflow = catch_unwind(AssertUnwindSafe(|| tree.insert(Handle::MAX + 1, ())));
        assert!(overflow.is_err());

        assert_eq!(tree.len(), Handle::MAX + 1);
        tree.validate_invariants();
        let (handle, inserted) = tree.insert(0, ());
        assert!(!inserted);
        assert_eq!(tree.key_value(handle), (&0, &()));
    }

    #[test]
    fn value_mut_ptr_borrows_one_slot() {
        let mut tree = RawTreapMap::new(XorShift32::DEFAULT_SEED);
        let (a, _) = tree.insert(1, 10);
        let (b, _) = tree.insert(2, 20);
        let ptr = &raw mut tree;
        // SAFETY: `a` and `b` are distinct live nodes and the tree is not restructured
        // while the two references are alive.
        unsafe {
            let first = RawTreapMap::value_mut_ptr(ptr, a);
            let second = RawTreapMap::value_mut_ptr(ptr, b);
            *first += 1;
            *second += 2;
            *first += 100;
        }
        assert_eq!(tree.key_value(a), (&1, &111));
        assert_eq!(tree.key_value(b), (&2, &22));
    }

    struct Dump<'a>(&'a RawTreapMap<i32, ()>);

    impl fmt::Debug for Dump<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt_structure(f, self.0.root())
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32, u32),
        Search(i32),
        UpperBound(i32),
        Predecessor(i32),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            20 => (-500i32..500, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            5 => (-500i32..500).prop_map(Op::Search),
            5 => (-500i32..500).prop_map(Op::UpperBound),
            5 => (-500i32..500).prop_map(Op::Predecessor),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn operations_match_btreemap(seed in 1..=u32::MAX, ops in prop::collection::vec(op_strategy(), 0..512)) {
            let mut tree = RawTreapMap::new(seed);
            let mut model = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key, value) => {
                        let (handle, inserted) = tree.insert(key, value);
                        let expected_inserted = !model.contains_key(&key);
                        let expected = *model.entry(key).or_insert(value);
                        prop_assert_eq!(inserted, expected_inserted);
                        prop_assert_eq!(tree.key_value(handle), (&key, &expected));
                    }
                    Op::Search(key) => {
                        let found = tree.search(&key).map(|h| tree.key_value(h));
                        prop_assert_eq!(found, model.get_key_value(&key));
                    }
                    Op::UpperBound(key) => {
                        let found = tree.upper_bound(&key).map(|h| tree.key_value(h));
                        let expected = model.range((core::ops::Bound::Excluded(key), core::ops::Bound::Unbounded)).next();
                        prop_assert_eq!(found, expected);
                    }
                    Op::Predecessor(key) => {
                        let found = tree.predecessor(&key).map(|h| tree.key_value(h));
                        prop_assert_eq!(found, model.range(..key).next_back());
                    }
                    Op::Clear => {
                        tree.clear();
                        model.clear();
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.first().map(|h| tree.key_value(h)), model.first_key_value());
                prop_assert_eq!(tree.last().map(|h| tree.key_value(h)), model.last_key_value());
            }
        }
    }
}
