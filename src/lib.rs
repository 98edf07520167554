//! An ordered map backed by a randomized binary search tree (treap).
//!
//! This crate provides [`TreapMap`], a key-ordered map whose nodes are kept both in
//! binary-search-tree order on the key and in max-heap order on a pseudo-random
//! priority drawn once per node. The random priorities give an expected O(log n)
//! height without any deterministic rebalancing metadata.
//!
//! # Example
//!
//! ```
//! use treap_map::TreapMap;
//!
//! let mut scores = TreapMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Inserting an existing key is a no-op.
//! let (_, inserted) = scores.insert("Bob", 0);
//! assert!(!inserted);
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//!
//! // Upsert goes through `get_or_insert_default`.
//! *scores.get_or_insert_default("Dave") = 77;
//!
//! // Successor queries.
//! let next = scores.upper_bound(&"Bob");
//! assert_eq!(next.peek(), Some((&"Carol", &92)));
//!
//! // Cursor traversal from `begin()` to `end()`.
//! let mut cursor = scores.begin();
//! let mut names = Vec::new();
//! while cursor != scores.end() {
//!     names.push(*cursor.get().0);
//!     cursor.move_next();
//! }
//! assert_eq!(names, ["Alice", "Bob", "Carol", "Dave"]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Per-map priority source** - Each map owns a seeded xorshift generator, so shapes are reproducible
//! - **Parent-pointer free** - Insertion rebalances by rotations while the recursion unwinds
//!
//! # Implementation
//!
//! Nodes and values are stored in two index arenas. A node owns at most one child per side
//! through a handle; there are no parent links, and cursors advance by re-running a
//! successor query from the root.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: `IterMut` and `ValuesMut` hand out disjoint `&mut V` while reading the node arena.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod treap_map;

pub use treap_map::TreapMap;
