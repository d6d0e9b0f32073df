//! # splay-rs
//!
//! A self-adjusting binary search tree (splay tree) over string keys.
//!
//! Nodes live in a flat arena of slots addressed by [`NodeId`], a 32-bit
//! index with a NULL sentinel. Parent and child links are slot indices
//! rather than owned references, so rotations and deletion splices are
//! plain index reassignments, and freed slots are recycled through a free
//! list without disturbing the ids of unrelated nodes.
//!
//! Lookups are single-path: [`SplayTree::find`] walks one ordered descent
//! from a start node and reports the first node the [`Match`] mode accepts.
//! The tree only restructures itself on [`SplayTree::splay`], which moves a
//! node to the root through the standard zig / zig-zig / zig-zag rotations;
//! reads never mutate.
//!
//! ## Example
//!
//! ```rust
//! use splay_rs::{Match, SplayTree};
//!
//! let mut tree: SplayTree<u32> = SplayTree::new();
//! let save = tree.insert("save", 1);
//! tree.insert("search", 2);
//!
//! assert_eq!(tree.find("save", Match::Exact, tree.root()), Some(save));
//!
//! tree.splay(save);
//! assert_eq!(tree.root(), save);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

use std::mem;

/// A 32-bit reference to a node slot in the arena.
///
/// Ids are stable: a node keeps its id until it is removed, no matter how
/// the tree restructures around it. A removed node's slot is recycled, so
/// holding an id across that node's removal is a programmer error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The absent-node sentinel.
    pub const NULL: NodeId = NodeId(u32::MAX);

    /// Check if this id is the NULL sentinel.
    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    fn new(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize);
        NodeId(idx as u32)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Key match modes used by [`SplayTree::find`] and the search layers built
/// on top of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Match {
    /// Key equals the query.
    Exact,
    /// Key starts with the query.
    Prefix,
    /// Key contains the query.
    Substring,
    /// Every key matches.
    Any,
}

impl Match {
    /// Test a key against a query under this mode.
    #[inline]
    pub fn matches(self, key: &str, query: &str) -> bool {
        match self {
            Match::Exact => key == query,
            Match::Prefix => key.starts_with(query),
            Match::Substring => key.contains(query),
            Match::Any => true,
        }
    }
}

#[derive(Clone)]
struct Node<V> {
    key: Box<str>,
    value: V,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

/// A splay tree over string keys with arena-allocated nodes.
///
/// Duplicate keys are permitted; ties sort into the right subtree. Node
/// identity is the [`NodeId`] returned by [`insert`](SplayTree::insert),
/// never the key.
#[derive(Clone)]
pub struct SplayTree<V> {
    slots: Vec<Option<Node<V>>>,
    /// Vacated slot indices awaiting reuse.
    free: Vec<u32>,
    root: NodeId,
    len: usize,
}

impl<V> SplayTree<V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: NodeId::NULL,
            len: 0,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current root, or NULL for an empty tree.
    ///
    /// Root identity changes on every splay and on deletion of the root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check whether `id` refers to a live node in this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        !id.is_null()
            && id.index() < self.slots.len()
            && self.slots[id.index()].is_some()
    }

    /// Number of arena slots allocated so far (live nodes plus free-listed).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of vacant slots awaiting reuse.
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Key of a live node.
    pub fn key(&self, id: NodeId) -> &str {
        &self.node(id).key
    }

    /// Payload of a live node.
    pub fn value(&self, id: NodeId) -> &V {
        &self.node(id).value
    }

    /// Mutable payload of a live node.
    pub fn value_mut(&mut self, id: NodeId) -> &mut V {
        &mut self.node_mut(id).value
    }

    /// Parent of a node, or NULL for the root.
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    /// Left child of a node, or NULL.
    pub fn left(&self, id: NodeId) -> NodeId {
        self.node(id).left
    }

    /// Right child of a node, or NULL.
    pub fn right(&self, id: NodeId) -> NodeId {
        self.node(id).right
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node<V> {
        self.slots[id.index()]
            .as_ref()
            .expect("NodeId refers to a freed node")
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.slots[id.index()]
            .as_mut()
            .expect("NodeId refers to a freed node")
    }

    /// Place a node in a vacant slot, or grow the arena.
    fn alloc(&mut self, node: Node<V>) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                debug_assert!(slot.is_none(), "free list points at a live slot");
                *slot = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Vacate a slot and hand its index to the free list.
    fn release(&mut self, id: NodeId) -> Node<V> {
        let node = self.slots[id.index()]
            .take()
            .expect("NodeId refers to a freed node");
        self.free.push(id.0);
        node
    }

    /// Insert a key with its payload, returning the new node's id.
    ///
    /// Iterative descent from the root; equal keys descend right. The tree
    /// does not rebalance on insert.
    ///
    /// # Panics
    /// Panics on an empty key.
    pub fn insert(&mut self, key: &str, value: V) -> NodeId {
        assert!(!key.is_empty(), "cannot insert an empty key");

        let id = self.alloc(Node {
            key: key.into(),
            value,
            parent: NodeId::NULL,
            left: NodeId::NULL,
            right: NodeId::NULL,
        });

        if self.root.is_null() {
            self.root = id;
        } else {
            let mut cur = self.root;
            loop {
                let go_left = key < &*self.node(cur).key;
                let child = if go_left {
                    self.node(cur).left
                } else {
                    self.node(cur).right
                };
                if child.is_null() {
                    if go_left {
                        self.node_mut(cur).left = id;
                    } else {
                        self.node_mut(cur).right = id;
                    }
                    self.node_mut(id).parent = cur;
                    break;
                }
                cur = child;
            }
        }

        self.len += 1;
        id
    }

    /// Single-path descent from `start`, returning the first node whose key
    /// the mode accepts.
    ///
    /// At each node the query is tested first; on a miss the walk branches
    /// by ordinary key comparison and gives up at a dead end. Matches that
    /// do not lie on this one descent path are invisible to the call; the
    /// caller decides where (and how often) to restart.
    pub fn find(&self, query: &str, mode: Match, start: NodeId) -> Option<NodeId> {
        let mut cur = start;
        while !cur.is_null() {
            let node = self.node(cur);
            if mode.matches(&node.key, query) {
                return Some(cur);
            }
            cur = if query < &*node.key {
                node.left
            } else {
                node.right
            };
        }
        None
    }

    /// Remove a node and return its payload. Never rebalances.
    ///
    /// A leaf detaches from its parent; a node with one child is spliced
    /// over. A node with two children absorbs its in-order predecessor
    /// (the rightmost node of the left subtree): the predecessor's key and
    /// payload move into this slot and the predecessor's own slot is freed,
    /// so its id dies while `id` stays live holding the merged record.
    ///
    /// # Panics
    /// Panics if `id` is stale or foreign to this tree.
    pub fn remove(&mut self, id: NodeId) -> V {
        let (left, right) = {
            let n = self.node(id);
            (n.left, n.right)
        };
        self.len -= 1;

        if !left.is_null() && !right.is_null() {
            let mut pred = left;
            loop {
                let r = self.node(pred).right;
                if r.is_null() {
                    break;
                }
                pred = r;
            }
            self.detach(pred);
            let donor = self.release(pred);
            let node = self.node_mut(id);
            node.key = donor.key;
            mem::replace(&mut node.value, donor.value)
        } else {
            self.detach(id);
            self.release(id).value
        }
    }

    /// Splice a node with at most one child out of the tree.
    fn detach(&mut self, id: NodeId) {
        let (left, right, parent) = {
            let n = self.node(id);
            (n.left, n.right, n.parent)
        };
        debug_assert!(left.is_null() || right.is_null());
        let child = if left.is_null() { right } else { left };

        if !child.is_null() {
            self.node_mut(child).parent = parent;
        }
        if parent.is_null() {
            self.root = child;
        } else if self.node(parent).left == id {
            self.node_mut(parent).left = child;
        } else {
            debug_assert_eq!(self.node(parent).right, id);
            self.node_mut(parent).right = child;
        }
    }

    /// Rotate a node to the root.
    ///
    /// Classic splay: a zig when the parent is the root, a zig-zig when
    /// node, parent and grandparent are same-side children, a zig-zag for
    /// the inside grandchild. Amortized O(log n).
    ///
    /// # Panics
    /// Panics if `id` is stale or foreign to this tree.
    pub fn splay(&mut self, id: NodeId) {
        assert!(self.contains(id), "cannot splay a freed or foreign NodeId");
        loop {
            let parent = self.node(id).parent;
            if parent.is_null() {
                break;
            }
            let grand = self.node(parent).parent;
            let id_is_left = self.node(parent).left == id;

            if grand.is_null() {
                // Zig.
                if id_is_left {
                    self.rotate_right(parent);
                } else {
                    self.rotate_left(parent);
                }
            } else if (self.node(grand).left == parent) == id_is_left {
                // Zig-zig: grandparent edge first, then the parent edge.
                if id_is_left {
                    self.rotate_right(grand);
                    self.rotate_right(parent);
                } else {
                    self.rotate_left(grand);
                    self.rotate_left(parent);
                }
            } else {
                // Zig-zag: rotate past the parent, then past the grandparent.
                if id_is_left {
                    self.rotate_right(parent);
                    self.rotate_left(grand);
                } else {
                    self.rotate_left(parent);
                    self.rotate_right(grand);
                }
            }
        }
    }

    /// Rotate the edge between `n` and its right child, moving the child up.
    fn rotate_left(&mut self, n: NodeId) {
        let r = self.node(n).right;
        debug_assert!(!r.is_null(), "rotate_left requires a right child");
        let rl = self.node(r).left;
        let parent = self.node(n).parent;

        self.node_mut(n).right = rl;
        if !rl.is_null() {
            self.node_mut(rl).parent = n;
        }
        self.node_mut(r).left = n;
        self.node_mut(n).parent = r;
        self.replace_child(parent, n, r);
    }

    /// Rotate the edge between `n` and its left child, moving the child up.
    fn rotate_right(&mut self, n: NodeId) {
        let l = self.node(n).left;
        debug_assert!(!l.is_null(), "rotate_right requires a left child");
        let lr = self.node(l).right;
        let parent = self.node(n).parent;

        self.node_mut(n).left = lr;
        if !lr.is_null() {
            self.node_mut(lr).parent = n;
        }
        self.node_mut(l).right = n;
        self.node_mut(n).parent = l;
        self.replace_child(parent, n, l);
    }

    /// Point `parent`'s child slot (or the root pointer) from `old` to `new`.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        self.node_mut(new).parent = parent;
        if parent.is_null() {
            self.root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            debug_assert_eq!(self.node(parent).right, old);
            self.node_mut(parent).right = new;
        }
    }

    /// In-order iterator over `(id, key, value)`.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tree: self,
            stack: Vec::new(),
            cur: self.root,
        }
    }
}

impl<V> Default for SplayTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for SplayTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, k, v)| (k, v)))
            .finish()
    }
}

/// In-order traversal over a [`SplayTree`].
pub struct Iter<'a, V> {
    tree: &'a SplayTree<V>,
    stack: Vec<NodeId>,
    cur: NodeId,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (NodeId, &'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.cur.is_null() {
            self.stack.push(self.cur);
            self.cur = self.tree.node(self.cur).left;
        }
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.cur = node.right;
        Some((id, &node.key, &node.value))
    }
}


#[cfg(test)]
mod proptests;
