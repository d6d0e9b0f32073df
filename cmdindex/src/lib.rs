//! # cmdindex - Adaptive Command Index
//!
//! A splay-tree-backed index of named commands for interactive command
//! palettes.
//!
//! ## Features
//!
//! - **Promote-on-use**: executing a command splays its node to the root,
//!   so later listings and searches are biased toward recent commands
//! - **Bounded searches**: exact, strict (prefix) and soft (substring)
//!   lookup, each capped by a per-call result limit
//! - **Resumable pages**: every search returns an explicit [`Cursor`] that
//!   continues the same traversal without rescanning from the root
//! - **Stable handles**: commands are addressed by [`NodeId`], so duplicate
//!   display names coexist and deletion needs no re-search
//!
//! ## Architecture
//!
//! Two layers:
//!
//! 1. **Tree layer** ([`splay_rs::SplayTree`]): an arena-backed splay tree
//!    keyed by normalized command names. It owns ordering, rotation and
//!    single-path descent, and never inspects payloads.
//!
//! 2. **Index layer** ([`CommandIndex`]): normalizes keys, stores
//!    [`Command`] records as payloads, and drives the tree's descent
//!    primitive into gated pre-order (strict) and breadth-first (soft,
//!    list-all) traversals with cursor bookkeeping.
//!
//! The index is single-threaded: every call runs to completion on the
//! caller's thread and searches are bounded by their result limit. Hosts
//! that share one index across threads serialize access themselves.
//!
//! ## Example
//!
//! ```rust
//! use cmdindex::{Command, CommandIndex};
//!
//! let mut index: CommandIndex<u32> = CommandIndex::new();
//! index.register(Command::new("Save", 1));
//! index.register(Command::new("Save As", 2));
//! index.register(Command::new("Search", 3));
//!
//! let page = index.strict_search("sa", 10);
//! let names: Vec<&str> = page.items.iter().map(|(_, c)| c.name.as_str()).collect();
//! assert_eq!(names, ["Save", "Save As"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod cursor;

pub use cursor::{Cursor, Page};
pub use splay_rs::{Match, NodeId};

use splay_rs::SplayTree;

/// A named command registered with the index.
///
/// The tree never inspects this record; it is returned verbatim on matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command<A> {
    /// Display name. The index key is its normalized form; the name itself
    /// is kept untouched.
    pub name: String,
    /// Optional key-binding label shown next to the name.
    pub shortcut: Option<String>,
    /// Opaque action payload.
    pub action: A,
}

impl<A> Command<A> {
    /// Create a command with no shortcut.
    pub fn new(name: impl Into<String>, action: A) -> Self {
        Self {
            name: name.into(),
            shortcut: None,
            action,
        }
    }

    /// Attach a shortcut label.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

/// Normalized form of a command name: trimmed and lowercased. All index
/// keys and queries pass through this.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Configuration for a [`CommandIndex`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity hint for the number of registered commands.
    pub initial_capacity: usize,
    /// Page size used by [`CommandIndex::open_palette`].
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            page_size: 32,
        }
    }
}

/// Arena occupancy statistics for the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of registered commands.
    pub commands: usize,
    /// Arena slots allocated so far (live plus reusable).
    pub slots: usize,
    /// Vacant slots awaiting reuse.
    pub free_slots: usize,
    /// Total bytes held by normalized keys.
    pub key_bytes: usize,
}

/// An adaptively ordered index of named commands.
///
/// Rebuilt from the live registered-command set on every process start;
/// nothing is persisted.
pub struct CommandIndex<A> {
    tree: SplayTree<Command<A>>,
    config: Config,
}

impl<A> CommandIndex<A> {
    /// Create an empty index with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            tree: SplayTree::with_capacity(config.initial_capacity),
            config,
        }
    }

    /// Register a command under its normalized name and return its handle.
    ///
    /// Duplicate normalized names are permitted; identity is the returned
    /// [`NodeId`], never the key.
    ///
    /// # Panics
    /// Panics if the name normalizes to an empty string.
    pub fn register(&mut self, command: Command<A>) -> NodeId {
        let key = normalize(&command.name);
        assert!(!key.is_empty(), "command name must not normalize to empty");
        self.tree.insert(&key, command)
    }

    /// Remove a command by handle and return its record. The handle becomes
    /// invalid.
    ///
    /// # Panics
    /// Panics if the handle is stale or foreign to this index.
    pub fn unregister(&mut self, id: NodeId) -> Command<A> {
        self.tree.remove(id)
    }

    /// Command record behind a live handle.
    pub fn command(&self, id: NodeId) -> &Command<A> {
        self.tree.value(id)
    }

    /// Look up a command by its exact (normalized) name.
    pub fn exact_match(&self, name: &str) -> Option<&Command<A>> {
        let query = normalize(name);
        self.tree
            .find(&query, Match::Exact, self.tree.root())
            .map(|id| self.tree.value(id))
    }

    /// Splay a command's node to the root, biasing later listings and
    /// searches toward it. Called when the command executes.
    ///
    /// # Panics
    /// Panics if the handle is stale or foreign to this index.
    pub fn promote(&mut self, id: NodeId) {
        self.tree.splay(id);
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Registered commands in normalized-key order.
    pub fn iter(&self) -> splay_rs::Iter<'_, Command<A>> {
        self.tree.iter()
    }

    /// Prefix search: up to `limit` commands whose normalized name starts
    /// with the normalized query.
    ///
    /// Traversal is a gated pre-order: a single-path descent locates one
    /// matching node, then the same descent restarts inside that node's
    /// left and right subtrees. Result order follows tree shape (and so
    /// usage history), not the alphabet.
    pub fn strict_search(&self, query: &str, limit: usize) -> Page<'_, A> {
        self.fill(Cursor::strict(normalize(query), self.tree.root(), limit))
    }

    /// Resume a strict search under a longer query, typically as the user
    /// keeps typing.
    ///
    /// Valid when `extended_query` extends the cursor's query and the
    /// cursor still has a resume position and leftover quota; the search
    /// restarts from the last yielded node instead of the root and spends
    /// the remaining quota. Any other cursor yields an empty page.
    pub fn continue_strict_search(&self, cursor: Cursor, extended_query: &str) -> Page<'_, A> {
        let query = normalize(extended_query);
        if !cursor.resumes_strict(&query) {
            return Page::empty(cursor);
        }
        let resumed = Cursor::strict(query, cursor.position(), cursor.remaining());
        self.fill(resumed)
    }

    /// Substring search: up to `limit` commands whose normalized name
    /// contains the normalized query, in breadth-first order from the root.
    pub fn soft_search(&self, query: &str, limit: usize) -> Page<'_, A> {
        self.fill(Cursor::scan(
            Match::Substring,
            normalize(query),
            self.tree.root(),
            limit,
        ))
    }

    /// Resume a soft search's queue for another `limit` matches ("scroll
    /// for more"). A drained or non-soft cursor yields an empty page.
    pub fn continue_soft_search(&self, cursor: Cursor, limit: usize) -> Page<'_, A> {
        if cursor.mode() != Match::Substring {
            return Page::empty(cursor);
        }
        self.fill(cursor.with_limit(limit))
    }

    /// List up to `limit` commands in breadth-first order from the root.
    ///
    /// Because [`promote`](Self::promote) moves executed commands to the
    /// root, this order naturally favors recently used commands.
    pub fn list_all(&self, limit: usize) -> Page<'_, A> {
        self.fill(Cursor::scan(
            Match::Any,
            String::new(),
            self.tree.root(),
            limit,
        ))
    }

    /// Resume a listing for another `limit` commands. A drained or
    /// non-listing cursor yields an empty page.
    pub fn continue_list_all(&self, cursor: Cursor, limit: usize) -> Page<'_, A> {
        if cursor.mode() != Match::Any {
            return Page::empty(cursor);
        }
        self.fill(cursor.with_limit(limit))
    }

    /// First palette page: a listing bounded by the configured page size.
    pub fn open_palette(&self) -> Page<'_, A> {
        self.list_all(self.config.page_size)
    }

    /// Arena occupancy statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            commands: self.tree.len(),
            slots: self.tree.capacity(),
            free_slots: self.tree.free_slots(),
            key_bytes: self.tree.iter().map(|(_, k, _)| k.len()).sum(),
        }
    }

    fn fill(&self, mut cursor: Cursor) -> Page<'_, A> {
        let mut items = Vec::new();
        match cursor.mode() {
            Match::Prefix => self.fill_strict(&mut cursor, &mut items),
            Match::Substring | Match::Any => self.fill_scan(&mut cursor, &mut items),
            // Exact lookups never paginate.
            Match::Exact => {}
        }
        Page { items, cursor }
    }

    /// Gated pre-order: each pending id is the start of a fresh single-path
    /// descent; a hit exposes its own subtrees as the next starts, left
    /// before right.
    fn fill_strict<'a>(&'a self, cursor: &mut Cursor, items: &mut Vec<(NodeId, &'a Command<A>)>) {
        while cursor.remaining() > 0 {
            let Some(start) = cursor.pop() else { break };
            let Some(hit) = self.tree.find(cursor.query(), Match::Prefix, start) else {
                continue;
            };
            let right = self.tree.right(hit);
            if !right.is_null() {
                cursor.push_start(right);
            }
            let left = self.tree.left(hit);
            if !left.is_null() {
                cursor.push_start(left);
            }
            cursor.record_hit(hit);
            items.push((hit, self.tree.value(hit)));
        }
    }

    /// Breadth-first scan: every dequeued node enqueues its children, and
    /// matching nodes are yielded until the quota or the queue runs out.
    fn fill_scan<'a>(&'a self, cursor: &mut Cursor, items: &mut Vec<(NodeId, &'a Command<A>)>) {
        while cursor.remaining() > 0 {
            let Some(id) = cursor.pop() else { break };
            let left = self.tree.left(id);
            if !left.is_null() {
                cursor.push_back(left);
            }
            let right = self.tree.right(id);
            if !right.is_null() {
                cursor.push_back(right);
            }
            if cursor.mode().matches(self.tree.key(id), cursor.query()) {
                cursor.record_hit(id);
                items.push((id, self.tree.value(id)));
            }
        }
    }
}

impl<A> Default for CommandIndex<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for CommandIndex<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandIndex")
            .field("commands", &self.tree.len())
            .finish_non_exhaustive()
    }
}
