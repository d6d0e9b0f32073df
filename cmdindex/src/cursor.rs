//! Resumable search state.
//!
//! Every search on a [`CommandIndex`](crate::CommandIndex) returns a
//! [`Page`]: one bounded batch of matches plus the [`Cursor`] that resumes
//! the same traversal. Cursors are plain values owned by the caller, so
//! several palette instances can paginate the same index independently;
//! the host discards a cursor whenever the query changes mode and asks for
//! a fresh page instead.

use std::collections::VecDeque;

use splay_rs::{Match, NodeId};

use crate::Command;

/// Saved traversal state: match mode, normalized query, last yielded node,
/// pending nodes and leftover quota.
///
/// Strict (prefix) searches treat the pending list as a stack of subtree
/// starts; soft (substring) and list-all searches treat it as a FIFO queue
/// of unvisited nodes.
#[derive(Clone, Debug)]
pub struct Cursor {
    mode: Match,
    query: String,
    position: NodeId,
    pending: VecDeque<NodeId>,
    remaining: usize,
}

impl Cursor {
    pub(crate) fn strict(query: String, start: NodeId, limit: usize) -> Self {
        let mut pending = VecDeque::new();
        if !start.is_null() {
            pending.push_back(start);
        }
        Self {
            mode: Match::Prefix,
            query,
            position: NodeId::NULL,
            pending,
            remaining: limit,
        }
    }

    pub(crate) fn scan(mode: Match, query: String, root: NodeId, limit: usize) -> Self {
        debug_assert!(matches!(mode, Match::Substring | Match::Any));
        let mut pending = VecDeque::new();
        if !root.is_null() {
            pending.push_back(root);
        }
        Self {
            mode,
            query,
            position: NodeId::NULL,
            pending,
            remaining: limit,
        }
    }

    /// Match mode this cursor was produced under.
    pub fn mode(&self) -> Match {
        self.mode
    }

    /// Normalized query the cursor is traversing for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Last node this search yielded, or NULL before the first match.
    pub fn position(&self) -> NodeId {
        self.position
    }

    /// Quota left over from the call that produced this cursor.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// True once nothing is pending; continuing a drained cursor yields an
    /// empty page.
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    /// True when `query` extends this strict cursor's query and both a
    /// resume point and quota remain.
    pub(crate) fn resumes_strict(&self, query: &str) -> bool {
        self.mode == Match::Prefix
            && !self.position.is_null()
            && self.remaining > 0
            && query.starts_with(&self.query)
    }

    pub(crate) fn with_limit(mut self, limit: usize) -> Self {
        self.remaining = limit;
        self
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.pending.pop_front()
    }

    pub(crate) fn push_start(&mut self, id: NodeId) {
        debug_assert!(!id.is_null());
        self.pending.push_front(id);
    }

    pub(crate) fn push_back(&mut self, id: NodeId) {
        debug_assert!(!id.is_null());
        self.pending.push_back(id);
    }

    pub(crate) fn record_hit(&mut self, id: NodeId) {
        self.position = id;
        self.remaining -= 1;
    }
}

/// One bounded batch of matches plus the cursor that resumes the search.
#[derive(Debug)]
pub struct Page<'a, A> {
    /// Matched nodes in traversal order, with their commands.
    pub items: Vec<(NodeId, &'a Command<A>)>,
    /// Saved traversal state; pass it to the matching continuation call.
    pub cursor: Cursor,
}

impl<'a, A> Page<'a, A> {
    pub(crate) fn empty(cursor: Cursor) -> Self {
        Self {
            items: Vec::new(),
            cursor,
        }
    }

    /// Number of matches in this batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when this batch carried no matches.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
