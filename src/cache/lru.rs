//! LRU List Module
//!
//! Recency list for cache eviction: a doubly linked list whose nodes live in a
//! slot vector and link to each other by index.
//!
//! - Front = Most recently used
//! - Back = Least recently used
//!
//! Every operation except iteration is O(1). Freed slots are recycled.

use crate::cache::CacheEntry;

/// Stable handle to a node in the list.
pub type NodeId = usize;

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == LRU List ==
/// Recency-ordered list of cache entries.
#[derive(Debug, Default)]
pub struct LruList {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl LruList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Front ==
    /// Inserts an entry at the most-recently-used position.
    pub fn push_front(&mut self, entry: CacheEntry) -> NodeId {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };

        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    pub fn move_to_front(&mut self, id: NodeId) {
        if self.head == Some(id) || !self.contains(id) {
            return;
        }
        self.detach(id);

        let old_head = self.head;
        {
            let node = self.node_mut(id);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => self.node_mut(h).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    // == Remove ==
    /// Unlinks a node and frees its slot, returning the entry it held.
    pub fn remove(&mut self, id: NodeId) -> Option<CacheEntry> {
        if !self.contains(id) {
            return None;
        }
        self.detach(id);

        let node = self.slots[id].take()?;
        self.free.push(id);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Back ==
    pub fn peek_back(&self) -> Option<&CacheEntry> {
        self.tail.and_then(|id| self.get(id))
    }

    // == Accessors ==
    pub fn get(&self, id: NodeId) -> Option<&CacheEntry> {
        self.slots.get(id)?.as_ref().map(|node| &node.entry)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheEntry> {
        self.slots.get_mut(id)?.as_mut().map(|node| &mut node.entry)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<i64> {
        let mut keys = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(node) = self.slots[id].as_ref() else {
                break;
            };
            keys.push(node.entry.key);
            cursor = node.next;
        }
        keys
    }

    // == Internal Helpers ==
    fn detach(&mut self, id: NodeId) {
        let (prev, next) = {
            let node = self.node_mut(id);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    // Callers only pass ids reachable from head/tail or checked with `contains`.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots[id].as_mut() {
            Some(node) => node,
            None => unreachable!("linked node {} has been freed", id),
        }
    }
}
