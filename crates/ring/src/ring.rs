use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::Arc,
};

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::{
    config::RingConfig,
    error::{RingError, RingResult},
    hash::{HashFn, SliceNameFn},
    index::SortedIndex,
    models::{InnerKey, Key, Node, Op, State},
    services::{KeyNodeWatcher, Keys, Nodes, Watcher},
    watcher::NotificationHub,
};

/// Everything guarded by the ring lock.
pub(crate) struct RingState<T> {
    pub(crate) slices: SortedIndex,
    pub(crate) hashes: SortedIndex,
    pub(crate) unassigned: BTreeSet<u64>,

    pub(crate) nodes_by_slice: HashMap<u64, String>,
    pub(crate) v_factor_by_node: HashMap<String, usize>,
    pub(crate) slices_by_hash: HashMap<u64, u64>,
    pub(crate) keys_by_hash: HashMap<u64, Vec<InnerKey>>,
    pub(crate) content_by_key: HashMap<String, T>,
    pub(crate) hashes_by_key: HashMap<String, u64>,
}

impl<T> RingState<T> {
    fn new() -> Self {
        Self {
            slices: SortedIndex::new(),
            hashes: SortedIndex::new(),
            unassigned: BTreeSet::new(),
            nodes_by_slice: HashMap::new(),
            v_factor_by_node: HashMap::new(),
            slices_by_hash: HashMap::new(),
            keys_by_hash: HashMap::new(),
            content_by_key: HashMap::new(),
            hashes_by_key: HashMap::new(),
        }
    }

    /// The slice at the largest position `<= hash`, wrapping to the last slice.
    pub(crate) fn owning_slice(&self, hash: u64) -> Option<u64> {
        if self.slices.is_empty() {
            return None;
        }

        let idx = self.slices.locate(hash);
        let owner = match self.slices.get(idx) {
            Some(slice) if slice == hash => idx,
            _ => self.slices.prev_index(idx),
        };

        self.slices.get(owner)
    }

    pub(crate) fn node_for_hash(&self, hash: u64) -> Option<String> {
        self.slices_by_hash
            .get(&hash)
            .and_then(|slice| self.nodes_by_slice.get(slice))
            .cloned()
    }

    fn owned_by(&self, slice: u64, node: &str) -> bool {
        self.nodes_by_slice.get(&slice).map(String::as_str) == Some(node)
    }

    fn snapshot(&self) -> State {
        State {
            nodes_by_slice: self.nodes_by_slice.clone(),
            slices_by_hash: self.slices_by_hash.clone(),
            hashes_by_key: self.hashes_by_key.clone(),
            unassigned: self.unassigned.clone(),
        }
    }
}

/// Consistent hash ring distributing keys over the virtual slices of its
/// nodes.
///
/// Every mutation runs under one write lock, including the notifications it
/// emits, so a watcher that stops reading blocks the whole ring until it is
/// deregistered.
pub struct Ring<T> {
    pub(crate) state: RwLock<RingState<T>>,
    pub(crate) hub: NotificationHub<T>,
    hash: HashFn,
    slice_name: SliceNameFn,
    base_v_factor: usize,
}

impl<T> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("base_v_factor", &self.base_v_factor)
            .field("watchers", &self.hub.len())
            .finish_non_exhaustive()
    }
}

impl<T> Ring<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(config: RingConfig<T>) -> RingResult<Self> {
        config.validate()?;

        Ok(Self {
            state: RwLock::new(RingState::new()),
            hub: NotificationHub::new(config.filter),
            hash: config.hash,
            slice_name: config.slice_name,
            base_v_factor: config.base_v_factor,
        })
    }

    pub fn new_shared(config: RingConfig<T>) -> RingResult<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }

    #[inline]
    pub fn base_v_factor(&self) -> usize {
        self.base_v_factor
    }

    #[inline]
    fn hash(&self, identifier: &str) -> u64 {
        (self.hash)(identifier)
    }

    #[inline]
    fn slice_position(&self, node_id: &str, idx: usize) -> u64 {
        self.hash(&(self.slice_name)(node_id, idx))
    }

    #[inline]
    fn slice_count(&self, v_factor: usize) -> usize {
        v_factor.saturating_mul(self.base_v_factor)
    }

    /// Emits one ring-change op per key stored at `hash`, in key order.
    fn notify_position(
        &self,
        state: &RingState<T>,
        hash: u64,
        node: Option<&str>,
        removed: bool,
    ) {
        let Some(keys) = state.keys_by_hash.get(&hash) else {
            return;
        };

        for inner in keys {
            self.hub.notify(Op {
                key: inner.key.clone(),
                node: node.map(str::to_owned),
                payload: state.content_by_key.get(&inner.key).cloned(),
                removed,
                updated: false,
                ring_change: true,
            });
        }
    }

    pub(crate) fn insert_slice(
        &self,
        state: &mut RingState<T>,
        slice: u64,
        node: &str,
    ) -> RingResult<()> {
        if state.nodes_by_slice.contains_key(&slice) {
            return Err(RingError::SliceAlreadyExists(slice));
        }

        let idx = state.slices.insert(slice);
        state.nodes_by_slice.insert(slice, node.to_string());

        trace!(slice, node, "slice inserted");

        // First slice on the ring adopts the whole unassigned pool.
        if state.slices.len() == 1 {
            let pooled = std::mem::take(&mut state.unassigned);
            for hash in pooled {
                state.slices_by_hash.insert(hash, slice);
                self.notify_position(state, hash, Some(node), false);
            }

            return Ok(());
        }

        let next = state.slices[state.slices.next_index(idx)];
        let start = state.hashes.locate(slice);
        let end = state.hashes.locate(next);

        self.reassign_range(state, slice, start, end, next < slice);

        Ok(())
    }

    pub(crate) fn remove_slice(&self, state: &mut RingState<T>, slice: u64) -> RingResult<()> {
        let Some(node) = state.nodes_by_slice.get(&slice).cloned() else {
            return Ok(());
        };

        let idx = state.slices.locate(slice);

        if state.slices.len() == 1 {
            let hashes: Vec<u64> = state.hashes.iter().collect();
            for hash in hashes {
                self.notify_position(state, hash, Some(&node), true);
                state.slices_by_hash.remove(&hash);
                state.unassigned.insert(hash);
            }
        } else {
            let prev = state.slices[state.slices.prev_index(idx)];
            let next = state.slices[state.slices.next_index(idx)];
            let start = state.hashes.locate(slice);
            let end = state.hashes.locate(next);

            // The previous slice inherits the whole range.
            self.reassign_range(state, prev, start, end, next < slice);
        }

        state.slices.remove_at(idx)?;
        state.nodes_by_slice.remove(&slice);

        trace!(slice, node = %node, "slice removed");

        Ok(())
    }

    /// Moves the hashes at `[start, end)` of the hash index to `slice`,
    /// walking circularly. `circle` marks a range that wraps past the top of
    /// the ring; with `start == end` it then covers every hash.
    pub(crate) fn reassign_range(
        &self,
        state: &mut RingState<T>,
        slice: u64,
        start: usize,
        end: usize,
        circle: bool,
    ) {
        let len = state.hashes.len();

        if (circle && start == end) || (start == 0 && end == len) {
            let hashes: Vec<u64> = state.hashes.iter().collect();
            for hash in hashes {
                self.reassign_hash(state, slice, hash);
            }
            return;
        }

        let end = if end == len { 0 } else { end };
        let mut idx = start;

        loop {
            if idx == len {
                idx = 0;
            }

            if idx == end {
                return;
            }

            let hash = state.hashes[idx];
            self.reassign_hash(state, slice, hash);

            idx += 1;
        }
    }

    fn reassign_hash(&self, state: &mut RingState<T>, slice: u64, hash: u64) {
        let previous = state.node_for_hash(hash);
        self.notify_position(state, hash, previous.as_deref(), true);

        state.slices_by_hash.insert(hash, slice);

        let next = state.nodes_by_slice.get(&slice).cloned();
        self.notify_position(state, hash, next.as_deref(), false);
    }

    fn insert_key(state: &mut RingState<T>, hash: u64, inner: InnerKey) {
        let keys = state.keys_by_hash.entry(hash).or_default();
        let idx = keys.partition_point(|k| k.order < inner.order);
        keys.insert(idx, inner);
    }

    fn retire_hash(state: &mut RingState<T>, hash: u64) {
        state.keys_by_hash.remove(&hash);
        state.hashes.remove(hash);
        state.slices_by_hash.remove(&hash);
        state.unassigned.remove(&hash);
    }
}

impl<T> Nodes for Ring<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn create_node(&self, node: Node) -> RingResult<()> {
        let mut state = self.state.write();

        if state.v_factor_by_node.contains_key(&node.identifier) {
            return Err(RingError::NodeAlreadyExists(node.identifier));
        }

        state
            .v_factor_by_node
            .insert(node.identifier.clone(), node.v_factor);

        // A collision part way through keeps the slices inserted so far.
        for idx in 0..self.slice_count(node.v_factor) {
            let slice = self.slice_position(&node.identifier, idx);
            self.insert_slice(&mut state, slice, &node.identifier)?;
        }

        debug!(node = %node.identifier, v_factor = node.v_factor, "node created");

        Ok(())
    }

    fn delete_node(&self, identifier: &str) -> RingResult<()> {
        let mut state = self.state.write();

        let Some(v_factor) = state.v_factor_by_node.get(identifier).copied() else {
            return Ok(());
        };

        for idx in 0..self.slice_count(v_factor) {
            let slice = self.slice_position(identifier, idx);
            if state.owned_by(slice, identifier) {
                self.remove_slice(&mut state, slice)?;
            }
        }

        state.v_factor_by_node.remove(identifier);

        debug!(node = identifier, "node deleted");

        Ok(())
    }

    fn update_node(&self, node: Node) -> RingResult<()> {
        let mut state = self.state.write();

        let current = state
            .v_factor_by_node
            .get(&node.identifier)
            .copied()
            .ok_or_else(|| RingError::NodeNotFound(node.identifier.clone()))?;

        let from = self.slice_count(current);
        let to = self.slice_count(node.v_factor);

        if to > from {
            for idx in from..to {
                let slice = self.slice_position(&node.identifier, idx);
                match self.insert_slice(&mut state, slice, &node.identifier) {
                    Ok(()) => {}
                    Err(RingError::SliceAlreadyExists(slice)) => {
                        return Err(RingError::SliceHashCollision {
                            node: node.identifier,
                            slice,
                        });
                    }
                    Err(err) => return Err(err),
                }
            }
        } else {
            for idx in to..from {
                let slice = self.slice_position(&node.identifier, idx);
                if state.owned_by(slice, &node.identifier) {
                    self.remove_slice(&mut state, slice)?;
                }
            }
        }

        if current != node.v_factor {
            debug!(
                node = %node.identifier,
                from = current,
                to = node.v_factor,
                "node vFactor updated"
            );
        }

        state.v_factor_by_node.insert(node.identifier, node.v_factor);

        Ok(())
    }

    fn get_node(&self, identifier: &str) -> RingResult<Node> {
        let state = self.state.read();

        state
            .v_factor_by_node
            .get(identifier)
            .map(|v_factor| Node::new(identifier, *v_factor))
            .ok_or_else(|| RingError::NodeNotFound(identifier.to_string()))
    }

    fn list_nodes(&self) -> Vec<String> {
        let state = self.state.read();

        let mut nodes: Vec<String> = state.v_factor_by_node.keys().cloned().collect();
        nodes.sort_unstable();
        nodes
    }
}

impl<T> Keys<T> for Ring<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn emplace(&self, key: Key<T>, hash_token: Option<&str>) -> RingResult<()> {
        if key.name().is_empty() {
            return Err(RingError::NilKey);
        }

        let mut state = self.state.write();

        if state.hashes_by_key.contains_key(key.name()) {
            return Err(RingError::KeyAlreadyExists(key.inner.key));
        }

        let Key { inner, value } = key;
        let hash = self.hash(hash_token.unwrap_or(&inner.key));

        state.content_by_key.insert(inner.key.clone(), value.clone());

        if !state.hashes.contains(hash) {
            state.hashes.insert(hash);
        }

        let node = match state.owning_slice(hash) {
            Some(slice) => {
                state.slices_by_hash.insert(hash, slice);
                state.nodes_by_slice.get(&slice).cloned()
            }
            None => {
                state.unassigned.insert(hash);
                None
            }
        };

        trace!(key = %inner.key, hash, node = ?node, "key emplaced");

        self.hub.notify(Op {
            key: inner.key.clone(),
            node,
            payload: Some(value),
            ..Op::default()
        });

        state.hashes_by_key.insert(inner.key.clone(), hash);
        Self::insert_key(&mut state, hash, inner);

        Ok(())
    }

    fn update(&self, key: Key<T>) -> RingResult<()> {
        if key.name().is_empty() {
            return Err(RingError::NilKey);
        }

        let mut state = self.state.write();

        let Some(hash) = state.hashes_by_key.get(key.name()).copied() else {
            return Err(RingError::KeyNotFound(key.inner.key));
        };

        let Key { inner, value } = key;
        state.content_by_key.insert(inner.key.clone(), value.clone());

        let node = state.node_for_hash(hash);

        self.hub.notify(Op {
            key: inner.key,
            node,
            payload: Some(value),
            updated: true,
            ..Op::default()
        });

        Ok(())
    }

    fn remove(&self, key: &str) {
        let mut state = self.state.write();

        let Some(hash) = state.hashes_by_key.remove(key) else {
            return;
        };

        state.content_by_key.remove(key);

        let remaining = match state.keys_by_hash.get_mut(&hash) {
            Some(keys) => {
                keys.retain(|k| k.key != key);
                keys.len()
            }
            None => 0,
        };

        let node = if state.unassigned.contains(&hash) {
            None
        } else {
            state.node_for_hash(hash)
        };

        trace!(key, hash, node = ?node, "key removed");

        self.hub.notify(Op {
            key: key.to_string(),
            node,
            removed: true,
            ..Op::default()
        });

        if remaining == 0 {
            Self::retire_hash(&mut state, hash);
        }
    }

    fn node_for_key(&self, key: &str) -> RingResult<Option<String>> {
        let state = self.state.read();

        let hash = state
            .hashes_by_key
            .get(key)
            .copied()
            .ok_or_else(|| RingError::KeyNotFound(key.to_string()))?;

        Ok(state.node_for_hash(hash))
    }
}

impl<T> Watcher<T> for Ring<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn register_watcher(&self, template: &Op<T>) -> Receiver<Op<T>> {
        self.hub.register(template)
    }

    fn deregister_watcher(&self, template: &Op<T>) {
        self.hub.deregister(template);
    }
}

impl<T> KeyNodeWatcher<T> for Ring<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn state(&self) -> State {
        self.state.read().snapshot()
    }
}
