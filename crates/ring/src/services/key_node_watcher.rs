use crossbeam_channel::Receiver;

use crate::{
    error::RingResult,
    models::{Key, Node, Op, State},
};

/// Key lifecycle.
///
/// A `Key<T>` always exists, so the empty identifier stands in for the nil
/// key: `emplace` and `update` reject it with [`RingError::NilKey`] and never
/// store a key named `""`.
///
/// [`RingError::NilKey`]: crate::RingError::NilKey
pub trait Keys<T>: Send + Sync {
    /// Places `key` on the ring, hashing `hash_token` instead of the key
    /// name when one is given.
    fn emplace(&self, key: Key<T>, hash_token: Option<&str>) -> RingResult<()>;

    fn update(&self, key: Key<T>) -> RingResult<()>;

    fn remove(&self, key: &str);

    fn node_for_key(&self, key: &str) -> RingResult<Option<String>>;
}

pub trait Nodes: Send + Sync {
    fn create_node(&self, node: Node) -> RingResult<()>;

    fn delete_node(&self, identifier: &str) -> RingResult<()>;

    fn update_node(&self, node: Node) -> RingResult<()>;

    fn get_node(&self, identifier: &str) -> RingResult<Node>;

    fn list_nodes(&self) -> Vec<String>;
}

/// Subscription surface. Every delivery is a rendezvous: a receiver that
/// stops reading stalls the ring until it is deregistered.
pub trait Watcher<T>: Send + Sync {
    fn register_watcher(&self, template: &Op<T>) -> Receiver<Op<T>>;

    fn deregister_watcher(&self, template: &Op<T>);
}

pub trait KeyNodeWatcher<T>: Keys<T> + Nodes + Watcher<T> {
    fn state(&self) -> State;
}
