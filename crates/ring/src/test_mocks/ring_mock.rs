//! Callback-driven stand-in for a ring, for testing code that depends on
//! [`KeyNodeWatcher`] without running a real one.

use crossbeam_channel::{Receiver, never};

use crate::{
    error::{RingError, RingResult},
    models::{Key, Node, Op, State},
    services::{KeyNodeWatcher, Keys, Nodes, Watcher},
};

/// Every operation forwards to its `on_*` closure.
///
/// The defaults accept every mutation, report nothing stored, and hand out
/// watcher channels that never deliver.
pub struct MockRing<T> {
    pub on_register_watcher: Box<dyn Fn(&Op<T>) -> Receiver<Op<T>> + Send + Sync>,
    pub on_deregister_watcher: Box<dyn Fn(&Op<T>) + Send + Sync>,
    pub on_emplace: Box<dyn Fn(Key<T>, Option<&str>) -> RingResult<()> + Send + Sync>,
    pub on_update: Box<dyn Fn(Key<T>) -> RingResult<()> + Send + Sync>,
    pub on_remove: Box<dyn Fn(&str) + Send + Sync>,
    pub on_node_for_key: Box<dyn Fn(&str) -> RingResult<Option<String>> + Send + Sync>,
    pub on_create_node: Box<dyn Fn(Node) -> RingResult<()> + Send + Sync>,
    pub on_delete_node: Box<dyn Fn(&str) -> RingResult<()> + Send + Sync>,
    pub on_update_node: Box<dyn Fn(Node) -> RingResult<()> + Send + Sync>,
    pub on_get_node: Box<dyn Fn(&str) -> RingResult<Node> + Send + Sync>,
    pub on_list_nodes: Box<dyn Fn() -> Vec<String> + Send + Sync>,
    pub on_state: Box<dyn Fn() -> State + Send + Sync>,
}

impl<T: 'static> Default for MockRing<T> {
    fn default() -> Self {
        Self {
            on_register_watcher: Box::new(|_: &Op<T>| never::<Op<T>>()),
            on_deregister_watcher: Box::new(|_: &Op<T>| {}),
            on_emplace: Box::new(|_: Key<T>, _: Option<&str>| -> RingResult<()> { Ok(()) }),
            on_update: Box::new(|_: Key<T>| -> RingResult<()> { Ok(()) }),
            on_remove: Box::new(|_: &str| {}),
            on_node_for_key: Box::new(|key: &str| -> RingResult<Option<String>> {
                Err(RingError::KeyNotFound(key.to_string()))
            }),
            on_create_node: Box::new(|_: Node| -> RingResult<()> { Ok(()) }),
            on_delete_node: Box::new(|_: &str| -> RingResult<()> { Ok(()) }),
            on_update_node: Box::new(|_: Node| -> RingResult<()> { Ok(()) }),
            on_get_node: Box::new(|identifier: &str| -> RingResult<Node> {
                Err(RingError::NodeNotFound(identifier.to_string()))
            }),
            on_list_nodes: Box::new(Vec::<String>::new),
            on_state: Box::new(State::default),
        }
    }
}

impl<T: 'static> MockRing<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_register_watcher<F>(mut self, f: F) -> Self
    where
        F: Fn(&Op<T>) -> Receiver<Op<T>> + Send + Sync + 'static,
    {
        self.on_register_watcher = Box::new(f);
        self
    }

    pub fn with_deregister_watcher<F>(mut self, f: F) -> Self
    where
        F: Fn(&Op<T>) + Send + Sync + 'static,
    {
        self.on_deregister_watcher = Box::new(f);
        self
    }

    pub fn with_emplace<F>(mut self, f: F) -> Self
    where
        F: Fn(Key<T>, Option<&str>) -> RingResult<()> + Send + Sync + 'static,
    {
        self.on_emplace = Box::new(f);
        self
    }

    pub fn with_update<F>(mut self, f: F) -> Self
    where
        F: Fn(Key<T>) -> RingResult<()> + Send + Sync + 'static,
    {
        self.on_update = Box::new(f);
        self
    }

    pub fn with_remove<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_remove = Box::new(f);
        self
    }

    pub fn with_node_for_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> RingResult<Option<String>> + Send + Sync + 'static,
    {
        self.on_node_for_key = Box::new(f);
        self
    }

    pub fn with_create_node<F>(mut self, f: F) -> Self
    where
        F: Fn(Node) -> RingResult<()> + Send + Sync + 'static,
    {
        self.on_create_node = Box::new(f);
        self
    }

    pub fn with_delete_node<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> RingResult<()> + Send + Sync + 'static,
    {
        self.on_delete_node = Box::new(f);
        self
    }

    pub fn with_update_node<F>(mut self, f: F) -> Self
    where
        F: Fn(Node) -> RingResult<()> + Send + Sync + 'static,
    {
        self.on_update_node = Box::new(f);
        self
    }

    pub fn with_get_node<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> RingResult<Node> + Send + Sync + 'static,
    {
        self.on_get_node = Box::new(f);
        self
    }

    pub fn with_list_nodes<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        self.on_list_nodes = Box::new(f);
        self
    }

    pub fn with_state<F>(mut self, f: F) -> Self
    where
        F: Fn() -> State + Send + Sync + 'static,
    {
        self.on_state = Box::new(f);
        self
    }
}

impl<T> Keys<T> for MockRing<T> {
    fn emplace(&self, key: Key<T>, hash_token: Option<&str>) -> RingResult<()> {
        (self.on_emplace)(key, hash_token)
    }

    fn update(&self, key: Key<T>) -> RingResult<()> {
        (self.on_update)(key)
    }

    fn remove(&self, key: &str) {
        (self.on_remove)(key)
    }

    fn node_for_key(&self, key: &str) -> RingResult<Option<String>> {
        (self.on_node_for_key)(key)
    }
}

impl<T> Nodes for MockRing<T> {
    fn create_node(&self, node: Node) -> RingResult<()> {
        (self.on_create_node)(node)
    }

    fn delete_node(&self, identifier: &str) -> RingResult<()> {
        (self.on_delete_node)(identifier)
    }

    fn update_node(&self, node: Node) -> RingResult<()> {
        (self.on_update_node)(node)
    }

    fn get_node(&self, identifier: &str) -> RingResult<Node> {
        (self.on_get_node)(identifier)
    }

    fn list_nodes(&self) -> Vec<String> {
        (self.on_list_nodes)()
    }
}

impl<T> Watcher<T> for MockRing<T> {
    fn register_watcher(&self, template: &Op<T>) -> Receiver<Op<T>> {
        (self.on_register_watcher)(template)
    }

    fn deregister_watcher(&self, template: &Op<T>) {
        (self.on_deregister_watcher)(template)
    }
}

impl<T> KeyNodeWatcher<T> for MockRing<T> {
    fn state(&self) -> State {
        (self.on_state)()
    }
}
