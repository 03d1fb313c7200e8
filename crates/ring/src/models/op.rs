/// A change notification for one key.
///
/// `node` is `None` while the key sits in the unassigned pool. Removal
/// notifications produced by deleting a key carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Op<T> {
    pub key: String,
    pub node: Option<String>,
    pub payload: Option<T>,
    pub removed: bool,
    pub updated: bool,
    pub ring_change: bool,
}

impl<T> Default for Op<T> {
    fn default() -> Self {
        Self {
            key: String::new(),
            node: None,
            payload: None,
            removed: false,
            updated: false,
            ring_change: false,
        }
    }
}

impl<T> Op<T> {
    /// Watcher template matching every event routed to `node`.
    #[inline]
    pub fn for_node(node: impl Into<String>) -> Self {
        Self {
            node: Some(node.into()),
            ..Self::default()
        }
    }

    #[inline]
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }

    #[inline]
    pub fn updated(mut self, updated: bool) -> Self {
        self.updated = updated;
        self
    }

    #[inline]
    pub fn ring_change(mut self, ring_change: bool) -> Self {
        self.ring_change = ring_change;
        self
    }

    pub fn node_id(&self) -> &str {
        self.node.as_deref().unwrap_or_default()
    }
}
