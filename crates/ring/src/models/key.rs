/// Identity of a key on the ring.
///
/// `order` breaks ties between keys that hash to the same position: lower
/// orders are notified first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InnerKey {
    pub key: String,
    pub order: i64,
}

impl InnerKey {
    #[inline]
    pub fn new(key: impl Into<String>, order: i64) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Key<T> {
    pub inner: InnerKey,
    pub value: T,
}

impl<T> Key<T> {
    #[inline]
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            inner: InnerKey::new(key, 0),
            value,
        }
    }

    #[inline]
    pub fn with_order(mut self, order: i64) -> Self {
        self.inner.order = order;
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.key
    }

    #[inline]
    pub fn order(&self) -> i64 {
        self.inner.order
    }
}
