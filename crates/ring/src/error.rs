use thiserror::Error;

pub type RingResult<T> = Result<T, RingError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    #[error("base vFactor for ring hash cannot be less than one")]
    InvalidBaseVFactor,

    #[error("invalid ring configuration: {0}")]
    Config(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node already exists: {0}")]
    NodeAlreadyExists(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key already exists: {0}")]
    KeyAlreadyExists(String),

    #[error("key cannot be nil")]
    NilKey,

    #[error("slice already exists at position {0}")]
    SliceAlreadyExists(u64),

    /// Two distinct virtual slice names of the same node hashed to one position.
    #[error("slice hash collision for node {node} at position {slice}")]
    SliceHashCollision { node: String, slice: u64 },

    #[error("attempted to remove index {index} out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },
}
