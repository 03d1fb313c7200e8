/// A ring member. `v_factor` scales how many virtual slices it holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub identifier: String,
    pub v_factor: usize,
}

impl Node {
    #[inline]
    pub fn new(identifier: impl Into<String>, v_factor: usize) -> Self {
        Self {
            identifier: identifier.into(),
            v_factor,
        }
    }
}
