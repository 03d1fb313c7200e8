pub mod key;
pub mod node;
pub mod op;
pub mod state;

pub use key::{InnerKey, Key};
pub use node::Node;
pub use op::Op;
pub use state::State;
