pub mod key_node_watcher;

pub use key_node_watcher::{KeyNodeWatcher, Keys, Nodes, Watcher};
