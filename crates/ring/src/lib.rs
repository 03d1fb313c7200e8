//! Consistent hash ring that assigns keys to the virtual slices of member
//! nodes and notifies watchers whenever an assignment changes.

pub mod config;
pub mod error;
pub mod hash;
pub mod index;
pub mod models;
pub mod ring;
pub mod services;
pub mod test_mocks;
pub mod watcher;

pub use crate::config::RingConfig;
pub use crate::error::{RingError, RingResult};
pub use crate::models::{InnerKey, Key, Node, Op, State};
pub use crate::ring::Ring;
pub use crate::services::{KeyNodeWatcher, Keys, Nodes, Watcher};

#[cfg(test)]
mod tests;
