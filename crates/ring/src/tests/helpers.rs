use std::{collections::HashMap, sync::Arc, time::Duration};

use crossbeam_channel::Receiver;

use crate::{
    Op, Ring, RingConfig,
    hash::md5_hash,
    index::SortedIndex,
};

pub type Payload = &'static str;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Long enough for a blocked thread to have reached its rendezvous.
pub const SETTLE: Duration = Duration::from_millis(100);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Hash function with pinned positions, falling back to MD5 for anything
/// not in `table`.
pub fn table_hash(table: &'static [(&'static str, u64)]) -> impl Fn(&str) -> u64 + Send + Sync {
    let table: HashMap<&'static str, u64> = table.iter().copied().collect();

    move |identifier: &str| {
        table
            .get(identifier)
            .copied()
            .unwrap_or_else(|| md5_hash(identifier))
    }
}

pub fn ring() -> Ring<Payload> {
    init_tracing();
    Ring::new(RingConfig::default()).expect("default config is valid")
}

pub fn ring_with(config: RingConfig<Payload>) -> Ring<Payload> {
    init_tracing();
    Ring::new(config).expect("config is valid")
}

pub fn shared_ring_with(config: RingConfig<Payload>) -> Arc<Ring<Payload>> {
    init_tracing();
    Ring::new_shared(config).expect("config is valid")
}

/// Overwrites the hash index and ownership records directly.
pub fn seed_hashes(ring: &Ring<Payload>, owners: &[(u64, u64)]) {
    let mut state = ring.state.write();
    state.hashes = SortedIndex::from(owners.iter().map(|(hash, _)| *hash).collect::<Vec<_>>());
    for (hash, slice) in owners {
        state.slices_by_hash.insert(*hash, *slice);
    }
}

pub fn slices_by_hash(ring: &Ring<Payload>) -> HashMap<u64, u64> {
    ring.state.read().slices_by_hash.clone()
}

pub fn insert_slice(ring: &Ring<Payload>, slice: u64, node: &str) -> crate::RingResult<()> {
    let mut state = ring.state.write();
    ring.insert_slice(&mut state, slice, node)
}

pub fn remove_slice(ring: &Ring<Payload>, slice: u64) {
    let mut state = ring.state.write();
    ring.remove_slice(&mut state, slice)
        .expect("slice removal stays in bounds");
}

pub fn recv(rx: &Receiver<Op<Payload>>) -> Op<Payload> {
    rx.recv_timeout(RECV_TIMEOUT)
        .expect("notification should arrive")
}

pub fn op(key: &str, node: Option<&str>) -> Op<Payload> {
    Op {
        key: key.to_string(),
        node: node.map(str::to_string),
        ..Op::default()
    }
}
