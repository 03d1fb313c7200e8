//! Hashing ports used to place slices and keys on the ring.
//!
//! MD5 is used for distribution only, never for anything security related.

use std::sync::Arc;

use md5::{Digest, Md5};

pub type HashFn = Arc<dyn Fn(&str) -> u64 + Send + Sync>;

pub type SliceNameFn = Arc<dyn Fn(&str, usize) -> String + Send + Sync>;

/// First eight bytes of the MD5 digest of `identifier`, read big-endian.
pub fn md5_hash(identifier: &str) -> u64 {
    let digest = Md5::digest(identifier.as_bytes());

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);

    u64::from_be_bytes(head)
}

#[inline]
pub fn default_slice_name(node_id: &str, idx: usize) -> String {
    format!("{node_id}{idx}")
}
