use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Read-only snapshot of the ring's assignment tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub nodes_by_slice: HashMap<u64, String>,
    pub slices_by_hash: HashMap<u64, u64>,
    pub hashes_by_key: HashMap<String, u64>,
    pub unassigned: BTreeSet<u64>,
}
