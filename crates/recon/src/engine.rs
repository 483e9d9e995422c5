use std::collections::{HashMap, HashSet};

use crate::model::{CellWrite, ReconEntry, ReconReport};

/// Join local sheet rows to remote records by key.
///
/// `local_keys` is an ordered sequence of `(row, key)` pairs; rows whose
/// key is empty after trimming are skipped and counted. `key_of` runs
/// once per remote record; records without a key are counted, never an
/// error. Matching is exact string equality after trimming both sides:
/// no case folding, no numeric normalization.
///
/// When the server hands back several records with the same key the last
/// one wins (the fetch layer does not deduplicate). Inputs are never
/// mutated; output entries preserve local row order, so identical inputs
/// always produce identical output.
pub fn reconcile<R, K, V>(
    local_keys: &[(usize, String)],
    remote: &[R],
    key_of: K,
    value_of: V,
) -> ReconReport
where
    K: Fn(&R) -> Option<String>,
    V: Fn(&R) -> CellWrite,
{
    let mut index: HashMap<String, &R> = HashMap::new();
    let mut keyless_remote = 0usize;

    for record in remote {
        match key_of(record)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
        {
            Some(key) => {
                index.insert(key, record);
            }
            None => keyless_remote += 1,
        }
    }

    let mut entries = Vec::new();
    let mut matched_keys: HashSet<&str> = HashSet::new();
    let mut local_misses = 0usize;
    let mut empty_local_keys = 0usize;

    for (row, key) in local_keys {
        let key = key.trim();
        if key.is_empty() {
            empty_local_keys += 1;
            continue;
        }
        match index.get(key) {
            Some(record) => {
                entries.push(ReconEntry {
                    row: *row,
                    value: value_of(record),
                });
                matched_keys.insert(key);
            }
            None => local_misses += 1,
        }
    }

    ReconReport {
        entries,
        local_misses,
        unmatched_remote: index.len() - matched_keys.len(),
        keyless_remote,
        empty_local_keys,
    }
}
