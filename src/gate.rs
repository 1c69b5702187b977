//! Progression gate
//!
//! A module unlocks when every one of its prerequisites is complete. The
//! first module is always open. With default prerequisites this is a
//! single-predecessor chain.

use crate::catalog::Catalog;
use crate::progress::CompletionSet;

pub fn is_unlocked(catalog: &Catalog, completion: &CompletionSet, index: usize) -> bool {
    if index == 0 {
        return !catalog.is_empty();
    }
    match catalog.get(index) {
        Some(module) => module.prerequisites.iter().all(|&p| completion.contains(p)),
        None => false,
    }
}

pub fn unlocked_indices(catalog: &Catalog, completion: &CompletionSet) -> Vec<usize> {
    (0..catalog.len())
        .filter(|&i| is_unlocked(catalog, completion, i))
        .collect()
}

/// First module that can be opened and is not yet complete
pub fn next_open_module(catalog: &Catalog, completion: &CompletionSet) -> Option<usize> {
    (0..catalog.len()).find(|&i| !completion.contains(i) && is_unlocked(catalog, completion, i))
}

/// Keep an active index inside a catalog of `len` modules
pub fn clamp_active(active: usize, len: usize) -> usize {
    if active >= len {
        0
    } else {
        active
    }
}
