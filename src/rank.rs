//! Rank and knowledge-point projection
//!
//! Display-only values derived from the completion set.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::progress::CompletionSet;

pub const DEFAULT_RANKS: [&str; 4] = ["Novice", "Scholar", "Analyst", "Guardian"];

/// Rank names indexed by completed-module count. Counts past the end of
/// the table keep the last rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    names: Vec<String>,
}

impl RankTable {
    /// `None` when `names` is empty
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() {
            None
        } else {
            Some(Self { names })
        }
    }

    pub fn rank_for(&self, completed_count: usize) -> &str {
        let idx = completed_count.min(self.names.len() - 1);
        &self.names[idx]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            names: DEFAULT_RANKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankProjection {
    pub rank_name: String,
    pub total_points: u64,
    pub completed_count: usize,
    pub total_available: u64,
    pub percent_complete: u8,
}

pub fn project(table: &RankTable, catalog: &Catalog, completion: &CompletionSet) -> RankProjection {
    let completed: Vec<_> = completion.iter().filter_map(|i| catalog.get(i)).collect();

    let total_points = completed.iter().map(|m| m.points_value as u64).sum();
    let total_available = catalog.modules().iter().map(|m| m.points_value as u64).sum();
    let percent_complete = if catalog.is_empty() {
        0
    } else {
        (completed.len() * 100 / catalog.len()) as u8
    };

    RankProjection {
        rank_name: table.rank_for(completed.len()).to_string(),
        total_points,
        completed_count: completed.len(),
        total_available,
        percent_complete,
    }
}
