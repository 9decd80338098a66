//! Dot-product scoring over the full embedding table
//!
//! Exact scan, no approximate index: the candidate set is every node row.
//! Scoring is parallelized with rayon but stays read-only, and the final
//! ordering is fully determined by (score desc, index asc), so repeated calls
//! produce identical output.

use crate::model::EmbeddingTable;
use rayon::prelude::*;
use std::cmp::Ordering;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Score every row against `target` and return the `take` best as
/// `(node_index, score)`, descending score, ties by ascending index.
pub fn top_scored(table: &EmbeddingTable, target: &[f32], take: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = (0..table.len())
        .into_par_iter()
        .map(|i| (i, dot(table.row(i), target)))
        .collect();

    // Unstable sort is fine: the index tie-break makes the order total.
    scored.sort_unstable_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(take);
    scored
}
