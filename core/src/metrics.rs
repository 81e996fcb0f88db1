//! Ranking quality metrics with binary relevance.

use crate::error::{Error, Result};
use crate::index::DocId;
use serde::Serialize;
use std::collections::HashSet;

/// Fraction of the first `k` retrieved ids that are relevant.
///
/// The denominator is always `k`, so a result list shorter than `k` is
/// penalized for the missing positions.
pub fn precision_at_k(retrieved: &[DocId], relevant: &HashSet<DocId>, k: usize) -> Result<f64> {
    if k == 0 {
        return Err(Error::InvalidCutoff(k));
    }
    let hits = retrieved.iter().take(k).filter(|id| relevant.contains(*id)).count();
    Ok(hits as f64 / k as f64)
}

fn dcg_at_k(retrieved: &[DocId], relevant: &HashSet<DocId>, k: usize) -> f64 {
    retrieved
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, id)| relevant.contains(*id))
        .map(|(i, _)| 1.0 / (i as f64 + 2.0).log2())
        .sum()
}

fn ideal_dcg_at_k(num_relevant: usize, k: usize) -> f64 {
    (0..num_relevant.min(k)).map(|i| 1.0 / (i as f64 + 2.0).log2()).sum()
}

/// Normalized discounted cumulative gain at `k`; 0.0 when nothing is relevant.
pub fn ndcg_at_k(retrieved: &[DocId], relevant: &HashSet<DocId>, k: usize) -> Result<f64> {
    if k == 0 {
        return Err(Error::InvalidCutoff(k));
    }
    let idcg = ideal_dcg_at_k(relevant.len(), k);
    if idcg == 0.0 {
        return Ok(0.0);
    }
    Ok(dcg_at_k(retrieved, relevant, k) / idcg)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutoffScores {
    pub k: usize,
    pub precision: f64,
    pub ndcg: f64,
}

/// Precision and nDCG for each cutoff in `cutoffs`, in the same order.
pub fn score_cutoffs(
    retrieved: &[DocId],
    relevant: &HashSet<DocId>,
    cutoffs: &[usize],
) -> Result<Vec<CutoffScores>> {
    cutoffs
        .iter()
        .map(|&k| {
            Ok(CutoffScores {
                k,
                precision: precision_at_k(retrieved, relevant, k)?,
                ndcg: ndcg_at_k(retrieved, relevant, k)?,
            })
        })
        .collect()
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
