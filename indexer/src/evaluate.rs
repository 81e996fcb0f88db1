//! Batch evaluation of boolean OR retrieval against term-frequency ranking.

use anyhow::{Context, Result};
use serde::Serialize;
use stackir_core::metrics::{mean, score_cutoffs, CutoffScores};
use stackir_core::{BooleanOperator, DocId, Searcher};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Instant;

pub const CUTOFFS: [usize; 2] = [5, 10];

/// Where the relevant set for each query comes from.
pub enum Relevance {
    /// Judged ids per query text. Queries without judgments have none relevant.
    Judged(HashMap<String, HashSet<DocId>>),
    /// The first `n` term-frequency results of the query itself.
    PseudoTop(usize),
}

impl Relevance {
    fn relevant_for(&self, query: &str, tf_docs: &[DocId]) -> HashSet<DocId> {
        match self {
            Relevance::Judged(qrels) => qrels.get(query).cloned().unwrap_or_default(),
            Relevance::PseudoTop(n) => tf_docs.iter().take(*n).copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub query: String,
    pub boolean_secs: f64,
    pub tf_secs: f64,
    pub boolean: Vec<CutoffScores>,
    pub tf: Vec<CutoffScores>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub queries: usize,
    pub boolean_secs: f64,
    pub tf_secs: f64,
    pub boolean: Vec<CutoffScores>,
    pub tf: Vec<CutoffScores>,
}

/// One query per line; blank lines and `#` comments are ignored.
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Judgments as a JSON object mapping query text to relevant ids.
pub fn read_qrels(path: &Path) -> Result<HashMap<String, HashSet<DocId>>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let qrels: HashMap<String, HashSet<DocId>> = serde_json::from_str(&text)?;
    Ok(qrels)
}

pub fn evaluate_queries(
    searcher: &Searcher<'_>,
    queries: &[String],
    relevance: &Relevance,
    tf_k: usize,
) -> Result<Vec<QueryReport>> {
    let mut reports = Vec::with_capacity(queries.len());
    for query in queries {
        let start = Instant::now();
        let boolean_docs: Vec<DocId> = searcher.boolean(query, BooleanOperator::Or).into_iter().collect();
        let boolean_secs = start.elapsed().as_secs_f64();

        let start = Instant::now();
        let tf_docs = searcher.ranked_ids(query, tf_k);
        let tf_secs = start.elapsed().as_secs_f64();

        let relevant = relevance.relevant_for(query, &tf_docs);
        tracing::debug!(query = %query, boolean_hits = boolean_docs.len(), tf_hits = tf_docs.len(), relevant = relevant.len(), "evaluated query");
        reports.push(QueryReport {
            query: query.clone(),
            boolean_secs,
            tf_secs,
            boolean: score_cutoffs(&boolean_docs, &relevant, &CUTOFFS)?,
            tf: score_cutoffs(&tf_docs, &relevant, &CUTOFFS)?,
        });
    }
    Ok(reports)
}

fn average_cutoffs(per_query: Vec<&[CutoffScores]>) -> Vec<CutoffScores> {
    CUTOFFS
        .iter()
        .enumerate()
        .map(|(i, &k)| {
            let precision: Vec<f64> = per_query.iter().map(|s| s[i].precision).collect();
            let ndcg: Vec<f64> = per_query.iter().map(|s| s[i].ndcg).collect();
            CutoffScores { k, precision: mean(&precision), ndcg: mean(&ndcg) }
        })
        .collect()
}

pub fn summarize(reports: &[QueryReport]) -> Summary {
    let boolean_secs: Vec<f64> = reports.iter().map(|r| r.boolean_secs).collect();
    let tf_secs: Vec<f64> = reports.iter().map(|r| r.tf_secs).collect();
    Summary {
        queries: reports.len(),
        boolean_secs: mean(&boolean_secs),
        tf_secs: mean(&tf_secs),
        boolean: average_cutoffs(reports.iter().map(|r| r.boolean.as_slice()).collect()),
        tf: average_cutoffs(reports.iter().map(|r| r.tf.as_slice()).collect()),
    }
}
