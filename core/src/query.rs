use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::normalize;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    And,
    Or,
}

impl FromStr for BooleanOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(Error::InvalidOperator(s.to_string())),
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    /// Sum of the query terms' frequencies in this document.
    pub score: u64,
}

/// Read-only query evaluation over a built [`InvertedIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Searcher<'a> {
    index: &'a InvertedIndex,
}

impl<'a> Searcher<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a InvertedIndex {
        self.index
    }

    /// Boolean retrieval. Results iterate in ascending document id order.
    ///
    /// A query with no tokens after normalization matches nothing under either
    /// operator.
    pub fn boolean(&self, query: &str, op: BooleanOperator) -> BTreeSet<DocId> {
        let tokens = normalize(query);
        if tokens.is_empty() {
            return BTreeSet::new();
        }
        let empty = HashSet::new();
        let mut sets: Vec<&HashSet<DocId>> = tokens
            .iter()
            .map(|t| self.index.postings(t).unwrap_or(&empty))
            .collect();

        match op {
            BooleanOperator::Or => sets.iter().flat_map(|s| s.iter().copied()).collect(),
            BooleanOperator::And => {
                sets.sort_by_key(|s| s.len());
                let Some((smallest, rest)) = sets.split_first() else {
                    return BTreeSet::new();
                };
                smallest
                    .iter()
                    .copied()
                    .filter(|doc_id| rest.iter().all(|s| s.contains(doc_id)))
                    .collect()
            }
        }
    }

    /// Boolean retrieval with the operator given as text (`"and"`, `"OR"`, ...).
    pub fn boolean_str(&self, query: &str, op: &str) -> Result<BTreeSet<DocId>> {
        let op: BooleanOperator = op.parse()?;
        Ok(self.boolean(query, op))
    }

    /// Term-frequency ranking: every query token adds its count in each document
    /// to that document's score. Repeated query tokens count once per repeat.
    ///
    /// Ordered by descending score, then ascending document id. At most `k`
    /// documents are returned; fewer if fewer matched.
    pub fn ranked(&self, query: &str, k: usize) -> Vec<ScoredDoc> {
        let mut scores: HashMap<DocId, u64> = HashMap::new();
        for term in normalize(query) {
            if let Some(postings) = self.index.term_frequencies(&term) {
                for (&doc_id, &tf) in postings {
                    *scores.entry(doc_id).or_insert(0) += tf as u64;
                }
            }
        }

        let mut scored: Vec<ScoredDoc> = scores
            .into_iter()
            .map(|(doc_id, score)| ScoredDoc { doc_id, score })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
        scored.truncate(k);
        scored
    }

    /// Same as [`Searcher::ranked`] but only the ids.
    pub fn ranked_ids(&self, query: &str, k: usize) -> Vec<DocId> {
        self.ranked(query, k).into_iter().map(|d| d.doc_id).collect()
    }
}
