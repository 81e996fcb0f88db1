use crate::error::{Error, Result};
use crate::tokenizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

pub type DocId = u32;

/// Boolean and frequency postings built once from a fixed document set.
///
/// The two maps always carry the same (term, doc) pairs: a document is in a
/// term's postings set exactly when its count for that term is non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    boolean: HashMap<String, HashSet<DocId>>,
    frequency: HashMap<String, HashMap<DocId, u32>>,
    doc_lengths: HashMap<DocId, usize>,
}

impl InvertedIndex {
    /// Build an index from already normalized token sequences.
    ///
    /// Fails with [`Error::DuplicateDocumentId`] the first time an id repeats;
    /// nothing is returned in that case, so a partial index is never visible.
    pub fn build<I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocId, Vec<String>)>,
    {
        let start = Instant::now();
        let mut index = Self::default();
        tracing::debug!("building inverted index");
        for (doc_id, tokens) in documents {
            index.add(doc_id, tokens)?;
        }
        tracing::debug!(
            postings = index.frequency.values().map(HashMap::len).sum::<usize>(),
            "indexed all documents"
        );
        tracing::info!(
            num_docs = index.num_docs(),
            num_terms = index.num_terms(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built inverted index"
        );
        Ok(index)
    }

    /// Build an index from raw text, normalizing every document first.
    pub fn from_texts<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocId, S)>,
        S: AsRef<str>,
    {
        Self::build(documents.into_iter().map(|(id, text)| (id, normalize(text.as_ref()))))
    }

    fn add(&mut self, doc_id: DocId, tokens: Vec<String>) -> Result<()> {
        if self.doc_lengths.contains_key(&doc_id) {
            return Err(Error::DuplicateDocumentId(doc_id));
        }
        self.doc_lengths.insert(doc_id, tokens.len());

        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            *tf_counts.entry(token).or_insert(0) += 1;
        }
        tracing::trace!(doc_id, distinct_terms = tf_counts.len(), "indexing document");

        for (term, tf) in tf_counts {
            self.boolean.entry(term.clone()).or_default().insert(doc_id);
            self.frequency.entry(term).or_default().insert(doc_id, tf);
        }
        Ok(())
    }

    /// Documents containing `term`, or `None` if the term was never seen.
    pub fn postings(&self, term: &str) -> Option<&HashSet<DocId>> {
        self.boolean.get(term)
    }

    /// Per-document occurrence counts for `term`.
    pub fn term_frequencies(&self, term: &str) -> Option<&HashMap<DocId, u32>> {
        self.frequency.get(term)
    }

    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> u32 {
        self.frequency
            .get(term)
            .and_then(|docs| docs.get(&doc_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn doc_frequency(&self, term: &str) -> usize {
        self.boolean.get(term).map_or(0, HashSet::len)
    }

    /// Total occurrences of `term` across the collection.
    pub fn collection_frequency(&self, term: &str) -> u64 {
        self.frequency
            .get(term)
            .map_or(0, |docs| docs.values().map(|&tf| tf as u64).sum())
    }

    /// Length of the document's normalized token sequence.
    pub fn doc_len(&self, doc_id: DocId) -> Option<usize> {
        self.doc_lengths.get(&doc_id).copied()
    }

    pub fn contains_doc(&self, doc_id: DocId) -> bool {
        self.doc_lengths.contains_key(&doc_id)
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.doc_lengths.keys().copied()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.frequency.keys().map(String::as_str)
    }

    pub fn num_docs(&self) -> usize { self.doc_lengths.len() }

    pub fn num_terms(&self) -> usize { self.frequency.len() }

    pub fn is_empty(&self) -> bool { self.doc_lengths.is_empty() }
}
