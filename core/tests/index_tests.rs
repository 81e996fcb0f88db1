use stackir_core::tokenizer::normalize;
use stackir_core::{Error, InvertedIndex};

fn corpus() -> Vec<(u32, &'static str)> {
    vec![
        (3, "<p>Can I download PlayStation 3 games for my PlayStation 4?</p>"),
        (8, "Downloading games onto a PlayStation 4"),
        (21, "Witcher 3 crashes constantly, crashes every hour"),
        (40, ""),
    ]
}

#[test]
fn membership_matches_positive_frequency() {
    let index = InvertedIndex::from_texts(corpus()).unwrap();
    for term in index.terms() {
        for doc_id in index.doc_ids() {
            let in_set = index.postings(term).is_some_and(|s| s.contains(&doc_id));
            assert_eq!(in_set, index.term_frequency(term, doc_id) > 0, "{term} / {doc_id}");
        }
    }
}

#[test]
fn frequencies_sum_to_token_count() {
    let index = InvertedIndex::from_texts(corpus()).unwrap();
    for (doc_id, text) in corpus() {
        let total: u32 = index.terms().map(|t| index.term_frequency(t, doc_id)).sum();
        assert_eq!(total as usize, normalize(text).len());
    }
    assert_eq!(index.term_frequency("playstation", 3), 2);
    assert_eq!(index.term_frequency("crashes", 21), 2);
}

#[test]
fn empty_document_is_indexed_without_terms() {
    let index = InvertedIndex::from_texts(corpus()).unwrap();
    assert!(index.contains_doc(40));
    assert_eq!(index.doc_len(40), Some(0));
    assert_eq!(index.num_docs(), 4);
}

#[test]
fn rebuild_is_structurally_identical() {
    let a = InvertedIndex::from_texts(corpus()).unwrap();
    let b = InvertedIndex::from_texts(corpus()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn duplicate_document_id_is_rejected() {
    let mut docs = corpus();
    docs.push((8, "another post"));
    assert_eq!(
        InvertedIndex::from_texts(docs).unwrap_err(),
        Error::DuplicateDocumentId(8)
    );
}
