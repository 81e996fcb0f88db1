use stackir_core::{BooleanOperator, Error, InvertedIndex, ScoredDoc, Searcher};
use std::collections::BTreeSet;

fn pets() -> InvertedIndex {
    InvertedIndex::from_texts(vec![(1, "cats and dogs"), (2, "dogs and birds")]).unwrap()
}

fn ids(v: &[u32]) -> BTreeSet<u32> {
    v.iter().copied().collect()
}

#[test]
fn boolean_postings_for_shared_term() {
    let index = pets();
    let dogs: BTreeSet<u32> = index.postings("dogs").unwrap().iter().copied().collect();
    assert_eq!(dogs, ids(&[1, 2]));
    assert!(index.postings("and").is_none());
}

#[test]
fn and_queries() {
    let index = pets();
    let s = Searcher::new(&index);
    assert_eq!(s.boolean("dogs", BooleanOperator::And), ids(&[1, 2]));
    assert_eq!(s.boolean("cats", BooleanOperator::And), ids(&[1]));
    assert_eq!(s.boolean("cats dogs", BooleanOperator::And), ids(&[1]));
    assert_eq!(s.boolean("cats birds", BooleanOperator::And), ids(&[]));
}

#[test]
fn and_with_unseen_token_is_empty() {
    let index = pets();
    let s = Searcher::new(&index);
    assert!(s.boolean("dogs unicorns", BooleanOperator::And).is_empty());
    assert_eq!(s.boolean("dogs unicorns", BooleanOperator::Or), ids(&[1, 2]));
}

#[test]
fn or_is_union() {
    let index = pets();
    let s = Searcher::new(&index);
    assert_eq!(s.boolean("cats birds", BooleanOperator::Or), ids(&[1, 2]));
    assert_eq!(s.boolean("cats", BooleanOperator::Or), ids(&[1]));
}

#[test]
fn empty_normalized_query_matches_nothing() {
    let index = pets();
    let s = Searcher::new(&index);
    assert!(s.boolean("the and of", BooleanOperator::And).is_empty());
    assert!(s.boolean("!!!", BooleanOperator::Or).is_empty());
    assert!(s.ranked("", 10).is_empty());
}

#[test]
fn operator_given_as_text() {
    let index = pets();
    let s = Searcher::new(&index);
    assert_eq!(s.boolean_str("dogs", "and").unwrap(), ids(&[1, 2]));
    assert_eq!(
        s.boolean_str("dogs", "NOT").unwrap_err(),
        Error::InvalidOperator("NOT".into())
    );
}

#[test]
fn ranked_ties_go_to_lower_id() {
    let index = pets();
    let s = Searcher::new(&index);
    assert_eq!(s.ranked("dogs", 1), vec![ScoredDoc { doc_id: 1, score: 1 }]);
    assert_eq!(s.ranked_ids("dogs", 10), vec![1, 2]);
}

#[test]
fn ranked_single_term_scores_equal_term_frequency() {
    let index = InvertedIndex::from_texts(vec![
        (10, "sekiro deflect"),
        (11, "sekiro sekiro sekiro"),
        (12, "elden ring"),
        (13, "sekiro ending sekiro"),
    ])
    .unwrap();
    let hits = Searcher::new(&index).ranked("Sekiro?", 10);
    assert_eq!(
        hits,
        vec![
            ScoredDoc { doc_id: 11, score: 3 },
            ScoredDoc { doc_id: 13, score: 2 },
            ScoredDoc { doc_id: 10, score: 1 },
        ]
    );
    for hit in &hits {
        assert_eq!(hit.score, index.term_frequency("sekiro", hit.doc_id) as u64);
    }
}

#[test]
fn ranked_never_pads() {
    let index = pets();
    assert_eq!(Searcher::new(&index).ranked("cats", 50).len(), 1);
    assert!(Searcher::new(&index).ranked("cats", 0).is_empty());
}

#[test]
fn ranked_sums_across_terms() {
    let index = InvertedIndex::from_texts(vec![
        (1, "witcher witcher crashes"),
        (2, "witcher crashes crashes crashes"),
        (3, "skyrim mods"),
    ])
    .unwrap();
    let hits = Searcher::new(&index).ranked("witcher crashes", 10);
    assert_eq!(
        hits,
        vec![ScoredDoc { doc_id: 2, score: 4 }, ScoredDoc { doc_id: 1, score: 3 }]
    );
}
