//! Descriptive statistics over post metadata: tags, answer coverage and
//! question lengths.

use crate::index::DocId;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostKind {
    Question,
    Answer,
    /// Any other `PostTypeId` (wiki excerpts, moderator nominations, ...).
    Other(u32),
}

impl PostKind {
    pub fn from_type_id(type_id: u32) -> Self {
        match type_id {
            1 => Self::Question,
            2 => Self::Answer,
            other => Self::Other(other),
        }
    }
}

/// Metadata of one post row, with word counts of its visible title and body.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: DocId,
    pub kind: PostKind,
    pub parent_id: Option<DocId>,
    pub tags: Vec<String>,
    pub answer_count: Option<u32>,
    pub accepted_answer_id: Option<DocId>,
    pub title_words: usize,
    pub body_words: usize,
}

/// Split a `Tags` attribute. Both `|a|b|` and the older `<a><b>` forms are accepted.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(['|', '<', '>'])
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCounts {
    pub top: Vec<(String, u64)>,
    /// Occurrences of every tag outside `top`.
    pub other: u64,
    pub total: u64,
}

/// The `n` most used tags across questions, ties by tag name.
pub fn top_tags(posts: &[PostRecord], n: usize) -> TagCounts {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for post in posts.iter().filter(|p| p.kind == PostKind::Question) {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    let total: u64 = counts.values().sum();
    let mut top: Vec<(String, u64)> = counts.into_iter().map(|(t, c)| (t.to_string(), c)).collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(n);
    let other = total - top.iter().map(|(_, c)| c).sum::<u64>();
    TagCounts { top, other, total }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LengthProfile {
    pub questions: usize,
    pub mean_body_words: f64,
    pub mean_title_words: f64,
    pub mean_tags: f64,
}

impl LengthProfile {
    fn of(questions: &[&PostRecord]) -> Self {
        if questions.is_empty() {
            return Self::default();
        }
        Self {
            questions: questions.len(),
            mean_body_words: mean_of(questions, |q| q.body_words),
            mean_title_words: mean_of(questions, |q| q.title_words),
            mean_tags: mean_of(questions, |q| q.tags.len()),
        }
    }
}

fn mean_of(posts: &[&PostRecord], f: impl Fn(&PostRecord) -> usize) -> f64 {
    posts.iter().map(|p| f(p)).sum::<usize>() as f64 / posts.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerStats {
    pub questions: usize,
    pub answers: usize,
    /// Mean answer count over questions with at least one answer.
    pub mean_answers_per_answered_question: f64,
    pub mean_answers_per_question: f64,
    pub questions_without_answers: usize,
    pub questions_with_accepted_answer: usize,
    pub mean_answer_body_words: f64,
    pub answered: LengthProfile,
    pub unanswered: LengthProfile,
}

/// Answer coverage of the questions in `posts`.
///
/// A question's answer count is its `AnswerCount` attribute when present,
/// otherwise the number of loaded answers whose `ParentId` points at it.
pub fn answer_stats(posts: &[PostRecord]) -> AnswerStats {
    let mut loaded_answers: HashMap<DocId, u32> = HashMap::new();
    let answers: Vec<&PostRecord> = posts.iter().filter(|p| p.kind == PostKind::Answer).collect();
    for answer in &answers {
        if let Some(parent) = answer.parent_id {
            *loaded_answers.entry(parent).or_insert(0) += 1;
        }
    }

    let questions: Vec<&PostRecord> = posts.iter().filter(|p| p.kind == PostKind::Question).collect();
    let answer_counts: Vec<u32> = questions
        .iter()
        .map(|q| q.answer_count.unwrap_or_else(|| loaded_answers.get(&q.id).copied().unwrap_or(0)))
        .collect();

    let (answered, unanswered): (Vec<(&PostRecord, u32)>, Vec<(&PostRecord, u32)>) = questions
        .iter()
        .copied()
        .zip(answer_counts.iter().copied())
        .partition(|(_, n)| *n > 0);

    let answered_total: u64 = answered.iter().map(|(_, n)| *n as u64).sum();
    let ratio = |num: f64, den: usize| if den == 0 { 0.0 } else { num / den as f64 };
    let answer_words: usize = answers.iter().map(|a| a.body_words).sum();

    AnswerStats {
        questions: questions.len(),
        answers: answers.len(),
        mean_answers_per_answered_question: ratio(answered_total as f64, answered.len()),
        mean_answers_per_question: ratio(answered_total as f64, questions.len()),
        questions_without_answers: unanswered.len(),
        questions_with_accepted_answer: questions.iter().filter(|q| q.accepted_answer_id.is_some()).count(),
        mean_answer_body_words: ratio(answer_words as f64, answers.len()),
        answered: LengthProfile::of(&answered.iter().map(|(q, _)| *q).collect::<Vec<_>>()),
        unanswered: LengthProfile::of(&unanswered.iter().map(|(q, _)| *q).collect::<Vec<_>>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: DocId, tags: &str, answer_count: Option<u32>, body_words: usize) -> PostRecord {
        PostRecord {
            id,
            kind: PostKind::Question,
            parent_id: None,
            tags: parse_tags(tags),
            answer_count,
            accepted_answer_id: None,
            title_words: 4,
            body_words,
        }
    }

    fn answer(id: DocId, parent: DocId, body_words: usize) -> PostRecord {
        PostRecord {
            id,
            kind: PostKind::Answer,
            parent_id: Some(parent),
            tags: vec![],
            answer_count: None,
            accepted_answer_id: None,
            title_words: 0,
            body_words,
        }
    }

    #[test]
    fn tags_in_both_formats() {
        assert_eq!(parse_tags("|elden-ring|pc|"), vec!["elden-ring", "pc"]);
        assert_eq!(parse_tags("<skyrim><mods>"), vec!["skyrim", "mods"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn top_tags_with_other_bucket() {
        let posts = vec![
            question(1, "|elden-ring|pc|", None, 10),
            question(2, "|elden-ring|ps5|", None, 10),
            question(3, "|sekiro|pc|", None, 10),
            answer(4, 1, 5),
        ];
        let tags = top_tags(&posts, 2);
        assert_eq!(tags.top, vec![("elden-ring".to_string(), 2), ("pc".to_string(), 2)]);
        assert_eq!(tags.other, 2);
        assert_eq!(tags.total, 6);
    }

    #[test]
    fn answer_coverage_counts_loaded_answers() {
        let mut accepted = question(1, "|pc|", None, 30);
        accepted.accepted_answer_id = Some(10);
        let posts = vec![
            accepted,
            question(2, "|pc|ps4|", None, 10),
            question(3, "", None, 20),
            answer(10, 1, 8),
            answer(11, 1, 12),
            answer(12, 3, 4),
        ];
        let stats = answer_stats(&posts);
        assert_eq!(stats.questions, 3);
        assert_eq!(stats.answers, 3);
        assert_eq!(stats.questions_without_answers, 1);
        assert_eq!(stats.questions_with_accepted_answer, 1);
        assert!((stats.mean_answers_per_answered_question - 1.5).abs() < 1e-12);
        assert!((stats.mean_answers_per_question - 1.0).abs() < 1e-12);
        assert!((stats.mean_answer_body_words - 8.0).abs() < 1e-12);
        assert_eq!(stats.answered.questions, 2);
        assert!((stats.answered.mean_body_words - 25.0).abs() < 1e-12);
        assert!((stats.unanswered.mean_body_words - 10.0).abs() < 1e-12);
        assert!((stats.unanswered.mean_tags - 2.0).abs() < 1e-12);
    }

    #[test]
    fn answer_count_attribute_takes_precedence() {
        let posts = vec![question(1, "", Some(4), 10), question(2, "", Some(0), 10), answer(3, 2, 1)];
        let stats = answer_stats(&posts);
        assert_eq!(stats.questions_without_answers, 1);
        assert!((stats.mean_answers_per_answered_question - 4.0).abs() < 1e-12);
    }

    #[test]
    fn no_posts() {
        let stats = answer_stats(&[]);
        assert_eq!(stats.questions, 0);
        assert_eq!(stats.mean_answers_per_question, 0.0);
        assert_eq!(stats.answered, LengthProfile::default());
        assert_eq!(top_tags(&[], 10).total, 0);
    }
}
