use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "i","me","my","myself","we","our","ours","ourselves","you","your","yours","yourself","yourselves",
            "he","him","his","himself","she","her","hers","herself","it","its","itself","they","them","their",
            "theirs","themselves","what","which","who","whom","this","that","these","those","am","is","are",
            "was","were","be","been","being","have","has","had","having","do","does","did","doing","a","an",
            "the","and","but","if","or","because","as","until","while","of","at","by","for","with","about",
            "against","between","into","through","during","before","after","above","below","to","from","up",
            "down","in","out","on","off","over","under","again","further","then","once","here","there","when",
            "where","why","how","all","any","both","each","few","more","most","other","some","such","no","nor",
            "not","only","own","same","so","than","too","very","s","t","can","will","just","don","should","now"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Replace every `<...>` tag with a single space.
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, " ").into_owned()
}

/// Normalize text into index tokens: lowercase, strip tags, delete ASCII
/// punctuation, split on whitespace, then keep purely alphabetic non-stopwords.
///
/// Punctuation is removed rather than replaced, so `don't` becomes `dont`.
pub fn normalize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let untagged = strip_html(&lowered);
    let cleaned: String = untagged.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().all(char::is_alphabetic))
        .filter(|w| !is_stopword(w))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = normalize("Cats, and DOGS!");
        assert_eq!(t, vec!["cats", "dogs"]);
    }

    #[test]
    fn punctuation_is_deleted_not_split() {
        assert_eq!(normalize("e-mail don't"), vec!["email", "dont"]);
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert!(normalize("").is_empty());
        assert!(normalize("?!... --- ;;").is_empty());
    }

    #[test]
    fn stopword_list_is_closed() {
        assert!(is_stopword("the"));
        assert!(is_stopword("don"));
        assert!(!is_stopword("playstation"));
        assert_eq!(STOPWORDS.len(), 127);
    }
}
