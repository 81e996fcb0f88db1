use stackir_core::tokenizer::normalize;

#[test]
fn it_lowercases_and_strips_html() {
    let words = normalize("<p>Downloading <b>PlayStation</b> games</p>");
    assert_eq!(words, vec!["downloading", "playstation", "games"]);
}

#[test]
fn it_filters_stopwords() {
    let words = normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_drops_digits_and_alphanumerics() {
    let words = normalize("GTA5 on XBOX360 from 2013 works");
    assert_eq!(words, vec!["works"]);
}

#[test]
fn it_keeps_unicode_letters() {
    let words = normalize("Café Ωmega");
    assert_eq!(words, vec!["café", "ωmega"]);
}
