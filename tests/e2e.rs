//! End-to-end scenarios built directly from small in-memory settings
//! strings, exercising the public [`Tokenizer`] surface the way a caller
//! actually would rather than any one internal module in isolation.

use lexcascade::settings::load_str;
use lexcascade::token::{TYPE_NUMBER, TYPE_PUNCTUATION, TYPE_WORD};
use lexcascade::{Setting, Tokenizer, TokenRole};

const LANG_DEFAULT: &str = "default";

fn texts(sentence: &[lexcascade::Token]) -> Vec<&str> {
    sentence.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn e1_default_settings_split_a_greeting_into_word_and_punctuation_tokens() {
    let mut t = Tokenizer::new(Setting::empty(LANG_DEFAULT));
    t.tokenize_line("Hello, world!", Some("eng")).unwrap();
    let sentences = t.get_sentences();
    assert_eq!(sentences.len(), 1);
    let s = &sentences[0];
    assert_eq!(texts(s), vec!["Hello", ",", "world", "!"]);
    assert_eq!(s[0].kind, TYPE_WORD);
    assert!(s[0].role.contains(TokenRole::BEGIN_SENT));
    assert!(s[0].is_nospace());
    assert_eq!(s[1].kind, TYPE_PUNCTUATION);
    assert!(!s[1].is_nospace());
    assert_eq!(s[2].kind, TYPE_WORD);
    assert!(s[2].is_nospace());
    assert_eq!(s[3].kind, TYPE_PUNCTUATION);
    assert!(s[3].role.contains(TokenRole::END_SENT));
}

#[test]
fn e2_quoted_exclamation_stays_inside_one_popped_sentence() {
    let mut t = Tokenizer::new(Setting::empty(LANG_DEFAULT));
    t.set_quote_detection(true);
    t.tokenize_line("\"Go!\", she said.", Some("eng")).unwrap();
    let sentences = t.get_sentences();
    assert_eq!(sentences.len(), 1);
    let s = &sentences[0];
    assert_eq!(texts(s), vec!["\"", "Go", "!", "\"", ",", "she", "said", "."]);

    assert!(s[0].role.contains(TokenRole::BEGIN_QUOTE));
    assert!(s[0].is_nospace());

    assert!(s[2].role.contains(TokenRole::END_SENT));
    assert!(s[2].is_nospace());

    assert!(s[3].role.contains(TokenRole::END_QUOTE));

    assert!(s[6].is_nospace());
    assert!(s[7].role.contains(TokenRole::END_SENT));
}

#[test]
fn e3_sentence_per_line_input_closes_each_line_regardless_of_abbreviations() {
    let mut t = Tokenizer::new(Setting::empty(LANG_DEFAULT));
    t.set_sentence_per_line_input(true);
    t.tokenize_line("A.", None).unwrap();
    t.tokenize_line("B.", None).unwrap();
    let sentences = t.get_sentences();
    assert_eq!(sentences.len(), 2);
    assert_eq!(texts(&sentences[0]), vec!["A", "."]);
    assert!(sentences[0].last().unwrap().role.contains(TokenRole::END_SENT));
    assert_eq!(texts(&sentences[1]), vec!["B", "."]);
    assert!(sentences[1].last().unwrap().role.contains(TokenRole::END_SENT));
}

#[test]
fn e4_a_url_rule_keeps_the_whole_address_as_one_token() {
    let setting = load_str(LANG_DEFAULT, "[RULES]\nURL=^(https?://\\S+)\n").unwrap();
    let mut t = Tokenizer::new(setting);
    t.tokenize_line("http://x.y/z?a=1 more", None).unwrap();
    let sentences = t.get_sentences();
    assert_eq!(sentences.len(), 1);
    let s = &sentences[0];
    assert_eq!(texts(s), vec!["http://x.y/z?a=1", "more"]);
    assert_eq!(s[0].kind, "URL");
    assert!(!s[0].is_nospace());
    assert_eq!(s[1].kind, TYPE_WORD);
    assert!(s[1].role.contains(TokenRole::END_SENT));
}

#[test]
fn e5_a_known_abbreviation_does_not_end_the_sentence_early() {
    let text = "\
[ABBREVIATIONS]
U.S.A.

[META-RULES]
ABBREV=ABBREVIATIONS

[RULE-ORDER]
ABBREV
";
    let eng_setting = load_str("eng", text).unwrap();
    let mut t = Tokenizer::new(Setting::empty(LANG_DEFAULT));
    t.add_language("eng", eng_setting);
    t.tokenize_line("the U.S.A. thing", Some("eng")).unwrap();
    let sentences = t.get_sentences();
    assert_eq!(sentences.len(), 1);
    let s = &sentences[0];
    assert_eq!(texts(s), vec!["the", "U.S.A.", "thing"]);
    assert_eq!(s[1].kind, "ABBREV");
    assert!(!s[1].role.contains(TokenRole::END_SENT));
    assert_eq!(s[2].kind, TYPE_WORD);
    assert!(s[2].role.contains(TokenRole::END_SENT));
}

#[test]
fn e6_passthru_classifies_by_category_and_still_closes_the_sentence() {
    let mut t = Tokenizer::new(Setting::empty(LANG_DEFAULT));
    t.set_pass_through(true);
    t.tokenize_line("Hi 3 !", None).unwrap();
    let sentences = t.get_sentences();
    assert_eq!(sentences.len(), 1);
    let s = &sentences[0];
    assert_eq!(texts(s), vec!["Hi", "3", "!"]);
    assert_eq!(s[0].kind, TYPE_WORD);
    assert_eq!(s[1].kind, TYPE_NUMBER);
    assert_eq!(s[2].kind, TYPE_PUNCTUATION);
    assert!(s[2].role.contains(TokenRole::END_SENT));
}
