//! The pass-through tokenizer (§4.7): skips the rule cascade entirely and
//! classifies each separator-delimited chunk by character category alone.
//!
//! Grounded on the `--passthru`/`passThru` short-circuit in
//! `examples/original_source/src/tokenize.cxx`'s `tokenizeLine`.

use crate::rule_cascade::TokenizeMode;
use crate::token::{Token, TokenRole, LANG_DEFAULT, TYPE_NUMBER, TYPE_PUNCTUATION, TYPE_UNKNOWN, TYPE_WORD};
use crate::unicode_util::{char_class, CharClass};

fn classify_chunk(chunk: &str) -> &'static str {
    let mut all_letters = true;
    let mut all_digits = true;
    let mut all_punct = true;
    for c in chunk.chars() {
        match char_class(c) {
            CharClass::Word => {
                all_digits = false;
                all_punct = false;
            }
            CharClass::Number => {
                all_letters = false;
                all_punct = false;
            }
            CharClass::Punctuation => {
                all_letters = false;
                all_digits = false;
            }
            _ => {
                all_letters = false;
                all_digits = false;
                all_punct = false;
            }
        }
    }
    if all_letters {
        TYPE_WORD
    } else if all_digits {
        TYPE_NUMBER
    } else if all_punct {
        TYPE_PUNCTUATION
    } else {
        TYPE_UNKNOWN
    }
}

/// Tokenize `chunk` (already separator-delimited, non-empty) in pass-through
/// mode and push the result onto `out`, honoring the utterance marker,
/// punctuation dropping and the normalize-set exactly as the rule cascade
/// does, but never running a single rule.
pub fn tokenize_chunk_passthrough(chunk: &str, mode: &TokenizeMode, out: &mut Vec<Token>) {
    let start = out.len();

    if !mode.utt_mark.is_empty() {
        if let Some(pos) = chunk.find(mode.utt_mark.as_str()) {
            let (before, after) = chunk.split_at(pos);
            let after = &after[mode.utt_mark.len()..];
            if !before.is_empty() {
                tokenize_chunk_passthrough(before, mode, out);
            }
            if let Some(last) = out.last_mut() {
                last.role.insert(TokenRole::END_SENT);
            }
            let next_start = out.len();
            if !after.is_empty() {
                tokenize_chunk_passthrough(after, mode, out);
            }
            if let Some(next) = out.get_mut(next_start) {
                next.role.insert(TokenRole::BEGIN_SENT);
            }
            return;
        }
    }

    let kind = classify_chunk(chunk);
    if mode.punct_filter && kind == TYPE_PUNCTUATION {
        return;
    }
    let text = if mode.norm_set.contains(kind) {
        format!("{{{{{}}}}}", kind)
    } else if mode.lowercase {
        chunk.to_lowercase()
    } else if mode.uppercase {
        chunk.to_uppercase()
    } else {
        chunk.to_string()
    };
    out.push(Token::new(kind, text).with_language(LANG_DEFAULT));

    if out.len() > start + 1 {
        for tok in &mut out[start..out.len() - 1] {
            tok.role.insert(TokenRole::NOSPACE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(chunk: &str, mode: &TokenizeMode) -> Vec<Token> {
        let mut out = Vec::new();
        tokenize_chunk_passthrough(chunk, mode, &mut out);
        out
    }

    #[test]
    fn all_letter_chunk_classifies_as_word() {
        let mode = TokenizeMode::new();
        let tokens = run("hello", &mode);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TYPE_WORD);
        assert_eq!(tokens[0].text, "hello");
    }

    #[test]
    fn all_digit_chunk_classifies_as_number() {
        let mode = TokenizeMode::new();
        let tokens = run("12345", &mode);
        assert_eq!(tokens[0].kind, TYPE_NUMBER);
    }

    #[test]
    fn all_punctuation_chunk_classifies_as_punctuation() {
        let mode = TokenizeMode::new();
        let tokens = run("!?!", &mode);
        assert_eq!(tokens[0].kind, TYPE_PUNCTUATION);
    }

    #[test]
    fn mixed_content_chunk_classifies_as_unknown() {
        let mode = TokenizeMode::new();
        let tokens = run("abc123", &mode);
        assert_eq!(tokens[0].kind, TYPE_UNKNOWN);
    }

    #[test]
    fn chunk_is_never_split_on_internal_boundaries() {
        // Unlike the rule cascade, pass-through mode classifies the whole
        // separator-delimited chunk as one token regardless of content mix.
        let mode = TokenizeMode::new();
        let tokens = run("hi!", &mode);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "hi!");
    }

    #[test]
    fn utterance_marker_still_splits_and_marks_sentence_boundaries() {
        let mode = TokenizeMode::new();
        let tokens = run("a<utt>b", &mode);
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].role.contains(TokenRole::END_SENT));
        assert!(tokens[1].role.contains(TokenRole::BEGIN_SENT));
    }

    #[test]
    fn punct_filter_drops_a_pure_punctuation_chunk() {
        let mut mode = TokenizeMode::new();
        mode.punct_filter = true;
        let tokens = run("!!!", &mode);
        assert!(tokens.is_empty());
    }

    #[test]
    fn normalize_set_replaces_text_with_type_placeholder() {
        let mut mode = TokenizeMode::new();
        mode.norm_set.insert(TYPE_NUMBER.to_string());
        let tokens = run("42", &mode);
        assert_eq!(tokens[0].text, "{{NUMBER}}");
    }

    #[test]
    fn lowercase_mode_folds_case() {
        let mut mode = TokenizeMode::new();
        mode.lowercase = true;
        let tokens = run("HELLO", &mode);
        assert_eq!(tokens[0].text, "hello");
    }
}
