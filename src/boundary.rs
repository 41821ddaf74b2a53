//! Sentence and paragraph boundary detection (§4.3): walks a freshly
//! appended tail of the token buffer, assigning `END_SENT`/`BEGIN_SENT`
//! from the end-of-sentence marker set, quote state, and next-token casing,
//! then exposes sentence counting and popping over the whole buffer.
//!
//! Grounded on `detectEos()`, `detectSentenceBounds()`, `countSentences()`
//! and `popSentence()` in `examples/original_source/src/tokenize.cxx`.

use crate::quote::detect_quote_bounds;
use crate::settings::Setting;
use crate::token::{Token, TokenRole, TYPE_PUNCTUATION};
use crate::unicode_util::{is_quote_char, is_upper_or_title};

fn detect_eos(tokens: &[Token], i: usize, setting: &Setting) -> bool {
    let Some(first) = tokens[i].first_char() else {
        return false;
    };
    if first != '.' && !setting.eos_markers.contains(&first) {
        return false;
    }
    if i + 1 >= tokens.len() {
        return true;
    }
    let Some(next_char) = tokens[i + 1].first_char() else {
        return false;
    };
    if is_quote_char(next_char) {
        return true;
    }
    is_upper_or_title(next_char)
}

fn is_closing_bracket(text: &str) -> bool {
    matches!(text, ")" | "}" | "]" | ">")
}

/// Scan `tokens[start..]`, assigning sentence/quote boundary roles in place.
pub fn detect_sentence_bounds(
    setting: &mut Setting,
    tokens: &mut Vec<Token>,
    start: usize,
    quote_detection: bool,
    sentence_per_line_input: bool,
) {
    let mut i = start;
    while i < tokens.len() {
        if tokens[i].kind.starts_with(TYPE_PUNCTUATION) {
            let is_eos = !sentence_per_line_input && detect_eos(tokens, i, setting);

            if is_eos {
                if quote_detection && !setting.quotes.stack_is_empty() {
                    tokens[i].role.insert(TokenRole::TEMP_END_SENT);
                    if i > 0 {
                        tokens[i - 1].role.remove(TokenRole::TEMP_END_SENT);
                    }
                } else {
                    tokens[i].role.insert(TokenRole::END_SENT);
                    if i + 1 < tokens.len() {
                        tokens[i + 1].role.insert(TokenRole::BEGIN_SENT);
                    }
                    if i > 0
                        && tokens[i - 1].role.contains(TokenRole::END_SENT)
                        && !tokens[i - 1].role.contains(TokenRole::BEGIN_SENT)
                    {
                        tokens[i - 1].role.remove(TokenRole::END_SENT);
                        tokens[i].role.remove(TokenRole::BEGIN_SENT);
                    }
                }
            }

            if i > 0 && is_closing_bracket(&tokens[i].text) {
                let prev_pure_end = tokens[i - 1].role.contains(TokenRole::END_SENT)
                    && !tokens[i - 1].role.contains(TokenRole::BEGIN_SENT);
                if prev_pure_end {
                    tokens[i - 1].role.remove(TokenRole::END_SENT);
                    tokens[i].role.insert(TokenRole::END_SENT);
                }
            }

            if quote_detection {
                detect_quote_bounds(setting, tokens, i);
            }
        }
        i += 1;
    }

    strip_trailing_punctuation_artifacts(tokens, start);
}

/// Post-pass: walking backward from the buffer end while tokens remain
/// punctuation, strip `BEGIN_SENT` unconditionally and strip `END_SENT`
/// unless the token opens a quote or is the very last token in the buffer.
fn strip_trailing_punctuation_artifacts(tokens: &mut [Token], floor: usize) {
    let last_index = tokens.len().saturating_sub(1);
    let mut j = tokens.len();
    while j > floor {
        j -= 1;
        if !tokens[j].kind.starts_with(TYPE_PUNCTUATION) {
            break;
        }
        tokens[j].role.remove(TokenRole::BEGIN_SENT);
        if !(tokens[j].role.contains(TokenRole::BEGIN_QUOTE) || j == last_index) {
            tokens[j].role.remove(TokenRole::END_SENT);
        }
    }
}

/// Count complete sentences in the buffer, optionally forcing completion of
/// a trailing partial sentence (used at end-of-stream).
pub fn count_sentences(tokens: &mut [Token], force: bool) -> usize {
    let mut depth: i32 = 0;
    let mut count = 0;
    let mut sentence_open = false;
    let mut last_language: Option<&str> = None;

    for i in 0..tokens.len() {
        if let Some(prev_lang) = last_language {
            if prev_lang != tokens[i].language && sentence_open && depth == 0 {
                tokens[i - 1].role.insert(TokenRole::END_SENT);
            }
        }
        last_language = Some(tokens[i].language.as_str());

        if tokens[i].role.contains(TokenRole::BEGIN_QUOTE) {
            depth += 1;
        }
        if tokens[i].role.contains(TokenRole::END_QUOTE) {
            depth = (depth - 1).max(0);
        }

        if !sentence_open {
            sentence_open = true;
        }

        if depth == 0 && tokens[i].role.contains(TokenRole::END_SENT) {
            count += 1;
            sentence_open = false;
        }
    }

    if force {
        if let Some(last) = tokens.last_mut() {
            if last.role.contains(TokenRole::TEMP_END_SENT) {
                last.role.remove(TokenRole::TEMP_END_SENT);
                last.role.insert(TokenRole::END_SENT);
            }
            if !last.role.contains(TokenRole::END_SENT) {
                last.role.insert(TokenRole::END_SENT);
                count += 1;
            }
        }
    }

    count
}

/// Pop the first complete sentence (`BEGIN_SENT` at depth 0 through the next
/// `END_SENT` at depth 0, inclusive) from the front of `tokens`, if any.
pub fn pop_sentence(tokens: &mut Vec<Token>) -> Option<Vec<Token>> {
    let mut depth: i32 = 0;
    let mut begin: Option<usize> = None;

    for i in 0..tokens.len() {
        // The buffer front is always the start of the next unconsumed
        // sentence, so `begin` is unconditionally the first index visited —
        // even when that token itself opens a quote and bumps depth past 0.
        if begin.is_none() {
            begin = Some(i);
        }

        if tokens[i].role.contains(TokenRole::BEGIN_QUOTE) {
            depth += 1;
        }
        if tokens[i].role.contains(TokenRole::END_QUOTE) {
            depth = (depth - 1).max(0);
        }

        if let Some(b) = begin {
            if depth == 0 && tokens[i].role.contains(TokenRole::END_SENT) {
                let sentence = tokens.drain(b..=i).collect();
                return Some(sentence);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TYPE_PUNCTUATION, TYPE_WORD};

    fn word(text: &str) -> Token {
        Token::new(TYPE_WORD, text)
    }
    fn punct(text: &str) -> Token {
        Token::new(TYPE_PUNCTUATION, text)
    }

    #[test]
    fn period_before_uppercase_word_ends_the_sentence() {
        let mut setting = Setting::empty("default");
        let mut tokens = vec![word("Hello"), punct("."), word("World")];
        detect_sentence_bounds(&mut setting, &mut tokens, 0, false, false);
        assert!(tokens[1].role.contains(TokenRole::END_SENT));
        assert!(tokens[2].role.contains(TokenRole::BEGIN_SENT));
    }

    #[test]
    fn period_before_lowercase_word_does_not_end_the_sentence() {
        let mut setting = Setting::empty("default");
        let mut tokens = vec![word("etc"), punct("."), word("more")];
        detect_sentence_bounds(&mut setting, &mut tokens, 0, false, false);
        assert!(!tokens[1].role.contains(TokenRole::END_SENT));
    }

    #[test]
    fn final_punctuation_token_always_ends_the_sentence() {
        let mut setting = Setting::empty("default");
        let mut tokens = vec![word("Done"), punct("!")];
        detect_sentence_bounds(&mut setting, &mut tokens, 0, false, false);
        assert!(tokens[1].role.contains(TokenRole::END_SENT));
    }

    #[test]
    fn sentence_per_line_input_suppresses_eos_detection() {
        let mut setting = Setting::empty("default");
        let mut tokens = vec![word("Hello"), punct("."), word("World")];
        detect_sentence_bounds(&mut setting, &mut tokens, 0, false, true);
        assert!(!tokens[1].role.contains(TokenRole::END_SENT));
    }

    #[test]
    fn closing_bracket_absorbs_end_sent_from_its_predecessor() {
        // The "." ends a line on its own first (picking up END_SENT as the
        // last token seen so far); a lone closing bracket then arrives as
        // its own tail and absorbs that boundary backward one step.
        let mut setting = Setting::empty("default");
        let mut tokens = vec![word("Done"), punct(".")];
        detect_sentence_bounds(&mut setting, &mut tokens, 0, false, false);
        assert!(tokens[1].role.contains(TokenRole::END_SENT));

        tokens.push(punct(")"));
        detect_sentence_bounds(&mut setting, &mut tokens, 2, false, false);
        assert!(!tokens[1].role.contains(TokenRole::END_SENT));
        assert!(tokens[2].role.contains(TokenRole::END_SENT));
    }

    #[test]
    fn trailing_punctuation_run_does_not_open_an_empty_sentence() {
        let mut setting = Setting::empty("default");
        let mut tokens = vec![word("Hello"), punct("."), punct("!")];
        detect_sentence_bounds(&mut setting, &mut tokens, 0, false, false);
        assert!(!tokens[1].role.contains(TokenRole::BEGIN_SENT));
    }

    #[test]
    fn count_sentences_counts_completed_runs_at_depth_zero() {
        let mut tokens = vec![
            word("A").with_role(TokenRole::BEGIN_SENT | TokenRole::END_SENT),
            word("B").with_role(TokenRole::BEGIN_SENT | TokenRole::END_SENT),
        ];
        assert_eq!(count_sentences(&mut tokens, false), 2);
    }

    #[test]
    fn count_sentences_force_closes_a_trailing_partial_run() {
        let mut tokens = vec![word("A").with_role(TokenRole::BEGIN_SENT)];
        assert_eq!(count_sentences(&mut tokens, true), 1);
        assert!(tokens[0].role.contains(TokenRole::END_SENT));
    }

    #[test]
    fn pop_sentence_drains_exactly_one_complete_sentence() {
        let mut tokens = vec![
            word("A").with_role(TokenRole::BEGIN_SENT | TokenRole::END_SENT),
            word("B").with_role(TokenRole::BEGIN_SENT | TokenRole::END_SENT),
        ];
        let first = pop_sentence(&mut tokens).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].text, "A");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "B");
    }

    #[test]
    fn pop_sentence_skips_over_a_nested_quote_at_depth_zero() {
        let mut tokens = vec![
            word("A").with_role(TokenRole::BEGIN_SENT),
            punct("\"").with_role(TokenRole::BEGIN_QUOTE),
            word("B").with_role(TokenRole::END_SENT),
            punct("\"").with_role(TokenRole::END_QUOTE),
            word("C").with_role(TokenRole::END_SENT),
        ];
        let sentence = pop_sentence(&mut tokens).unwrap();
        assert_eq!(sentence.len(), 5);
        assert!(tokens.is_empty());
    }
}
