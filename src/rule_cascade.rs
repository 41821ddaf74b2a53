//! The rule-ordered cascade (§4.2): recursively carves one separator-free
//! chunk into typed tokens by walking the active language's ordered rule
//! list and recursing into the winning rule's prefix/groups/suffix.
//!
//! Grounded on `TokenizerClass::tokenizeWord()` in
//! `examples/original_source/src/tokenize.cxx` (lines ~3109-3330): the
//! single-codepoint fast path, the `tokenize_word` gate on punctuation/
//! digit/quote/emoticon content, first-rule-wins iteration via
//! `rule->matchAll()`, and the recursive `assigned_type` carry.

use crate::settings::Setting;
use crate::token::{
    Token, TYPE_CURRENCY, TYPE_EMOTICON, TYPE_NUMBER, TYPE_PICTOGRAM, TYPE_PUNCTUATION,
    TYPE_SYMBOL, TYPE_UNKNOWN, TYPE_WORD,
};
use crate::unicode_util::{char_class, CharClass};
use std::collections::HashSet;

/// Runtime flags that affect token emission but not classification itself:
/// the normalize-set, punctuation dropping, and case folding switches from
/// the CLI surface (§6.2).
#[derive(Debug, Clone, Default)]
pub struct TokenizeMode {
    pub norm_set: HashSet<String>,
    pub punct_filter: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    /// The literal that forces an end-of-utterance boundary (default `<utt>`).
    pub utt_mark: String,
}

impl TokenizeMode {
    pub fn new() -> Self {
        Self {
            utt_mark: "<utt>".to_string(),
            ..Default::default()
        }
    }
}

fn classify_single(c: char) -> &'static str {
    match char_class(c) {
        CharClass::Word => TYPE_WORD,
        CharClass::Number => TYPE_NUMBER,
        CharClass::Punctuation => TYPE_PUNCTUATION,
        CharClass::Currency => TYPE_CURRENCY,
        CharClass::Symbol => TYPE_SYMBOL,
        CharClass::Emoticon => TYPE_EMOTICON,
        CharClass::Pictogram => TYPE_PICTOGRAM,
        CharClass::Unknown => TYPE_UNKNOWN,
    }
}

fn needs_word_tokenize(c: char) -> bool {
    matches!(
        char_class(c),
        CharClass::Punctuation | CharClass::Number | CharClass::Currency | CharClass::Emoticon | CharClass::Pictogram
    ) || crate::unicode_util::is_quote_char(c)
}

fn apply_case(mode: &TokenizeMode, text: &str) -> String {
    if mode.lowercase {
        text.to_lowercase()
    } else if mode.uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

fn emit_token(out: &mut Vec<Token>, mode: &TokenizeMode, language: &str, kind: &str, text: &str) {
    if mode.punct_filter
        && matches!(kind, TYPE_PUNCTUATION | TYPE_CURRENCY | TYPE_EMOTICON | TYPE_PICTOGRAM)
    {
        if let Some(prev) = out.last_mut() {
            prev.role.remove(crate::token::TokenRole::NOSPACE);
        }
        return;
    }

    let final_text = if mode.norm_set.contains(kind) {
        format!("{{{{{}}}}}", kind)
    } else {
        apply_case(mode, text)
    };

    out.push(Token::new(kind, final_text).with_language(language));
}

/// Recursively classify `chunk` (which is known to contain no separator
/// characters) and push the resulting tokens onto `out`. `assigned_type`
/// carries a parent rule's name down into prefix/suffix/group recursion.
fn emit_chunk(
    setting: &Setting,
    chunk: &str,
    language: &str,
    mode: &TokenizeMode,
    assigned_type: Option<&str>,
    out: &mut Vec<Token>,
) {
    if chunk.is_empty() {
        return;
    }

    let mut chars = chunk.chars();
    let first = chars.next().unwrap();
    if chars.next().is_none() {
        let kind = assigned_type.unwrap_or_else(|| classify_single(first)).to_string();
        emit_token(out, mode, language, &kind, chunk);
        return;
    }

    let tokenize_word = chunk.chars().any(needs_word_tokenize);
    if !tokenize_word {
        let kind = assigned_type.unwrap_or(TYPE_WORD).to_string();
        emit_token(out, mode, language, &kind, chunk);
        return;
    }

    for rule in &setting.rules {
        let Some(m) = rule.match_all(chunk) else {
            continue;
        };

        if !m.prefix.is_empty() {
            emit_chunk(setting, m.prefix, language, mode, assigned_type, out);
        }

        for group in &m.groups {
            if group.is_empty() {
                continue;
            }
            let emit_atomically_as_assigned =
                m.prefix.is_empty() && m.suffix.is_empty() && assigned_type.is_some();
            if emit_atomically_as_assigned {
                let kind = assigned_type.unwrap().to_string();
                emit_token(out, mode, language, &kind, group);
            } else if rule.id == TYPE_WORD {
                emit_token(out, mode, language, TYPE_WORD, group);
            } else {
                emit_chunk(setting, group, language, mode, Some(rule.id.as_str()), out);
            }
        }

        if !m.suffix.is_empty() {
            emit_chunk(setting, m.suffix, language, mode, assigned_type, out);
        }
        return;
    }

    // No rule matched: emit as a single token.
    let kind = assigned_type.unwrap_or(TYPE_WORD).to_string();
    emit_token(out, mode, language, &kind, chunk);
}

/// The maximum chunk length (in codepoints) the cascade will attempt before
/// giving up and emitting the remainder verbatim with a logged warning.
const MAX_CHUNK_LEN: usize = 2_500;

/// Entry point for one separator-free chunk (§4.2 steps 2-6): splits on any
/// occurrence of the utterance marker, then runs the recursive rule cascade
/// on each resulting piece, and finally marks every emitted token but the
/// last with `NOSPACE` since nothing inside this chunk was separated by
/// whitespace in the source.
pub fn tokenize_chunk(setting: &Setting, chunk: &str, language: &str, mode: &TokenizeMode, out: &mut Vec<Token>) {
    let start = out.len();
    tokenize_chunk_inner(setting, chunk, language, mode, out);
    if out.len() > start + 1 {
        for tok in &mut out[start..out.len() - 1] {
            tok.role.insert(crate::token::TokenRole::NOSPACE);
        }
    }
}

fn tokenize_chunk_inner(setting: &Setting, chunk: &str, language: &str, mode: &TokenizeMode, out: &mut Vec<Token>) {
    if !mode.utt_mark.is_empty() {
        if let Some(pos) = chunk.find(mode.utt_mark.as_str()) {
            let (before, after) = chunk.split_at(pos);
            let after = &after[mode.utt_mark.len()..];
            if !before.is_empty() {
                tokenize_chunk_inner(setting, before, language, mode, out);
            }
            if let Some(last) = out.last_mut() {
                last.role.insert(crate::token::TokenRole::END_SENT);
            }
            let next_start = out.len();
            if !after.is_empty() {
                tokenize_chunk_inner(setting, after, language, mode, out);
            }
            if let Some(next) = out.get_mut(next_start) {
                next.role.insert(crate::token::TokenRole::BEGIN_SENT);
            }
            return;
        }
    }

    if chunk.chars().count() > MAX_CHUNK_LEN {
        log::warn!(
            "chunk of {} codepoints exceeds the {}-codepoint limit, emitting verbatim",
            chunk.chars().count(),
            MAX_CHUNK_LEN
        );
        emit_token(out, mode, language, TYPE_WORD, chunk);
        return;
    }

    emit_chunk(setting, chunk, language, mode, None, out);
}
