//! The quote state machine (§4.4): tracks open quote characters across the
//! token buffer and resolves a pair once its closing character is seen.
//!
//! Grounded on `Quoting`/`TokenizerClass::resolveQuote()` /
//! `detectQuoteBounds()` in `examples/original_source/include/ucto/setting.h`
//! and `examples/original_source/src/tokenize.cxx`.

use crate::settings::Setting;
use crate::token::{Token, TokenRole};

/// Inspect token `i`'s leading character against the active language's
/// registered quote pairs, pushing a new open quote or attempting to resolve
/// an existing one against the quote stack. A close character whose match
/// cannot be resolved (unbalanced sentences or sub-quotes between the pair)
/// is left on the stack untouched, to be cleaned up later by `flush_stack`.
pub fn detect_quote_bounds(setting: &mut Setting, tokens: &mut [Token], i: usize) {
    let Some(c) = tokens[i].first_char() else {
        return;
    };
    let is_open = setting.quotes.lookup_open(c);
    let is_close = setting.quotes.lookup_close(c);
    if !is_open && !is_close {
        return;
    }

    if is_close {
        if let Some(pos) = setting.quotes.find_matching(c) {
            let open = setting.quotes.peek_at(pos);
            if resolve_quote(tokens, open.token_index, i) {
                setting.quotes.resolve_at(pos);
            }
            return;
        }
    }
    if is_open {
        setting.quotes.push(i, c);
    }
}

/// Try to close the quote spanning `[begin, end]`.
///
/// Mirrors `expectingend`/`subquote` in `resolveQuote()`
/// (`examples/original_source/src/tokenize.cxx:2269-2373`): walks the tokens
/// strictly between the pair, tracking the sentence-boundary balance
/// (`expecting_end`) at sub-quote depth zero (`subquote`), and promoting any
/// `TEMP_END_SENT` found along the way to `END_SENT` (with `BEGIN_SENT` on
/// whatever starts the next contained sentence). Returns `true` and marks
/// `BEGIN_QUOTE`/`END_QUOTE` only when the span turned out balanced, or
/// unbalanced by exactly one missing trailing `END_SENT` (which is then
/// synthesized on the token just before `end`); otherwise returns `false`
/// without touching either token's role, so the caller leaves the open
/// entry on the stack rather than discarding it.
fn resolve_quote(tokens: &mut [Token], begin: usize, end: usize) -> bool {
    let mut expecting_end: i32 = 0;
    let mut subquote: i32 = 0;
    let mut begin_sentence = begin + 1;

    for i in begin + 1..end {
        if tokens[i].role.contains(TokenRole::BEGIN_QUOTE) {
            subquote += 1;
        }

        if subquote == 0 {
            if tokens[i].role.contains(TokenRole::BEGIN_SENT) {
                expecting_end += 1;
            }
            if tokens[i].role.contains(TokenRole::END_SENT) {
                expecting_end -= 1;
            }
            if tokens[i].role.contains(TokenRole::TEMP_END_SENT) {
                tokens[i].role.remove(TokenRole::TEMP_END_SENT);
                tokens[i].role.insert(TokenRole::END_SENT);
                tokens[begin_sentence].role.insert(TokenRole::BEGIN_SENT);
                begin_sentence = i + 1;
            }
        } else if tokens[i].role.contains(TokenRole::END_QUOTE) && tokens[i].role.contains(TokenRole::END_SENT) {
            tokens[begin_sentence].role.insert(TokenRole::BEGIN_SENT);
            begin_sentence = i + 1;
        }

        if tokens[i].role.contains(TokenRole::END_QUOTE) {
            subquote -= 1;
        }
    }

    let resolved = if expecting_end == 0 && subquote == 0 {
        true
    } else if expecting_end == 1 && subquote == 0 && !tokens[end - 1].role.contains(TokenRole::END_SENT) {
        tokens[end - 1].role.insert(TokenRole::END_SENT);
        true
    } else {
        false
    };

    if !resolved {
        return false;
    }

    tokens[begin].role.insert(TokenRole::BEGIN_QUOTE);
    tokens[end].role.insert(TokenRole::END_QUOTE);

    if tokens[end - 1].role.contains(TokenRole::END_SENT)
        && end + 1 < tokens.len()
        && tokens[end + 1].role.contains(TokenRole::BEGIN_SENT)
    {
        tokens[end].role.insert(TokenRole::END_SENT);
    }
    true
}
