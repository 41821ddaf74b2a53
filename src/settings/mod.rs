//! The per-language configuration compiled from a settings file: the rule
//! cascade, quote pairs, end-of-sentence markers and the character filter.

mod loader;

pub use loader::{load_str, SettingsBuilder};

use crate::error::ConfigError;
use crate::token::TYPE_PUNCTUATION;
use crate::unicode_util::CharFilter;
use regex::Regex;
use std::collections::HashSet;
use std::rc::Rc;

/// One named, compiled rule of the cascade.
///
/// Grounded on the way the teacher's `lexeme::Pattern` wraps a compiled
/// `regex` object behind a small named struct (`src/lexeme/pattern.rs`).
#[derive(Debug)]
pub struct Rule {
    pub id: String,
    pub pattern: String,
    regexp: Regex,
}

/// The result of applying a [`Rule`] to one chunk of text.
pub struct RuleMatch<'t> {
    pub prefix: &'t str,
    pub groups: Vec<&'t str>,
    pub suffix: &'t str,
}

impl Rule {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regexp = Regex::new(&pattern)?;
        Ok(Self {
            id: id.into(),
            pattern,
            regexp,
        })
    }

    /// Find the leftmost match of this rule in `chunk` and split it into the
    /// prefix before the match, the capture groups (or the whole match when
    /// the pattern declares no explicit groups), and the trailing suffix.
    pub fn match_all<'t>(&self, chunk: &'t str) -> Option<RuleMatch<'t>> {
        let caps = self.regexp.captures(chunk)?;
        let whole = caps.get(0)?;

        let groups: Vec<&'t str> = if self.regexp.captures_len() > 1 {
            (1..caps.len())
                .filter_map(|i| caps.get(i))
                .map(|m| m.as_str())
                .collect()
        } else {
            vec![whole.as_str()]
        };

        if groups.iter().all(|g| g.is_empty()) {
            return None;
        }

        Some(RuleMatch {
            prefix: &chunk[..whole.start()],
            groups,
            suffix: &chunk[whole.end()..],
        })
    }
}

/// An open/close character-class pair for quote detection.
#[derive(Debug, Clone)]
pub struct QuotePair {
    pub open: String,
    pub close: String,
}

impl QuotePair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn opens_with(&self, c: char) -> bool {
        self.open.contains(c)
    }

    pub fn closes_with(&self, c: char) -> bool {
        self.close.contains(c)
    }
}

/// One open quote on the stack, identified by the index of its opening token
/// in the tokenizer buffer and the character that opened it.
#[derive(Debug, Clone, Copy)]
pub struct OpenQuote {
    pub token_index: usize,
    pub open_char: char,
}

/// Tracks open quote pairs for one language's sentence boundary detection.
///
/// Grounded on `Quoting`/`Rule` in `examples/original_source/include/ucto/setting.h`
/// (parallel `quoteindexstack`/`quotestack` vectors collapsed here into one
/// stack of `(index, char)` pairs since no other code needs the split).
#[derive(Debug, Clone, Default)]
pub struct Quoting {
    pairs: Vec<QuotePair>,
    stack: Vec<OpenQuote>,
}

impl Quoting {
    pub fn new(pairs: Vec<QuotePair>) -> Self {
        Self {
            pairs,
            stack: Vec::new(),
        }
    }

    pub fn is_empty_pairs(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn add(&mut self, pair: QuotePair) {
        self.pairs.push(pair);
    }

    pub fn stack_is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn push(&mut self, token_index: usize, open_char: char) {
        self.stack.push(OpenQuote {
            token_index,
            open_char,
        });
    }

    /// True if `c` opens some registered pair.
    pub fn lookup_open(&self, c: char) -> bool {
        self.pairs.iter().any(|p| p.opens_with(c))
    }

    /// True if `c` closes some registered pair.
    pub fn lookup_close(&self, c: char) -> bool {
        self.pairs.iter().any(|p| p.closes_with(c))
    }

    /// Find the innermost stack entry whose opening character pairs with the
    /// closing character `c`, returning its stack position.
    pub fn find_matching(&self, c: char) -> Option<usize> {
        self.stack.iter().rposition(|entry| {
            self.pairs
                .iter()
                .any(|p| p.opens_with(entry.open_char) && p.closes_with(c))
        })
    }

    /// Look up the entry at `stack_pos` without removing it, so a caller can
    /// attempt resolution and only commit the pop once it succeeds.
    pub fn peek_at(&self, stack_pos: usize) -> OpenQuote {
        self.stack[stack_pos]
    }

    /// Remove and return the entry at `stack_pos`.
    pub fn resolve_at(&mut self, stack_pos: usize) -> OpenQuote {
        self.stack.remove(stack_pos)
    }

    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    /// Drop stack entries whose token index falls before `cutoff` (the
    /// buffer head has been drained up to `cutoff`) and rebase the rest.
    pub fn flush_stack(&mut self, cutoff: usize) {
        self.stack.retain(|entry| entry.token_index >= cutoff);
        for entry in &mut self.stack {
            entry.token_index -= cutoff;
        }
    }
}

/// The compiled configuration for one language.
pub struct Setting {
    pub language: String,
    pub rules: Vec<Rc<Rule>>,
    pub eos_markers: HashSet<char>,
    pub quotes: Quoting,
    pub filter: CharFilter,
    pub version: String,
    pub source_path: String,
}

impl Setting {
    /// A setting with no loaded rule file: just the generic punctuation
    /// peeling rules every language config normally pulls in via
    /// `%include` of a shared base file, the default EOS markers and quote
    /// pairs, and no language-specific abbreviations or multi-word units.
    pub fn empty(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            rules: builtin_rules(),
            eos_markers: ".!?".chars().collect(),
            quotes: default_quotes(),
            filter: CharFilter::default(),
            version: String::new(),
            source_path: String::new(),
        }
    }

    pub fn rule_by_name(&self, name: &str) -> Option<&Rc<Rule>> {
        self.rules.iter().find(|r| r.id == name)
    }
}

/// Peel one leading or trailing punctuation codepoint at a time. Every real
/// settings file pulls in an equivalent generic base ruleset via
/// `%include`; these two keep the zero-config path usable on their own.
fn builtin_rules() -> Vec<Rc<Rule>> {
    vec![
        Rc::new(Rule::new(TYPE_PUNCTUATION, r"^(\p{P})").expect("builtin rule compiles")),
        Rc::new(Rule::new(TYPE_PUNCTUATION, r"(\p{P})$").expect("builtin rule compiles")),
    ]
}

fn default_quotes() -> Quoting {
    Quoting::new(vec![
        QuotePair::new("\"", "\""),
        QuotePair::new("\u{2018}", "\u{2019}"),
        QuotePair::new("\u{201C}\u{201E}\u{201F}", "\u{201D}"),
    ])
}

/// Load a `Setting` for a language from the contents of a settings file.
pub fn load(language: &str, source_path: &str, text: &str) -> Result<Setting, ConfigError> {
    SettingsBuilder::new(language, source_path).parse(text)
}
