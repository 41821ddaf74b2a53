//! A rule-driven, Unicode-aware tokenizer and sentence splitter.
//!
//! # Overview
//! Given a stream of text, this library produces a sequence of typed tokens
//! grouped into sentences and paragraphs. Each token carries a type tag
//! (`WORD`, `NUMBER`, `PUNCTUATION`, or a user-defined rule name), its
//! literal text, a bitset of structural roles (beginning/end of sentence,
//! quoted, adjacent to no whitespace, new paragraph), and a language code.
//!
//! # Design
//! Tokenization is driven entirely by a loaded [`Setting`](settings::Setting):
//! an ordered list of named regex [`Rule`](settings::Rule)s, a set of
//! end-of-sentence markers, a pair of quote classes, and a character filter.
//! The [`Tokenizer`] applies the rule cascade recursively to each
//! separator-delimited chunk of a line — first match wins, and the winning
//! rule's prefix, capture groups and suffix are each re-examined against the
//! same cascade — then runs a sentence/paragraph boundary pass and a quote
//! resolution pass over the newly produced tokens.
//!
//! Multiple languages can be loaded into one [`Tokenizer`]; an optional
//! [`LanguageDetector`](language::LanguageDetector) adapter lets the
//! dispatcher classify and even split a single line across languages before
//! handing each span to its own [`Setting`].
//!
//! # Example
//! ```
//! use lexcascade::{settings, Tokenizer};
//!
//! let text = "\
//! [RULES]
//! URL=^(https?://\\S+)
//!
//! [RULE-ORDER]
//! URL
//! ";
//! let setting = settings::load_str("default", text).unwrap();
//! let mut tokenizer = Tokenizer::new(setting);
//! tokenizer.tokenize_line("Hello world", None).unwrap();
//! let sentences = tokenizer.get_sentences();
//! assert_eq!(sentences.len(), 1);
//! assert_eq!(sentences[0][0].text, "Hello");
//! assert_eq!(sentences[0][1].text, "world");
//! ```
//!
//! # License
//! [lexcascade](crate) is provided under the MIT license. See
//! [LICENSE](https://github.com/creative-forest/lexcascade/blob/main/LICENSE).

mod boundary;
pub mod doc_trait;
pub mod error;
pub mod language;
mod passthrough;
mod quote;
mod rule_cascade;
pub mod settings;
pub mod token;
mod tokenizer;
pub mod unicode_util;

pub use doc_trait::{TextBearingDocument, TextNodeRef, TextRedundancy};
pub use error::{ConfigError, TokenizerError};
pub use language::{LanguageDetector, TrigramDetector};
pub use rule_cascade::TokenizeMode;
pub use settings::Setting;
pub use token::{Token, TokenRole};
pub use tokenizer::Tokenizer;
