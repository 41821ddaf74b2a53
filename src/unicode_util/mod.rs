//! Unicode collaborators consumed by the tokenization core: normalization,
//! general-category/block classification, per-language character filtering,
//! and byte-order-mark sniffing. None of this module implements tokenization
//! logic itself — it wraps external Unicode facilities the same way the
//! teacher's `util::code` module wraps raw byte/codepoint queries behind a
//! handful of small, named helpers.

mod bom;
mod charclass;
mod filter;
mod normalize;

pub use bom::strip_bom;
pub use charclass::{char_class, is_quote_char, is_upper_or_title, CharClass};
pub use filter::CharFilter;
pub use normalize::{normalize, NormalizationForm};
