use unicode_general_category::{get_general_category, GeneralCategory};

/// The character-category classification used by §4.2 step 3 (single-code-point
/// chunks) and the pass-through tokenizer (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Word,
    Number,
    Punctuation,
    Currency,
    Symbol,
    Emoticon,
    Pictogram,
    Unknown,
}

/// Emoticons block (U+1F600-U+1F64F).
fn is_emoticon_block(c: char) -> bool {
    ('\u{1F600}'..='\u{1F64F}').contains(&c)
}

/// Miscellaneous Symbols and Pictographs block (U+1F300-U+1F5FF).
fn is_pictogram_block(c: char) -> bool {
    ('\u{1F300}'..='\u{1F5FF}').contains(&c)
}

pub fn char_class(c: char) -> CharClass {
    if is_emoticon_block(c) {
        return CharClass::Emoticon;
    }
    if is_pictogram_block(c) {
        return CharClass::Pictogram;
    }

    match get_general_category(c) {
        GeneralCategory::UppercaseLetter
        | GeneralCategory::LowercaseLetter
        | GeneralCategory::TitlecaseLetter
        | GeneralCategory::ModifierLetter
        | GeneralCategory::OtherLetter => CharClass::Word,
        GeneralCategory::DecimalNumber | GeneralCategory::LetterNumber | GeneralCategory::OtherNumber => {
            CharClass::Number
        }
        GeneralCategory::CurrencySymbol => CharClass::Currency,
        GeneralCategory::MathSymbol | GeneralCategory::ModifierSymbol | GeneralCategory::OtherSymbol => {
            CharClass::Symbol
        }
        GeneralCategory::ConnectorPunctuation
        | GeneralCategory::DashPunctuation
        | GeneralCategory::OpenPunctuation
        | GeneralCategory::ClosePunctuation
        | GeneralCategory::InitialPunctuation
        | GeneralCategory::FinalPunctuation
        | GeneralCategory::OtherPunctuation => CharClass::Punctuation,
        _ => CharClass::Unknown,
    }
}

/// True if `c`'s general category is an uppercase or titlecase letter,
/// used by the sentence boundary detector to test "does the next token look
/// like the start of a new sentence".
pub fn is_upper_or_title(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter | GeneralCategory::TitlecaseLetter
    )
}

pub fn is_quote_char(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}'
    )
}
