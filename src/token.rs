use std::fmt::{self, Display, Formatter};
use std::ops::{BitOr, BitOrAssign, BitAnd, Not};

/// Bit flags attached to every emitted [`Token`].
///
/// Mirrors the external role vocabulary (`NOSPACE`, `BEGINOFSENTENCE`, ...)
/// while keeping the short internal names used throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct TokenRole(u16);

impl TokenRole {
    pub const NONE: TokenRole = TokenRole(0);
    pub const NOSPACE: TokenRole = TokenRole(1 << 0);
    pub const BEGIN_SENT: TokenRole = TokenRole(1 << 1);
    pub const END_SENT: TokenRole = TokenRole(1 << 2);
    pub const NEW_PARAGRAPH: TokenRole = TokenRole(1 << 3);
    pub const BEGIN_QUOTE: TokenRole = TokenRole(1 << 4);
    pub const END_QUOTE: TokenRole = TokenRole(1 << 5);
    pub const TEMP_END_SENT: TokenRole = TokenRole(1 << 6);
    pub const LINEBREAK: TokenRole = TokenRole(1 << 7);

    pub fn contains(self, other: TokenRole) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: TokenRole) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: TokenRole) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TokenRole {
    type Output = TokenRole;
    fn bitor(self, rhs: TokenRole) -> TokenRole {
        TokenRole(self.0 | rhs.0)
    }
}

impl BitOrAssign for TokenRole {
    fn bitor_assign(&mut self, rhs: TokenRole) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for TokenRole {
    type Output = TokenRole;
    fn bitand(self, rhs: TokenRole) -> TokenRole {
        TokenRole(self.0 & rhs.0)
    }
}

impl Not for TokenRole {
    type Output = TokenRole;
    fn not(self) -> TokenRole {
        TokenRole(!self.0)
    }
}

impl Display for TokenRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        const NAMED: &[(TokenRole, &str)] = &[
            (TokenRole::NOSPACE, "NOSPACE"),
            (TokenRole::BEGIN_SENT, "BEGINOFSENTENCE"),
            (TokenRole::END_SENT, "ENDOFSENTENCE"),
            (TokenRole::NEW_PARAGRAPH, "NEWPARAGRAPH"),
            (TokenRole::BEGIN_QUOTE, "BEGINQUOTE"),
            (TokenRole::END_QUOTE, "ENDQUOTE"),
            (TokenRole::TEMP_END_SENT, "TEMPENDOFSENTENCE"),
            (TokenRole::LINEBREAK, "LINEBREAK"),
        ];
        let mut first = true;
        for (flag, name) in NAMED {
            if self.contains(*flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The tag attached to a token: either a built-in character-class
/// classification or a user-defined rule name loaded from a settings file.
pub type TokenType = String;

pub const TYPE_WORD: &str = "WORD";
pub const TYPE_NUMBER: &str = "NUMBER";
pub const TYPE_PUNCTUATION: &str = "PUNCTUATION";
pub const TYPE_CURRENCY: &str = "CURRENCY";
pub const TYPE_SYMBOL: &str = "SYMBOL";
pub const TYPE_EMOTICON: &str = "EMOTICON";
pub const TYPE_PICTOGRAM: &str = "PICTOGRAM";
pub const TYPE_UNKNOWN: &str = "UNKNOWN";
pub const TYPE_UNANALYZED: &str = "UNANALYZED";

/// ISO-639-3 sentinel for a span whose language could not be determined.
pub const LANG_UNDETERMINED: &str = "und";
/// Sentinel used when no explicit language has been assigned.
pub const LANG_DEFAULT: &str = "default";

/// A single emitted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub text: String,
    pub role: TokenRole,
    pub language: String,
}

impl Token {
    pub fn new(kind: impl Into<TokenType>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
            role: TokenRole::NONE,
            language: LANG_DEFAULT.to_string(),
        }
    }

    pub fn with_role(mut self, role: TokenRole) -> Self {
        self.role |= role;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn is_nospace(&self) -> bool {
        self.role.contains(TokenRole::NOSPACE)
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.text, self.kind, self.role)
    }
}
