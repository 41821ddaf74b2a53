use thiserror::Error;

/// Errors produced while loading a [`Setting`](crate::settings::Setting) from
/// a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}:{line}: {message}")]
    Malformed {
        path: String,
        line: usize,
        message: String,
    },
    #[error("{path}: cannot read settings file: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: %include target '{target}' could not be resolved")]
    MissingInclude { path: String, target: String },
    #[error("{path}: duplicate rule '{name}' in [RULE-ORDER]")]
    DuplicateRuleOrder { path: String, name: String },
}

/// Errors produced while tokenizing input that has already passed config
/// loading; these surface to a caller of [`Tokenizer`](crate::Tokenizer).
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("decoding error: {0}")]
    Decode(String),

    #[error("range error: {0}")]
    Range(String),

    #[error("internal logic error: {0}")]
    Logic(String),
}
