use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("structural error in {file}: {message}")]
    Structural { file: String, message: String },

    #[error("unresolved {kind} reference `{reference}` in {owner}")]
    Reference {
        kind: &'static str,
        reference: String,
        owner: String,
    },

    #[error("deterministic id collision on `{id}`: `{first}` vs `{second}`")]
    IdCollision {
        id: String,
        first: String,
        second: String,
    },

    #[error("schema validation failed for {document}: {message}")]
    SchemaValidation { document: String, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for structural violations detected during AST construction.
    pub fn structural(file: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Structural {
            file: file.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
