use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdiSyntaxError {
    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Parsing error: {message}")]
    Parsing { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EdiSyntaxError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EdiSyntaxError>;
