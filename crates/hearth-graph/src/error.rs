use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown relationship kind: {0}")]
    UnknownRelationshipKind(String),

    #[error("malformed entity id: {0}")]
    MalformedId(String),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("payload kind {payload} does not match entity kind {kind}")]
    PayloadMismatch { kind: String, payload: String },

    #[error("extension map exceeds {max} keys (got {got})")]
    ExtensionTooLarge { max: usize, got: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
