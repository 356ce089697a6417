use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("narrative collaborator failed: {0}")]
    Collaborator(String),

    #[error("narrative collaborator timed out after {0} ms")]
    CollaboratorTimeout(u64),
}
