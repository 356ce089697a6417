use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("rule {rule} failed: {reason}")]
    RuleFailed { rule: String, reason: String },
}
