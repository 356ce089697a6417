use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction rule {rule} failed: {reason}")]
    RuleFailed { rule: String, reason: String },
}
