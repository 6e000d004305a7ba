/// Domain-level failures shared by every crate in the workspace.
///
/// The API layer maps each variant to an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// User input was rejected. The message is shown to the submitter as-is.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The shared access code does not match.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}
