/// Errors surfaced by the store and the engine services built on it.
///
/// `NotFound` is the only caller-visible failure in the core: empty
/// audiences, expired snoozes, missing delivery history, and unknown
/// delivery channels are all normal control-flow outcomes, not errors.
///
/// # Examples
///
/// ```rust
/// use bullhorn_store::error::StoreError;
///
/// let err = StoreError::not_found("alert", "alert-99");
/// assert!(err.to_string().contains("alert"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced alert, user, or preference record does not exist.
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Convenience `Result` alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
