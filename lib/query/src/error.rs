use explorer_model::ModelError;

/// An error raised while compiling a descriptor. It indicates a configuration bug.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The descriptor has no graph pattern left after resolution.
    #[error("The query for '{0}' has an empty WHERE clause")]
    EmptyWhere(String),
    /// The result shape uses an invalid variable name.
    #[error(transparent)]
    Model(#[from] ModelError),
}
