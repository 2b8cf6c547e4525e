use explorer_query::CompileError;
use sparesults::QueryResultsParseError;

/// An error raised while talking to the SPARQL endpoint.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EndpointError {
    /// The request could not be sent or timed out.
    #[error("Could not reach the SPARQL endpoint: {0}")]
    Request(#[from] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("The SPARQL endpoint answered with status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The beginning of the response body.
        body: String,
    },
    /// The response is not a valid SPARQL JSON results document.
    #[error("The SPARQL endpoint returned malformed results: {0}")]
    Results(#[from] QueryResultsParseError),
    /// The response holds a boolean where solutions were expected.
    #[error("The SPARQL endpoint returned a boolean result to a SELECT query")]
    UnexpectedBoolean,
}

/// An error raised while executing a descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}
