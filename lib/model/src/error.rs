use oxrdf::{IriParseError, VariableNameParseError};
use thiserror::Error;

/// An error raised while assembling a query descriptor.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A variable name that is not a valid SPARQL variable.
    #[error("Invalid variable name '{name}': {error}")]
    InvalidVariable {
        /// The name as it was given.
        name: String,
        /// The parsing error.
        #[source]
        error: VariableNameParseError,
    },
    /// An IRI that could not be parsed.
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        /// The IRI as it was given.
        iri: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}

/// Parses a variable name, accepting an optional leading `?` or `$`.
pub fn parse_variable(name: &str) -> Result<oxrdf::Variable, ModelError> {
    let stripped = strip_sigil(name);
    oxrdf::Variable::new(stripped).map_err(|error| ModelError::InvalidVariable {
        name: name.to_owned(),
        error,
    })
}

/// Parses an absolute IRI.
pub fn parse_iri(iri: &str) -> Result<oxrdf::NamedNode, ModelError> {
    oxrdf::NamedNode::new(iri).map_err(|error| ModelError::InvalidIri {
        iri: iri.to_owned(),
        error,
    })
}

pub(crate) fn strip_sigil(name: &str) -> &str {
    name.strip_prefix('?')
        .or_else(|| name.strip_prefix('$'))
        .unwrap_or(name)
}
