use crate::endpoint::SparqlEndpoint;
use crate::error::ExecutionError;
use crate::reshape::{reshape, Entity};
use explorer_model::ResolvedQuery;
use explorer_query::{compile, compile_count, COUNT_VARIABLE};
use oxrdf::Term;
use tracing::{debug, error, warn};

/// The reshaped results of one query and the query text that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub results: Vec<Entity>,
    pub query: String,
}

/// A page of results with the total number of matching entities.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<Entity>,
    pub total_results: usize,
    pub query: String,
}

/// A single entity, or `None` when nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityResponse {
    pub result: Option<Entity>,
    pub query: String,
}

/// Executes resolved descriptors against a [`SparqlEndpoint`].
///
/// The explorer holds no state besides the endpoint. Dropping one of the returned futures cancels
/// the outbound requests it started.
#[derive(Debug, Clone)]
pub struct Explorer<E> {
    endpoint: E,
}

impl<E: SparqlEndpoint> Explorer<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Compiles and runs `query`, reshaping the solutions into entities.
    pub async fn execute(&self, query: &ResolvedQuery) -> Result<QueryResponse, ExecutionError> {
        let compiled = compile(query)?;
        debug!(query = %compiled.text, "Executing SPARQL query");
        let solutions = self
            .endpoint
            .select(&compiled.text)
            .await
            .inspect_err(|e| error!("SPARQL query failed: {e}"))?;
        Ok(QueryResponse {
            results: reshape(&compiled, &solutions),
            query: compiled.text,
        })
    }

    /// Counts the distinct identifiers matching the `WHERE` clause of `query`.
    ///
    /// Limit and offset of `query` do not apply.
    pub async fn count(&self, query: &ResolvedQuery) -> Result<usize, ExecutionError> {
        let text = compile_count(query)?;
        debug!(query = %text, "Executing SPARQL count query");
        let solutions = self.endpoint.select(&text).await?;
        Ok(solutions
            .first()
            .and_then(|solution| solution.get(COUNT_VARIABLE))
            .and_then(|term| match term {
                Term::Literal(literal) => literal.value().parse().ok(),
                _ => None,
            })
            .unwrap_or_default())
    }

    /// Runs `query` and its pagination count concurrently.
    ///
    /// A failing main query fails the search. A failing count only degrades `total_results`
    /// to `0`.
    pub async fn search(&self, query: &ResolvedQuery) -> Result<SearchResponse, ExecutionError> {
        let (response, total_results) = futures::join!(self.execute(query), self.count(query));
        let response = response?;
        let total_results = total_results.unwrap_or_else(|e| {
            warn!("Pagination count failed, reporting 0 results in total: {e}");
            0
        });
        Ok(SearchResponse {
            results: response.results,
            total_results,
            query: response.query,
        })
    }

    /// Runs `query` and keeps the first entity.
    pub async fn entity(&self, query: &ResolvedQuery) -> Result<EntityResponse, ExecutionError> {
        let response = self.execute(query).await?;
        Ok(EntityResponse {
            result: response.results.into_iter().next(),
            query: response.query,
        })
    }
}
