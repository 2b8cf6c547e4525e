use crate::error::EndpointError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Media type requested from the endpoint.
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
/// How much of an error body is kept in [`EndpointError::Status`].
const ERROR_BODY_EXCERPT: usize = 512;

/// A remote SPARQL endpoint answering `SELECT` queries.
#[async_trait]
pub trait SparqlEndpoint: Send + Sync {
    /// Runs a `SELECT` query and returns its solutions in endpoint order.
    async fn select(&self, query: &str) -> Result<Vec<QuerySolution>, EndpointError>;
}

#[async_trait]
impl<T: SparqlEndpoint + ?Sized> SparqlEndpoint for Arc<T> {
    async fn select(&self, query: &str) -> Result<Vec<QuerySolution>, EndpointError> {
        self.as_ref().select(query).await
    }
}

/// Holds the configuration of a remote SPARQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// The query URL of the endpoint.
    pub url: Url,
    /// Upper bound for a single request, including reading the response.
    pub timeout: Duration,
    /// Sent as the engine-specific `sameAs` parameter when set, toggling `owl:sameAs` expansion.
    pub same_as: Option<bool>,
    /// Sent as `default-graph-uri` when set.
    pub default_graph: Option<String>,
}

impl EndpointConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Self::DEFAULT_TIMEOUT,
            same_as: None,
            default_graph: None,
        }
    }

    /// The form parameters sent along with `query`.
    fn form(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut form = vec![("query", query.to_owned())];
        if let Some(same_as) = self.same_as {
            form.push(("sameAs", same_as.to_string()));
        }
        if let Some(graph) = &self.default_graph {
            form.push(("default-graph-uri", graph.clone()));
        }
        form
    }
}

/// A [`SparqlEndpoint`] reached over HTTP with the SPARQL 1.1 protocol.
///
/// Queries are sent as url-encoded `POST` bodies. No request is retried.
#[derive(Debug, Clone)]
pub struct HttpSparqlEndpoint {
    client: reqwest::Client,
    config: EndpointConfig,
}

impl HttpSparqlEndpoint {
    pub fn new(config: EndpointConfig) -> Result<Self, EndpointError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SparqlEndpoint for HttpSparqlEndpoint {
    async fn select(&self, query: &str) -> Result<Vec<QuerySolution>, EndpointError> {
        let response = self
            .client
            .post(self.config.url.clone())
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&self.config.form(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_EXCERPT).collect(),
            });
        }

        let bytes = response.bytes().await?;
        parse_solutions(&bytes)
    }
}

/// Parses a SPARQL JSON results document holding solutions.
pub fn parse_solutions(document: &[u8]) -> Result<Vec<QuerySolution>, EndpointError> {
    match QueryResultsParser::from_format(QueryResultsFormat::Json).for_reader(document)? {
        ReaderQueryResultsParserOutput::Solutions(solutions) => {
            Ok(solutions.collect::<Result<Vec<_>, _>>()?)
        }
        ReaderQueryResultsParserOutput::Boolean(_) => Err(EndpointError::UnexpectedBoolean),
    }
}
