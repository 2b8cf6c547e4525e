use crate::config::ServerConfig;
use explorer_engine::{Explorer, SparqlEndpoint};
use explorer_routes::RouteRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub explorer: Explorer<Arc<dyn SparqlEndpoint>>,
    pub registry: Arc<RouteRegistry>,
    pub results_per_page: usize,
    pub debug_queries: bool,
}

impl AppState {
    pub fn new(endpoint: Arc<dyn SparqlEndpoint>, registry: Arc<RouteRegistry>) -> Self {
        Self {
            explorer: Explorer::new(endpoint),
            registry,
            results_per_page: ServerConfig::DEFAULT_RESULTS_PER_PAGE,
            debug_queries: true,
        }
    }

    #[must_use]
    pub fn with_results_per_page(mut self, results_per_page: usize) -> Self {
        self.results_per_page = results_per_page.max(1);
        self
    }

    #[must_use]
    pub fn with_debug_queries(mut self, debug_queries: bool) -> Self {
        self.debug_queries = debug_queries;
        self
    }

    /// Keeps `query` for the response only when debug queries are enabled.
    pub fn debug_query(&self, query: String) -> Option<String> {
        self.debug_queries.then_some(query)
    }
}
