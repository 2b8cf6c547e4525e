use explorer_engine::EndpointConfig;

/// Holds the configuration for an explorer web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The SPARQL endpoint every query is sent to.
    pub endpoint: EndpointConfig,
    /// The IP address or DNS name that the socket binds to.
    pub bind: String,
    /// Whether CORS is enabled.
    pub cors: bool,
    /// Number of entities on one search page.
    pub results_per_page: usize,
    /// Whether responses carry the SPARQL query that produced them.
    pub debug_queries: bool,
}

impl ServerConfig {
    pub const DEFAULT_BIND: &'static str = "localhost:8080";
    pub const DEFAULT_RESULTS_PER_PAGE: usize = 20;

    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            bind: Self::DEFAULT_BIND.to_owned(),
            cors: false,
            results_per_page: Self::DEFAULT_RESULTS_PER_PAGE,
            debug_queries: true,
        }
    }
}
