mod endpoint;
pub mod error;
mod explorer;
mod reshape;

pub use endpoint::{parse_solutions, EndpointConfig, HttpSparqlEndpoint, SparqlEndpoint};
pub use explorer::{EntityResponse, Explorer, QueryResponse, SearchResponse};
pub use reshape::{reshape, Entity};
pub use sparesults::QuerySolution;
