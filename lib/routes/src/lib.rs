//! Named routes and the query descriptors behind them.
//!
//! A [`RouteRegistry`] is built once, validated, and then shared read-only.

mod error;
pub mod odeuropa;
mod registry;
mod route;
pub mod templates;

pub use error::ConfigError;
pub use registry::{RouteRegistry, RouteRegistryBuilder};
pub use route::{FilterDefinition, PluginDefinition, PluginKind, RouteDefinition, ViewKind};
