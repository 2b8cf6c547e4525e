use explorer_model::ModelError;

/// An error raised while building or looking up routes.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No route is registered under this name.
    #[error("Unknown route '{0}'")]
    UnknownRoute(String),
    /// The route has no plugin of this kind.
    #[error("Route '{route}' has no plugin '{plugin}'")]
    UnknownPlugin { route: String, plugin: String },
    /// The route has no filter with this id.
    #[error("Route '{route}' has no filter '{filter}'")]
    UnknownFilter { route: String, filter: String },
    /// Two routes share a name.
    #[error("Route '{0}' is registered twice")]
    DuplicateRoute(String),
    /// A plugin reuses a route that does not exist.
    #[error("Plugin '{plugin}' of route '{route}' refers to the unknown route '{target}'")]
    DanglingPluginRoute {
        route: String,
        plugin: String,
        target: String,
    },
    /// A detail-only route without a detail query.
    #[error("Route '{0}' only shows details but has no detail query")]
    MissingDetailQuery(String),
    /// A descriptor uses an invalid variable name or IRI.
    #[error(transparent)]
    Model(#[from] ModelError),
}
