use crate::error::ConfigError;
use crate::route::{PluginKind, RouteDefinition};
use explorer_model::{QueryDescriptor, WherePart};
use std::collections::BTreeMap;

/// The validated set of routes served by the explorer.
///
/// The registry is immutable once built and can be shared between requests.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: BTreeMap<String, RouteDefinition>,
}

impl RouteRegistry {
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    pub fn route(&self, name: &str) -> Result<&RouteDefinition, ConfigError> {
        self.routes
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRoute(name.to_owned()))
    }

    /// Iterates over the routes ordered by name.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.values()
    }

    /// Builds the query of a plugin of `route`.
    ///
    /// The plugin query is joined with the main query of the route it reuses: its type
    /// restriction and where clause come first, followed by the plugin patterns. The result shape
    /// and options are the plugin's. Prefixes of both queries are merged.
    pub fn plugin_descriptor(
        &self,
        route: &str,
        kind: PluginKind,
    ) -> Result<QueryDescriptor, ConfigError> {
        let plugin = self.route(route)?.find_plugin(kind)?;
        let base = self.route(&plugin.route)?;

        let mut where_parts = Vec::<WherePart>::new();
        if let Some(restriction) = base.type_restriction() {
            where_parts.push(restriction.into());
        }
        where_parts.extend(base.main_query().where_parts.iter().cloned());
        where_parts.extend(plugin.query.where_parts.iter().cloned());

        let mut descriptor = plugin.query.clone();
        descriptor.where_parts = where_parts;
        let mut prefixes = base.main_query().options.prefixes.clone();
        for prefix in &plugin.query.options.prefixes {
            if !prefixes.iter().any(|(name, _)| *name == prefix.0) {
                prefixes.push(prefix.clone());
            }
        }
        descriptor.options.prefixes = prefixes;
        Ok(descriptor)
    }
}

/// Collects routes and validates them as a whole.
#[derive(Debug, Default)]
pub struct RouteRegistryBuilder {
    routes: Vec<RouteDefinition>,
}

impl RouteRegistryBuilder {
    #[must_use]
    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Validates the routes and builds the registry.
    ///
    /// Route names must be unique, every proto must be valid, detail-only routes need a detail
    /// query and plugins may only reuse registered routes.
    pub fn build(self) -> Result<RouteRegistry, ConfigError> {
        let mut routes = BTreeMap::new();
        for route in self.routes {
            route.validate()?;
            let name = route.name().to_owned();
            if routes.contains_key(&name) {
                return Err(ConfigError::DuplicateRoute(name));
            }
            routes.insert(name, route);
        }

        for route in routes.values() {
            for plugin in route.plugins() {
                if !routes.contains_key(&plugin.route) {
                    return Err(ConfigError::DanglingPluginRoute {
                        route: route.name().to_owned(),
                        plugin: plugin.kind.as_str().to_owned(),
                        target: plugin.route.clone(),
                    });
                }
            }
        }
        Ok(RouteRegistry { routes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ViewKind;
    use explorer_model::Proto;

    fn browse(name: &str) -> RouteDefinition {
        RouteDefinition::new(
            name,
            ViewKind::Browse,
            QueryDescriptor::new(Proto::new("id")).with_where("?id a ?type ."),
        )
    }

    #[test]
    fn duplicate_routes_are_rejected() {
        let result = RouteRegistry::builder()
            .route(browse("smells"))
            .route(browse("smells"))
            .build();
        assert!(matches!(result, Err(ConfigError::DuplicateRoute(name)) if name == "smells"));
    }

    #[test]
    fn dangling_plugin_routes_are_rejected() {
        let route = browse("sources").plugin(
            PluginKind::Texts,
            "texts",
            QueryDescriptor::new(Proto::new("id")),
        );
        let result = RouteRegistry::builder().route(route).build();
        assert!(matches!(
            result,
            Err(ConfigError::DanglingPluginRoute { target, .. }) if target == "texts"
        ));
    }

    #[test]
    fn detail_only_routes_need_a_detail_query() {
        let route = RouteDefinition::new(
            "texts",
            ViewKind::DetailOnly,
            QueryDescriptor::new(Proto::new("id")),
        );
        assert!(matches!(
            RouteRegistry::builder().route(route).build(),
            Err(ConfigError::MissingDetailQuery(_))
        ));
    }

    #[test]
    fn invalid_protos_are_rejected() {
        let route = RouteDefinition::new(
            "smells",
            ViewKind::Browse,
            QueryDescriptor::new(Proto::new("id").field("label", "not a variable")),
        );
        assert!(matches!(
            RouteRegistry::builder().route(route).build(),
            Err(ConfigError::Model(_))
        ));
    }

    #[test]
    fn unknown_plugin_is_reported() -> Result<(), ConfigError> {
        let registry = RouteRegistry::builder().route(browse("smells")).build()?;
        assert!(matches!(
            registry.plugin_descriptor("smells", PluginKind::Timeline),
            Err(ConfigError::UnknownPlugin { plugin, .. }) if plugin == "timeline"
        ));
        Ok(())
    }
}
