use crate::error::ConfigError;
use explorer_model::{
    parse_iri, parse_variable, quote_literal, Fragment, NamedNode, QueryDescriptor, Value,
    ValuesBinding, Variable, WherePart,
};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// The variable holding the RDF types of a route restriction.
const RDF_TYPE_VARIABLE: &str = "rdfType";

/// How a route is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// A paginated list of entities with facet filters.
    Browse,
    /// A list of vocabulary concepts, each with its own plugins.
    Vocabulary,
    /// Entities are only reachable by identifier.
    DetailOnly,
}

/// The visualizations attached to a vocabulary route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginKind {
    WordCloud,
    Timeline,
    Texts,
    Visuals,
    Dates,
}

impl PluginKind {
    pub const ALL: [Self; 5] = [
        Self::WordCloud,
        Self::Timeline,
        Self::Texts,
        Self::Visuals,
        Self::Dates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WordCloud => "word-cloud",
            Self::Timeline => "timeline",
            Self::Texts => "texts",
            Self::Visuals => "visuals",
            Self::Dates => "dates",
        }
    }

    /// Whether the plugin lists entities of another route, paged like a search.
    pub fn lists_entities(self) -> bool {
        matches!(self, Self::Texts | Self::Visuals)
    }

    /// Parses the name used in URLs, e.g. `word-cloud`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl Display for PluginKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

type FilterFn = dyn Fn(&[String]) -> Vec<Fragment> + Send + Sync;

/// A facet filter of a browse route.
///
/// The filter function turns the selected values into where-clause fragments. The optional
/// values query lists the options a user can pick from.
#[derive(Clone)]
pub struct FilterDefinition {
    id: String,
    values_query: Option<QueryDescriptor>,
    filter_func: Arc<FilterFn>,
}

impl FilterDefinition {
    pub fn new(
        id: impl Into<String>,
        filter_func: impl Fn(&[String]) -> Vec<Fragment> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            values_query: None,
            filter_func: Arc::new(filter_func),
        }
    }

    #[must_use]
    pub fn with_values_query(mut self, query: QueryDescriptor) -> Self {
        self.values_query = Some(query);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn values_query(&self) -> Option<&QueryDescriptor> {
        self.values_query.as_ref()
    }

    /// Returns the fragments restricting the results to `selected`. Nothing is restricted when
    /// no value is selected.
    pub fn apply(&self, selected: &[String]) -> Vec<Fragment> {
        if selected.is_empty() {
            return Vec::new();
        }
        (self.filter_func)(selected)
    }
}

impl Debug for FilterDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterDefinition")
            .field("id", &self.id)
            .field("values_query", &self.values_query)
            .finish_non_exhaustive()
    }
}

/// A visualization of a route.
///
/// The plugin query is joined with the main query of `route`, which must be registered too.
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    pub kind: PluginKind,
    pub route: String,
    pub query: QueryDescriptor,
}

/// A named route with its queries.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    name: String,
    view: ViewKind,
    uri_base: Option<String>,
    rdf_types: Vec<Value>,
    search_label: Option<Variable>,
    main_query: QueryDescriptor,
    detail_query: Option<QueryDescriptor>,
    filters: Vec<FilterDefinition>,
    plugins: Vec<PluginDefinition>,
}

impl RouteDefinition {
    pub fn new(name: impl Into<String>, view: ViewKind, main_query: QueryDescriptor) -> Self {
        Self {
            name: name.into(),
            view,
            uri_base: None,
            rdf_types: Vec::new(),
            search_label: None,
            main_query,
            detail_query: None,
            filters: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Sets the namespace of the entities, which allows short identifiers in URLs.
    #[must_use]
    pub fn uri_base(mut self, base: impl Into<String>) -> Self {
        self.uri_base = Some(base.into());
        self
    }

    /// Restricts the entities to instances of `rdf_type`.
    #[must_use]
    pub fn rdf_type(mut self, rdf_type: Value) -> Self {
        self.rdf_types.push(rdf_type);
        self
    }

    /// Enables the text search on `variable`, which the main query must bind.
    pub fn search_label(mut self, variable: &str) -> Result<Self, ConfigError> {
        self.search_label = Some(parse_variable(variable)?);
        Ok(self)
    }

    #[must_use]
    pub fn detail_query(mut self, query: QueryDescriptor) -> Self {
        self.detail_query = Some(query);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterDefinition) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn plugin(mut self, kind: PluginKind, route: impl Into<String>, query: QueryDescriptor) -> Self {
        self.plugins.push(PluginDefinition {
            kind,
            route: route.into(),
            query,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn main_query(&self) -> &QueryDescriptor {
        &self.main_query
    }

    pub fn filters(&self) -> &[FilterDefinition] {
        &self.filters
    }

    pub fn plugins(&self) -> &[PluginDefinition] {
        &self.plugins
    }

    pub fn find_filter(&self, id: &str) -> Result<&FilterDefinition, ConfigError> {
        self.filters
            .iter()
            .find(|filter| filter.id == id)
            .ok_or_else(|| ConfigError::UnknownFilter {
                route: self.name.clone(),
                filter: id.to_owned(),
            })
    }

    pub fn find_plugin(&self, kind: PluginKind) -> Result<&PluginDefinition, ConfigError> {
        self.plugins
            .iter()
            .find(|plugin| plugin.kind == kind)
            .ok_or_else(|| ConfigError::UnknownPlugin {
                route: self.name.clone(),
                plugin: kind.as_str().to_owned(),
            })
    }

    /// Expands a short identifier into the full IRI of an entity.
    ///
    /// Identifiers that already are absolute IRIs are kept as they are.
    pub fn full_iri(&self, id: &str) -> Result<NamedNode, ConfigError> {
        let id = id.trim();
        let iri = match &self.uri_base {
            Some(base) if !id.contains("://") => format!("{base}{id}"),
            _ => id.to_owned(),
        };
        Ok(parse_iri(&iri)?)
    }

    /// Strips the route namespace from an entity IRI.
    pub fn short_id<'a>(&self, iri: &'a str) -> &'a str {
        self.uri_base
            .as_deref()
            .and_then(|base| iri.strip_prefix(base))
            .filter(|id| !id.is_empty())
            .unwrap_or(iri)
    }

    /// The `VALUES ?rdfType { ... } ?id a ?rdfType .` restriction, if the route has types.
    pub fn type_restriction(&self) -> Option<Fragment> {
        if self.rdf_types.is_empty() {
            return None;
        }
        let variable = Variable::new_unchecked(RDF_TYPE_VARIABLE);
        Some(Fragment::group([
            Fragment::Values(ValuesBinding::new(
                variable.clone(),
                self.rdf_types.iter().cloned(),
            )),
            Fragment::triple(self.main_query.proto.id().clone(), "a", variable),
        ]))
    }

    /// Builds the browse query for the given filter selections and search text.
    ///
    /// The type restriction comes first, followed by the main where clause, the facet filters
    /// and the text filter. Pagination is left to the caller.
    pub fn search_descriptor(
        &self,
        selections: &[(String, Vec<String>)],
        text: Option<&str>,
    ) -> Result<QueryDescriptor, ConfigError> {
        let mut descriptor = self.main_query.clone();
        if let Some(restriction) = self.type_restriction() {
            descriptor.where_parts.insert(0, restriction.into());
        }
        for (id, selected) in selections {
            let filter = self.find_filter(id)?;
            descriptor
                .where_parts
                .extend(filter.apply(selected).into_iter().map(WherePart::from));
        }
        let text = text.map(str::trim).filter(|text| !text.is_empty());
        if let (Some(label), Some(text)) = (&self.search_label, text) {
            descriptor.where_parts.push(
                Fragment::filter(format!(
                    "CONTAINS(LCASE(STR({label})), {})",
                    quote_literal(&text.to_lowercase())
                ))
                .into(),
            );
        }
        Ok(descriptor)
    }

    /// Builds the query describing one entity.
    ///
    /// Uses the detail query when there is one, the unpaginated main query otherwise.
    pub fn entity_descriptor(&self, id: &str) -> Result<QueryDescriptor, ConfigError> {
        let iri = self.full_iri(id)?;
        let mut descriptor = match &self.detail_query {
            Some(query) => query.clone(),
            None => {
                let mut query = self.main_query.clone();
                query.options.limit = None;
                query.options.offset = None;
                query.options.page = None;
                query
            }
        };
        let binding = ValuesBinding::new(descriptor.proto.id().clone(), [Value::Iri(iri)]);
        descriptor.options.values.push(binding);
        Ok(descriptor)
    }

    /// Returns the query listing the options of a facet filter, if it has one.
    pub fn filter_values_descriptor(&self, id: &str) -> Result<Option<QueryDescriptor>, ConfigError> {
        Ok(self.find_filter(id)?.values_query.clone())
    }

    /// Checks every proto of the route.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.view == ViewKind::DetailOnly && self.detail_query.is_none() {
            return Err(ConfigError::MissingDetailQuery(self.name.clone()));
        }
        let queries = std::iter::once(&self.main_query)
            .chain(&self.detail_query)
            .chain(self.filters.iter().filter_map(|filter| filter.values_query.as_ref()))
            .chain(self.plugins.iter().map(|plugin| &plugin.query));
        for query in queries {
            query.proto.validate()?;
        }
        Ok(())
    }
}
