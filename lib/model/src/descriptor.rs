use crate::fragment::{Fragment, ValuesBinding};
use crate::params::QueryParams;
use crate::proto::Proto;
use oxrdf::Variable;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Whether language tags of literals are exposed in the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageTagHandling {
    /// Literals are exposed as plain strings.
    #[default]
    Hide,
    /// Tagged literals are exposed as `{ "@value": ..., "@language": ... }`.
    Keep,
}

/// One `ORDER BY` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub variable: Variable,
    pub descending: bool,
}

/// A page of entities, as opposed to a `LIMIT` on solution rows.
///
/// One entity usually spans several rows, so the page is selected on distinct identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: usize,
    pub offset: usize,
}

/// Flags controlling how a descriptor is compiled and reshaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub distinct: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub page: Option<Page>,
    pub order_by: Vec<OrderBy>,
    pub group_by: Vec<Variable>,
    pub language_tags: LanguageTagHandling,
    /// `VALUES` blocks placed at the top of the `WHERE` clause.
    pub values: Vec<ValuesBinding>,
    /// `PREFIX` declarations as `(prefix, namespace)` pairs.
    pub prefixes: Vec<(String, String)>,
    /// When set, leaves holding several languages keep only this language and untagged values.
    pub preferred_language: Option<String>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            distinct: true,
            limit: None,
            offset: None,
            page: None,
            order_by: Vec::new(),
            group_by: Vec::new(),
            language_tags: LanguageTagHandling::default(),
            values: Vec::new(),
            prefixes: Vec::new(),
            preferred_language: None,
        }
    }
}

type WhereFn = dyn Fn(&QueryParams) -> Vec<Fragment> + Send + Sync;

/// A where-clause part computed from the runtime parameters.
///
/// Templates must be pure: the same parameters always give the same fragments.
#[derive(Clone)]
pub struct WhereTemplate(Arc<WhereFn>);

impl WhereTemplate {
    pub fn new(template: impl Fn(&QueryParams) -> Vec<Fragment> + Send + Sync + 'static) -> Self {
        Self(Arc::new(template))
    }

    pub fn apply(&self, params: &QueryParams) -> Vec<Fragment> {
        (self.0)(params)
    }
}

impl Debug for WhereTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("WhereTemplate")
    }
}

/// A part of the `WHERE` clause of a [`QueryDescriptor`].
#[derive(Debug, Clone)]
pub enum WherePart {
    Fragment(Fragment),
    Template(WhereTemplate),
}

impl From<Fragment> for WherePart {
    fn from(value: Fragment) -> Self {
        Self::Fragment(value)
    }
}

impl From<&str> for WherePart {
    fn from(value: &str) -> Self {
        Self::Fragment(Fragment::from(value))
    }
}

impl From<WhereTemplate> for WherePart {
    fn from(value: WhereTemplate) -> Self {
        Self::Template(value)
    }
}

/// The declarative definition of one query: result shape, graph patterns and options.
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    pub proto: Proto,
    pub where_parts: Vec<WherePart>,
    pub options: QueryOptions,
}

/// A [`QueryDescriptor`] whose templates have been evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub proto: Proto,
    pub where_clause: Vec<Fragment>,
    pub options: QueryOptions,
}

impl QueryDescriptor {
    pub fn new(proto: Proto) -> Self {
        Self {
            proto,
            where_parts: Vec::new(),
            options: QueryOptions::default(),
        }
    }

    /// Appends a static part.
    #[must_use]
    pub fn with_where(mut self, part: impl Into<WherePart>) -> Self {
        self.where_parts.push(part.into());
        self
    }

    /// Appends a part computed from the runtime parameters.
    #[must_use]
    pub fn with_template(
        self,
        template: impl Fn(&QueryParams) -> Vec<Fragment> + Send + Sync + 'static,
    ) -> Self {
        self.with_where(WhereTemplate::new(template))
    }

    /// Appends all given parts.
    #[must_use]
    pub fn extend_where(mut self, parts: impl IntoIterator<Item = WherePart>) -> Self {
        self.where_parts.extend(parts);
        self
    }

    /// Replaces the result shape, keeping the where clause and options.
    #[must_use]
    pub fn with_proto(mut self, proto: Proto) -> Self {
        self.proto = proto;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.options.distinct = distinct;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.options.offset = Some(offset);
        self
    }

    /// Restricts the results to `size` entities, skipping the first `offset` ones.
    #[must_use]
    pub fn page(mut self, size: usize, offset: usize) -> Self {
        self.options.page = Some(Page { size, offset });
        self
    }

    #[must_use]
    pub fn order_by(mut self, variable: &str, descending: bool) -> Self {
        self.options.order_by.push(OrderBy {
            variable: Variable::new_unchecked(crate::error::strip_sigil(variable)),
            descending,
        });
        self
    }

    #[must_use]
    pub fn group_by(mut self, variable: &str) -> Self {
        self.options
            .group_by
            .push(Variable::new_unchecked(crate::error::strip_sigil(variable)));
        self
    }

    #[must_use]
    pub fn values(mut self, binding: ValuesBinding) -> Self {
        self.options.values.push(binding);
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.options
            .prefixes
            .push((prefix.to_owned(), namespace.to_owned()));
        self
    }

    #[must_use]
    pub fn language_tags(mut self, handling: LanguageTagHandling) -> Self {
        self.options.language_tags = handling;
        self
    }

    #[must_use]
    pub fn preferred_language(mut self, language: Option<String>) -> Self {
        self.options.preferred_language = language;
        self
    }

    /// Evaluates every template with `params`.
    ///
    /// Static parts are kept in place, templates are replaced by the fragments they return.
    /// Fragments that render to nothing are dropped.
    pub fn resolve(&self, params: &QueryParams) -> ResolvedQuery {
        let where_clause = self
            .where_parts
            .iter()
            .flat_map(|part| match part {
                WherePart::Fragment(fragment) => vec![fragment.clone()],
                WherePart::Template(template) => template.apply(params),
            })
            .filter(|fragment| !fragment.is_empty())
            .collect();
        ResolvedQuery {
            proto: self.proto.clone(),
            where_clause,
            options: self.options.clone(),
        }
    }
}
