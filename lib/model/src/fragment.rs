use crate::error::{parse_iri, parse_variable, ModelError};
use crate::escape::quote_literal;
use oxrdf::{NamedNode, Variable};
use std::fmt::{Display, Formatter};

/// A constant that can appear in a graph pattern or a `VALUES` block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// An absolute IRI, written as `<...>`.
    Iri(NamedNode),
    /// A prefixed name such as `od:L11_Smell`. It is trusted and written as is.
    Prefixed(String),
    /// A simple literal.
    Literal(String),
    /// A language-tagged literal.
    LanguageLiteral {
        /// The lexical form.
        value: String,
        /// The language tag.
        language: String,
    },
}

impl Value {
    /// Creates an IRI value, validating `iri`.
    pub fn iri(iri: &str) -> Result<Self, ModelError> {
        Ok(Self::Iri(parse_iri(iri)?))
    }

    pub fn prefixed(name: impl Into<String>) -> Self {
        Self::Prefixed(name.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn language_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::LanguageLiteral {
            value: value.into(),
            language: language.into(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "{iri}"),
            Self::Prefixed(name) => f.write_str(name),
            Self::Literal(value) => f.write_str(&quote_literal(value)),
            Self::LanguageLiteral { value, language } => {
                write!(f, "{}@{language}", quote_literal(value))
            }
        }
    }
}

impl From<NamedNode> for Value {
    fn from(value: NamedNode) -> Self {
        Self::Iri(value)
    }
}

/// The subject or object of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Variable(Variable),
    Value(Value),
}

impl Node {
    /// Creates a variable node. The name may start with `?`.
    pub fn var(name: &str) -> Result<Self, ModelError> {
        Ok(Self::Variable(parse_variable(name)?))
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable(variable) => write!(f, "{variable}"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<Variable> for Node {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<NamedNode> for Node {
    fn from(value: NamedNode) -> Self {
        Self::Value(Value::Iri(value))
    }
}

/// Binds a variable to a fixed list of values, rendered as `VALUES ?var { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesBinding {
    pub variable: Variable,
    pub values: Vec<Value>,
}

impl ValuesBinding {
    pub fn new(variable: Variable, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            variable,
            values: values.into_iter().collect(),
        }
    }
}

/// One piece of a `WHERE` clause.
///
/// Structured variants are preferred. [`Fragment::Raw`] holds hand-written graph patterns, e.g.
/// for irregular property paths, and is inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A trusted graph pattern.
    Raw(String),
    /// A triple pattern. The predicate is a trusted property path.
    Triple {
        subject: Node,
        predicate: String,
        object: Node,
    },
    /// `OPTIONAL { ... }`
    Optional(Vec<Fragment>),
    /// `{ ... } UNION { ... }`
    Union(Vec<Vec<Fragment>>),
    /// `FILTER(...)` around a trusted expression.
    Filter(String),
    /// An inline `VALUES` block.
    Values(ValuesBinding),
    /// `BIND(... AS ?var)`
    Bind {
        expression: String,
        variable: Variable,
    },
    /// A nested list of fragments, flattened in place.
    Group(Vec<Fragment>),
}

impl Fragment {
    pub fn raw(pattern: impl Into<String>) -> Self {
        Self::Raw(pattern.into())
    }

    pub fn triple(
        subject: impl Into<Node>,
        predicate: impl Into<String>,
        object: impl Into<Node>,
    ) -> Self {
        Self::Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn filter(expression: impl Into<String>) -> Self {
        Self::Filter(expression.into())
    }

    pub fn optional(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        Self::Optional(fragments.into_iter().collect())
    }

    pub fn union(branches: impl IntoIterator<Item = Vec<Fragment>>) -> Self {
        Self::Union(branches.into_iter().collect())
    }

    pub fn group(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        Self::Group(fragments.into_iter().collect())
    }

    pub fn bind(expression: impl Into<String>, variable: Variable) -> Self {
        Self::Bind {
            expression: expression.into(),
            variable,
        }
    }

    /// Returns whether the fragment renders to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(pattern) | Self::Filter(pattern) => pattern.trim().is_empty(),
            Self::Optional(fragments) | Self::Group(fragments) => {
                fragments.iter().all(Fragment::is_empty)
            }
            Self::Union(branches) => branches.iter().flatten().all(Fragment::is_empty),
            Self::Triple { .. } | Self::Values(_) | Self::Bind { .. } => false,
        }
    }
}

impl From<&str> for Fragment {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

impl From<String> for Fragment {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<ValuesBinding> for Fragment {
    fn from(value: ValuesBinding) -> Self {
        Self::Values(value)
    }
}
