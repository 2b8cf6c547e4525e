use crate::error::{parse_variable, strip_sigil, ModelError};
use oxrdf::Variable;

/// How the values of a leaf are turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafKind {
    /// IRIs and literals are exposed as strings.
    #[default]
    Term,
    /// The lexical value is parsed as an integer.
    Integer,
}

/// A leaf of a [`Proto`], bound to one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub variable: Variable,
    pub kind: LeafKind,
    /// Always produce an array, even for a single value.
    pub as_list: bool,
    /// An aggregate or other expression projected as `(expression AS ?variable)`.
    pub expression: Option<String>,
}

/// A field of a [`Proto`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoField {
    /// A scalar, or an array when several distinct values are bound.
    Scalar(Leaf),
    /// A nested entity, or an array of them when several distinct identifiers are bound.
    Object(Proto),
    /// A nested entity that is always exposed as an array.
    List(Proto),
}

/// A column of a flattened [`Proto`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// The dotted path of the field, e.g. `author.name`.
    pub path: String,
    pub variable: Variable,
    /// Set when the column is computed in the projection.
    pub expression: Option<String>,
}

/// The shape of the entities a query returns.
///
/// Every proto is keyed by an identifier variable: rows that bind the same identifier are merged
/// into one entity. The identifier is exposed as `@id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proto {
    id: Variable,
    fields: Vec<(String, ProtoField)>,
}

/// The key under which the identifier of an entity is exposed.
pub const ID_KEY: &str = "@id";

impl Proto {
    /// Creates a proto keyed by the variable `id`.
    ///
    /// Names are checked by [`Proto::validate`] so the builder stays infallible.
    pub fn new(id: &str) -> Self {
        Self {
            id: Variable::new_unchecked(strip_sigil(id)),
            fields: Vec::new(),
        }
    }

    /// Adds a leaf. A variable named `count` is parsed as an integer.
    #[must_use]
    pub fn field(self, key: &str, variable: &str) -> Self {
        let kind = if strip_sigil(variable) == "count" {
            LeafKind::Integer
        } else {
            LeafKind::Term
        };
        self.leaf(key, variable, kind, false)
    }

    /// Adds a leaf computed in the projection, e.g. `COUNT(DISTINCT ?id)`.
    ///
    /// A variable named `count` is parsed as an integer.
    #[must_use]
    pub fn aggregate(mut self, key: &str, variable: &str, expression: &str) -> Self {
        self = self.field(key, variable);
        if let Some((_, ProtoField::Scalar(leaf))) = self.fields.last_mut() {
            leaf.expression = Some(expression.to_owned());
        }
        self
    }

    /// Adds a leaf whose values are parsed as integers.
    #[must_use]
    pub fn integer(self, key: &str, variable: &str) -> Self {
        self.leaf(key, variable, LeafKind::Integer, false)
    }

    /// Adds a leaf that is always an array.
    #[must_use]
    pub fn list_field(self, key: &str, variable: &str) -> Self {
        self.leaf(key, variable, LeafKind::Term, true)
    }

    /// Adds a nested entity.
    #[must_use]
    pub fn object(mut self, key: &str, proto: Proto) -> Self {
        self.fields.push((key.to_owned(), ProtoField::Object(proto)));
        self
    }

    /// Adds a nested entity that is always an array.
    #[must_use]
    pub fn list(mut self, key: &str, proto: Proto) -> Self {
        self.fields.push((key.to_owned(), ProtoField::List(proto)));
        self
    }

    fn leaf(mut self, key: &str, variable: &str, kind: LeafKind, as_list: bool) -> Self {
        self.fields.push((
            key.to_owned(),
            ProtoField::Scalar(Leaf {
                variable: Variable::new_unchecked(strip_sigil(variable)),
                kind,
                as_list,
                expression: None,
            }),
        ));
        self
    }

    pub fn id(&self) -> &Variable {
        &self.id
    }

    pub fn fields(&self) -> &[(String, ProtoField)] {
        &self.fields
    }

    /// Flattens the proto depth-first into `(path, variable)` columns.
    ///
    /// The identifier of every (nested) proto comes before its fields.
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = Vec::new();
        self.collect_columns("", &mut columns);
        columns
    }

    fn collect_columns(&self, prefix: &str, columns: &mut Vec<Column>) {
        columns.push(Column {
            path: format!("{prefix}{ID_KEY}"),
            variable: self.id.clone(),
            expression: None,
        });
        for (key, field) in &self.fields {
            match field {
                ProtoField::Scalar(leaf) => columns.push(Column {
                    path: format!("{prefix}{key}"),
                    variable: leaf.variable.clone(),
                    expression: leaf.expression.clone(),
                }),
                ProtoField::Object(nested) | ProtoField::List(nested) => {
                    nested.collect_columns(&format!("{prefix}{key}."), columns);
                }
            }
        }
    }

    /// Returns the distinct variables of the proto in column order.
    pub fn variables(&self) -> Vec<Variable> {
        self.projection()
            .into_iter()
            .map(|column| column.variable)
            .collect()
    }

    /// Returns the columns to project: one per distinct variable, in column order.
    pub fn projection(&self) -> Vec<Column> {
        let mut projection: Vec<Column> = Vec::new();
        for column in self.columns() {
            if !projection.iter().any(|c| c.variable == column.variable) {
                projection.push(column);
            }
        }
        projection
    }

    /// Checks that every variable name is a valid SPARQL variable.
    pub fn validate(&self) -> Result<(), ModelError> {
        for column in self.columns() {
            parse_variable(column.variable.as_str())?;
        }
        Ok(())
    }
}
