use crate::error::CompileError;
use crate::render::render_where;
use explorer_model::{LanguageTagHandling, Page, Proto, ResolvedQuery, Variable};

/// The variable holding the result of a pagination count query.
pub const COUNT_VARIABLE: &str = "count";
/// The prefix of the variables ranking identifiers in a page sub-select.
const PAGE_KEY_VARIABLE: &str = "pageKey";

/// A SPARQL query together with what the executor needs to reshape its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub text: String,
    pub proto: Proto,
    pub language_tags: LanguageTagHandling,
    pub preferred_language: Option<String>,
}

/// Compiles a resolved descriptor into a `SELECT` query.
///
/// The projection lists the distinct variables of the proto in depth-first order. Aggregated
/// leaves are projected as `(expression AS ?variable)`. With a page, the identifiers of the page
/// are selected first and joined with the `WHERE` clause so that no entity is cut in half.
pub fn compile(query: &ResolvedQuery) -> Result<CompiledQuery, CompileError> {
    query.proto.validate()?;
    let body = checked_where(query)?;

    let projection = query
        .proto
        .projection()
        .iter()
        .map(|column| match &column.expression {
            Some(expression) => format!("({} AS {})", expression.trim(), column.variable),
            None => column.variable.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    let distinct = if query.options.distinct {
        "DISTINCT "
    } else {
        ""
    };

    let options = &query.options;
    let mut lines = prologue(query);
    lines.push(format!("SELECT {distinct}{projection} WHERE {{"));
    if let Some(page) = options.page {
        lines.push(page_selection(query, &body, page));
    }
    lines.push(body);
    lines.push("}".to_owned());

    if !options.group_by.is_empty() {
        let keys = options
            .group_by
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("GROUP BY {keys}"));
    }
    if !options.order_by.is_empty() {
        let keys = options
            .order_by
            .iter()
            .map(|key| {
                if key.descending {
                    format!("DESC({})", key.variable)
                } else {
                    key.variable.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("ORDER BY {keys}"));
    }
    if let Some(offset) = options.offset.filter(|offset| *offset > 0) {
        lines.push(format!("OFFSET {offset}"));
    }
    if let Some(limit) = options.limit {
        lines.push(format!("LIMIT {limit}"));
    }

    Ok(CompiledQuery {
        text: lines.join("\n"),
        proto: query.proto.clone(),
        language_tags: options.language_tags,
        preferred_language: options.preferred_language.clone(),
    })
}

/// Selects the identifiers of one page in a sub-select joined with the full `WHERE` clause.
///
/// Without sort keys, identifiers are paged in their own order. Otherwise each identifier is
/// ranked by the smallest (or, descending, the largest) value of every key, with the identifier
/// breaking ties, so that pages follow the order of the outer query.
fn page_selection(query: &ResolvedQuery, body: &str, page: Page) -> String {
    let id = query.proto.id();
    let mut aggregates = Vec::new();
    let mut order = Vec::new();
    for key in &query.options.order_by {
        let variable = if key.variable == *id {
            id.to_string()
        } else {
            let rank = format!("?{PAGE_KEY_VARIABLE}{}", aggregates.len());
            let aggregate = if key.descending { "MAX" } else { "MIN" };
            aggregates.push(format!("({aggregate}({}) AS {rank})", key.variable));
            rank
        };
        order.push(if key.descending {
            format!("DESC({variable})")
        } else {
            variable
        });
    }
    if !query.options.order_by.iter().any(|key| key.variable == *id) {
        order.push(id.to_string());
    }

    let mut lines = vec!["  {".to_owned()];
    if aggregates.is_empty() {
        lines.push(format!("    SELECT DISTINCT {id} WHERE {{"));
    } else {
        lines.push(format!("    SELECT {id} {} WHERE {{", aggregates.join(" ")));
    }
    lines.extend(body.lines().map(|line| format!("    {line}")));
    lines.push("    }".to_owned());
    if !aggregates.is_empty() {
        lines.push(format!("    GROUP BY {id}"));
    }
    lines.push(format!("    ORDER BY {}", order.join(" ")));
    if page.offset > 0 {
        lines.push(format!("    OFFSET {}", page.offset));
    }
    lines.push(format!("    LIMIT {}", page.size));
    lines.push("  }".to_owned());
    lines.join("\n")
}

/// Compiles the pagination count query of a resolved descriptor.
///
/// The `WHERE` clause is the one [`compile`] produces; page, limit, offset and ordering are
/// dropped.
pub fn compile_count(query: &ResolvedQuery) -> Result<String, CompileError> {
    let body = checked_where(query)?;
    let mut lines = prologue(query);
    lines.push(format!(
        "SELECT (COUNT(DISTINCT {}) AS ?{COUNT_VARIABLE}) WHERE {{",
        query.proto.id()
    ));
    lines.push(body);
    lines.push("}".to_owned());
    Ok(lines.join("\n"))
}

/// Returns the proto variables that never appear in the rendered `WHERE` clause.
///
/// Aggregated leaves are bound by the projection and never reported. Unbound variables are not
/// an error, their fields are simply never populated.
pub fn unbound_variables(query: &ResolvedQuery) -> Vec<Variable> {
    let body = render_where(query);
    query
        .proto
        .projection()
        .into_iter()
        .filter(|column| column.expression.is_none())
        .map(|column| column.variable)
        .filter(|variable| !mentions(&body, variable.as_str()))
        .collect()
}

fn mentions(text: &str, name: &str) -> bool {
    text.match_indices(name).any(|(start, _)| {
        let sigil = text[..start].chars().next_back();
        let next = text[start + name.len()..].chars().next();
        matches!(sigil, Some('?' | '$'))
            && !next.is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}

fn checked_where(query: &ResolvedQuery) -> Result<String, CompileError> {
    let body = render_where(query);
    if body.trim().is_empty() {
        return Err(CompileError::EmptyWhere(query.proto.id().as_str().to_owned()));
    }
    Ok(body.trim_end().to_owned())
}

fn prologue(query: &ResolvedQuery) -> Vec<String> {
    query
        .options
        .prefixes
        .iter()
        .map(|(prefix, namespace)| format!("PREFIX {prefix}: <{namespace}>"))
        .collect()
}
