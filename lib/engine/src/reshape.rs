use explorer_model::{LanguageTagHandling, Leaf, LeafKind, Proto, ProtoField, ID_KEY};
use explorer_query::CompiledQuery;
use itertools::Itertools;
use oxrdf::Term;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use sparesults::QuerySolution;

/// A reshaped result: a JSON object mirroring the proto of its query.
pub type Entity = Map<String, Value>;

/// How literals are turned into JSON.
#[derive(Clone, Copy)]
struct LiteralSettings<'a> {
    language_tags: LanguageTagHandling,
    preferred_language: Option<&'a str>,
}

/// Folds flat solutions back into entities shaped like the proto of `query`.
///
/// Solutions are grouped by the identifier variable of the proto, in order of first appearance.
/// Within a group, every leaf collects its distinct bound values: one value gives a scalar,
/// several give an array in first-seen order and none leaves the field out. Nested protos are
/// grouped the same way by their own identifier. Solutions without an identifier are skipped.
pub fn reshape(query: &CompiledQuery, solutions: &[QuerySolution]) -> Vec<Entity> {
    let settings = LiteralSettings {
        language_tags: query.language_tags,
        preferred_language: query.preferred_language.as_deref(),
    };
    let rows = solutions.iter().collect::<Vec<_>>();
    reshape_rows(&query.proto, &rows, settings)
}

fn reshape_rows(
    proto: &Proto,
    rows: &[&QuerySolution],
    settings: LiteralSettings<'_>,
) -> Vec<Entity> {
    let mut positions: FxHashMap<&Term, usize> = FxHashMap::default();
    let mut groups: Vec<(&Term, Vec<&QuerySolution>)> = Vec::new();
    for &row in rows {
        let Some(id) = row.get(proto.id()) else {
            continue;
        };
        let position = *positions.entry(id).or_insert_with(|| {
            groups.push((id, Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(row);
    }

    groups
        .into_iter()
        .map(|(id, rows)| build_entity(proto, id, &rows, settings))
        .collect()
}

fn build_entity(
    proto: &Proto,
    id: &Term,
    rows: &[&QuerySolution],
    settings: LiteralSettings<'_>,
) -> Entity {
    let mut entity = Map::new();
    entity.insert(ID_KEY.to_owned(), Value::String(term_string(id)));
    for (key, field) in proto.fields() {
        let value = match field {
            ProtoField::Scalar(leaf) => collapse(leaf_values(leaf, rows, settings), leaf.as_list),
            ProtoField::Object(nested) => collapse(nested_values(nested, rows, settings), false),
            ProtoField::List(nested) => collapse(nested_values(nested, rows, settings), true),
        };
        if let Some(value) = value {
            entity.insert(key.clone(), value);
        }
    }
    entity
}

fn nested_values(
    proto: &Proto,
    rows: &[&QuerySolution],
    settings: LiteralSettings<'_>,
) -> Vec<Value> {
    reshape_rows(proto, rows, settings)
        .into_iter()
        .map(Value::Object)
        .collect()
}

fn leaf_values(leaf: &Leaf, rows: &[&QuerySolution], settings: LiteralSettings<'_>) -> Vec<Value> {
    let terms = rows
        .iter()
        .filter_map(|row| row.get(&leaf.variable))
        .filter(|term| !is_blank_value(term))
        .unique()
        .collect::<Vec<_>>();
    let terms = prefer_language(terms, settings.preferred_language);

    let mut values: Vec<Value> = Vec::with_capacity(terms.len());
    for term in terms {
        let value = term_value(term, leaf.kind, settings.language_tags);
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// One value gives a scalar, several an array, none nothing.
fn collapse(mut values: Vec<Value>, as_list: bool) -> Option<Value> {
    match values.len() {
        0 => None,
        1 if !as_list => values.pop(),
        _ => Some(Value::Array(values)),
    }
}

/// Keeps only untagged values and values in `language` if any value is tagged with it.
fn prefer_language<'a>(terms: Vec<&'a Term>, language: Option<&str>) -> Vec<&'a Term> {
    let Some(language) = language else {
        return terms;
    };
    let in_language = |term: &Term| match term {
        Term::Literal(literal) => literal
            .language()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(language)),
        _ => false,
    };
    if !terms.iter().any(|term| in_language(term)) {
        return terms;
    }
    terms
        .into_iter()
        .filter(|term| match term {
            Term::Literal(literal) => literal.language().is_none() || in_language(term),
            _ => true,
        })
        .collect()
}

fn is_blank_value(term: &Term) -> bool {
    matches!(term, Term::Literal(literal) if literal.value().is_empty())
}

fn term_value(term: &Term, kind: LeafKind, language_tags: LanguageTagHandling) -> Value {
    let Term::Literal(literal) = term else {
        return Value::String(term_string(term));
    };
    if kind == LeafKind::Integer {
        if let Ok(number) = literal.value().trim().parse::<i64>() {
            return Value::from(number);
        }
    }
    match (language_tags, literal.language()) {
        (LanguageTagHandling::Keep, Some(language)) => {
            let mut tagged = Map::new();
            tagged.insert("@value".to_owned(), Value::from(literal.value()));
            tagged.insert("@language".to_owned(), Value::from(language));
            Value::Object(tagged)
        }
        _ => Value::from(literal.value()),
    }
}

fn term_string(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        other => other.to_string(),
    }
}
