//! Reusable where-clause templates and facet filter builders.
//!
//! Templates read the runtime [`QueryParams`] and leave their constraint out when the parameter
//! they depend on is absent.

use explorer_model::{
    parse_iri, parse_variable, quote_literal, Fragment, QueryParams, Value, ValuesBinding,
    Variable,
};

/// Keeps the values of `variable` that fall in one of the selected timeline buckets.
///
/// Every start year of `params.date` opens the range `[start, start + interval)`. The ranges are
/// joined with `||`. Nothing is added when no valid start year is given.
pub fn date_range_filter(variable: &str, params: &QueryParams) -> Vec<Fragment> {
    let Ok(variable) = parse_variable(variable) else {
        return Vec::new();
    };
    let interval = i64::from(params.interval_or_default());
    let ranges = params
        .start_years()
        .into_iter()
        .map(|start| {
            let start = i64::from(start);
            format!(
                "({variable} >= {start} && {variable} < {})",
                start + interval
            )
        })
        .collect::<Vec<_>>();
    if ranges.is_empty() {
        return Vec::new();
    }
    vec![Fragment::filter(ranges.join(" || "))]
}

/// Keeps the values of `variable` between the `from` and `to` years, both inclusive.
pub fn year_bounds_filter(variable: &str, params: &QueryParams) -> Vec<Fragment> {
    let Ok(variable) = parse_variable(variable) else {
        return Vec::new();
    };
    let bounds = match params.year_bounds() {
        (Some(from), Some(to)) => format!("{variable} >= {from} && {variable} <= {to}"),
        (Some(from), None) => format!("{variable} >= {from}"),
        (None, Some(to)) => format!("{variable} <= {to}"),
        (None, None) => return Vec::new(),
    };
    vec![Fragment::filter(bounds)]
}

/// Keeps untagged literals and literals in the requested language.
pub fn language_filter(variable: &str, params: &QueryParams) -> Vec<Fragment> {
    let (Ok(variable), Some(language)) = (parse_variable(variable), params.language.as_deref())
    else {
        return Vec::new();
    };
    vec![Fragment::filter(format!(
        "LANG({variable}) = \"\" || LANGMATCHES(LANG({variable}), {})",
        quote_literal(language)
    ))]
}

/// Binds `variable` to the entity identifier of the request.
///
/// An identifier that is not a valid IRI binds nothing, so that the query matches nothing.
pub fn id_binding(variable: &str, params: &QueryParams) -> Vec<Fragment> {
    iri_binding(variable, params.id.as_deref())
}

/// Binds `variable` to the category of the request, see [`id_binding`].
pub fn category_binding(variable: &str, params: &QueryParams) -> Vec<Fragment> {
    iri_binding(variable, params.category.as_deref())
}

fn iri_binding(variable: &str, iri: Option<&str>) -> Vec<Fragment> {
    let (Ok(variable), Some(iri)) = (parse_variable(variable), iri) else {
        return Vec::new();
    };
    let values = parse_iri(iri.trim()).map(Value::Iri).into_iter();
    vec![Fragment::Values(ValuesBinding::new(variable, values))]
}

/// A facet filter binding `variable` to the selected IRIs and joining `pattern`.
///
/// Invalid IRIs are dropped. When none is left, the `VALUES` block is empty and nothing matches.
pub fn iri_filter(
    variable: &str,
    pattern: &str,
) -> impl Fn(&[String]) -> Vec<Fragment> + Send + Sync + 'static {
    let variable = parse_variable(variable).ok();
    let pattern = pattern.to_owned();
    move |selected: &[String]| {
        let values = selected
            .iter()
            .filter_map(|iri| parse_iri(iri.trim()).ok())
            .map(Value::Iri);
        selection(variable.as_ref(), values, &pattern)
    }
}

/// A facet filter binding `variable` to the selected plain literals and joining `pattern`.
pub fn literal_filter(
    variable: &str,
    pattern: &str,
) -> impl Fn(&[String]) -> Vec<Fragment> + Send + Sync + 'static {
    let variable = parse_variable(variable).ok();
    let pattern = pattern.to_owned();
    move |selected: &[String]| {
        let values = selected
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(Value::literal);
        selection(variable.as_ref(), values, &pattern)
    }
}

fn selection(
    variable: Option<&Variable>,
    values: impl IntoIterator<Item = Value>,
    pattern: &str,
) -> Vec<Fragment> {
    let Some(variable) = variable else {
        return Vec::new();
    };
    vec![
        Fragment::Values(ValuesBinding::new(variable.clone(), values)),
        Fragment::raw(pattern),
    ]
}
