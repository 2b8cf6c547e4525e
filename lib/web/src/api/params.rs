use crate::error::ExplorerServerError;
use crate::AppState;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::RequestPartsExt;
use explorer_model::QueryParams;

/// The query string of an API request.
///
/// Parameters that are not recognized are kept as facet filter selections, their values split on
/// commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerParams {
    /// The route, sent as `type`.
    pub route: String,
    /// The 1-based search page.
    pub page: usize,
    /// The free text search, sent as `q`.
    pub text: Option<String>,
    /// The parameters handed to where-clause templates.
    pub query: QueryParams,
    pub selections: Vec<(String, Vec<String>)>,
}

impl ExplorerParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ExplorerServerError> {
        let mut route = None;
        let mut page = 1;
        let mut text = None;
        let mut query = QueryParams::default();
        let mut selections = Vec::<(String, Vec<String>)>::new();

        for (key, value) in pairs {
            match key.as_str() {
                "type" => route = Some(value),
                "page" => page = parse_page(&value)?,
                "q" => text = Some(value),
                "locale" => query.language = non_empty(value),
                "id" => query.id = non_empty(value),
                "category" => query.category = non_empty(value),
                "date" => query.date = non_empty(value),
                "from" => query.from = non_empty(value),
                "to" => query.to = non_empty(value),
                "interval" => {
                    query.interval = Some(value.trim().parse().map_err(|_| {
                        ExplorerServerError::BadRequest(format!("Invalid interval '{value}'"))
                    })?);
                }
                _ => {
                    let values = value
                        .split(',')
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .map(str::to_owned);
                    match selections.iter_mut().find(|(id, _)| *id == key) {
                        Some((_, selected)) => selected.extend(values),
                        None => selections.push((key, values.collect())),
                    }
                }
            }
        }

        let route = route
            .filter(|route| !route.is_empty())
            .ok_or_else(|| ExplorerServerError::BadRequest("Missing parameter 'type'".to_owned()))?;
        Ok(Self {
            route,
            page,
            text,
            query,
            selections,
        })
    }
}

fn parse_page(value: &str) -> Result<usize, ExplorerServerError> {
    match value.trim().parse::<usize>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(ExplorerServerError::BadRequest(format!(
            "Invalid page '{value}'"
        ))),
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

impl FromRequestParts<AppState> for ExplorerParams {
    type Rejection = ExplorerServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let pairs = parts
            .extract::<Query<Vec<(String, String)>>>()
            .await
            .map_err(|e| ExplorerServerError::BadRequest(e.to_string()))?
            .0;
        Self::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn known_parameters_are_parsed() -> Result<(), ExplorerServerError> {
        let params = ExplorerParams::from_pairs(pairs(&[
            ("type", "smells"),
            ("page", "3"),
            ("locale", "en"),
            ("q", "rose"),
            ("date", "1600,1650"),
            ("interval", "10"),
        ]))?;
        assert_eq!(params.route, "smells");
        assert_eq!(params.page, 3);
        assert_eq!(params.text.as_deref(), Some("rose"));
        assert_eq!(
            params.query,
            QueryParams::default()
                .with_language("en")
                .with_date("1600,1650")
                .with_interval(10)
        );
        assert!(params.selections.is_empty());
        Ok(())
    }

    #[test]
    fn other_parameters_are_selections() -> Result<(), ExplorerServerError> {
        let params = ExplorerParams::from_pairs(pairs(&[
            ("type", "smells"),
            ("source", "http://example.org/a, http://example.org/b"),
            ("source", "http://example.org/c"),
            ("place", ""),
        ]))?;
        assert_eq!(
            params.selections,
            vec![
                (
                    "source".to_owned(),
                    vec![
                        "http://example.org/a".to_owned(),
                        "http://example.org/b".to_owned(),
                        "http://example.org/c".to_owned()
                    ]
                ),
                ("place".to_owned(), Vec::new())
            ]
        );
        Ok(())
    }

    #[test]
    fn type_is_required() {
        assert!(matches!(
            ExplorerParams::from_pairs(pairs(&[("page", "1")])),
            Err(ExplorerServerError::BadRequest(_))
        ));
    }

    #[test]
    fn page_must_be_positive() {
        for page in ["0", "-1", "two"] {
            assert!(matches!(
                ExplorerParams::from_pairs(pairs(&[("type", "smells"), ("page", page)])),
                Err(ExplorerServerError::BadRequest(_))
            ));
        }
    }
}
