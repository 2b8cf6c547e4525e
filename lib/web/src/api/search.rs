use crate::api::params::ExplorerParams;
use crate::error::ExplorerServerError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use explorer_engine::Entity;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    results: Vec<Entity>,
    total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_sparql_query: Option<String>,
}

/// Lists one page of the entities of a route.
pub async fn handle_search(
    State(state): State<AppState>,
    params: ExplorerParams,
) -> Result<Json<SearchBody>, ExplorerServerError> {
    let route = state.registry.route(&params.route)?;
    let (selections, ignored): (Vec<_>, Vec<_>) = params
        .selections
        .into_iter()
        .partition(|(id, _)| route.find_filter(id).is_ok());
    if !ignored.is_empty() {
        debug!(route = route.name(), "Ignoring unknown filters {ignored:?}");
    }

    let offset = (params.page - 1).saturating_mul(state.results_per_page);
    let descriptor = route
        .search_descriptor(&selections, params.text.as_deref())?
        .page(state.results_per_page, offset)
        .preferred_language(params.query.language.clone());
    let response = state
        .explorer
        .search(&descriptor.resolve(&params.query))
        .await?;

    Ok(Json(SearchBody {
        results: response.results,
        total_results: response.total_results,
        debug_sparql_query: state.debug_query(response.query),
    }))
}
