use crate::api::params::ExplorerParams;
use crate::error::ExplorerServerError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use explorer_engine::Entity;
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Map;

#[derive(Debug, Serialize)]
pub struct FiltersBody {
    filters: Map<String, serde_json::Value>,
}

/// Lists the options of every facet filter of a route.
///
/// The option queries run concurrently. Filters without a values query are left out.
pub async fn handle_filters(
    State(state): State<AppState>,
    params: ExplorerParams,
) -> Result<Json<FiltersBody>, ExplorerServerError> {
    let route = state.registry.route(&params.route)?;
    let queries = route
        .filters()
        .iter()
        .filter_map(|filter| {
            let descriptor = filter
                .values_query()?
                .clone()
                .preferred_language(params.query.language.clone());
            Some((filter.id(), descriptor.resolve(&params.query)))
        })
        .collect::<Vec<_>>();

    let responses = try_join_all(
        queries
            .iter()
            .map(|(_, query)| state.explorer.execute(query)),
    )
    .await?;

    let filters = queries
        .iter()
        .zip(responses)
        .map(|((id, _), response)| ((*id).to_owned(), options(response.results)))
        .collect();
    Ok(Json(FiltersBody { filters }))
}

fn options(results: Vec<Entity>) -> serde_json::Value {
    serde_json::Value::Array(results.into_iter().map(serde_json::Value::Object).collect())
}
