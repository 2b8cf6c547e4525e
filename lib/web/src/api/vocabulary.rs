use crate::api::params::ExplorerParams;
use crate::error::ExplorerServerError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use explorer_engine::Entity;
use explorer_routes::{ConfigError, PluginKind};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyBody {
    results: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_sparql_query: Option<String>,
}

/// Runs one plugin query of a vocabulary route, e.g. the word cloud of a concept.
///
/// The `id` may be short, it is expanded against the namespace of the route. Plugins listing
/// texts or visual items are paged like a search and report their total.
pub async fn handle_vocabulary(
    State(state): State<AppState>,
    Path(plugin): Path<String>,
    mut params: ExplorerParams,
) -> Result<Json<VocabularyBody>, ExplorerServerError> {
    let kind = PluginKind::from_name(&plugin).ok_or_else(|| ConfigError::UnknownPlugin {
        route: params.route.clone(),
        plugin,
    })?;
    let route = state.registry.route(&params.route)?;
    let mut descriptor = state
        .registry
        .plugin_descriptor(route.name(), kind)?
        .preferred_language(params.query.language.clone());
    if let Some(id) = params.query.id.take() {
        let iri = route.full_iri(&id)?;
        debug!(
            route = route.name(),
            plugin = %kind,
            id = route.short_id(iri.as_str()),
            "Running plugin query"
        );
        params.query.id = Some(iri.into_string());
    }

    if kind.lists_entities() {
        let offset = (params.page - 1).saturating_mul(state.results_per_page);
        descriptor = descriptor.page(state.results_per_page, offset);
        let response = state
            .explorer
            .search(&descriptor.resolve(&params.query))
            .await?;
        return Ok(Json(VocabularyBody {
            results: response.results,
            total_results: Some(response.total_results),
            debug_sparql_query: state.debug_query(response.query),
        }));
    }

    let response = state
        .explorer
        .execute(&descriptor.resolve(&params.query))
        .await?;
    Ok(Json(VocabularyBody {
        results: response.results,
        total_results: None,
        debug_sparql_query: state.debug_query(response.query),
    }))
}
