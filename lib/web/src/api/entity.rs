use crate::api::params::ExplorerParams;
use crate::error::ExplorerServerError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use explorer_engine::Entity;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBody {
    result: Option<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_sparql_query: Option<String>,
}

/// Describes one entity of a route. A missing entity is a `null` result, not an error.
pub async fn handle_entity(
    State(state): State<AppState>,
    params: ExplorerParams,
) -> Result<Json<EntityBody>, ExplorerServerError> {
    let Some(id) = params.query.id.as_deref() else {
        return Err(ExplorerServerError::BadRequest(
            "Missing parameter 'id'".to_owned(),
        ));
    };
    let descriptor = state
        .registry
        .route(&params.route)?
        .entity_descriptor(id)?
        .preferred_language(params.query.language.clone());
    let response = state
        .explorer
        .entity(&descriptor.resolve(&params.query))
        .await?;

    Ok(Json(EntityBody {
        result: response.result,
        debug_sparql_query: state.debug_query(response.query),
    }))
}
