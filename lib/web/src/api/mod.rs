use crate::api::entity::handle_entity;
use crate::api::filters::handle_filters;
use crate::api::search::handle_search;
use crate::api::vocabulary::handle_vocabulary;
use crate::AppState;
use axum::routing::get;
use axum::Router;

mod entity;
mod filters;
mod params;
mod search;
mod vocabulary;

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handle_search))
        .route("/entity", get(handle_entity))
        .route("/filters", get(handle_filters))
        .route("/vocabulary/{plugin}", get(handle_vocabulary))
}
