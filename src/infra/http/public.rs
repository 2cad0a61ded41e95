use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::{error::ErrorReport, repos::RepoError, vessels::VesselService};

use super::{
    GenericEnvelope, health_response,
    middleware::{log_responses, set_request_context},
};

const LIVENESS_BODY: &str = "Hola mundo!";

#[derive(Clone)]
pub struct HttpState {
    pub vessels: Arc<VesselService>,
    /// Send raw source error text to clients instead of a generic message.
    pub expose_error_detail: bool,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/buquesenpuerto", get(vessels_in_port))
        .route("/_health/db", get(db_health))
        .route("/_health/cache", get(cache_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn liveness() -> &'static str {
    LIVENESS_BODY
}

async fn vessels_in_port(State(state): State<HttpState>) -> Response {
    match state.vessels.current_vessels().await {
        Ok(vessels) => (StatusCode::OK, Json(GenericEnvelope::success(vessels))).into_response(),
        Err(err) => source_failure_response(err, state.expose_error_detail),
    }
}

fn source_failure_response(err: RepoError, expose_error_detail: bool) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let message = if expose_error_detail {
        err.to_string()
    } else {
        err.public_message().to_string()
    };

    let envelope: GenericEnvelope<()> = GenericEnvelope::failure(message);
    let mut response = (status, Json(envelope)).into_response();
    ErrorReport::from_error("infra::http::public::vessels_in_port", status, &err)
        .attach(&mut response);
    response
}

async fn db_health(State(state): State<HttpState>) -> Response {
    health_response(
        "infra::http::public::db_health",
        state.vessels.source().health_check().await,
    )
}

async fn cache_health(State(state): State<HttpState>) -> Response {
    health_response(
        "infra::http::public::cache_health",
        state.vessels.gateway().ping().await,
    )
}
