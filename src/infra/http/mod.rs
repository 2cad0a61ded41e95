mod envelope;
mod middleware;
mod public;

pub use envelope::GenericEnvelope;
pub use middleware::RequestContext;
pub use public::{HttpState, build_router};

use crate::application::error::ErrorReport;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

fn health_response<E>(source: &'static str, result: Result<(), E>) -> Response
where
    E: std::error::Error,
{
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(source, StatusCode::SERVICE_UNAVAILABLE, &err)
                .attach(&mut response);
            response
        }
    }
}
