pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::auth::handlers as auth;
use crate::jds::handlers as jds;
use crate::matches::handlers as matches;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::templates::handlers as templates;

/// Slack on top of the file size limit for multipart framing and headers.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        // Resumes
        .route("/resumes", get(resumes::handle_list_resumes))
        .route("/resumes/upload", post(resumes::handle_upload_resume))
        .route(
            "/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        // Job descriptions
        .route("/jds", get(jds::handle_list_jds))
        .route("/jds/upload", post(jds::handle_upload_jd))
        .route("/jds/:id", get(jds::handle_get_jd).delete(jds::handle_delete_jd))
        // Matches
        .route(
            "/matches",
            get(matches::handle_list_matches).post(matches::handle_create_match),
        )
        .route(
            "/matches/:id",
            get(matches::handle_get_match).delete(matches::handle_delete_match),
        )
        // Jade templates
        .route("/jade/upload", post(templates::handle_upload_template))
        .route("/jade/templates", get(templates::handle_list_templates))
        .route(
            "/jade/templates/:id/activate",
            put(templates::handle_activate_template),
        )
        .route("/jade/templates/:id", delete(templates::handle_delete_template))
        .route(
            "/jade/convert/:resume_id",
            post(templates::handle_convert_resume),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::permissive().allow_origin(value),
        Err(_) => {
            warn!("CORS_ORIGIN '{origin}' is not a valid header value; allowing any origin");
            CorsLayer::permissive()
        }
    }
}
