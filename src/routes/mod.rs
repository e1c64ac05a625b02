pub mod alumni;
pub mod auth;
pub mod health;
pub mod job_record;
pub mod trash;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::auth::{require_admin, require_auth};
use crate::middleware::rate_limit::{rate_limit, RateLimiter};
use crate::AppState;

/// Builds the full HTTP surface.
pub fn app(state: AppState) -> Router {
    let admin_api = Router::new()
        .route("/api/alumni", post(alumni::create_alumni))
        .route(
            "/api/alumni/:id",
            put(alumni::update_alumni).delete(alumni::delete_alumni),
        )
        .route("/api/pekerjaan", post(job_record::create_job_record))
        .route(
            "/api/pekerjaan/:id",
            put(job_record::update_job_record).delete(trash::soft_delete),
        )
        .route("/api/pekerjaan/admin/:id", put(trash::change_state_as_admin))
        .route("/api/pekerjaan/trash", get(trash::list_trash))
        .route("/api/pekerjaan/trashed", get(trash::list_trashed))
        .route("/api/pekerjaan/trash/:id/restore", put(trash::restore))
        .route("/api/pekerjaan/trash/:id", delete(trash::hard_delete))
        .route_layer(from_fn(require_admin));

    let protected_api = Router::new()
        .route("/api/alumni", get(alumni::list_alumni))
        .route("/api/alumni/:id", get(alumni::get_alumni))
        .route("/api/pekerjaan", get(job_record::list_job_records))
        .route("/api/pekerjaan/:id", get(job_record::get_job_record))
        .route(
            "/api/pekerjaan/alumni/:alumni_id",
            get(job_record::list_by_alumni),
        )
        .route("/api/pekerjaan/users/:id", put(trash::change_state_as_owner))
        .merge(admin_api)
        .route_layer(from_fn_with_state(state.auth.clone(), require_auth));

    let api = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .merge(protected_api)
        .layer(from_fn_with_state(
            RateLimiter::new(state.api_rps),
            rate_limit,
        ));

    let request_timeout = state.request_timeout;

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
