//! Route definitions for the dashboard.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    let signed_in = Router::new()
        .route("/", get(handlers::home))
        .route("/organizations", get(handlers::organizations))
        .route("/posts", get(handlers::posts))
        .route(
            "/profile",
            get(handlers::profile).post(handlers::profile_submit),
        )
        .route(
            "/profile-setup",
            get(handlers::profile_setup).post(handlers::profile_setup_submit),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_authenticated,
        ));

    let admin = Router::new()
        .route("/organizations/table", get(handlers::organizations_table))
        .route("/officers", get(handlers::officers))
        .route("/members", get(handlers::members))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let public = Router::new()
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/healthz", get(handlers::healthz));

    Router::new()
        .merge(public)
        .merge(signed_in)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
