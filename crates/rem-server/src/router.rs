use axum::routing::get;
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::session::session_middleware;
use crate::state::AppState;

/// Build the axum router with all REM endpoints.
///
/// REST routes live under the configured prefix and run inside a client
/// session; `/health` and `/info` do not.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/init",
            get(handler::init_handler).fallback(handler::unsupported_handler),
        )
        .route(
            "/:dataset",
            get(handler::list_handler)
                .post(handler::create_item_handler)
                .fallback(handler::unsupported_handler),
        )
        .route(
            "/:dataset/:id",
            get(handler::get_item_handler)
                .put(handler::upsert_item_handler)
                .delete(handler::delete_item_handler)
                .fallback(handler::unsupported_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    let prefix = state.config.normalized_prefix();
    let base = Router::new()
        .route("/health", get(handler::health_handler))
        .route("/info", get(handler::info_handler));
    let routed = if prefix.is_empty() {
        base.merge(api)
    } else {
        base.nest(&prefix, api)
    };

    let router = routed
        .fallback(handler::unsupported_handler)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http());

    if state.config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
