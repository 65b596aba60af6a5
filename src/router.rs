use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::borrow::{borrow_book, return_book};
use crate::handlers::health::{healthz, readyz};
use crate::middleware::{propagate_request_id_layer, request_id_layer};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Circulation
        .route("/borrows", post(borrow_book))
        .route("/borrows", patch(return_book))
        // Last layer added runs outermost: set the request id first, trace
        // inside it, echo the id on the way out.
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
