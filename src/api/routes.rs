use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

pub fn create_router() -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Relations conversions
        .route("/relations/split", post(handlers::split))
        .route("/relations/combine", post(handlers::combine))
        .route("/relations/from-jaql", post(handlers::from_jaql))
        .route("/relations/model/to-rules", post(handlers::model_to_rules))
        .route("/relations/model/from-rules", post(handlers::model_from_rules))
        // Rebuilding relations
        .route("/relations/calculate", post(handlers::calculate))
        .route("/relations/replace", post(handlers::replace))
        .route("/relations/merge", post(handlers::merge))
        // Filters
        .route("/filters/diff", post(handlers::diff))
        .route("/filters/compare-id", post(handlers::compare_id))
}
