use crate::infra::AppState;
use crate::pages;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use food_grader::grading::{
    api_router, CatalogRepository, GradingService, MissingIngredientRecorder,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn app_router<R, M>(service: Arc<GradingService<R, M>>) -> Router
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    api_router(service.clone())
        .merge(pages::page_router(service))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/public/:dir/:file", get(pages::public_asset))
        .fallback(pages::not_found)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
