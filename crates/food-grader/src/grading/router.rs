use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::{FoodForm, IngredientForm};
use super::repository::{CatalogRepository, MissingIngredientRecorder};
use super::service::GradingService;

/// JSON endpoints for reading and creating foods and ingredients.
pub fn api_router<R, M>(service: Arc<GradingService<R, M>>) -> Router
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    Router::new()
        .route(
            "/api/food",
            get(list_foods_handler::<R, M>).post(create_food_handler::<R, M>),
        )
        .route("/api/food/:barcode", get(food_handler::<R, M>))
        .route(
            "/api/ingredient",
            axum::routing::post(create_ingredient_handler::<R, M>),
        )
        .route("/api/ingredient/:name", get(ingredient_handler::<R, M>))
        .with_state(service)
}

pub(crate) async fn list_foods_handler<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    match service.run_blocking(|service| service.foods()).await {
        Ok(foods) => (StatusCode::OK, axum::Json(foods)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_food_handler<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    axum::Json(form): axum::Json<FoodForm>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    match service.run_blocking(move |service| service.create_food(form)).await {
        Ok(food) => (StatusCode::CREATED, axum::Json(food)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn food_handler<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    Path(barcode): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    let raw = barcode.clone();
    match service.run_blocking(move |service| service.food(&raw)).await {
        Ok(Some(food)) => (StatusCode::OK, axum::Json(food)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("There is no food associated with barcode: {}", barcode.trim()),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_ingredient_handler<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    axum::Json(form): axum::Json<IngredientForm>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    match service
        .run_blocking(move |service| service.create_ingredient(form))
        .await
    {
        Ok(ingredient) => (StatusCode::CREATED, axum::Json(ingredient)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn ingredient_handler<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    Path(name): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    let raw = name.clone();
    match service.run_blocking(move |service| service.ingredient(&raw)).await {
        Ok(Some(ingredient)) => (StatusCode::OK, axum::Json(ingredient)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("Ingredient {} does not exist", name.trim().to_lowercase()),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
