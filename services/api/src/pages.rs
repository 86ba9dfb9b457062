use crate::infra::AppState;
use crate::views::{self, Outcome};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Form, Router};
use food_grader::error::AppError;
use food_grader::grading::{
    CatalogRepository, FoodForm, FoodLookup, GradingService, IngredientForm,
    MissingIngredientRecorder,
};
use serde::Deserialize;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Debug, Deserialize)]
pub(crate) struct FoodQuery {
    #[serde(default)]
    barcode: Option<String>,
}

/// Browser-facing pages: search, report, and the two admin forms.
pub(crate) fn page_router<R, M>(service: Arc<GradingService<R, M>>) -> Router
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    Router::new()
        .route("/", get(landing))
        .route("/about", get(about))
        .route("/food", get(food_page::<R, M>))
        .route(
            "/admin/food/create",
            get(make_food_form).post(make_food_submit::<R, M>),
        )
        .route(
            "/admin/ingredient/create",
            get(make_ingredient_form).post(make_ingredient_submit::<R, M>),
        )
        .with_state(service)
}

pub(crate) async fn landing() -> Html<String> {
    Html(views::landing())
}

pub(crate) async fn about() -> Html<String> {
    Html(views::about())
}

pub(crate) async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found())).into_response()
}

pub(crate) async fn food_page<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    Query(query): Query<FoodQuery>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    let Some(barcode) = query.barcode else {
        return Html(views::food_search(&[])).into_response();
    };

    let lookup = service
        .run_blocking(move |service| service.lookup_food(&barcode))
        .await;
    match lookup {
        Ok(FoodLookup::Found(report)) => Html(views::food_report(&report)).into_response(),
        Ok(FoodLookup::NotFound(barcode)) => {
            Html(views::food_not_found(barcode.as_str())).into_response()
        }
        Err(AppError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::food_search(errors.messages())),
        )
            .into_response(),
        Err(err) => page_failure(err),
    }
}

pub(crate) async fn make_food_form() -> Html<String> {
    Html(views::make_food(Outcome::Blank))
}

pub(crate) async fn make_food_submit<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    Form(form): Form<FoodForm>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    match service
        .run_blocking(move |service| service.create_food(form))
        .await
    {
        Ok(food) => Html(views::make_food(Outcome::Created(&food))).into_response(),
        Err(AppError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::make_food(Outcome::Errors(errors.messages()))),
        )
            .into_response(),
        Err(err) => page_failure(err),
    }
}

pub(crate) async fn make_ingredient_form() -> Html<String> {
    Html(views::make_ingredient(Outcome::Blank))
}

pub(crate) async fn make_ingredient_submit<R, M>(
    State(service): State<Arc<GradingService<R, M>>>,
    Form(form): Form<IngredientForm>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    match service
        .run_blocking(move |service| service.create_ingredient(form))
        .await
    {
        Ok(ingredient) => {
            Html(views::make_ingredient(Outcome::Created(&ingredient))).into_response()
        }
        Err(AppError::Validation(errors)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::make_ingredient(Outcome::Errors(errors.messages()))),
        )
            .into_response(),
        Err(err) => page_failure(err),
    }
}

/// Serves `/public/{dir}/{file}` from the configured asset root.
pub(crate) async fn public_asset(
    Extension(state): Extension<AppState>,
    Path((dir, file)): Path<(String, String)>,
) -> Response {
    if !is_plain_segment(&dir) || !is_plain_segment(&file) {
        warn!(%dir, %file, "rejected public asset path");
        return not_found().await;
    }

    let path = state.public_dir.join(&dir).join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(err) if err.kind() == ErrorKind::NotFound => not_found().await,
        Err(err) => {
            error!(error = %err, path = %path.display(), "failed to read public asset");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(views::server_error())).into_response()
        }
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\'])
        && !segment.contains("..")
}

fn page_failure(err: AppError) -> Response {
    error!(error = %err, "page request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Html(views::server_error())).into_response()
}
