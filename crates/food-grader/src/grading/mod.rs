//! Food grading: ingredient lookup, the grade engine, admin submissions, and
//! the JSON API over them.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{load_catalog, parse_catalog, CatalogImportError};
pub use domain::{
    Barcode, BarcodeError, Food, FoodForm, GradeError, GradeLabel, Ingredient, IngredientForm,
    IngredientGrade, IngredientName,
};
pub use engine::{grade_ingredients, GradeOutcome, GradedIngredient};
pub use repository::{
    CatalogRepository, IngredientLookup, MissingIngredientRecorder, RecorderError,
    RepositoryError,
};
pub use router::api_router;
pub use service::{FoodLookup, FoodReport, GradingService, ServiceError};
pub use validation::ValidationErrors;
