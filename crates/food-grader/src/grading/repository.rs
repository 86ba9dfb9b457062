use super::domain::{Barcode, Food, Ingredient, IngredientGrade, IngredientName};

/// Resolves an ingredient's grade by its normalized name.
///
/// `Ok(None)` means no ingredient row matched. That is an expected outcome,
/// not an error; `Err` is reserved for storage failures.
pub trait IngredientLookup: Send + Sync {
    fn lookup(&self, name: &IngredientName) -> Result<Option<IngredientGrade>, RepositoryError>;
}

/// Storage abstraction for the ingredient and food tables.
///
/// Inserts are insert-or-fail: an existing key yields
/// [`RepositoryError::Conflict`] and leaves the stored row untouched.
pub trait CatalogRepository: IngredientLookup {
    fn insert_ingredient(&self, ingredient: Ingredient) -> Result<Ingredient, RepositoryError>;
    fn insert_food(&self, food: Food) -> Result<Food, RepositoryError>;
    fn fetch_food(&self, barcode: &Barcode) -> Result<Option<Food>, RepositoryError>;
    fn foods(&self) -> Result<Vec<Food>, RepositoryError>;
}

/// Append-only sink for ingredient names that failed lookup during grading.
pub trait MissingIngredientRecorder: Send + Sync {
    fn record(&self, name: &IngredientName) -> Result<(), RecorderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("missing-ingredient log unavailable: {0}")]
    Unavailable(String),
}
