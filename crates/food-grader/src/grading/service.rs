use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;

use super::domain::{
    Barcode, Food, FoodForm, Ingredient, IngredientForm, IngredientGrade, IngredientName,
};
use super::engine::{grade_ingredients, GradeOutcome, GradedIngredient};
use super::repository::{
    CatalogRepository, MissingIngredientRecorder, RecorderError, RepositoryError,
};
use super::validation::{
    food_exists_message, ingredient_exists_message, parse_barcode, validate_food,
    validate_ingredient, ValidationErrors,
};

/// Service composing the catalog storage, the missing-ingredient log, and the
/// grade engine. Storage handles are injected so every caller shares the same
/// explicitly constructed clients.
pub struct GradingService<R, M> {
    repository: Arc<R>,
    recorder: Arc<M>,
}

/// Result of a barcode search.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodLookup {
    Found(FoodReport),
    NotFound(Barcode),
}

/// A stored food with the current grade of each listed ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodReport {
    pub food: Food,
    pub ingredients: Vec<GradedIngredient>,
}

impl FoodReport {
    pub fn missing_graded_ingredients(&self) -> bool {
        self.food.is_missing_ingredients()
    }
}

impl<R, M> GradingService<R, M>
where
    R: CatalogRepository + 'static,
    M: MissingIngredientRecorder + 'static,
{
    pub fn new(repository: Arc<R>, recorder: Arc<M>) -> Self {
        Self {
            repository,
            recorder,
        }
    }

    /// Grade an ingredient list, recording every unresolved name.
    pub fn grade(&self, raw_ingredients: &str) -> Result<GradeOutcome, RepositoryError> {
        grade_ingredients(raw_ingredients, self.repository.as_ref(), self.recorder.as_ref())
    }

    /// Look up a food by the barcode typed into the search form.
    ///
    /// The per-ingredient breakdown reflects the ingredient table as it is
    /// now; the stored food grade is not recomputed and nothing is recorded.
    pub fn lookup_food(&self, raw_barcode: &str) -> Result<FoodLookup, ServiceError> {
        let barcode = parse_barcode(raw_barcode)?;

        let Some(food) = self.repository.fetch_food(&barcode)? else {
            return Ok(FoodLookup::NotFound(barcode));
        };

        let ingredients = food
            .ingredient_names()
            .into_iter()
            .map(|name| {
                let grade = self.repository.lookup(&name)?;
                Ok(GradedIngredient { name, grade })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(FoodLookup::Found(FoodReport { food, ingredients }))
    }

    /// Validate, grade, and store a new food.
    ///
    /// Unresolved ingredients are written to the missing log only once the
    /// food row is stored, so a rejected submission leaves no trace.
    pub fn create_food(&self, form: FoodForm) -> Result<Food, ServiceError> {
        let valid = validate_food(&form)?;
        let outcome = grade_ingredients(&valid.ingredients, self.repository.as_ref(), &Deferred)?;

        let food = Food {
            barcode: valid.barcode,
            name: valid.name,
            ingredients: valid.ingredients,
            grade: outcome.label,
            numgrade: outcome.numeric,
        };

        let barcode = food.barcode.clone();
        match self.repository.insert_food(food) {
            Ok(food) => {
                self.record_missing(&outcome.missing);
                info!(barcode = %food.barcode, grade = %food.grade, "food created");
                Ok(food)
            }
            Err(RepositoryError::Conflict) => Err(ServiceError::Validation(
                ValidationErrors::single(food_exists_message(&barcode)),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Validate and store a new ingredient. Names are unique.
    ///
    /// Field errors and an already-taken name are reported together.
    pub fn create_ingredient(&self, form: IngredientForm) -> Result<Ingredient, ServiceError> {
        let ingredient = match validate_ingredient(&form) {
            Ok(ingredient) => ingredient,
            Err(mut errors) => {
                let name = IngredientName::new(&form.name);
                if !name.is_empty() && self.repository.lookup(&name)?.is_some() {
                    errors.push(ingredient_exists_message(&name));
                }
                return Err(errors.into());
            }
        };
        let name = ingredient.name.clone();

        match self.repository.insert_ingredient(ingredient) {
            Ok(ingredient) => {
                info!(ingredient = %ingredient.name, grade = %ingredient.grade, "ingredient created");
                Ok(ingredient)
            }
            Err(RepositoryError::Conflict) => Err(ServiceError::Validation(
                ValidationErrors::single(ingredient_exists_message(&name)),
            )),
            Err(err) => Err(err.into()),
        }
    }

    pub fn ingredient(&self, raw_name: &str) -> Result<Option<Ingredient>, RepositoryError> {
        let name = IngredientName::new(raw_name);
        let grade: Option<IngredientGrade> = self.repository.lookup(&name)?;
        Ok(grade.map(|grade| Ingredient { name, grade }))
    }

    pub fn food(&self, raw_barcode: &str) -> Result<Option<Food>, ServiceError> {
        let barcode = parse_barcode(raw_barcode)?;
        Ok(self.repository.fetch_food(&barcode)?)
    }

    pub fn foods(&self) -> Result<Vec<Food>, RepositoryError> {
        self.repository.foods()
    }

    /// Runs a storage-bound call on the blocking thread pool so database
    /// round trips never stall the async workers.
    pub async fn run_blocking<T, E, F>(self: &Arc<Self>, call: F) -> Result<T, AppError>
    where
        F: FnOnce(&Self) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || call(&service))
            .await?
            .map_err(Into::into)
    }

    fn record_missing(&self, names: &[IngredientName]) {
        for name in names {
            if let Err(err) = self.recorder.record(name) {
                warn!(ingredient = %name, error = %err, "failed to record missing ingredient");
            }
        }
    }
}

/// Holds back recording while a food submission may still be rejected.
struct Deferred;

impl MissingIngredientRecorder for Deferred {
    fn record(&self, _name: &IngredientName) -> Result<(), RecorderError> {
        Ok(())
    }
}

/// Error raised by the grading service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

