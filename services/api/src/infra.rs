use food_grader::grading::{
    Barcode, CatalogRepository, Food, Ingredient, IngredientGrade, IngredientLookup,
    IngredientName, MissingIngredientRecorder, RecorderError, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) public_dir: Arc<PathBuf>,
}

/// Process-local ingredient and food tables keyed the same way the database
/// keys them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCatalog {
    ingredients: Arc<Mutex<HashMap<IngredientName, IngredientGrade>>>,
    foods: Arc<Mutex<HashMap<Barcode, Food>>>,
}

impl InMemoryCatalog {
    /// Loads a catalog, skipping names that are already present.
    pub(crate) fn seed(&self, ingredients: Vec<Ingredient>) -> usize {
        let mut loaded = 0;
        for ingredient in ingredients {
            if self.insert_ingredient(ingredient).is_ok() {
                loaded += 1;
            }
        }
        info!(loaded, "seeded in-memory ingredient catalog");
        loaded
    }
}

impl IngredientLookup for InMemoryCatalog {
    fn lookup(&self, name: &IngredientName) -> Result<Option<IngredientGrade>, RepositoryError> {
        let guard = self.ingredients.lock().expect("catalog mutex poisoned");
        Ok(guard.get(name).copied())
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn insert_ingredient(&self, ingredient: Ingredient) -> Result<Ingredient, RepositoryError> {
        let mut guard = self.ingredients.lock().expect("catalog mutex poisoned");
        if guard.contains_key(&ingredient.name) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(ingredient.name.clone(), ingredient.grade);
        Ok(ingredient)
    }

    fn insert_food(&self, food: Food) -> Result<Food, RepositoryError> {
        let mut guard = self.foods.lock().expect("catalog mutex poisoned");
        if guard.contains_key(&food.barcode) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(food.barcode.clone(), food.clone());
        Ok(food)
    }

    fn fetch_food(&self, barcode: &Barcode) -> Result<Option<Food>, RepositoryError> {
        let guard = self.foods.lock().expect("catalog mutex poisoned");
        Ok(guard.get(barcode).cloned())
    }

    fn foods(&self) -> Result<Vec<Food>, RepositoryError> {
        let guard = self.foods.lock().expect("catalog mutex poisoned");
        let mut foods: Vec<Food> = guard.values().cloned().collect();
        foods.sort_by(|a, b| a.barcode.cmp(&b.barcode));
        Ok(foods)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMissingLog {
    names: Arc<Mutex<Vec<IngredientName>>>,
}

impl InMemoryMissingLog {
    #[cfg(test)]
    pub(crate) fn names(&self) -> Vec<IngredientName> {
        self.names
            .lock()
            .expect("missing log mutex poisoned")
            .clone()
    }
}

impl MissingIngredientRecorder for InMemoryMissingLog {
    fn record(&self, name: &IngredientName) -> Result<(), RecorderError> {
        let mut guard = self.names.lock().expect("missing log mutex poisoned");
        guard.push(name.clone());
        Ok(())
    }
}
