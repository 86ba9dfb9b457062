use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::grading::domain::{Barcode, Food, Ingredient, IngredientGrade, IngredientName};
use crate::grading::repository::{
    CatalogRepository, IngredientLookup, MissingIngredientRecorder, RecorderError,
    RepositoryError,
};
use crate::grading::{api_router, FoodForm, GradingService, IngredientForm};

#[derive(Default)]
pub(super) struct MemoryCatalog {
    ingredients: Mutex<HashMap<IngredientName, IngredientGrade>>,
    foods: Mutex<HashMap<Barcode, Food>>,
}

impl MemoryCatalog {
    pub(super) fn with_ingredients(entries: &[(&str, i64)]) -> Self {
        let catalog = Self::default();
        for (name, grade) in entries {
            catalog
                .insert_ingredient(Ingredient {
                    name: IngredientName::new(name),
                    grade: IngredientGrade::new(*grade).expect("valid grade"),
                })
                .expect("seed ingredient");
        }
        catalog
    }

    pub(super) fn ingredient_count(&self) -> usize {
        self.ingredients.lock().expect("catalog mutex poisoned").len()
    }
}

impl IngredientLookup for MemoryCatalog {
    fn lookup(&self, name: &IngredientName) -> Result<Option<IngredientGrade>, RepositoryError> {
        let guard = self.ingredients.lock().expect("catalog mutex poisoned");
        Ok(guard.get(name).copied())
    }
}

impl CatalogRepository for MemoryCatalog {
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

#[derive(Default)]
pub(super) struct MemoryLog {
    names: Mutex<Vec<String>>,
}

impl MissingIngredientRecorder for MemoryLog {
    fn record(&self, name: &IngredientName) -> Result<(), RecorderError> {
        self.names
            .lock()
            .expect("log mutex poisoned")
            .push(name.to_string());
        Ok(())
    }
}

impl MemoryLog {
    pub(super) fn names(&self) -> Vec<String> {
        self.names.lock().expect("log mutex poisoned").clone()
    }
}

pub(super) struct UnavailableCatalog;

impl IngredientLookup for UnavailableCatalog {
    fn lookup(&self, _name: &IngredientName) -> Result<Option<IngredientGrade>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl CatalogRepository for UnavailableCatalog {
    fn insert_ingredient(&self, _ingredient: Ingredient) -> Result<Ingredient, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_food(&self, _food: Food) -> Result<Food, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_food(&self, _barcode: &Barcode) -> Result<Option<Food>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn foods(&self) -> Result<Vec<Food>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    entries: &[(&str, i64)],
) -> (
    GradingService<MemoryCatalog, MemoryLog>,
    Arc<MemoryCatalog>,
    Arc<MemoryLog>,
) {
    let catalog = Arc::new(MemoryCatalog::with_ingredients(entries));
    let log = Arc::new(MemoryLog::default());
    let service = GradingService::new(catalog.clone(), log.clone());
    (service, catalog, log)
}

pub(super) fn pantry() -> Vec<(&'static str, i64)> {
    vec![("oats", 3), ("honey", 1), ("sugar", -4), ("salt", -2), ("water", 0)]
}

pub(super) fn food_form(barcode: &str, name: &str, ingredients: &str) -> FoodForm {
    FoodForm {
        barcode: barcode.to_string(),
        name: name.to_string(),
        ingredients: ingredients.to_string(),
    }
}

pub(super) fn ingredient_form(name: &str, grade: &str) -> IngredientForm {
    IngredientForm {
        name: name.to_string(),
        grade: grade.to_string(),
    }
}

pub(super) fn router_with_service(
    service: GradingService<MemoryCatalog, MemoryLog>,
) -> axum::Router {
    api_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
