use std::fmt;

use serde::Serialize;

use super::domain::{
    Barcode, BarcodeError, FoodForm, GradeError, Ingredient, IngredientForm, IngredientGrade,
    IngredientName,
};

pub const BARCODE_EMPTY: &str = "Barcode Field cannot be empty";
pub const BARCODE_NOT_NUMERIC: &str = "Barcode must be an integer";
pub const NAME_EMPTY: &str = "Name Field cannot be empty";
pub const INGREDIENTS_EMPTY: &str = "Ingredients Field cannot be empty";
pub const GRADE_EMPTY: &str = "Grade Field cannot be empty";
pub const GRADE_NOT_NUMERIC: &str = "Grade could not be parsed. Check to make sure it is a number";
pub const GRADE_OUT_OF_RANGE: &str = "The grade must be an integer between -5 and 5, inclusive";

/// User-facing messages collected over a whole submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(message);
        errors
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|existing| existing == message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A food submission that passed every field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidFood {
    pub barcode: Barcode,
    pub name: String,
    pub ingredients: String,
}

/// Barcode taken from a lookup query. A blank query value is reported as
/// non-numeric, the same as any other unparsable input.
pub fn parse_barcode(raw: &str) -> Result<Barcode, ValidationErrors> {
    Barcode::parse(raw).map_err(|_| ValidationErrors::single(BARCODE_NOT_NUMERIC))
}

pub fn validate_food(form: &FoodForm) -> Result<ValidFood, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let barcode = match Barcode::parse(&form.barcode) {
        Ok(barcode) => Some(barcode),
        Err(err) => {
            errors.push(barcode_message(&err));
            None
        }
    };

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(NAME_EMPTY);
    }

    let ingredients = form.ingredients.trim().to_lowercase();
    if ingredients.is_empty() {
        errors.push(INGREDIENTS_EMPTY);
    }

    match barcode {
        Some(barcode) if errors.is_empty() => Ok(ValidFood {
            barcode,
            name: name.to_string(),
            ingredients,
        }),
        _ => Err(errors),
    }
}

pub fn validate_ingredient(form: &IngredientForm) -> Result<Ingredient, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = IngredientName::new(&form.name);
    if name.is_empty() {
        errors.push(NAME_EMPTY);
    }

    let grade = if form.grade.trim().is_empty() {
        errors.push(GRADE_EMPTY);
        None
    } else {
        match IngredientGrade::parse(&form.grade) {
            Ok(grade) => Some(grade),
            Err(GradeError::NotANumber(_)) => {
                errors.push(GRADE_NOT_NUMERIC);
                None
            }
            Err(GradeError::OutOfRange(_)) => {
                errors.push(GRADE_OUT_OF_RANGE);
                None
            }
        }
    };

    match grade {
        Some(grade) if errors.is_empty() => Ok(Ingredient { name, grade }),
        _ => Err(errors),
    }
}

pub fn food_exists_message(barcode: &Barcode) -> String {
    format!("Food with barcode: {barcode} already exists")
}

pub fn ingredient_exists_message(name: &IngredientName) -> String {
    format!("Ingredient {name} already exists")
}

fn barcode_message(err: &BarcodeError) -> &'static str {
    match err {
        BarcodeError::Empty => BARCODE_EMPTY,
        BarcodeError::NotNumeric(_) => BARCODE_NOT_NUMERIC,
    }
}
