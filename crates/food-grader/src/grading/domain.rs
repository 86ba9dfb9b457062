use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_INGREDIENT_GRADE: i8 = -5;
pub const MAX_INGREDIENT_GRADE: i8 = 5;

/// Case-folded, trimmed ingredient key. Lookups match on this value exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct IngredientName(String);

impl IngredientName {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for IngredientName {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<IngredientName> for String {
    fn from(value: IngredientName) -> Self {
        value.0
    }
}

impl fmt::Display for IngredientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Healthiness rating of a single ingredient, always within [-5, 5].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct IngredientGrade(i8);

impl IngredientGrade {
    pub fn new(value: i64) -> Result<Self, GradeError> {
        if (MIN_INGREDIENT_GRADE as i64..=MAX_INGREDIENT_GRADE as i64).contains(&value) {
            Ok(Self(value as i8))
        } else {
            Err(GradeError::OutOfRange(value))
        }
    }

    /// Parses submitted form text. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, GradeError> {
        let trimmed = raw.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| GradeError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn value(self) -> i8 {
        self.0
    }
}

impl TryFrom<i64> for IngredientGrade {
    type Error = GradeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IngredientGrade> for i64 {
    fn from(value: IngredientGrade) -> Self {
        value.0 as i64
    }
}

impl fmt::Display for IngredientGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    #[error("grade '{0}' is not a number")]
    NotANumber(String),
    #[error("grade {0} is outside -5..=5")]
    OutOfRange(i64),
}

/// Numeric product code (UPC-A in practice). Only ASCII digits are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(raw: &str) -> Result<Self, BarcodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BarcodeError::Empty);
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(BarcodeError::NotNumeric(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BarcodeError {
    #[error("barcode is empty")]
    Empty,
    #[error("barcode '{0}' contains non-digit characters")]
    NotNumeric(String),
}

/// Categorical grade stored alongside each food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLabel {
    #[serde(rename = "very bad")]
    VeryBad,
    #[serde(rename = "bad")]
    Bad,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "very good")]
    VeryGood,
    #[serde(rename = "missing")]
    Missing,
}

impl GradeLabel {
    pub fn label(self) -> &'static str {
        match self {
            GradeLabel::VeryBad => "very bad",
            GradeLabel::Bad => "bad",
            GradeLabel::Neutral => "neutral",
            GradeLabel::Good => "good",
            GradeLabel::VeryGood => "very good",
            GradeLabel::Missing => "missing",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "very bad" => Some(GradeLabel::VeryBad),
            "bad" => Some(GradeLabel::Bad),
            "neutral" => Some(GradeLabel::Neutral),
            "good" => Some(GradeLabel::Good),
            "very good" => Some(GradeLabel::VeryGood),
            "missing" => Some(GradeLabel::Missing),
            _ => None,
        }
    }

    /// Buckets a fully resolved average using half-open thresholds checked in
    /// order. Returns `None` for averages of 5 or more, which match no bucket.
    pub fn from_average(average: f64) -> Option<Self> {
        if average < -3.0 {
            Some(GradeLabel::VeryBad)
        } else if average < -1.0 {
            Some(GradeLabel::Bad)
        } else if average < 1.0 {
            Some(GradeLabel::Neutral)
        } else if average < 3.0 {
            Some(GradeLabel::Good)
        } else if average < 5.0 {
            Some(GradeLabel::VeryGood)
        } else {
            None
        }
    }
}

impl fmt::Display for GradeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(rename = "title")]
    pub name: IngredientName,
    pub grade: IngredientGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub barcode: Barcode,
    #[serde(rename = "title")]
    pub name: String,
    /// Comma-separated ingredient list as submitted (lowercased).
    pub ingredients: String,
    pub grade: GradeLabel,
    pub numgrade: f64,
}

impl Food {
    pub fn is_missing_ingredients(&self) -> bool {
        self.grade == GradeLabel::Missing
    }

    pub fn ingredient_names(&self) -> Vec<IngredientName> {
        self.ingredients.split(',').map(IngredientName::new).collect()
    }
}

/// Raw admin submission for a new food.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FoodForm {
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "ingred")]
    pub ingredients: String,
}

/// Raw admin submission for a new ingredient.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngredientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grade: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_names_fold_case_and_whitespace() {
        assert_eq!(IngredientName::new("  Sugar "), IngredientName::new("sugar"));
        assert_eq!(IngredientName::new("\tCANE SUGAR\n").as_str(), "cane sugar");
    }

    #[test]
    fn grade_parse_separates_parse_and_range_failures() {
        assert_eq!(IngredientGrade::parse(" -5 ").map(|g| g.value()), Ok(-5));
        assert_eq!(IngredientGrade::parse("6"), Err(GradeError::OutOfRange(6)));
        assert!(matches!(
            IngredientGrade::parse("2.5"),
            Err(GradeError::NotANumber(_))
        ));
        assert!(matches!(
            IngredientGrade::parse("abc"),
            Err(GradeError::NotANumber(_))
        ));
    }

    #[test]
    fn barcode_requires_digits() {
        assert!(Barcode::parse("012345678905").is_ok());
        assert_eq!(Barcode::parse("  "), Err(BarcodeError::Empty));
        assert!(matches!(
            Barcode::parse("12a4"),
            Err(BarcodeError::NotNumeric(_))
        ));
        assert!(Barcode::parse("-12").is_err());
    }

    #[test]
    fn bucket_thresholds_are_half_open() {
        assert_eq!(GradeLabel::from_average(-5.0), Some(GradeLabel::VeryBad));
        assert_eq!(GradeLabel::from_average(-3.0), Some(GradeLabel::Bad));
        assert_eq!(GradeLabel::from_average(-1.0), Some(GradeLabel::Neutral));
        assert_eq!(GradeLabel::from_average(1.0), Some(GradeLabel::Good));
        assert_eq!(GradeLabel::from_average(3.0), Some(GradeLabel::VeryGood));
        assert_eq!(GradeLabel::from_average(4.99), Some(GradeLabel::VeryGood));
        assert_eq!(GradeLabel::from_average(5.0), None);
    }

    #[test]
    fn food_serializes_with_storage_field_names() {
        let food = Food {
            barcode: Barcode::parse("123").expect("valid barcode"),
            name: "Granola".to_string(),
            ingredients: "oats, honey".to_string(),
            grade: GradeLabel::VeryGood,
            numgrade: 3.5,
        };

        let value = serde_json::to_value(&food).expect("serializes");
        assert_eq!(value["barcode"], "123");
        assert_eq!(value["title"], "Granola");
        assert_eq!(value["grade"], "very good");
        assert_eq!(value["numgrade"], 3.5);
    }

    #[test]
    fn ingredient_grade_rejects_out_of_range_json() {
        let parsed: Result<Ingredient, _> =
            serde_json::from_str(r#"{"title":"Salt","grade":9}"#);
        assert!(parsed.is_err());

        let parsed: Ingredient =
            serde_json::from_str(r#"{"title":" Salt ","grade":-2}"#).expect("valid ingredient");
        assert_eq!(parsed.name.as_str(), "salt");
        assert_eq!(parsed.grade.value(), -2);
    }
}
