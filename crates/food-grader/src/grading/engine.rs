//! Turns a raw, comma-separated ingredient list into a food grade.
//!
//! Each token is trimmed and lowercased, resolved through an
//! [`IngredientLookup`], and folded into a running total. An unresolved token
//! is handed to the [`MissingIngredientRecorder`] and resets the running total
//! to zero, so the numeric grade of a `missing` food only reflects ingredients
//! resolved after the last gap. Callers should ignore `numeric` whenever the
//! label is [`GradeLabel::Missing`].

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{GradeLabel, IngredientGrade, IngredientName};
use super::repository::{IngredientLookup, MissingIngredientRecorder, RepositoryError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradedIngredient {
    #[serde(rename = "title")]
    pub name: IngredientName,
    pub grade: Option<IngredientGrade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    pub label: GradeLabel,
    pub numeric: f64,
    pub ingredients: Vec<GradedIngredient>,
    pub missing: Vec<IngredientName>,
}

impl GradeOutcome {
    pub fn is_resolved(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn grade_ingredients<L, M>(
    raw: &str,
    lookup: &L,
    recorder: &M,
) -> Result<GradeOutcome, RepositoryError>
where
    L: IngredientLookup + ?Sized,
    M: MissingIngredientRecorder + ?Sized,
{
    let mut total: i64 = 0;
    let mut ingredients = Vec::new();
    let mut missing = Vec::new();

    for name in raw.split(',').map(IngredientName::new) {
        match lookup.lookup(&name)? {
            Some(grade) => {
                total += i64::from(grade.value());
                ingredients.push(GradedIngredient {
                    name,
                    grade: Some(grade),
                });
            }
            None => {
                total = 0;
                if let Err(err) = recorder.record(&name) {
                    warn!(ingredient = %name, error = %err, "failed to record missing ingredient");
                }
                missing.push(name.clone());
                ingredients.push(GradedIngredient { name, grade: None });
            }
        }
    }

    // `split` always yields at least one token, so the count is never zero.
    let numeric = total as f64 / ingredients.len() as f64;

    let label = if missing.is_empty() {
        GradeLabel::from_average(numeric).unwrap_or_else(|| {
            warn!(
                average = numeric,
                "fully resolved average matched no grade bucket; keeping default label"
            );
            GradeLabel::Missing
        })
    } else {
        GradeLabel::Missing
    };

    debug!(label = %label, numeric, missing = missing.len(), "graded ingredient list");

    Ok(GradeOutcome {
        label,
        numeric,
        ingredients,
        missing,
    })
}
