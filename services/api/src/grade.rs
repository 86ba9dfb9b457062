use crate::infra::{InMemoryCatalog, InMemoryMissingLog};
use clap::Args;
use food_grader::error::AppError;
use food_grader::grading::{load_catalog, GradeOutcome, GradingService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Ingredient catalog CSV with `title,grade` columns
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Comma-separated ingredient list, as printed on the package
    #[arg(long)]
    pub(crate) ingredients: String,
    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_grade(args: GradeArgs) -> Result<(), AppError> {
    let GradeArgs {
        catalog,
        ingredients,
        json,
    } = args;

    let store = Arc::new(InMemoryCatalog::default());
    store.seed(load_catalog(&catalog)?);
    let service = GradingService::new(store, Arc::new(InMemoryMissingLog::default()));

    let outcome = service.grade(&ingredients)?;
    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Grade payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_outcome(&outcome));
    }

    Ok(())
}

fn render_outcome(outcome: &GradeOutcome) -> String {
    let mut lines = Vec::new();
    if outcome.is_resolved() {
        lines.push(format!(
            "Grade: {} ({:.2})",
            outcome.label, outcome.numeric
        ));
    } else {
        lines.push(format!("Grade: {}", outcome.label));
    }

    lines.push("Ingredients".to_string());
    for ingredient in &outcome.ingredients {
        let grade = ingredient
            .grade
            .map(|grade| grade.to_string())
            .unwrap_or_else(|| "ungraded".to_string());
        lines.push(format!("- {}: {}", ingredient.name, grade));
    }

    if !outcome.missing.is_empty() {
        let names: Vec<&str> = outcome.missing.iter().map(|name| name.as_str()).collect();
        lines.push(format!("Missing from catalog: {}", names.join(", ")));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_grader::grading::{GradeLabel, GradedIngredient, IngredientGrade, IngredientName};

    #[test]
    fn renders_resolved_outcome_with_average() {
        let outcome = GradeOutcome {
            label: GradeLabel::VeryGood,
            numeric: 3.0,
            ingredients: vec![GradedIngredient {
                name: IngredientName::new("oats"),
                grade: Some(IngredientGrade::new(3).expect("valid grade")),
            }],
            missing: Vec::new(),
        };

        let rendered = render_outcome(&outcome);
        assert!(rendered.starts_with("Grade: very good (3.00)\n"));
        assert!(rendered.contains("- oats: 3"));
        assert!(!rendered.contains("Missing from catalog"));
    }

    #[test]
    fn renders_missing_names_without_average() {
        let outcome = GradeOutcome {
            label: GradeLabel::Missing,
            numeric: 0.0,
            ingredients: vec![GradedIngredient {
                name: IngredientName::new("gum"),
                grade: None,
            }],
            missing: vec![IngredientName::new("gum")],
        };

        let rendered = render_outcome(&outcome);
        assert!(rendered.starts_with("Grade: missing\n"));
        assert!(rendered.contains("Missing from catalog: gum"));
    }
}
