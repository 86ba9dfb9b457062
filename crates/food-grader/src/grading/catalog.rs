//! CSV import for ingredient catalogs (`title,grade` rows).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{GradeError, Ingredient, IngredientGrade, IngredientName};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read ingredient catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ingredient catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("ingredient '{name}' has an invalid grade: {source}")]
    InvalidGrade { name: String, source: GradeError },
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(alias = "name")]
    title: String,
    grade: String,
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Ingredient>, CatalogImportError> {
    let file = File::open(path)?;
    parse_catalog(file)
}

pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<Ingredient>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut ingredients = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;
        let name = IngredientName::new(&row.title);
        let grade =
            IngredientGrade::parse(&row.grade).map_err(|source| CatalogImportError::InvalidGrade {
                name: name.to_string(),
                source,
            })?;
        ingredients.push(Ingredient { name, grade });
    }

    Ok(ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_and_normalizes_rows() {
        let csv = "title,grade\n Sugar , -4\noats,3\n";
        let ingredients = parse_catalog(Cursor::new(csv)).expect("catalog parses");

        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].name.as_str(), "sugar");
        assert_eq!(ingredients[0].grade.value(), -4);
    }

    #[test]
    fn accepts_name_header_alias() {
        let ingredients =
            parse_catalog(Cursor::new("name,grade\nkale,5\n")).expect("catalog parses");

        assert_eq!(ingredients[0].name.as_str(), "kale");
    }

    #[test]
    fn reports_row_with_bad_grade() {
        let err = parse_catalog(Cursor::new("title,grade\nlard,-9\n")).expect_err("rejects");

        match err {
            CatalogImportError::InvalidGrade { name, source } => {
                assert_eq!(name, "lard");
                assert_eq!(source, GradeError::OutOfRange(-9));
            }
            other => panic!("expected invalid grade, got {other:?}"),
        }
    }
}
