//! MySQL-backed catalog and missing-ingredient log.

mod schema;

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use food_grader::config::DatabaseConfig;
use food_grader::grading::{
    Barcode, CatalogRepository, Food, GradeLabel, Ingredient, IngredientGrade, IngredientLookup,
    IngredientName, MissingIngredientRecorder, RecorderError, RepositoryError,
};
use tracing::error;

type DbPool = r2d2::Pool<ConnectionManager<MysqlConnection>>;
type FoodRow = (String, String, String, String, f64);

const POOL_SIZE: u32 = 8;

/// Opens one pool shared by the catalog and the missing-ingredient log.
pub(crate) fn connect(
    config: &DatabaseConfig,
) -> Result<(MysqlCatalog, MysqlMissingLog), RepositoryError> {
    let manager = ConnectionManager::<MysqlConnection>::new(config.url());
    let pool = r2d2::Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;

    Ok((
        MysqlCatalog { pool: pool.clone() },
        MysqlMissingLog { pool },
    ))
}

fn checkout(
    pool: &DbPool,
) -> Result<PooledConnection<ConnectionManager<MysqlConnection>>, RepositoryError> {
    pool.get()
        .map_err(|err| RepositoryError::Unavailable(err.to_string()))
}

fn storage_error(err: DieselError) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::Conflict
        }
        other => RepositoryError::Unavailable(other.to_string()),
    }
}

fn food_from_row(row: FoodRow) -> Result<Food, RepositoryError> {
    let (barcode, title, ingredients, grade, numgrade) = row;
    let barcode = Barcode::parse(&barcode).map_err(|err| {
        error!(%barcode, error = %err, "stored food has an invalid barcode");
        RepositoryError::Unavailable(format!("stored barcode {barcode} is invalid"))
    })?;
    let grade = GradeLabel::from_label(&grade).ok_or_else(|| {
        RepositoryError::Unavailable(format!("stored grade {grade} is not a known label"))
    })?;

    Ok(Food {
        barcode,
        name: title,
        ingredients,
        grade,
        numgrade,
    })
}

#[derive(Clone)]
pub(crate) struct MysqlCatalog {
    pool: DbPool,
}

impl IngredientLookup for MysqlCatalog {
    fn lookup(&self, name: &IngredientName) -> Result<Option<IngredientGrade>, RepositoryError> {
        use schema::ingredients::dsl::*;

        let conn = checkout(&self.pool)?;
        let stored = ingredients
            .filter(title.eq(name.as_str()))
            .select(grade)
            .first::<i32>(&*conn)
            .optional()
            .map_err(storage_error)?;

        stored
            .map(|value| {
                IngredientGrade::new(i64::from(value)).map_err(|err| {
                    RepositoryError::Unavailable(format!("stored grade for {name} is invalid: {err}"))
                })
            })
            .transpose()
    }
}

impl CatalogRepository for MysqlCatalog {
    fn insert_ingredient(&self, ingredient: Ingredient) -> Result<Ingredient, RepositoryError> {
        use schema::ingredients::dsl::*;

        let conn = checkout(&self.pool)?;
        diesel::insert_into(ingredients)
            .values((
                title.eq(ingredient.name.as_str()),
                grade.eq(i32::from(ingredient.grade.value())),
            ))
            .execute(&*conn)
            .map_err(storage_error)?;
        Ok(ingredient)
    }

    fn insert_food(&self, new_food: Food) -> Result<Food, RepositoryError> {
        use schema::food::dsl::*;

        let conn = checkout(&self.pool)?;
        diesel::insert_into(food)
            .values((
                barcode.eq(new_food.barcode.as_str()),
                title.eq(new_food.name.as_str()),
                ingredients.eq(new_food.ingredients.as_str()),
                grade.eq(new_food.grade.label()),
                numgrade.eq(new_food.numgrade),
            ))
            .execute(&*conn)
            .map_err(storage_error)?;
        Ok(new_food)
    }

    fn fetch_food(&self, wanted: &Barcode) -> Result<Option<Food>, RepositoryError> {
        use schema::food::dsl::*;

        let conn = checkout(&self.pool)?;
        food.filter(barcode.eq(wanted.as_str()))
            .first::<FoodRow>(&*conn)
            .optional()
            .map_err(storage_error)?
            .map(food_from_row)
            .transpose()
    }

    fn foods(&self) -> Result<Vec<Food>, RepositoryError> {
        use schema::food::dsl::*;

        let conn = checkout(&self.pool)?;
        food.order(barcode.asc())
            .load::<FoodRow>(&*conn)
            .map_err(storage_error)?
            .into_iter()
            .map(food_from_row)
            .collect()
    }
}

#[derive(Clone)]
pub(crate) struct MysqlMissingLog {
    pool: DbPool,
}

impl MissingIngredientRecorder for MysqlMissingLog {
    fn record(&self, name: &IngredientName) -> Result<(), RecorderError> {
        use schema::missing::dsl::*;

        let conn = self
            .pool
            .get()
            .map_err(|err| RecorderError::Unavailable(err.to_string()))?;
        diesel::insert_into(missing)
            .values(title.eq(name.as_str()))
            .execute(&*conn)
            .map_err(|err| RecorderError::Unavailable(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violations_become_conflicts() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("Duplicate entry".to_string()),
        );
        assert!(matches!(storage_error(err), RepositoryError::Conflict));
        assert!(matches!(
            storage_error(DieselError::NotFound),
            RepositoryError::Unavailable(_)
        ));
    }

    #[test]
    fn rows_map_to_foods() {
        let food = food_from_row((
            "0042".to_string(),
            "Granola".to_string(),
            "oats, honey".to_string(),
            "good".to_string(),
            2.0,
        ))
        .expect("row maps");
        assert_eq!(food.barcode.as_str(), "0042");
        assert_eq!(food.grade, GradeLabel::Good);

        let bad = food_from_row((
            "42".to_string(),
            "Granola".to_string(),
            "oats".to_string(),
            "great".to_string(),
            2.0,
        ));
        assert!(matches!(bad, Err(RepositoryError::Unavailable(_))));
    }
}
