use sqlx::{Pool, Postgres};

use crate::domain::records::ValidationError;

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const FOREIGN_KEY_VIOLATION: &str = "23503";
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// Foreign key violations become `ValidationError::UnknownReference` naming
/// the offending column; everything else passes through.
pub fn map_write_error(err: sqlx::Error) -> anyhow::Error {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let field = db
                .constraint()
                .map(fk_column)
                .unwrap_or_else(|| "reference".to_string());
            return ValidationError::UnknownReference(field).into();
        }
    }
    err.into()
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// `projects_program_id_fkey` -> `program_id`. Table names carry no
/// underscores, so the column is everything after the first one.
fn fk_column(constraint: &str) -> String {
    let trimmed = constraint.strip_suffix("_fkey").unwrap_or(constraint);
    match trimmed.split_once('_') {
        Some((_, column)) if !column.is_empty() => column.to_string(),
        _ => trimmed.to_string(),
    }
}

pub mod repositories;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_map_to_columns() {
        assert_eq!(fk_column("projects_program_id_fkey"), "program_id");
        assert_eq!(fk_column("distributions_beneficiary_id_fkey"), "beneficiary_id");
        assert_eq!(fk_column("odd"), "odd");
    }
}
