use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::records::{Page, RecordFilter};
use crate::infrastructure::db::PgPool;

/// Table layout shared by the record list/get/delete queries.
pub struct ListSpec {
    pub table: &'static str,
    pub columns: &'static str,
    /// Columns matched case-insensitively by `q`.
    pub search: &'static [&'static str],
    /// Column compared with the `status` filter.
    pub status: Option<&'static str>,
    pub project_col: Option<&'static str>,
    pub program_col: Option<&'static str>,
}

pub type RowMapper<R> = fn(&PgRow) -> anyhow::Result<R>;

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, spec: &ListSpec, filter: &RecordFilter) {
    qb.push(" WHERE TRUE");
    if let Some(pattern) = filter.search() {
        qb.push(" AND (");
        for (i, col) in spec.search.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*col)
                .push(" ILIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\'");
        }
        qb.push(")");
    }
    if let (Some(col), Some(status)) = (spec.status, filter.status()) {
        qb.push(" AND ")
            .push(col)
            .push(" = ")
            .push_bind(status.to_lowercase());
    }
    if let (Some(col), Some(id)) = (spec.project_col, filter.project_id) {
        qb.push(" AND ").push(col).push(" = ").push_bind(id);
    }
    if let (Some(col), Some(id)) = (spec.program_col, filter.program_id) {
        qb.push(" AND ").push(col).push(" = ").push_bind(id);
    }
}

pub async fn list_page<R>(
    pool: &PgPool,
    spec: &ListSpec,
    filter: &RecordFilter,
    map: RowMapper<R>,
) -> anyhow::Result<Page<R>> {
    let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", spec.table));
    push_where(&mut count, spec, filter);
    let total = count
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", spec.columns, spec.table));
    push_where(&mut query, spec, filter);
    query
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(filter.limit())
        .push(" OFFSET ")
        .push_bind(filter.offset());
    let rows = query.build().fetch_all(pool).await?;
    let items = rows.iter().map(map).collect::<anyhow::Result<Vec<R>>>()?;
    Ok(Page {
        items,
        total,
        page: filter.page,
        per_page: filter.per_page,
    })
}

pub async fn get_one<R>(
    pool: &PgPool,
    spec: &ListSpec,
    id: Uuid,
    map: RowMapper<R>,
) -> anyhow::Result<Option<R>> {
    let sql = format!("SELECT {} FROM {} WHERE id = $1", spec.columns, spec.table);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(map).transpose()
}

pub async fn delete_one(pool: &PgPool, spec: &ListSpec, id: Uuid) -> anyhow::Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = $1", spec.table);
    let res = sqlx::query(&sql).bind(id).execute(pool).await?;
    Ok(res.rows_affected() > 0)
}
