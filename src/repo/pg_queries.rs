//! PostgreSQL execution of compiled store requests.

use log::debug;
use sqlx::types::Json;

use crate::{
    query::{self, CompiledQuery, InsertQueryBuilder, SelectQueryBuilder, UpdateQueryBuilder},
    repo,
    types::Row,
};

pub async fn rows_select<'e>(
    exec: impl sqlx::PgExecutor<'e>,
    select: &query::Select,
) -> Result<Vec<Row>, repo::Error> {
    fetch_rows(exec, SelectQueryBuilder::build(select)?).await
}

pub async fn rows_insert<'e>(
    exec: impl sqlx::PgExecutor<'e>,
    insert: &query::Insert,
) -> Result<Vec<Row>, repo::Error> {
    fetch_rows(exec, InsertQueryBuilder::build(insert)?).await
}

pub async fn rows_update<'e>(
    exec: impl sqlx::PgExecutor<'e>,
    update: &query::Update,
) -> Result<Vec<Row>, repo::Error> {
    fetch_rows(exec, UpdateQueryBuilder::build(update)?).await
}

async fn fetch_rows<'e>(
    exec: impl sqlx::PgExecutor<'e>,
    compiled: CompiledQuery,
) -> Result<Vec<Row>, repo::Error> {
    debug!("{}", compiled.sql);

    let mut q = sqlx::query_scalar::<_, Json<Row>>(&compiled.sql);

    for v in compiled.values.into_iter() {
        match v {
            query::Value::Text(v) => q = q.bind(v),
            query::Value::Json(v) => q = q.bind(Json(v)),
        }
    }

    let rows = q.fetch_all(exec).await?;
    Ok(rows.into_iter().map(|Json(row)| row).collect())
}
