//! # Repository
//!
//! Access to the relational store holding the marketplace tables.
//!
//! [`RelationalStore`] is the seam used by the façades: it is implemented by
//! [`Repository`] on top of a PostgreSQL pool, and by `testing::MemoryStore` for tests.

use log::info;
use sqlx::postgres::PgPoolOptions;

mod error;
pub use error::*;

pub mod facades;
pub use facades::*;

mod pg_queries;
pub use pg_queries::*;

mod store;
pub use store::*;

#[cfg(any(test, feature = "testkit"))]
pub mod testing;

use crate::{
    query::{Insert, Select, Update},
    types::Row,
};

pub type Database = sqlx::Postgres;

/// PostgreSQL backed relational store.
#[derive(Clone)]
pub struct Repository {
    pool: sqlx::Pool<Database>,
}

impl Repository {
    pub fn new(pool: sqlx::Pool<Database>) -> Self {
        Self { pool }
    }

    pub async fn try_new(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("database connection pool ready (max {max_connections} connections)");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &sqlx::Pool<Database> {
        &self.pool
    }
}

impl RelationalStore for Repository {
    async fn select(&self, select: &Select) -> Result<Vec<Row>, Error> {
        rows_select(&self.pool, select).await
    }

    async fn insert(&self, insert: &Insert) -> Result<Vec<Row>, Error> {
        rows_insert(&self.pool, insert).await
    }

    async fn update(&self, update: &Update) -> Result<Vec<Row>, Error> {
        rows_update(&self.pool, update).await
    }
}
