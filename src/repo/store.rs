use std::future::Future;

use crate::{
    query::{Insert, Select, Update},
    types::Row,
};

use super::Error;

/// Relational store used by the façade.
///
/// Provides table scoped select/insert/update with column projection, equality
/// filters and relationship embedding. Implementations own all the state, callers
/// hold nothing between requests.
pub trait RelationalStore: Send + Sync + 'static {
    /// Returns every row matching `select`.
    fn select(&self, select: &Select) -> impl Future<Output = Result<Vec<Row>, Error>> + Send;

    /// Inserts a row and returns the inserted rows as stored.
    fn insert(&self, insert: &Insert) -> impl Future<Output = Result<Vec<Row>, Error>> + Send;

    /// Updates the matching rows and returns them as stored after the update.
    fn update(&self, update: &Update) -> impl Future<Output = Result<Vec<Row>, Error>> + Send;

    /// Returns the only row matching `select`. Zero or several matching rows are
    /// reported as [`Error::NotFound`].
    fn select_single(&self, select: &Select) -> impl Future<Output = Result<Row, Error>> + Send {
        async move { single(self.select(select).await?) }
    }
}

pub fn single(rows: Vec<Row>) -> Result<Row, Error> {
    if rows.len() != 1 {
        return Err(Error::not_single_row());
    }
    rows.into_iter().next().ok_or_else(Error::not_single_row)
}
