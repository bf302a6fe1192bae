//! # Store Request Primitives
//!
//! Typed description of the requests the façade sends to the relational store:
//!
//! -   [`Projection`]: which columns of a table are returned, and which related
//!     tables are embedded inline (one hop along a foreign key, recursively).
//! -   [`Eq`]: an equality filter on a column. Values are kept as text and cast by
//!     the store to the column type.
//! -   [`Select`], [`Insert`], [`Update`]: table scoped operations.
//!
//! These types carry no SQL, see [`super::SelectQueryBuilder`] and friends for that.

use crate::types::{Row, Table};

/// Column selection for a table
#[derive(Debug, Clone, PartialEq)]
pub enum Columns {
    /// Every column of the table, in catalog order (`*`)
    All,
    Only(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub table: Table,
    pub columns: Columns,
    pub embeds: Vec<Projection>,
}

impl Projection {
    pub fn of(table: Table) -> Self {
        Self {
            table,
            columns: Columns::All,
            embeds: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.columns = Columns::Only(columns.to_vec());
        self
    }

    pub fn embed(mut self, embed: Projection) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Resolves the column names of this projection against the catalog.
    pub fn column_names(&self) -> Result<Vec<&'static str>, super::Error> {
        match &self.columns {
            Columns::All => Ok(self.table.columns().iter().map(|c| c.name).collect()),
            Columns::Only(columns) => {
                for column in columns {
                    check_column(self.table, column)?;
                }
                Ok(columns.clone())
            }
        }
    }
}

/// Shorthand for an embedded table projection
pub fn embed(table: Table) -> Projection {
    Projection::of(table)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Eq {
    pub column: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Projection,
    pub filters: Vec<Eq>,
}

impl Select {
    pub fn from(table: Table) -> Self {
        Self {
            projection: Projection::of(table),
            filters: Vec::new(),
        }
    }

    pub fn table(&self) -> Table {
        self.projection.table
    }

    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.projection = self.projection.columns(columns);
        self
    }

    pub fn embed(mut self, embed: Projection) -> Self {
        self.projection = self.projection.embed(embed);
        self
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push(Eq {
            column,
            value: value.into(),
        });
        self
    }
}

/// Insertion of a single row, returning the inserted row.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Table,
    pub row: Row,
}

impl Insert {
    pub fn row(table: Table, row: Row) -> Self {
        Self { table, row }
    }
}

/// Update of the rows matching `filters`, returning the updated rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Table,
    pub set: Row,
    pub filters: Vec<Eq>,
}

impl Update {
    pub fn set(table: Table, set: Row) -> Self {
        Self {
            table,
            set,
            filters: Vec::new(),
        }
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push(Eq {
            column,
            value: value.into(),
        });
        self
    }
}

pub(super) fn check_column(table: Table, column: &str) -> Result<(), super::Error> {
    if table.column(column).is_none() {
        return Err(super::Error::UnknownColumn {
            table: table.name(),
            column: column.to_owned(),
        });
    }
    Ok(())
}
