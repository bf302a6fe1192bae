//! In-memory relational store for tests.
//!
//! Mirrors the behavior of the PostgreSQL store closely enough to exercise the façade
//! and the HTTP layer without a database: the constraints declared in the table catalog
//! (primary keys, NOT NULL, UNIQUE, foreign keys, enumerated values, defaults) are
//! enforced and reported with the same messages PostgreSQL uses.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Number, Value};

use crate::{
    query::{
        Columns, Eq, Insert, InsertQueryBuilder, Projection, Select, SelectQueryBuilder, Update,
        UpdateQueryBuilder,
    },
    repo::{Error, RelationalStore},
    types::{self, ColumnDef, DefaultValue, Relation, Row, SqlType, Table},
};

#[derive(Default)]
struct State {
    tables: HashMap<Table, Vec<Row>>,
    sequences: HashMap<Table, i64>,
    failing: HashMap<Table, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every request touching `table` fail with a connectivity error.
    pub fn fail_table(&self, table: Table, message: &str) {
        self.lock().failing.insert(table, message.to_owned());
    }

    /// Number of rows currently stored in `table`.
    pub fn count(&self, table: Table) -> usize {
        self.lock().rows(table).len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // a panicking test must not poison the others
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn select_sync(&self, select: &Select) -> Result<Vec<Row>, Error> {
        SelectQueryBuilder::build(select)?;

        let state = self.lock();
        state.check_available(select.table())?;

        let filters = state.compile_filters(select.table(), &select.filters)?;
        let mut rows: Vec<&Row> = state
            .rows(select.table())
            .iter()
            .filter(|row| matches(row, &filters))
            .collect();
        rows.sort_by_key(|row| primary_key(select.table(), row));

        Ok(rows
            .into_iter()
            .map(|row| state.project(&select.projection, row))
            .collect())
    }

    fn insert_sync(&self, insert: &Insert) -> Result<Vec<Row>, Error> {
        InsertQueryBuilder::build(insert)?;

        let mut state = self.lock();
        let table = insert.table;
        state.check_available(table)?;

        let mut row = Row::new();
        for column in table.columns() {
            let value = match insert.row.get(column.name) {
                Some(value) => coerce(column, value)?,
                None if column.auto => Value::Number(state.next_id(table).into()),
                None => match column.default {
                    Some(DefaultValue::Now) => Value::String(now()),
                    None => Value::Null,
                },
            };
            row.insert(column.name.to_owned(), value);
        }

        state.check_row(table, &row, None)?;
        state.tables.entry(table).or_default().push(row.clone());

        Ok(vec![row])
    }

    fn update_sync(&self, update: &Update) -> Result<Vec<Row>, Error> {
        UpdateQueryBuilder::build(update)?;

        let mut state = self.lock();
        let table = update.table;
        state.check_available(table)?;

        if update.set.is_empty() {
            return Ok(Vec::new());
        }

        let filters = state.compile_filters(table, &update.filters)?;
        let positions: Vec<usize> = state
            .rows(table)
            .iter()
            .enumerate()
            .filter(|(_, row)| matches(row, &filters))
            .map(|(i, _)| i)
            .collect();

        let mut updated = Vec::with_capacity(positions.len());
        for pos in positions {
            let mut row = state.rows(table)[pos].clone();
            for (name, value) in &update.set {
                // columns have been checked by the query builder
                if let Some(column) = table.column(name) {
                    row.insert(name.clone(), coerce(column, value)?);
                }
            }
            state.check_row(table, &row, Some(pos))?;
            updated.push((pos, row));
        }

        let rows = state.tables.entry(table).or_default();
        for (pos, row) in &updated {
            rows[*pos] = row.clone();
        }

        Ok(updated.into_iter().map(|(_, row)| row).collect())
    }
}

impl RelationalStore for MemoryStore {
    async fn select(&self, select: &Select) -> Result<Vec<Row>, Error> {
        self.select_sync(select)
    }

    async fn insert(&self, insert: &Insert) -> Result<Vec<Row>, Error> {
        self.insert_sync(insert)
    }

    async fn update(&self, update: &Update) -> Result<Vec<Row>, Error> {
        self.update_sync(update)
    }
}

impl State {
    fn rows(&self, table: Table) -> &[Row] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or_default()
    }

    fn next_id(&mut self, table: Table) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn check_available(&self, table: Table) -> Result<(), Error> {
        match self.failing.get(&table) {
            Some(msg) => Err(Error::ConnectivityFailure(msg.clone())),
            None => Ok(()),
        }
    }

    fn compile_filters(
        &self,
        table: Table,
        filters: &[Eq],
    ) -> Result<Vec<(&'static str, Value)>, Error> {
        filters
            .iter()
            .map(|f| {
                let column = table.column(f.column).ok_or_else(|| {
                    Error::ConnectivityFailure(format!(
                        "column {}.{} does not exist",
                        table, f.column
                    ))
                })?;
                Ok((column.name, coerce(column, &Value::String(f.value.clone()))?))
            })
            .collect()
    }

    /// Checks the constraints of `row` before it is written at `position`
    /// (`None` for a new row).
    fn check_row(&self, table: Table, row: &Row, position: Option<usize>) -> Result<(), Error> {
        let others = || {
            self.rows(table)
                .iter()
                .enumerate()
                .filter(move |(i, _)| Some(*i) != position)
                .map(|(_, r)| r)
        };

        for column in table.columns() {
            let value = row.get(column.name).unwrap_or(&Value::Null);

            if value.is_null() {
                if column.rejects_null() {
                    return Err(Error::ConstraintViolation(format!(
                        "null value in column \"{}\" of relation \"{table}\" violates not-null constraint",
                        column.name
                    )));
                }
                continue;
            }

            if !column.allowed.is_empty() && !column.allowed.iter().any(|a| value == a) {
                return Err(Error::ConstraintViolation(format!(
                    "new row for relation \"{table}\" violates check constraint \"{table}_{}_check\"",
                    column.name
                )));
            }

            if column.unique && others().any(|r| r.get(column.name) == Some(value)) {
                return Err(Error::ConstraintViolation(format!(
                    "duplicate key value violates unique constraint \"{table}_{}_key\"",
                    column.name
                )));
            }

            if let Some(target) = column.references {
                let exists = target.primary_key().next().is_some_and(|pk| {
                    self.rows(target).iter().any(|r| r.get(pk.name) == Some(value))
                });
                if !exists {
                    return Err(Error::ConstraintViolation(format!(
                        "insert or update on table \"{table}\" violates foreign key constraint \"{table}_{}_fkey\"",
                        column.name
                    )));
                }
            }
        }

        let key = primary_key(table, row);
        if others().any(|r| primary_key(table, r) == key) {
            return Err(Error::ConstraintViolation(format!(
                "duplicate key value violates unique constraint \"{table}_pkey\""
            )));
        }

        Ok(())
    }

    fn project(&self, projection: &Projection, row: &Row) -> Row {
        let mut out = Row::new();

        let names: Vec<&str> = match &projection.columns {
            Columns::All => projection.table.columns().iter().map(|c| c.name).collect(),
            Columns::Only(columns) => columns.clone(),
        };
        for name in names {
            out.insert(
                name.to_owned(),
                row.get(name).cloned().unwrap_or(Value::Null),
            );
        }

        for embed in &projection.embeds {
            let target = embed.table;
            let value = match types::relation(projection.table, target) {
                Some(Relation::ManyToOne { fk, target_pk }) => {
                    let key = row.get(fk).filter(|v| !v.is_null());
                    key.and_then(|key| {
                        self.rows(target)
                            .iter()
                            .find(|r| r.get(target_pk) == Some(key))
                    })
                    .map(|r| Value::Object(self.project(embed, r)))
                    .unwrap_or(Value::Null)
                }
                Some(Relation::OneToMany { fk, base_pk }) => {
                    let key = row.get(base_pk);
                    let mut related: Vec<&Row> = self
                        .rows(target)
                        .iter()
                        .filter(|r| key.is_some() && r.get(fk) == key)
                        .collect();
                    related.sort_by_key(|r| primary_key(target, r));
                    Value::Array(
                        related
                            .into_iter()
                            .map(|r| Value::Object(self.project(embed, r)))
                            .collect(),
                    )
                }
                // rejected by the query builder
                None => Value::Null,
            };
            out.insert(target.name().to_owned(), value);
        }

        out
    }
}

fn matches(row: &Row, filters: &[(&'static str, Value)]) -> bool {
    filters
        .iter()
        .all(|(column, value)| row.get(*column) == Some(value))
}

fn primary_key(table: Table, row: &Row) -> Vec<i64> {
    table
        .primary_key()
        .map(|c| row.get(c.name).and_then(Value::as_i64).unwrap_or_default())
        .collect()
}

/// Converts `value` to the representation the database would return for `column`.
fn coerce(column: &ColumnDef, value: &Value) -> Result<Value, Error> {
    let invalid = || {
        Error::ConstraintViolation(format!(
            "invalid input syntax for type {}: \"{}\"",
            column.sql_type.as_sql(),
            text(value)
        ))
    };

    if value.is_null() {
        return Ok(Value::Null);
    }

    match column.sql_type {
        SqlType::Integer => {
            let n = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            n.map(|n| Value::Number(n.into())).ok_or_else(invalid)
        }
        SqlType::Numeric => match value {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        },
        SqlType::Varchar | SqlType::Text | SqlType::Timestamp => Ok(Value::String(text(value))),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn now() -> String {
    chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
