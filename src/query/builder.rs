//! SQL compilation of store requests.
//!
//! Every request compiles into a single statement returning one JSON object per row
//! (column `row`). Objects are built with `json_build_object` so that keys follow the
//! catalog column order. Embedded tables are correlated subqueries:
//!
//! * many-to-one: `(SELECT json_build_object(..) FROM t1 WHERE t1.pk = t0.fk)`, `null` when
//!   the foreign key is `NULL`
//! * one-to-many: `COALESCE((SELECT json_agg(..) FROM t1 WHERE t1.fk = t0.pk), '[]')`
//!
//! Identifiers come from the catalog and are checked before being written into the query,
//! values are always bound.

use crate::types::{self, Relation, Row, Table};

use super::{Eq, Error, Insert, Projection, Select, Update, check_column};

/// Name of the JSON column holding each returned row
pub const ROW_COLUMN: &str = "row";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Compared against a column, cast by the database to the column type
    Text(String),
    /// A record to be expanded with `jsonb_populate_record`
    Json(Row),
}

#[derive(Debug)]
pub struct CompiledQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl CompiledQuery {
    fn new() -> Self {
        Self {
            sql: String::new(),
            values: Vec::new(),
        }
    }

    /// Pushes a value and returns its placeholder (`$n`)
    fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

pub struct SelectQueryBuilder;

impl SelectQueryBuilder {
    pub fn build(select: &Select) -> Result<CompiledQuery, Error> {
        let table = select.table();
        let mut query = CompiledQuery::new();
        let mut aliases = AliasGen::default();

        let alias = aliases.next();
        let object = json_object(&select.projection, &alias, &mut aliases)?;
        let clause = where_clause(table, &alias, &select.filters, &mut query)?;

        query.sql = format!(
            "SELECT {object} AS {ROW_COLUMN} FROM {table} {alias}{clause} ORDER BY {}",
            order_by(table, &alias)
        );

        Ok(query)
    }
}

pub struct InsertQueryBuilder;

impl InsertQueryBuilder {
    pub fn build(insert: &Insert) -> Result<CompiledQuery, Error> {
        let table = insert.table;
        let mut query = CompiledQuery::new();
        let mut aliases = AliasGen::default();

        let alias = aliases.next();
        let returning = json_object(&Projection::of(table), &alias, &mut aliases)?;

        if insert.row.is_empty() {
            query.sql = format!(
                "INSERT INTO {table} AS {alias} DEFAULT VALUES RETURNING {returning} AS {ROW_COLUMN}"
            );
            return Ok(query);
        }

        let columns = row_columns(table, &insert.row)?.join(", ");
        let record = query.bind(Value::Json(insert.row.clone()));

        query.sql = format!(
            "INSERT INTO {table} AS {alias} ({columns}) \
            SELECT {columns} FROM jsonb_populate_record(NULL::{table}, {record}) \
            RETURNING {returning} AS {ROW_COLUMN}"
        );

        Ok(query)
    }
}

pub struct UpdateQueryBuilder;

impl UpdateQueryBuilder {
    /// An update without columns to set touches nothing and returns no rows.
    pub fn build(update: &Update) -> Result<CompiledQuery, Error> {
        let table = update.table;
        let mut query = CompiledQuery::new();
        let mut aliases = AliasGen::default();

        let alias = aliases.next();
        let returning = json_object(&Projection::of(table), &alias, &mut aliases)?;

        if update.set.is_empty() {
            query.sql =
                format!("SELECT {returning} AS {ROW_COLUMN} FROM {table} {alias} WHERE false");
            return Ok(query);
        }

        let assignments = row_columns(table, &update.set)?
            .iter()
            .map(|c| format!("{c} = src.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let record = query.bind(Value::Json(update.set.clone()));
        let clause = where_clause(table, &alias, &update.filters, &mut query)?;

        query.sql = format!(
            "UPDATE {table} AS {alias} SET {assignments} \
            FROM jsonb_populate_record(NULL::{table}, {record}) AS src{clause} \
            RETURNING {returning} AS {ROW_COLUMN}"
        );

        Ok(query)
    }
}

#[derive(Default)]
struct AliasGen(usize);

impl AliasGen {
    fn next(&mut self) -> String {
        let alias = format!("t{}", self.0);
        self.0 += 1;
        alias
    }
}

fn json_object(
    projection: &Projection,
    alias: &str,
    aliases: &mut AliasGen,
) -> Result<String, Error> {
    let mut args: Vec<String> = projection
        .column_names()?
        .into_iter()
        .map(|c| format!("'{c}', {alias}.{c}"))
        .collect();

    for embed in &projection.embeds {
        let base = projection.table;
        let target = embed.table;

        let relation = types::relation(base, target).ok_or(Error::UnrelatedTables {
            base: base.name(),
            target: target.name(),
        })?;

        let child = aliases.next();
        let object = json_object(embed, &child, aliases)?;

        let subquery = match relation {
            Relation::ManyToOne { fk, target_pk } => format!(
                "(SELECT {object} FROM {target} {child} WHERE {child}.{target_pk} = {alias}.{fk})"
            ),
            Relation::OneToMany { fk, base_pk } => format!(
                "COALESCE((SELECT json_agg({object} ORDER BY {}) FROM {target} {child} \
                WHERE {child}.{fk} = {alias}.{base_pk}), '[]'::json)",
                order_by(target, &child)
            ),
        };

        args.push(format!("'{target}', {subquery}"));
    }

    Ok(format!("json_build_object({})", args.join(", ")))
}

fn where_clause(
    table: Table,
    alias: &str,
    filters: &[Eq],
    query: &mut CompiledQuery,
) -> Result<String, Error> {
    if filters.is_empty() {
        return Ok(String::new());
    }

    let mut clauses = Vec::with_capacity(filters.len());
    for filter in filters {
        let column = table
            .column(filter.column)
            .ok_or_else(|| Error::UnknownColumn {
                table: table.name(),
                column: filter.column.to_owned(),
            })?;
        let placeholder = query.bind(Value::Text(filter.value.clone()));
        clauses.push(format!(
            "{alias}.{} = {placeholder}::{}",
            column.name,
            column.sql_type.as_sql()
        ));
    }

    Ok(format!(" WHERE {}", clauses.join(" AND ")))
}

fn order_by(table: Table, alias: &str) -> String {
    table
        .primary_key()
        .map(|c| format!("{alias}.{}", c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_columns(table: Table, row: &Row) -> Result<Vec<String>, Error> {
    row.keys()
        .map(|k| check_column(table, k).map(|_| k.clone()))
        .collect()
}
