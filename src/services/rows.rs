//! Column-level row writes shared by the catalog services.
//!
//! DESIGN
//! ======
//! Forms produce a list of `(column, value)` pairs. Each value carries its
//! SQL type even when NULL, so binds stay typed and `QueryBuilder` can emit
//! one INSERT or UPDATE for any table. Table and column names always come
//! from code, never from request input.

use serde::Serialize;
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::CatalogError;

/// A typed column value. `None` binds a typed SQL NULL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Text(Option<String>),
    Int(Option<i32>),
    Float(Option<f64>),
    Bool(Option<bool>),
    Id(Option<Uuid>),
    TextList(Option<Vec<String>>),
}

pub type Columns = Vec<(&'static str, ColumnValue)>;

impl ColumnValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Text(v) => v.is_none(),
            Self::Int(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
            Self::Bool(v) => v.is_none(),
            Self::Id(v) => v.is_none(),
            Self::TextList(v) => v.is_none(),
        }
    }

    /// Loose truthiness: NULL, `""`, `0`, `NaN` and `false` are falsy.
    /// Lists are truthy whenever present, even when empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(v) => v.as_deref().is_some_and(|s| !s.is_empty()),
            Self::Int(v) => v.is_some_and(|n| n != 0),
            Self::Float(v) => v.is_some_and(|n| n != 0.0 && !n.is_nan()),
            Self::Bool(v) => v.unwrap_or(false),
            Self::Id(v) => v.is_some(),
            Self::TextList(v) => v.is_some(),
        }
    }

    fn push_bind(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self.clone() {
            Self::Text(v) => builder.push_bind(v),
            Self::Int(v) => builder.push_bind(v),
            Self::Float(v) => builder.push_bind(v),
            Self::Bool(v) => builder.push_bind(v),
            Self::Id(v) => builder.push_bind(v),
            Self::TextList(v) => builder.push_bind(v),
        };
    }
}

/// Build `INSERT INTO table (id, cols..) VALUES ($1, ..)`.
#[must_use]
pub fn insert_query(table: &'static str, id: Uuid, columns: &[(&'static str, ColumnValue)]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {table} (id"));
    for (column, _) in columns {
        builder.push(", ");
        builder.push(*column);
    }
    builder.push(") VALUES (");
    builder.push_bind(id);
    for (_, value) in columns {
        builder.push(", ");
        value.push_bind(&mut builder);
    }
    builder.push(")");
    builder
}

/// Build `UPDATE table SET col = $n, .., updated_at = now() WHERE id = $m`.
#[must_use]
pub fn update_query(table: &'static str, id: Uuid, columns: &[(&'static str, ColumnValue)]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {table} SET "));
    for (column, value) in columns {
        builder.push(*column);
        builder.push(" = ");
        value.push_bind(&mut builder);
        builder.push(", ");
    }
    builder.push("updated_at = now() WHERE id = ");
    builder.push_bind(id);
    builder
}

/// Insert a row with a fresh id and return that id.
///
/// # Errors
///
/// Returns a classified database error if the insert fails.
pub async fn insert_row<'e>(
    executor: impl PgExecutor<'e>,
    table: &'static str,
    columns: &[(&'static str, ColumnValue)],
) -> Result<Uuid, CatalogError> {
    let id = Uuid::new_v4();
    insert_query(table, id, columns).build().execute(executor).await?;
    Ok(id)
}

/// Update a row by id. Returns `NotFound` when no row matched.
///
/// # Errors
///
/// Returns `NotFound` or a classified database error.
pub async fn update_row<'e>(
    executor: impl PgExecutor<'e>,
    table: &'static str,
    entity: &'static str,
    id: Uuid,
    columns: &[(&'static str, ColumnValue)],
) -> Result<(), CatalogError> {
    let result = update_query(table, id, columns).build().execute(executor).await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(entity, id));
    }
    Ok(())
}

/// Delete a row by id. Returns `NotFound` when no row matched.
///
/// # Errors
///
/// Returns `NotFound` or a classified database error (e.g. the row is still
/// referenced).
pub async fn delete_row<'e>(
    executor: impl PgExecutor<'e>,
    table: &'static str,
    entity: &'static str,
    id: Uuid,
) -> Result<(), CatalogError> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(executor)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(entity, id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod tests;
