//! Builds parameterized SQL for JSONB-backed collections.
//! Each collection is a table `(id TEXT PRIMARY KEY, payload JSONB, created_at, updated_at)`.

use crate::query::Filter;
use crate::store::{FindQuery, ReturnDocument};

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// SQL text plus text parameters bound in order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: &str) -> usize {
        self.params.push(v.to_string());
        self.params.len()
    }

    /// ` WHERE payload ->> $n = $m AND ...`, or empty for an empty filter.
    fn where_clause(&mut self, filter: &Filter) -> String {
        let mut parts = Vec::with_capacity(filter.len());
        for (field, value) in filter.iter() {
            let key = self.push_param(field);
            let val = self.push_param(value);
            parts.push(format!("payload ->> ${} = ${}", key, val));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }
}

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))
}

pub fn create_collection(schema: &str, collection: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         id TEXT PRIMARY KEY, \
         payload JSONB NOT NULL DEFAULT '{{}}'::jsonb, \
         created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
         updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
        qualified_table(schema, collection)
    )
}

/// Binds: $1 id, $2 payload.
pub fn insert(schema: &str, collection: &str) -> String {
    format!(
        "INSERT INTO {} (id, payload) VALUES ($1, $2::jsonb) RETURNING id, payload",
        qualified_table(schema, collection)
    )
}

/// Binds: $1 id.
pub fn select_by_id(schema: &str, collection: &str) -> String {
    format!(
        "SELECT id, payload FROM {} WHERE id = $1",
        qualified_table(schema, collection)
    )
}

/// Binds: $1 id, $2 changes. Top-level keys of the changes replace the stored ones.
pub fn update_by_id(schema: &str, collection: &str, return_document: ReturnDocument) -> String {
    let table = qualified_table(schema, collection);
    match return_document {
        ReturnDocument::After => format!(
            "UPDATE {} SET payload = payload || $2::jsonb, updated_at = NOW() WHERE id = $1 RETURNING id, payload",
            table
        ),
        ReturnDocument::Before => format!(
            "WITH prev AS (SELECT id, payload FROM {t} WHERE id = $1 FOR UPDATE) \
             UPDATE {t} AS cur SET payload = cur.payload || $2::jsonb, updated_at = NOW() \
             FROM prev WHERE cur.id = prev.id RETURNING prev.id, prev.payload",
            t = table
        ),
    }
}

/// Binds: $1 id.
pub fn delete_by_id(schema: &str, collection: &str) -> String {
    format!("DELETE FROM {} WHERE id = $1", qualified_table(schema, collection))
}

pub fn count(schema: &str, collection: &str, filter: &Filter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(filter);
    q.sql = format!(
        "SELECT COUNT(*) FROM {}{}",
        qualified_table(schema, collection),
        where_clause
    );
    q
}

/// Filtered scan; LIMIT/OFFSET are inlined. No ORDER BY: order is whatever the table yields.
pub fn find(schema: &str, collection: &str, query: &FindQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = q.where_clause(&query.filter);
    let limit_clause = query.limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_clause = if query.skip > 0 {
        format!(" OFFSET {}", query.skip)
    } else {
        String::new()
    };
    q.sql = format!(
        "SELECT id, payload FROM {}{}{}{}",
        qualified_table(schema, collection),
        where_clause,
        limit_clause,
        offset_clause
    );
    q
}
