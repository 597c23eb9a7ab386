//! PostgreSQL document store: one JSONB table per collection.

use crate::config::ModelDescriptor;
use crate::error::StoreError;
use crate::query::{Filter, Projection};
use crate::sql;
use crate::store::{DeleteResult, Document, DocumentStore, FindQuery, ReturnDocument, ID_FIELD};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgDocumentStore {
            pool,
            schema: schema.into(),
        }
    }

    /// Create the schema and the collection table if missing.
    pub async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError> {
        let ddl = sql::create_schema(&self.schema);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(&self.pool).await?;
        let ddl = sql::create_collection(&self.schema, collection);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn ensure_collections(&self, models: &[ModelDescriptor]) -> Result<(), StoreError> {
        for model in models {
            self.ensure_collection(&model.name).await?;
        }
        Ok(())
    }
}

/// Stored payload plus its identifier under `ID_FIELD`.
fn row_to_document(row: &PgRow) -> Result<Document, StoreError> {
    let id: String = row.try_get("id")?;
    let payload: Value = row.try_get("payload")?;
    let mut doc = match payload {
        Value::Object(m) => m,
        other => {
            return Err(StoreError::Backend(format!(
                "record {} has a non-object payload: {}",
                id, other
            )))
        }
    };
    doc.insert(ID_FIELD.into(), Value::String(id));
    Ok(doc)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, mut data: Document) -> Result<Value, StoreError> {
        data.remove(ID_FIELD);
        let id = uuid::Uuid::new_v4().to_string();
        let sql = sql::insert(&self.schema, collection);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query(&sql)
            .bind(&id)
            .bind(Value::Object(data))
            .fetch_one(&self.pool)
            .await?;
        Ok(Value::Object(row_to_document(&row)?))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        projection: &Projection,
    ) -> Result<Option<Value>, StoreError> {
        let sql = sql::select_by_id(&self.schema, collection);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(Value::Object(projection.apply(row_to_document(&row)?)?))),
            None => Ok(None),
        }
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        mut data: Document,
        return_document: ReturnDocument,
    ) -> Result<Option<Value>, StoreError> {
        data.remove(ID_FIELD);
        let sql = sql::update_by_id(&self.schema, collection, return_document);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(data))
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(Value::Object(row_to_document(&row)?))),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<DeleteResult, StoreError> {
        let sql = sql::delete_by_id(&self.schema, collection);
        tracing::debug!(sql = %sql, id = %id, "query");
        let res = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected(),
        })
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let q = sql::count(&self.schema, collection, filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(p);
        }
        let n = query.fetch_one(&self.pool).await?;
        Ok(n.max(0) as u64)
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> Result<Vec<Value>, StoreError> {
        let q = sql::find(&self.schema, collection, query);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut stmt = sqlx::query(&q.sql);
        for p in &q.params {
            stmt = stmt.bind(p);
        }
        let rows = stmt.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<Value, StoreError> {
                let doc = row_to_document(row)?;
                Ok(Value::Object(query.projection.apply(doc)?))
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| StoreError::Backend("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}
