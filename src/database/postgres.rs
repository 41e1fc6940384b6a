use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use super::{
    document_id, manager, validate_collection_name, DocumentStore, IndexKind, IndexModel, StoreError, UpdateResult,
};
use crate::config::DatabaseConfig;
use crate::filter::{FieldPath, Filter, SqlResult, Update};

/// Document store over Postgres: one table per collection holding a JSONB
/// `doc` column, keyed by a generated `id` column mirroring `doc->>'_id'`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Ok(Self::new(manager::connect_pool(config).await?))
    }

    fn table(collection: &str) -> Result<String, StoreError> {
        validate_collection_name(collection)?;
        Ok(format!("\"{}\"", collection))
    }

    fn index_sql(table: &str, index: &IndexModel) -> Result<String, StoreError> {
        validate_collection_name(&index.name)?;
        let geo = index.keys.iter().any(|(_, kind)| *kind == IndexKind::Geo2dSphere);

        if geo {
            let [(path, _)] = index.keys.as_slice() else {
                return Err(StoreError::InvalidDocument("geo indexes take exactly one key".to_string()));
            };
            let lng = FieldPath::parse(&format!("{}.coordinates.0", path))?;
            let lat = FieldPath::parse(&format!("{}.coordinates.1", path))?;
            return Ok(format!(
                "CREATE INDEX IF NOT EXISTS \"{}\" ON {} USING gist (point((doc #>> {})::float8, (doc #>> {})::float8))",
                index.name,
                table,
                lng.to_pg_path(),
                lat.to_pg_path()
            ));
        }

        let keys: Vec<String> = index.keys.iter().map(|(path, _)| format!("(doc #>> {})", path.to_pg_path())).collect();
        Ok(format!(
            "CREATE {}INDEX IF NOT EXISTS \"{}\" ON {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            index.name,
            table,
            keys.join(", ")
        ))
    }

    /// The shared shape of `update_one` and `find_one_and_update`: returns
    /// `(after, before)` for the first matching document.
    async fn update_first(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<(Value, Value)>, StoreError> {
        let table = Self::table(collection)?;
        let where_sql = filter.to_sql("doc", 0);
        let set_sql = update.to_sql("target.doc", where_sql.params.len());

        let query = format!(
            "WITH target AS (SELECT id, doc FROM {table} WHERE {} ORDER BY seq LIMIT 1 FOR UPDATE) \
             UPDATE {table} AS t SET doc = {} FROM target WHERE t.id = target.id \
             RETURNING t.doc, target.doc",
            where_sql.query, set_sql.query
        );
        debug!("update_first on {}: {}", collection, query);

        let mut q = sqlx::query_as::<_, (Value, Value)>(&query);
        for param in where_sql.params.iter().chain(set_sql.params.iter()) {
            q = q.bind(param);
        }
        q.fetch_optional(&self.pool).await.map_err(map_sqlx_error)
    }

    async fn select(&self, collection: &str, filter: &Filter, limit: Option<u32>) -> Result<Vec<Value>, StoreError> {
        let table = Self::table(collection)?;
        let SqlResult { query: where_clause, params } = filter.to_sql("doc", 0);
        let limit_clause = limit.map(|l| format!(" LIMIT {}", l)).unwrap_or_default();
        let query = format!("SELECT doc FROM {} WHERE {} ORDER BY seq{}", table, where_clause, limit_clause);
        debug!("select on {}: {}", collection, query);

        let mut q = sqlx::query_scalar::<_, Value>(&query);
        for param in &params {
            q = q.bind(param);
        }
        q.fetch_all(&self.pool).await.map_err(map_sqlx_error)
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("_id").to_string();
            return StoreError::DuplicateKey(constraint);
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn create_collection(&self, collection: &str) -> Result<(), StoreError> {
        let table = Self::table(collection)?;
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                seq BIGSERIAL, \
                id TEXT GENERATED ALWAYS AS (doc ->> '_id') STORED PRIMARY KEY, \
                doc JSONB NOT NULL)",
            table
        );
        sqlx::query(&query).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_one(&self, collection: &str, doc: Value) -> Result<(), StoreError> {
        let table = Self::table(collection)?;
        document_id(&doc)?;
        let query = format!("INSERT INTO {} (doc) VALUES ($1)", table);
        sqlx::query(&query).bind(&doc).execute(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        self.select(collection, filter, None).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError> {
        Ok(self.select(collection, filter, Some(1)).await?.into_iter().next())
    }

    async fn update_one(&self, collection: &str, filter: &Filter, update: &Update) -> Result<UpdateResult, StoreError> {
        Ok(match self.update_first(collection, filter, update).await? {
            Some((after, before)) => UpdateResult { matched: 1, modified: u64::from(after != before) },
            None => UpdateResult::default(),
        })
    }

    async fn find_one_and_update(&self, collection: &str, filter: &Filter, update: &Update) -> Result<Option<Value>, StoreError> {
        Ok(self.update_first(collection, filter, update).await?.map(|(after, _)| after))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let table = Self::table(collection)?;
        let SqlResult { query: where_clause, params } = filter.to_sql("doc", 0);
        let query = format!(
            "DELETE FROM {table} WHERE id = (SELECT id FROM {table} WHERE {} ORDER BY seq LIMIT 1)",
            where_clause
        );
        debug!("delete_one on {}: {}", collection, query);

        let mut q = sqlx::query(&query);
        for param in &params {
            q = q.bind(param);
        }
        Ok(q.execute(&self.pool).await?.rows_affected())
    }

    async fn create_index(&self, collection: &str, index: &IndexModel) -> Result<(), StoreError> {
        let query = Self::index_sql(&Self::table(collection)?, index)?;
        debug!("create_index on {}: {}", collection, query);
        sqlx::query(&query).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
