use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::info;

use super::{assign_id, validate_name, Document, DocumentStore, Sort, StoreError, ID_FIELD};

const UNIQUE_VIOLATION: &str = "23505";

const CREATE_DOCUMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        seq BIGSERIAL NOT NULL,
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body JSONB NOT NULL,
        PRIMARY KEY (collection, id)
    )
"#;

/// Collections stored as JSONB rows in a single `documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it is missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_DOCUMENTS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

fn document_id(document: &Document) -> &str {
    document.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default()
}

fn map_insert_error(collection: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: db_err.constraint().unwrap_or(ID_FIELD).to_string(),
            };
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn find_one(&self, collection: &str, field: &str, value: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND body->>$2 = $3 ORDER BY seq LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let Json(body): Json<Document> = row.try_get("body")?;
                Ok(Some(body))
            }
            None => Ok(None),
        }
    }

    async fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Document>, StoreError> {
        let direction = sort.direction.as_sql();
        let query = format!(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY body->>$2 {direction}, seq {direction}"
        );

        let mut rows = sqlx::query(&query)
            .bind(collection)
            .bind(&sort.field)
            .fetch(&self.pool);

        let mut documents = Vec::new();
        while let Some(row) = rows.try_next().await? {
            let Json(body): Json<Document> = row.try_get("body")?;
            documents.push(body);
        }
        Ok(documents)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Document, StoreError> {
        let document = assign_id(document);

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(document_id(&document))
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(collection, e))?;

        Ok(document)
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for document in documents.into_iter().map(assign_id) {
            sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
                .bind(collection)
                .bind(document_id(&document))
                .bind(Json(&document))
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(collection, e))?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        validate_name(collection)?;
        validate_name(field)?;

        // Names are validated identifiers; DDL cannot take bind parameters.
        let index = format!("documents_{}_{}_key", collection, field).to_lowercase();
        let ddl = format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {index} ON documents ((body->>'{field}')) WHERE collection = '{collection}'"
        );
        sqlx::query(&ddl).execute(&self.pool).await?;

        info!("Ensured unique index {} on {}.{}", index, collection, field);
        Ok(())
    }
}
