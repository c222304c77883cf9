//! PostgreSQL-backed [`GameStore`].
//!
//! The `games` table is expected to exist already:
//!
//! ```sql
//! CREATE TABLE <schema>.games (
//!     id SERIAL PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     genre TEXT NOT NULL,
//!     size TEXT,
//!     rating NUMERIC,
//!     downloads TEXT,
//!     year INTEGER,
//!     cover_url TEXT,
//!     tag TEXT,
//!     is_new BOOLEAN,
//!     description TEXT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use arcadia_core::prelude::*;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

const TABLE: &str = "games";

#[derive(sqlx::FromRow)]
struct GameRow {
    id: i64,
    title: String,
    genre: String,
    size: String,
    rating: f64,
    downloads: String,
    year: i32,
    cover_url: Option<String>,
    tag: String,
    is_new: bool,
    description: String,
    created_at: DateTime<Utc>,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            title: row.title,
            genre: row.genre,
            size: row.size,
            rating: row.rating,
            downloads: row.downloads,
            year: row.year,
            cover_url: row.cover_url,
            tag: row.tag,
            is_new: row.is_new,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// SQL text for one schema. The schema is validated, so interpolating it is safe.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Statements {
    list: String,
    insert: String,
    delete: String,
}

impl Statements {
    fn new(schema: &SchemaName) -> Self {
        let table = schema.qualify(TABLE);
        Self {
            list: format!(
                "SELECT id::bigint AS id, title, genre, COALESCE(size, '') AS size, \
                 COALESCE(rating, 0)::float8 AS rating, COALESCE(downloads, '0') AS downloads, \
                 COALESCE(year, {DEFAULT_YEAR})::int4 AS year, cover_url, COALESCE(tag, '') AS tag, \
                 COALESCE(is_new, true) AS is_new, COALESCE(description, '') AS description, \
                 created_at::timestamptz AS created_at \
                 FROM {table} ORDER BY created_at DESC, id DESC"
            ),
            insert: format!(
                "INSERT INTO {table} (title, genre, size, rating, year, tag, is_new, description, cover_url, downloads) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id::bigint"
            ),
            delete: format!("DELETE FROM {table} WHERE id = $1"),
        }
    }
}

#[derive(Clone)]
pub struct PostgresGameStore {
    pool: PgPool,
    schema: SchemaName,
    statements: Arc<Statements>,
}

impl PostgresGameStore {
    pub fn new(pool: PgPool, schema: SchemaName) -> Self {
        let statements = Arc::new(Statements::new(&schema));
        Self {
            pool,
            schema,
            statements,
        }
    }

    /// Opens a connection pool for `config.database_url`.
    pub async fn connect(config: &CatalogConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {e}");
                database_error(e)
            })?;

        Ok(Self::new(pool, config.schema_name.clone()))
    }

    pub fn schema(&self) -> &SchemaName {
        &self.schema
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

impl GameStore for PostgresGameStore {
    #[instrument(skip(self), fields(schema = %self.schema))]
    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let rows: Vec<GameRow> = sqlx::query_as(&self.statements.list)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list games: {e}");
                database_error(e)
            })?;

        debug!(count = rows.len(), "Listed games");
        Ok(rows.into_iter().map(Game::from).collect())
    }

    #[instrument(skip(self, game), fields(schema = %self.schema, title = %game.title))]
    async fn insert_game(&self, game: NewGame) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(&self.statements.insert)
            .bind(&game.title)
            .bind(&game.genre)
            .bind(&game.size)
            .bind(game.rating)
            .bind(game.year)
            .bind(&game.tag)
            .bind(game.is_new)
            .bind(&game.description)
            .bind(&game.cover_url)
            .bind(&game.downloads)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert game: {e}");
                database_error(e)
            })?;

        debug!(id, "Inserted game");
        Ok(id)
    }

    #[instrument(skip(self), fields(schema = %self.schema))]
    async fn delete_game(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(&self.statements.delete)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete game: {e}");
                database_error(e)
            })?;

        debug!(rows = result.rows_affected(), "Deleted game");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_use_the_quoted_schema() {
        let schema = SchemaName::new("t_catalog").unwrap();
        let statements = Statements::new(&schema);

        assert!(statements.list.contains("FROM \"t_catalog\".\"games\" ORDER BY created_at DESC, id DESC"));
        assert!(statements.insert.starts_with("INSERT INTO \"t_catalog\".\"games\" ("));
        assert!(statements.insert.ends_with("RETURNING id::bigint"));
        assert_eq!(statements.delete, "DELETE FROM \"t_catalog\".\"games\" WHERE id = $1");
    }

    #[test]
    fn list_normalizes_nullable_columns() {
        let statements = Statements::new(&SchemaName::default());

        assert!(statements.list.contains("COALESCE(rating, 0)::float8 AS rating"));
        assert!(statements.list.contains("COALESCE(year, 2025)::int4 AS year"));
        assert!(statements.list.contains("COALESCE(is_new, true) AS is_new"));
    }

    #[test]
    fn insert_binds_every_column() {
        let statements = Statements::new(&SchemaName::default());
        let placeholders = (1..=10).map(|i| format!("${i}")).collect::<Vec<_>>().join(", ");
        assert!(statements.insert.contains(&format!("VALUES ({placeholders})")));
    }
}
