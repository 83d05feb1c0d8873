use std::str::FromStr;

use serde_json::Value;
use sqlx::Row as _;
use sqlx::query::Query;
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions,
    SqliteQueryResult,
};
use tracing::{debug, info};

use crate::libs::codec::{CellValue, FormValues, Row, decode_row};
use crate::libs::error::{Error, Result};
use crate::libs::schema::TableDescription;
use crate::libs::statement::{DeleteMode, Statement, StatementBuilder};

/// The CRUD engine. Owns the one connection the workbench talks through.
pub struct Store {
    pub database_url: String,
    pool: Option<SqlitePool>,
    delete_mode: DeleteMode,
}

impl Store {
    pub fn new(database_url: String, delete_mode: DeleteMode) -> Self {
        Self {
            database_url,
            pool: None,
            delete_mode,
        }
    }

    /// Opens the database, creating the file if it is missing.
    pub async fn connect(&mut self) -> Result<()> {
        info!(url = %self.database_url, "connecting");
        let options = SqliteConnectOptions::from_str(&self.database_url)?.create_if_missing(true);
        // a single connection that never idles out, so `sqlite::memory:` keeps its data
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        self.pool = Some(pool);
        Ok(())
    }

    /// Releases the connection. Later calls fail with the engine's "pool closed" error.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!(url = %self.database_url, "connection closed");
        }
    }

    pub(crate) fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or(Error::NotConnected)
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }

    fn bind<'q>(
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        value: CellValue,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match value {
            CellValue::Null => query.bind(None::<String>),
            CellValue::Integer(v) => query.bind(v),
            CellValue::Real(v) => query.bind(v),
            CellValue::Text(s) => query.bind(s),
            CellValue::Blob(b) => query.bind(b),
        }
    }

    async fn execute(&self, statement: Statement) -> Result<SqliteQueryResult> {
        debug!(sql = %statement.sql, params = statement.params.len(), "executing");
        let mut query = sqlx::query(&statement.sql);
        for v in statement.params {
            query = Self::bind(query, v);
        }
        Ok(query.execute(self.pool()?).await?)
    }

    // -------- Read --------
    pub async fn fetch_all(&self, description: &TableDescription) -> Result<Vec<Row>> {
        let statement = StatementBuilder::new(description).select_all();
        debug!(sql = %statement.sql, "fetching");
        let rows = sqlx::query(&statement.sql).fetch_all(self.pool()?).await?;
        Ok(rows.iter().map(decode_row).collect())
    }

    /// One more than the current maximum id, or 1 for an empty table.
    ///
    /// Only advisory: `insert` computes the id inside its own statement.
    pub async fn next_id(&self, table: &str) -> Result<i64> {
        let description = self.describe_table(table).await?;
        if description.key_column().is_none() {
            return Err(Error::MissingKey(table.to_string()));
        }
        let sql = StatementBuilder::new(&description).next_id();
        let id = sqlx::query_scalar::<_, i64>(&sql).fetch_one(self.pool()?).await?;
        Ok(id)
    }

    // -------- Insert a record --------
    /// Returns the id the statement assigned, or the rowid for tables without
    /// an id column.
    pub async fn insert(&self, description: &TableDescription, values: &FormValues) -> Result<i64> {
        let statement = StatementBuilder::new(description).insert(values)?;
        let id = if description.key_column().is_some() {
            debug!(sql = %statement.sql, params = statement.params.len(), "executing");
            let mut query = sqlx::query(&statement.sql);
            for v in statement.params {
                query = Self::bind(query, v);
            }
            let row = query.fetch_one(self.pool()?).await?;
            row.try_get::<i64, _>(0)?
        } else {
            self.execute(statement).await?.last_insert_rowid()
        };
        info!(table = %description.name, id, "row inserted");
        Ok(id)
    }

    // -------- Update record --------
    /// Returns the number of rows changed. An empty value map changes nothing
    /// and never reaches the database.
    pub async fn update(
        &self,
        description: &TableDescription,
        id: i64,
        values: &FormValues,
    ) -> Result<u64> {
        let Some(statement) = StatementBuilder::new(description).update(id, values)? else {
            return Ok(0);
        };
        let affected = self.execute(statement).await?.rows_affected();
        info!(table = %description.name, id, affected, "row updated");
        Ok(affected)
    }

    // -------- Delete record --------
    /// Returns the number of rows removed, which in full-row mode may be zero
    /// or more than one.
    pub async fn delete(&self, description: &TableDescription, row: &Row) -> Result<u64> {
        let statement = StatementBuilder::new(description).delete(row, self.delete_mode)?;
        let affected = self.execute(statement).await?.rows_affected();
        info!(table = %description.name, mode = ?self.delete_mode, affected, "rows deleted");
        Ok(affected)
    }

    /// The whole table as an array of objects keyed by column name.
    pub async fn fetch_json(&self, table: &str) -> Result<Value> {
        let description = self.describe_table(table).await?;
        let rows = self.fetch_all(&description).await?;
        Ok(Value::Array(
            rows.iter().map(|r| r.to_json(&description)).collect(),
        ))
    }

    // -------- Execute raw SQL --------
    pub async fn execute_raw(&self, sql: &str) -> Result<SqliteQueryResult> {
        Ok(sqlx::raw_sql(sql).execute(self.pool()?).await?)
    }
}
