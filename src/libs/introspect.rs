use sqlx::Row;

use crate::libs::error::{Error, Result};
use crate::libs::schema::{ColumnAffinity, ColumnInfo, TableDescription};
use crate::libs::store::Store;

impl Store {
    /// User-defined tables, in catalog order.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'",
        )
        .fetch_all(self.pool()?)
        .await?;
        Ok(names)
    }

    pub async fn list_columns(&self, table: &str) -> Result<Vec<String>> {
        let description = self.describe_table(table).await?;
        Ok(description.columns.into_iter().map(|c| c.name).collect())
    }

    /// Reads the table's columns in declaration order.
    pub async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let rows = sqlx::query(
            "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(self.pool()?)
        .await?;

        if rows.is_empty() {
            return Err(Error::UnknownTable(table.to_string()));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for r in rows {
            let sql_type: String = r.try_get("type")?;
            columns.push(ColumnInfo {
                name: r.try_get("name")?,
                affinity: ColumnAffinity::from_declared(&sql_type),
                sql_type,
                not_null: r.try_get::<i64, _>("notnull")? != 0,
                default: r.try_get("dflt_value")?,
                primary: r.try_get::<i64, _>("pk")? != 0,
            });
        }

        Ok(TableDescription {
            name: table.to_string(),
            columns,
        })
    }
}
