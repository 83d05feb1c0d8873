use crate::libs::codec::{CellValue, FormValues, Row};
use crate::libs::error::{Error, Result};
use crate::libs::schema::{ID_COLUMN, TableDescription, quote_ident};

/// SQL text plus the parameters to bind, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<CellValue>,
}

/// How a selected row is matched when it is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteMode {
    /// Every displayed column must equal the selected row's value. Identical
    /// rows are all deleted; a row holding NULL matches nothing.
    #[default]
    FullRow,
    /// Match on the synthetic id only.
    ById,
}

/// Builds the statements the CRUD engine runs against one described table.
pub struct StatementBuilder<'a> {
    description: &'a TableDescription,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(description: &'a TableDescription) -> Self {
        Self { description }
    }

    fn table(&self) -> String {
        quote_ident(&self.description.name)
    }

    fn check_columns(&self, values: &FormValues) -> Result<()> {
        for name in values.keys() {
            match self.description.column(name) {
                None => {
                    return Err(Error::UnknownColumn {
                        table: self.description.name.clone(),
                        column: name.clone(),
                    });
                }
                Some(c) if c.is_key() => return Err(Error::ImmutableColumn(name.clone())),
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn select_all(&self) -> Statement {
        let cols: Vec<String> = self
            .description
            .columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect();
        Statement {
            sql: format!("SELECT {} FROM {}", cols.join(", "), self.table()),
            params: Vec::new(),
        }
    }

    pub fn next_id(&self) -> String {
        format!(
            "SELECT COALESCE(MAX({}), 0) + 1 FROM {}",
            quote_ident(ID_COLUMN),
            self.table()
        )
    }

    /// Blank values are left out so column defaults apply. The id is computed
    /// inside the statement and returned by it.
    pub fn insert(&self, values: &FormValues) -> Result<Statement> {
        self.check_columns(values)?;

        let mut cols = Vec::new();
        let mut exprs = Vec::new();
        let mut params = Vec::new();

        if self.description.key_column().is_some() {
            cols.push(quote_ident(ID_COLUMN));
            exprs.push(format!("({})", self.next_id()));
        }
        for c in self.description.editable_columns() {
            if let Some(v) = values.get(&c.name).filter(|v| !v.is_empty()) {
                cols.push(quote_ident(&c.name));
                exprs.push("?".to_string());
                params.push(CellValue::Text(v.clone()));
            }
        }

        let mut sql = if cols.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table())
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table(),
                cols.join(", "),
                exprs.join(", ")
            )
        };
        if self.description.key_column().is_some() {
            sql.push_str(&format!(" RETURNING {}", quote_ident(ID_COLUMN)));
        }
        Ok(Statement { sql, params })
    }

    /// Every named column is set to the text as typed; a blank field stays an
    /// empty string. Returns `None` when there is nothing to set.
    pub fn update(&self, id: i64, values: &FormValues) -> Result<Option<Statement>> {
        self.check_columns(values)?;
        if self.description.key_column().is_none() {
            return Err(Error::MissingKey(self.description.name.clone()));
        }

        let mut sets = Vec::new();
        let mut params = Vec::new();
        for c in self.description.editable_columns() {
            if let Some(v) = values.get(&c.name) {
                sets.push(format!("{} = ?", quote_ident(&c.name)));
                params.push(CellValue::Text(v.clone()));
            }
        }
        if sets.is_empty() {
            return Ok(None);
        }
        params.push(CellValue::Integer(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table(),
            sets.join(", "),
            quote_ident(ID_COLUMN)
        );
        Ok(Some(Statement { sql, params }))
    }

    pub fn delete(&self, row: &Row, mode: DeleteMode) -> Result<Statement> {
        match mode {
            DeleteMode::FullRow => {
                let conds: Vec<String> = self
                    .description
                    .columns
                    .iter()
                    .map(|c| format!("{} = ?", quote_ident(&c.name)))
                    .collect();
                Ok(Statement {
                    sql: format!("DELETE FROM {} WHERE {}", self.table(), conds.join(" AND ")),
                    params: row.values().to_vec(),
                })
            }
            DeleteMode::ById => {
                let id = row
                    .id(self.description)
                    .ok_or_else(|| Error::MissingKey(self.description.name.clone()))?;
                Ok(Statement {
                    sql: format!(
                        "DELETE FROM {} WHERE {} = ?",
                        self.table(),
                        quote_ident(ID_COLUMN)
                    ),
                    params: vec![CellValue::Integer(id)],
                })
            }
        }
    }
}
