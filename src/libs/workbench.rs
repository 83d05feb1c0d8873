use tracing::{info, warn};

use crate::libs::codec::{CellValue, Row};
use crate::libs::error::{Error, Result};
use crate::libs::frontend::{FormField, Frontend};
use crate::libs::schema::TableDescription;
use crate::libs::store::Store;

pub const NO_TABLES: &str = "В базе данных нет таблиц. Пожалуйста, создайте их перед запуском.";
pub const SELECT_TO_DELETE: &str = "Пожалуйста, выберите строку для удаления.";
pub const SELECT_TO_EDIT: &str = "Пожалуйста, выберите строку для изменения.";
pub const CONFIRM_DELETE: &str = "Вы уверены, что хотите удалить эту строку?";
pub const NOTHING_DELETED: &str = "Ни одна строка не совпала с выбранной, таблица не изменилась.";
pub const ADD_TITLE: &str = "Добавить строку";
pub const EDIT_TITLE: &str = "Изменить строку";

/// How a grid action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The statement committed and the grid was reloaded.
    Applied,
    /// The operator backed out of a form or a confirmation.
    Cancelled,
    /// Precondition not met, storage was not touched.
    Rejected,
    /// The error was shown and the grid left as it was.
    Failed,
}

/// One table's tab: its description, the rows last fetched and the selection.
pub struct Grid {
    description: TableDescription,
    rows: Vec<Row>,
    selected: Option<usize>,
}

impl Grid {
    pub fn name(&self) -> &str {
        &self.description.name
    }

    pub fn description(&self) -> &TableDescription {
        &self.description
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.selected.and_then(|i| self.rows.get(i))
    }
}

/// Every table of the database as a grid, with the generic actions wired to
/// the store.
pub struct Workbench<'a> {
    store: &'a Store,
    grids: Vec<Grid>,
    active: usize,
}

impl<'a> Workbench<'a> {
    /// Builds one grid per table. With no tables the operator is warned and
    /// nothing is built.
    pub async fn open(store: &'a Store, frontend: &mut dyn Frontend) -> Result<Self> {
        let tables = store.list_tables().await?;
        if tables.is_empty() {
            warn!("database has no tables");
            frontend.warn(NO_TABLES);
            return Err(Error::NoTables);
        }

        let mut grids = Vec::with_capacity(tables.len());
        for name in tables {
            let description = store.describe_table(&name).await?;
            let rows = store.fetch_all(&description).await?;
            grids.push(Grid {
                description,
                rows,
                selected: None,
            });
        }
        info!(tables = grids.len(), "workbench ready");

        Ok(Self {
            store,
            grids,
            active: 0,
        })
    }

    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_grid(&self) -> &Grid {
        &self.grids[self.active]
    }

    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.grids.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Selects a row of the active grid; `None` clears the selection.
    pub fn select(&mut self, row: Option<usize>) -> bool {
        let grid = &mut self.grids[self.active];
        match row {
            Some(i) if i >= grid.rows.len() => false,
            _ => {
                grid.selected = row;
                true
            }
        }
    }

    /// Re-reads the active table's columns and rows.
    pub async fn refresh(&mut self) -> Result<()> {
        let description = self.store.describe_table(self.active_grid().name()).await?;
        self.reload(description).await
    }

    async fn reload(&mut self, description: TableDescription) -> Result<()> {
        let rows = self.store.fetch_all(&description).await?;
        let grid = &mut self.grids[self.active];
        grid.description = description;
        grid.rows = rows;
        // indices may now point at a different row
        grid.selected = None;
        Ok(())
    }

    async fn finish(&mut self, description: TableDescription, frontend: &mut dyn Frontend) -> Outcome {
        match self.reload(description).await {
            Ok(()) => Outcome::Applied,
            Err(e) => Self::failed(frontend, e),
        }
    }

    fn failed(frontend: &mut dyn Frontend, error: Error) -> Outcome {
        warn!(%error, "action failed");
        frontend.report_error(&format!("Ошибка: {error}"));
        Outcome::Failed
    }

    /// Asks for every editable column and inserts the row. A rejected form is
    /// shown again with what the operator typed.
    pub async fn add(&mut self, frontend: &mut dyn Frontend) -> Outcome {
        let description = match self.store.describe_table(self.active_grid().name()).await {
            Ok(d) => d,
            Err(e) => return Self::failed(frontend, e),
        };
        let mut fields: Vec<FormField> = description
            .editable_columns()
            .map(|c| FormField {
                column: c.name.clone(),
                affinity: c.affinity,
                not_null: c.not_null,
                initial: String::new(),
            })
            .collect();

        loop {
            let Some(values) = frontend.fill_form(ADD_TITLE, &fields) else {
                return Outcome::Cancelled;
            };
            match self.store.insert(&description, &values).await {
                Ok(_) => return self.finish(description, frontend).await,
                Err(e) => {
                    Self::failed(frontend, e);
                    for f in &mut fields {
                        if let Some(v) = values.get(&f.column) {
                            f.initial = v.clone();
                        }
                    }
                }
            }
        }
    }

    /// Edits the selected row's non-id columns, keyed by its id.
    pub async fn edit(&mut self, frontend: &mut dyn Frontend) -> Outcome {
        let grid = self.active_grid();
        let Some(row) = grid.selected_row() else {
            frontend.warn(SELECT_TO_EDIT);
            return Outcome::Rejected;
        };
        let Some(id) = row.id(&grid.description) else {
            return Self::failed(frontend, Error::MissingKey(grid.name().to_string()));
        };
        let current = row.to_form(&grid.description);
        // blob cells display as a byte count and cannot round-trip
        let blobs: Vec<String> = grid
            .description
            .columns
            .iter()
            .zip(row.values())
            .filter(|(_, v)| matches!(v, CellValue::Blob(_)))
            .map(|(c, _)| c.name.clone())
            .collect();

        let description = match self.store.describe_table(grid.name()).await {
            Ok(d) => d,
            Err(e) => return Self::failed(frontend, e),
        };
        let mut fields: Vec<FormField> = description
            .editable_columns()
            .filter(|c| !blobs.contains(&c.name))
            .map(|c| FormField {
                column: c.name.clone(),
                affinity: c.affinity,
                not_null: c.not_null,
                initial: current.get(&c.name).cloned().unwrap_or_default(),
            })
            .collect();

        loop {
            let Some(values) = frontend.fill_form(EDIT_TITLE, &fields) else {
                return Outcome::Cancelled;
            };
            match self.store.update(&description, id, &values).await {
                Ok(_) => return self.finish(description, frontend).await,
                Err(e) => {
                    Self::failed(frontend, e);
                    for f in &mut fields {
                        if let Some(v) = values.get(&f.column) {
                            f.initial = v.clone();
                        }
                    }
                }
            }
        }
    }

    /// Deletes the selected row after confirmation, matching it the way the
    /// store's delete mode says.
    pub async fn delete(&mut self, frontend: &mut dyn Frontend) -> Outcome {
        let grid = self.active_grid();
        let Some(row) = grid.selected_row().cloned() else {
            frontend.warn(SELECT_TO_DELETE);
            return Outcome::Rejected;
        };
        if !frontend.confirm(CONFIRM_DELETE) {
            return Outcome::Cancelled;
        }

        let description = grid.description.clone();
        match self.store.delete(&description, &row).await {
            Ok(affected) => {
                if affected == 0 {
                    frontend.warn(NOTHING_DELETED);
                }
                self.finish(description, frontend).await
            }
            Err(e) => Self::failed(frontend, e),
        }
    }
}
