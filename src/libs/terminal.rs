//! Terminal rendering of the workbench: tab bar, grid, action menu and dialogs.

use std::io::{self, Write};

use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use crossterm::{cursor, execute, terminal};
use dialoguer::{Confirm, Input, Select};
use tracing::warn;

use crate::libs::codec::FormValues;
use crate::libs::error::Result;
use crate::libs::frontend::{FormField, Frontend};
use crate::libs::workbench::{Grid, Workbench};

const ACTIONS: &[&str] = &[
    "Вкладка…",
    "Выбрать строку…",
    "Добавить",
    "Удалить",
    "Изменить",
    "Обновить",
    "Выход",
];

/// Dialogs on stdin/stdout.
pub struct TerminalFrontend {
    pub title: String,
}

impl TerminalFrontend {
    pub fn new(title: String) -> Self {
        Self { title }
    }

    fn pause(&self) {
        let _ = Input::<String>::new()
            .with_prompt("Enter: продолжить")
            .allow_empty(true)
            .interact_text();
    }
}

impl Frontend for TerminalFrontend {
    fn fill_form(&mut self, title: &str, fields: &[FormField]) -> Option<FormValues> {
        println!();
        println!("{}", title.bold());
        let mut values = FormValues::new();
        for f in fields {
            let prompt = if f.not_null {
                format!("{} ({}, обязательно)", f.column, f.affinity.label())
            } else {
                format!("{} ({})", f.column, f.affinity.label())
            };
            let answer = Input::<String>::new()
                .with_prompt(prompt)
                .with_initial_text(f.initial.clone())
                .allow_empty(true)
                .interact_text();
            match answer {
                Ok(v) => {
                    values.insert(f.column.clone(), v);
                }
                Err(e) => {
                    warn!(error = %e, "form input aborted");
                    return None;
                }
            }
        }
        if self.confirm("Подтвердить?") {
            Some(values)
        } else {
            None
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn warn(&mut self, message: &str) {
        println!("{} {}", "Предупреждение:".yellow().bold(), message);
        self.pause();
    }

    fn report_error(&mut self, message: &str) {
        println!("{} {}", "Ошибка базы данных:".red().bold(), message);
        self.pause();
    }
}

fn clear_screen() {
    let mut out = io::stdout();
    let _ = execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    );
    let _ = out.flush();
}

fn tab_bar(workbench: &Workbench<'_>) -> String {
    workbench
        .grids()
        .iter()
        .enumerate()
        .map(|(i, g)| {
            if i == workbench.active() {
                format!("[{}]", g.name()).reversed().bold().to_string()
            } else {
                format!(" {} ", g.name())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a grid with a row-number column; the selected row is marked.
pub fn render_grid(grid: &Grid) -> String {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    let mut header = vec![Cell::new("#")];
    header.extend(grid.description().columns.iter().map(|c| Cell::new(&c.name)));
    table.set_header(header);

    for (i, row) in grid.rows().iter().enumerate() {
        let marker = if grid.selected() == Some(i) {
            format!("▶ {}", i + 1)
        } else {
            (i + 1).to_string()
        };
        let mut cells = vec![Cell::new(marker)];
        cells.extend(row.display().into_iter().map(Cell::new));
        table.add_row(cells);
    }

    table.to_string()
}

fn choose_tab(workbench: &mut Workbench<'_>) {
    let names: Vec<&str> = workbench.grids().iter().map(Grid::name).collect();
    let choice = Select::new()
        .with_prompt("Таблица")
        .items(&names)
        .default(workbench.active())
        .interact_opt();
    if let Ok(Some(index)) = choice {
        workbench.switch_to(index);
    }
}

fn choose_row(workbench: &mut Workbench<'_>) {
    let grid = workbench.active_grid();
    if grid.rows().is_empty() {
        return;
    }
    let items: Vec<String> = grid
        .rows()
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}: {}", i + 1, r.display().join(" | ")))
        .collect();
    let choice = Select::new()
        .with_prompt("Строка")
        .items(&items)
        .default(grid.selected().unwrap_or(0))
        .interact_opt();
    if let Ok(Some(index)) = choice {
        workbench.select(Some(index));
    }
}

/// Runs the interactive session until the operator quits.
pub async fn run(workbench: &mut Workbench<'_>, frontend: &mut TerminalFrontend) -> Result<()> {
    loop {
        clear_screen();
        println!("{}", frontend.title.bold());
        println!("{}", tab_bar(workbench));
        println!("{}", render_grid(workbench.active_grid()));

        let action = Select::new()
            .with_prompt("Действие")
            .items(ACTIONS)
            .default(0)
            .interact_opt();
        let index = match action {
            Ok(Some(i)) => i,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "menu aborted");
                return Ok(());
            }
        };

        match index {
            0 => choose_tab(workbench),
            1 => choose_row(workbench),
            2 => {
                workbench.add(frontend).await;
            }
            3 => {
                workbench.delete(frontend).await;
            }
            4 => {
                workbench.edit(frontend).await;
            }
            5 => {
                if let Err(e) = workbench.refresh().await {
                    frontend.report_error(&format!("Ошибка: {e}"));
                }
            }
            _ => return Ok(()),
        }
    }
}
