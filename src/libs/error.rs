use thiserror::Error;

/// Everything that can go wrong between the workbench and the database.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine refused a statement or the connection could not be opened.
    /// The message is shown to the operator verbatim.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("database not connected")]
    NotConnected,

    #[error("the database has no tables")]
    NoTables,

    #[error("table {0} does not exist")]
    UnknownTable(String),

    #[error("table {table} has no column {column}")]
    UnknownColumn { table: String, column: String },

    #[error("column {0} is assigned by the application and cannot be edited")]
    ImmutableColumn(String),

    #[error("table {0} has no id column")]
    MissingKey(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
