// schema.rs

/// Name of the synthetic key column every managed table carries.
pub const ID_COLUMN: &str = "id";

/// SQLite's type preference for a column, inferred from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAffinity {
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
}

impl ColumnAffinity {
    /// Applies SQLite's affinity rules to a declared type, in their order of
    /// precedence.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            ColumnAffinity::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ColumnAffinity::Text
        } else if upper.is_empty() || upper.contains("BLOB") {
            ColumnAffinity::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            ColumnAffinity::Real
        } else {
            ColumnAffinity::Numeric
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnAffinity::Integer => "целое",
            ColumnAffinity::Real => "число",
            ColumnAffinity::Text => "текст",
            ColumnAffinity::Blob => "данные",
            ColumnAffinity::Numeric => "число",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: String,
    pub affinity: ColumnAffinity,
    pub not_null: bool,
    pub default: Option<String>,
    pub primary: bool,
}

impl ColumnInfo {
    pub fn is_key(&self) -> bool {
        self.name == ID_COLUMN
    }
}

/// Ordered column list of one table, as read from the catalog.
///
/// Grids and forms are both built from the same description so they agree on
/// column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableDescription {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The synthetic id column, if the table has one.
    pub fn key_column(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.is_key())
    }

    /// Columns the operator may fill in, in declaration order.
    pub fn editable_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| !c.is_key())
    }
}

/// Double-quotes an identifier for interpolation into SQL text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_follows_sqlite_precedence() {
        assert_eq!(ColumnAffinity::from_declared("INTEGER"), ColumnAffinity::Integer);
        assert_eq!(ColumnAffinity::from_declared("TEXT"), ColumnAffinity::Text);
        assert_eq!(ColumnAffinity::from_declared("varchar(20)"), ColumnAffinity::Text);
        assert_eq!(ColumnAffinity::from_declared("REAL"), ColumnAffinity::Real);
        assert_eq!(ColumnAffinity::from_declared("DOUBLE"), ColumnAffinity::Real);
        assert_eq!(ColumnAffinity::from_declared(""), ColumnAffinity::Blob);
        assert_eq!(ColumnAffinity::from_declared("DECIMAL(10,2)"), ColumnAffinity::Numeric);
        // "INT" wins over "CHAR"
        assert_eq!(ColumnAffinity::from_declared("CHARINT"), ColumnAffinity::Integer);
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(quote_ident("Ингредиенты"), "\"Ингредиенты\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn editable_columns_skip_id() {
        let desc = TableDescription {
            name: "t".into(),
            columns: vec![
                ColumnInfo {
                    name: "id".into(),
                    sql_type: "INTEGER".into(),
                    affinity: ColumnAffinity::Integer,
                    not_null: false,
                    default: None,
                    primary: true,
                },
                ColumnInfo {
                    name: "Название".into(),
                    sql_type: "TEXT".into(),
                    affinity: ColumnAffinity::Text,
                    not_null: true,
                    default: None,
                    primary: false,
                },
            ],
        };
        let names: Vec<_> = desc.editable_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Название"]);
        assert_eq!(desc.key_column().map(|c| c.name.as_str()), Some("id"));
        assert_eq!(desc.position("Название"), Some(1));
    }
}
