use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Row as _;
use sqlx::sqlite::SqliteRow;

use crate::libs::schema::TableDescription;

/// Raw text the operator typed, keyed by column name.
pub type FormValues = BTreeMap<String, String>;

/// One stored SQLite value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(v) => write!(f, "{v}"),
            // keeps the fractional part: 50.0 stays "50.0"
            CellValue::Real(v) => write!(f, "{v:?}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Blob(b) => write!(f, "<{} байт>", b.len()),
        }
    }
}

/// One table row, aligned with the description it was read with.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<CellValue>);

impl Row {
    pub fn values(&self) -> &[CellValue] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.0.get(index)
    }

    /// Value of the synthetic id column.
    pub fn id(&self, description: &TableDescription) -> Option<i64> {
        let index = description.position(crate::libs::schema::ID_COLUMN)?;
        self.get(index).and_then(CellValue::as_i64)
    }

    /// Display strings for every column, in column order.
    pub fn display(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Display strings for the editable columns, used to pre-fill an edit form.
    /// Blob cells are left out: their display text cannot be written back.
    pub fn to_form(&self, description: &TableDescription) -> FormValues {
        description
            .columns
            .iter()
            .zip(&self.0)
            .filter(|(c, v)| !c.is_key() && !matches!(v, CellValue::Blob(_)))
            .map(|(c, v)| (c.name.clone(), v.to_string()))
            .collect()
    }

    pub fn to_json(&self, description: &TableDescription) -> Value {
        let mut map = serde_json::Map::new();
        for (column, value) in description.columns.iter().zip(&self.0) {
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            map.insert(column.name.clone(), value);
        }
        Value::Object(map)
    }
}

/// Reads every column of a fetched row by its runtime storage class.
pub fn decode_row(r: &SqliteRow) -> Row {
    let mut values = Vec::with_capacity(r.len());
    for index in 0..r.len() {
        let value = match r.try_get::<Option<i64>, _>(index) {
            Ok(Some(v)) => CellValue::Integer(v),
            Ok(None) => CellValue::Null,
            Err(_) => match r.try_get::<Option<f64>, _>(index) {
                Ok(Some(v)) => CellValue::Real(v),
                Ok(None) => CellValue::Null,
                Err(_) => match r.try_get::<Option<String>, _>(index) {
                    Ok(Some(v)) => CellValue::Text(v),
                    Ok(None) => CellValue::Null,
                    Err(_) => match r.try_get::<Option<Vec<u8>>, _>(index) {
                        Ok(Some(v)) => CellValue::Blob(v),
                        _ => CellValue::Null,
                    },
                },
            },
        };
        values.push(value);
    }
    Row(values)
}
