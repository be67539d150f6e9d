//! In-memory tabular values passed between pipeline stages.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::AppError;

/// Column value type, named after the warehouse type it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Timestamp,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }
}

/// A row type with a fixed schema. Serialized field names must match
/// [`Record::columns`].
pub trait Record: Serialize + Clone {
    fn columns() -> &'static [Column];
}

/// Ordered rows of one record type. Each stage produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R: Record> {
    rows: Vec<R>,
}

impl<R: Record> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        R::columns().iter().map(|c| c.name).collect()
    }

    /// Apply `f` to every row, preserving count and order.
    pub fn map_rows<S: Record>(&self, f: impl Fn(&R) -> S) -> Table<S> {
        Table { rows: self.rows.iter().map(f).collect() }
    }

    /// Schema-erased copy handed to the warehouse.
    pub fn to_table_data(&self) -> Result<TableData, AppError> {
        let rows = self
            .rows
            .iter()
            .map(|row| match serde_json::to_value(row) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(AppError::Schema {
                    stage: "serialize".to_string(),
                    details: format!("expected object row, got {}", other),
                }),
                Err(e) => Err(AppError::Schema {
                    stage: "serialize".to_string(),
                    details: e.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(TableData { columns: R::columns().to_vec(), rows })
    }
}

impl<'a, R: Record> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Rows with their column schema, independent of the record type.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<Column>,
    pub rows: Vec<Map<String, Value>>,
}

impl TableData {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Counter {
        id: i64,
        hits: i64,
    }

    impl Record for Counter {
        fn columns() -> &'static [Column] {
            const COLUMNS: &[Column] =
                &[Column::new("id", ColumnType::Integer), Column::new("hits", ColumnType::Integer)];
            COLUMNS
        }
    }

    #[test]
    fn map_rows_preserves_order() {
        let table = Table::new(vec![Counter { id: 1, hits: 3 }, Counter { id: 2, hits: 5 }]);
        let doubled = table.map_rows(|row| Counter { id: row.id, hits: row.hits * 2 });
        assert_eq!(doubled.rows(), &[Counter { id: 1, hits: 6 }, Counter { id: 2, hits: 10 }]);
        assert_eq!(doubled.column_names(), vec!["id", "hits"]);
    }

    #[test]
    fn to_table_data_keeps_columns_and_rows() {
        let table = Table::new(vec![Counter { id: 7, hits: 29 }]);
        let data = table.to_table_data().unwrap();
        assert_eq!(data.columns.len(), 2);
        assert_eq!(data.num_rows(), 1);
        assert_eq!(data.rows[0]["hits"], json!(29));
    }

    #[test]
    fn column_types_use_warehouse_names() {
        assert_eq!(ColumnType::Integer.as_str(), "INTEGER");
        assert_eq!(ColumnType::Timestamp.as_str(), "TIMESTAMP");
    }
}
