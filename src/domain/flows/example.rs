//! Stages of the example metrics pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::table::{Column, ColumnType, Record, Table};
use crate::domain::Environment;

const EXTRACT_ROW_COUNT: i64 = 10;
const VALUE_STEP: i64 = 10;
const CALCULATION_FACTOR: i64 = 2;

/// Base dataset and table name of the destination.
pub const DESTINATION_NAME: &str = "parsons_test";

/// Row produced by the extract stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub id: i64,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
}

impl Record for MetricRecord {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", ColumnType::Integer),
            Column::new("value", ColumnType::Integer),
            Column::new("timestamp", ColumnType::Timestamp),
        ];
        COLUMNS
    }
}

/// Row produced by the transform stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub id: i64,
    pub value: i64,
    pub timestamp: DateTime<Utc>,
    pub calculated_value: i64,
}

impl Record for EnrichedRecord {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::new("id", ColumnType::Integer),
            Column::new("value", ColumnType::Integer),
            Column::new("timestamp", ColumnType::Timestamp),
            Column::new("calculated_value", ColumnType::Integer),
        ];
        COLUMNS
    }
}

/// Produce the fixed sample table, stamped with `now`.
pub fn extract(now: DateTime<Utc>) -> Table<MetricRecord> {
    Table::new(
        (1..=EXTRACT_ROW_COUNT)
            .map(|id| MetricRecord { id, value: id * VALUE_STEP, timestamp: now })
            .collect(),
    )
}

/// Add `calculated_value = value * 2` to every row.
pub fn transform(table: &Table<MetricRecord>) -> Table<EnrichedRecord> {
    table.map_rows(|row| EnrichedRecord {
        id: row.id,
        value: row.value,
        timestamp: row.timestamp,
        calculated_value: row.value * CALCULATION_FACTOR,
    })
}

/// Where the load stage writes for a given environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTarget {
    pub dataset: String,
    pub table_name: String,
}

impl LoadTarget {
    pub fn for_environment(env: &Environment) -> Self {
        let dataset = if env.is_prod() {
            DESTINATION_NAME.to_string()
        } else {
            format!("{}_{}", env, DESTINATION_NAME)
        };
        let table_name = format!("{}.{}", dataset, DESTINATION_NAME);
        Self { dataset, table_name }
    }
}
