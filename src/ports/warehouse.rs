use crate::domain::{AppError, Credentials, TableData};

/// Destination for loaded tables.
pub trait Warehouse {
    /// Create a dataset; with `exists_ok` an existing dataset is not an error.
    fn create_dataset(&self, dataset: &str, exists_ok: bool) -> Result<(), AppError>;

    /// Write rows into `table_name` (`dataset.table`), creating the table if
    /// absent and replacing its contents otherwise.
    ///
    /// The previous contents must survive a failed copy.
    fn copy(&self, table: &TableData, table_name: &str) -> Result<(), AppError>;
}

/// Opens warehouse connections with the given credentials.
pub trait WarehouseConnector {
    fn connect(&self, credentials: Credentials) -> Result<Box<dyn Warehouse>, AppError>;
}
