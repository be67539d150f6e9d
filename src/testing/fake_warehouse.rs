use std::sync::{Arc, Mutex};

use crate::domain::{AppError, Credentials, TableData};
use crate::ports::{Warehouse, WarehouseConnector};

/// Operations observed by [`FakeConnector`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum WarehouseCall {
    Connect { service_account: Option<String> },
    CreateDataset { dataset: String, exists_ok: bool },
    Copy { table_name: String, rows: usize, columns: Vec<String> },
}

/// Connector double whose warehouses append to a shared call log.
#[derive(Clone, Default)]
pub struct FakeConnector {
    pub calls: Arc<Mutex<Vec<WarehouseCall>>>,
    pub copied: Arc<Mutex<Vec<TableData>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WarehouseCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn copied(&self) -> Vec<TableData> {
        self.copied.lock().unwrap().clone()
    }
}

impl WarehouseConnector for FakeConnector {
    fn connect(&self, credentials: Credentials) -> Result<Box<dyn Warehouse>, AppError> {
        let service_account = match credentials {
            Credentials::ServiceAccount(key) => Some(key.client_email),
            Credentials::Ambient => None,
        };
        self.calls.lock().unwrap().push(WarehouseCall::Connect { service_account });
        Ok(Box::new(self.clone()))
    }
}

impl Warehouse for FakeConnector {
    fn create_dataset(&self, dataset: &str, exists_ok: bool) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push(WarehouseCall::CreateDataset { dataset: dataset.to_string(), exists_ok });
        Ok(())
    }

    fn copy(&self, table: &TableData, table_name: &str) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(WarehouseCall::Copy {
            table_name: table_name.to_string(),
            rows: table.num_rows(),
            columns: table.columns.iter().map(|c| c.name.to_string()).collect(),
        });
        self.copied.lock().unwrap().push(table.clone());
        Ok(())
    }
}
