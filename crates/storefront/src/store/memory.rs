//! In-process storage backends for tests.

use std::sync::Mutex;

use corner_shop_core::Product;

use super::{AppendLog, ProductSnapshot, StoreError};

/// Catalog held in memory.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    products: Mutex<Vec<Product>>,
}

impl MemorySnapshot {
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }
}

impl ProductSnapshot for MemorySnapshot {
    async fn load_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .map(|p| p.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone()))
    }

    async fn save_all(&self, products: &[Product]) -> Result<(), StoreError> {
        let mut guard = self
            .products
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = products.to_vec();
        Ok(())
    }
}

/// Append-only log held in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Snapshot of the lines written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|l| l.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl AppendLog for MemoryLog {
    async fn append_line(&self, line: &str) -> Result<(), StoreError> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line.to_owned());
        Ok(())
    }

    async fn read_lines(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lines())
    }
}
