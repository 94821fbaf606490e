//! File-backed persistence for the storefront.
//!
//! # Data directory layout
//!
//! - `products.json` - Catalog snapshot (JSON array, rewritten on every change)
//! - `orders.jsonl` - Order log (one JSON object per line, append-only)
//! - `audit.log` - Audit trail (`<timestamp> | <event> | k=v, ...`, append-only)
//!
//! # Backends
//!
//! Business logic only sees [`Storage`], which is generic over two narrow
//! traits: [`ProductSnapshot`] (`load_all` / `save_all`) and [`AppendLog`]
//! (`append_line` / `read_lines`). The flat-file backend lives in [`files`];
//! [`memory`] provides in-process implementations used by tests.
//!
//! # Write discipline
//!
//! Every load-modify-save sequence on the catalog goes through
//! [`Storage::begin_catalog_write`], which holds the catalog mutex until the
//! returned [`CatalogWrite`] is committed or dropped. Appends to each log are
//! serialized by the log implementation itself.

pub mod files;
pub mod memory;

use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use corner_shop_core::{Order, OrderId, OrderIdGenerator, Product};

pub use files::{JsonSnapshotFile, LineFile};
pub use memory::{MemoryLog, MemorySnapshot};

/// Catalog snapshot file name inside the data directory.
pub const PRODUCTS_FILE: &str = "products.json";
/// Order log file name inside the data directory.
pub const ORDERS_FILE: &str = "orders.jsonl";
/// Audit log file name inside the data directory.
pub const AUDIT_FILE: &str = "audit.log";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data is not valid structured data.
    #[error("data corruption in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whole-collection persistence for the product catalog.
pub trait ProductSnapshot: Send + Sync {
    /// Load every product, in stored order.
    fn load_all(&self) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Replace the stored catalog with `products`.
    fn save_all(
        &self,
        products: &[Product],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Line-oriented, append-only log.
pub trait AppendLog: Send + Sync {
    /// Append one line. `line` must not contain a newline.
    fn append_line(&self, line: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Read every line, oldest first.
    fn read_lines(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;
}

/// Storage facade shared by all services.
pub struct Storage<S, L> {
    products: S,
    orders: L,
    audit: L,
    catalog_lock: Mutex<()>,
    order_ids: OrderIdGenerator,
}

/// The flat-file storage used in production.
pub type FileStorage = Storage<JsonSnapshotFile, LineFile>;

impl FileStorage {
    /// Open (and create if needed) the data files under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or files cannot be created.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| StoreError::io(data_dir, e))?;

        let products = JsonSnapshotFile::new(data_dir.join(PRODUCTS_FILE));
        products.ensure_exists().await?;
        let orders = LineFile::new(data_dir.join(ORDERS_FILE));
        orders.ensure_exists().await?;
        let audit = LineFile::new(data_dir.join(AUDIT_FILE));
        audit.ensure_exists().await?;

        tracing::info!(data_dir = %data_dir.display(), "Storage opened");

        Ok(Self::new(products, orders, audit))
    }
}

impl<S: ProductSnapshot, L: AppendLog> Storage<S, L> {
    /// Compose a storage facade from its backends.
    #[must_use]
    pub fn new(products: S, orders: L, audit: L) -> Self {
        Self {
            products,
            orders,
            audit,
            catalog_lock: Mutex::new(()),
            order_ids: OrderIdGenerator::new(),
        }
    }

    /// The order log backend.
    #[must_use]
    pub const fn orders(&self) -> &L {
        &self.orders
    }

    /// The audit log backend.
    #[must_use]
    pub const fn audit(&self) -> &L {
        &self.audit
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Load the current catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the snapshot is not a valid product array.
    pub async fn load_products(&self) -> Result<Vec<Product>, StoreError> {
        self.products.load_all().await
    }

    /// Replace the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be written.
    pub async fn save_products(&self, products: &[Product]) -> Result<(), StoreError> {
        let _guard = self.catalog_lock.lock().await;
        self.products.save_all(products).await
    }

    /// Lock the catalog and load a fresh copy for modification.
    ///
    /// Other writers wait until the returned handle is committed or dropped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be loaded.
    pub async fn begin_catalog_write(&self) -> Result<CatalogWrite<'_, S>, StoreError> {
        let guard = self.catalog_lock.lock().await;
        let products = self.products.load_all().await?;
        Ok(CatalogWrite {
            _guard: guard,
            snapshot: &self.products,
            products,
        })
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Allocate an identifier for an order placed at `now` (local time).
    pub fn next_order_id(&self, now: &DateTime<Local>) -> OrderId {
        self.order_ids.next(now)
    }

    /// Append an order to the order log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the order cannot be serialized or written.
    pub async fn append_order(&self, order: &Order) -> Result<(), StoreError> {
        let line = serde_json::to_string(order)?;
        self.orders.append_line(&line).await
    }

    /// Find an order by id, scanning from the most recent entry backward.
    ///
    /// Blank and malformed lines are skipped. `Ok(None)` means no match.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the order log cannot be read.
    pub async fn find_order(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        let lines = self.orders.read_lines().await?;

        for line in lines.iter().rev() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Order>(line) {
                Ok(order) if &order.id == id => return Ok(Some(order)),
                Ok(_) => {}
                Err(e) => tracing::debug!("Skipping malformed order line: {e}"),
            }
        }

        Ok(None)
    }

    // =========================================================================
    // Audit
    // =========================================================================

    /// Append an audit entry. Failures are logged, never returned.
    pub async fn log_action(&self, event: &str, fields: &[(&str, String)]) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let line = format_audit_line(&timestamp, event, fields);
        if let Err(e) = self.audit.append_line(&line).await {
            tracing::warn!(event, "Failed to write audit entry: {e}");
        }
    }
}

/// Exclusive, loaded copy of the catalog.
///
/// Holds the catalog lock for its whole lifetime. Dropping it without calling
/// [`CatalogWrite::commit`] discards the changes.
pub struct CatalogWrite<'a, S> {
    _guard: MutexGuard<'a, ()>,
    snapshot: &'a S,
    /// Products as loaded when the write began.
    pub products: Vec<Product>,
}

impl<S: ProductSnapshot> CatalogWrite<'_, S> {
    /// Persist the modified catalog and release the lock.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshot cannot be written.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.snapshot.save_all(&self.products).await
    }
}

/// Render one audit line: `<timestamp> | <event> | k=v, k=v`.
fn format_audit_line(timestamp: &str, event: &str, fields: &[(&str, String)]) -> String {
    let pairs = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", v.replace(['\n', '\r'], " ")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{timestamp} | {event} | {pairs}")
}
