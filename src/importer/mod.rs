// ==========================================
// Sistema de Inventario y Kardex - Capa de importación
// ==========================================
// Pipeline de ingesta de planillas heterogéneas (CSV/Excel)
// de productos y movimientos, con persistencia idempotente
// por chunks y reporte de fallas parciales.
// ==========================================

// Declaración de módulos
pub mod batch_persister;
pub mod catalog_resolver;
pub mod error;
pub mod file_parser;
pub mod fold;
pub mod idempotency;
pub mod inventory_importer_impl;
pub mod inventory_importer_trait;
pub mod result_aggregator;
pub mod row_normalizer;
pub mod schema_resolver;
pub mod text;

// Re-export de los tipos centrales
pub use batch_persister::{BatchPersister, PlannedMovement, PlannedRow};
pub use catalog_resolver::{CatalogResolver, Resolution};
pub use error::{ImportEngineResult, ImportError};
pub use file_parser::{CsvParser, ExcelParser, FileParser, ParsedFile, ParseWarning, RawRow, UniversalFileParser};
pub use fold::{fold_movements_into_products, FoldedProduct};
pub use idempotency::{initial_stock_key, movement_key};
pub use inventory_importer_impl::InventoryImporterImpl;
pub use inventory_importer_trait::InventoryImporter;
pub use result_aggregator::{ResultAggregator, TABLE_MOVEMENTS, TABLE_MOVEMENT_LINES, TABLE_PRODUCTS};
pub use schema_resolver::{resolve_schema, HeaderIndex, ImportKind};
