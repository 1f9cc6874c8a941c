// ==========================================
// Sistema de Inventario y Kardex - Biblioteca central
// ==========================================
// Motor de importación de inventario para botillería:
// planillas CSV/Excel de productos y movimientos,
// conciliadas contra el catálogo y persistidas de forma
// idempotente. Sin CLI ni HTTP: lo invoca el handler de
// carga y consume el ImportResult.
// ==========================================

// ==========================================
// Declaración de módulos
// ==========================================

// Capa de dominio - entidades y tipos
pub mod domain;

// Capa de almacenes - acceso a datos
pub mod repository;

// Capa de importación - ingesta de archivos
pub mod importer;

// Infraestructura de base de datos (PRAGMA unificados / esquema)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-export de tipos centrales
// ==========================================

// Tipos de dominio
pub use domain::types::{BaseUnit, CatalogMode, Category, InitialStockPolicy, MovementKind};

// Entidades y registros
pub use domain::{
    CanonicalRecord, ImportOptions, ImportResult, MovementHeader, MovementLine, MovementRecord,
    Product, ProductRecord, RowError, TableSummary,
};

// Motor de importación
pub use importer::{ImportError, InventoryImporter, InventoryImporterImpl};

// Almacenes
pub use repository::{
    MovementRepository, MovementRepositoryImpl, ProductRepository, ProductRepositoryImpl,
    StoreError,
};

// ==========================================
// Constantes del sistema
// ==========================================

// Versión del sistema
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nombre del sistema
pub const APP_NAME: &str = "Sistema de Inventario y Kardex";
