// ==========================================
// Sistema de Inventario y Kardex - Errores de almacén
// ==========================================
// Herramienta: macro derive de thiserror
// ==========================================

use thiserror::Error;

/// Errores de la capa de almacenes (catálogo y kardex)
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== Errores de base de datos =====
    #[error("falló la conexión a la base de datos: {0}")]
    Connection(String),

    #[error("falló la transacción: {0}")]
    Transaction(String),

    #[error("falló la consulta: {0}")]
    Query(String),

    // ===== Violaciones de restricciones =====
    #[error("violación de unicidad: {0}")]
    UniqueViolation(String),

    #[error("violación de clave foránea: {0}")]
    ForeignKeyViolation(String),

    // ===== Concurrencia =====
    #[error("no se pudo tomar el lock de la conexión: {0}")]
    Lock(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("UNIQUE") => {
                StoreError::UniqueViolation(msg.clone())
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("FOREIGN KEY") => {
                StoreError::ForeignKeyViolation(msg.clone())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Alias de Result para los almacenes
pub type StoreResult<T> = Result<T, StoreError>;
