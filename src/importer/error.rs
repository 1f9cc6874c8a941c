// ==========================================
// Sistema de Inventario y Kardex - Errores de importación
// ==========================================
// Solo los errores de formato de archivo son fatales y
// escapan al llamador; todo problema de fila viaja como
// dato dentro del ImportResult.
// Herramienta: macro derive de thiserror
// ==========================================

use thiserror::Error;

/// Errores fatales del motor de importación
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Errores de archivo =====
    #[error("archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("archivo vacío: no hay línea de encabezado")]
    EmptyFile,

    #[error("falló la lectura del archivo: {0}")]
    FileRead(String),

    #[error("falló el parseo de Excel: {0}")]
    ExcelParse(String),

    #[error("falló el parseo de CSV: {0}")]
    CsvParse(String),

    // ===== Errores de esquema =====
    #[error("faltan columnas obligatorias [{missing}]; encabezados presentes: [{observed}]")]
    MissingColumns { missing: String, observed: String },

    // ===== Errores de base de datos (fuera del aislamiento por fila) =====
    #[error("falló el almacén: {0}")]
    Store(#[from] crate::repository::error::StoreError),

    // ===== Genérico =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileRead(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParse(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParse(err.to_string())
    }
}

/// Alias de Result del módulo de importación
pub type ImportEngineResult<T> = Result<T, ImportError>;
