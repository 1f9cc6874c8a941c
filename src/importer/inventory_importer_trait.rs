// ==========================================
// Sistema de Inventario y Kardex - Trait del importador
// ==========================================
// Interfaz de nivel biblioteca: la invoca el handler de
// carga de archivos (fuera de este motor) y consume el
// ImportResult, nada más.
// ==========================================

use crate::domain::import::{ImportOptions, ImportResult};
use crate::importer::error::ImportError;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// InventoryImporter Trait
// ==========================================
// Implementa: InventoryImporterImpl
#[async_trait]
pub trait InventoryImporter: Send + Sync {
    /// Importa un archivo de productos o movimientos.
    ///
    /// El tipo de archivo se autodetecta por columnas; el formato
    /// (CSV/Excel) por extensión, con fallback a texto delimitado.
    ///
    /// # Retorno
    /// - Ok(ImportResult): la corrida terminó; los problemas de fila
    ///   van adentro como datos
    /// - Err(ImportError): solo fallas fatales de formato de archivo
    ///   (vacío, ilegible, columnas obligatorias ausentes)
    async fn import_file<F: AsRef<Path> + Send>(
        &self,
        file_path: F,
        options: &ImportOptions,
    ) -> Result<ImportResult, ImportError>;

    /// Importa varios archivos, en secuencia y en el orden dado.
    ///
    /// Secuencial a propósito: dos importaciones concurrentes sobre
    /// códigos de barras superpuestos tienen interleaving indefinido.
    /// La falla de un archivo no afecta a los demás.
    async fn import_files<F: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<F>,
        options: &ImportOptions,
    ) -> Result<Vec<Result<ImportResult, String>>, ImportError>;
}
