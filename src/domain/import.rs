// ==========================================
// Sistema de Inventario y Kardex - Resultado de importación
// ==========================================
// ImportOptions: configuración que entrega el llamador.
// ImportResult: único artefacto que vuelve al llamador;
// inmutable una vez construido. Serializa en camelCase
// para que la capa de carga lo devuelva tal cual.
// ==========================================

use crate::domain::types::{CatalogMode, InitialStockPolicy};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tamaño de chunk por defecto para la persistencia por lotes.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

// ==========================================
// Opciones de importación
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    /// Ejecuta todo el pipeline sin escribir en ningún almacén.
    pub dry_run: bool,

    /// Filas por transacción de lote (mínimo 1, se fuerza al usarlo).
    pub chunk_size: usize,

    /// Qué hacer cuando un movimiento referencia un código desconocido.
    pub catalog_mode: CatalogMode,

    /// Cómo se asienta el stock inicial de una fila de producto.
    pub initial_stock_policy: InitialStockPolicy,

    /// Timestamp a usar cuando la fila no trae fecha parseable.
    /// Sin default, la fecha ilegible pasa a ser error de campo.
    pub default_timestamp: Option<NaiveDateTime>,

    /// Plegar un archivo de movimientos en filas de producto
    /// (cantidad neta por código de barras).
    pub fold_movements: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            dry_run: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            catalog_mode: CatalogMode::default(),
            initial_stock_policy: InitialStockPolicy::default(),
            default_timestamp: None,
            fold_movements: false,
        }
    }
}

impl ImportOptions {
    /// chunk_size saneado: nunca 0.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

// ==========================================
// Resumen por tabla de destino
// ==========================================
// Una fila aceptada puede abrirse en varios registros
// (producto + cabecera + detalle), por eso estos
// contadores van aparte de los totales de filas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub table: String,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

// ==========================================
// Resultado de la importación
// ==========================================
// Invariante: persisted_rows + skipped_rows == total_rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub total_rows: usize,
    pub persisted_rows: usize,
    pub skipped_rows: usize,
    pub dry_run: bool,

    /// "Fila <n>: <mensaje>", ordenados por número de línea de aparición.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    pub tables: Vec<TableSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ImportOptions::default();
        assert!(!opts.dry_run);
        assert_eq!(opts.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(opts.catalog_mode, CatalogMode::Upsert);
        assert_eq!(opts.initial_stock_policy, InitialStockPolicy::Entrada);
        assert!(opts.default_timestamp.is_none());
        assert!(!opts.fold_movements);
    }

    #[test]
    fn test_chunk_size_minimum_is_one() {
        let opts = ImportOptions {
            chunk_size: 0,
            ..Default::default()
        };
        assert_eq!(opts.effective_chunk_size(), 1);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = ImportResult {
            total_rows: 2,
            persisted_rows: 1,
            skipped_rows: 1,
            dry_run: true,
            errors: vec!["Fila 2: cantidad inválida".to_string()],
            warnings: vec![],
            tables: vec![TableSummary {
                table: "productos".to_string(),
                inserted: 1,
                ..Default::default()
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalRows"], 2);
        assert_eq!(json["persistedRows"], 1);
        assert_eq!(json["skippedRows"], 1);
        assert_eq!(json["dryRun"], true);
        assert_eq!(json["tables"][0]["table"], "productos");
    }
}
