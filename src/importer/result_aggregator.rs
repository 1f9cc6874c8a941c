// ==========================================
// Sistema de Inventario y Kardex - Agregador de resultados
// ==========================================
// Acumula totales, errores y advertencias de toda la corrida
// y arma el ImportResult final. En esta etapa nada lanza:
// los problemas de fila son datos, no control de flujo.
// ==========================================

use crate::domain::import::{ImportResult, TableSummary};

// Tablas de destino. Una fila aceptada puede abrirse en varios
// registros, por eso se cuentan aparte de los totales de filas.
pub const TABLE_PRODUCTS: &str = "productos";
pub const TABLE_MOVEMENTS: &str = "movimientos";
pub const TABLE_MOVEMENT_LINES: &str = "movimiento_detalles";

pub struct ResultAggregator {
    dry_run: bool,
    total_rows: usize,
    persisted_rows: usize,
    skipped_rows: usize,
    errors: Vec<(usize, String)>,
    warnings: Vec<(usize, String)>,
    tables: Vec<TableSummary>,
}

impl ResultAggregator {
    pub fn new(dry_run: bool) -> Self {
        let tables = [TABLE_PRODUCTS, TABLE_MOVEMENTS, TABLE_MOVEMENT_LINES]
            .iter()
            .map(|name| TableSummary {
                table: name.to_string(),
                ..Default::default()
            })
            .collect();

        Self {
            dry_run,
            total_rows: 0,
            persisted_rows: 0,
            skipped_rows: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            tables,
        }
    }

    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
    }

    pub fn row_persisted(&mut self) {
        self.persisted_rows += 1;
    }

    /// Varias filas de origen persistidas por una sola operación
    /// (plegado de movimientos: un upsert por grupo de código).
    pub fn rows_persisted(&mut self, count: usize) {
        self.persisted_rows += count;
    }

    /// Fila descartada sin mensaje (duplicado idempotente: es
    /// comportamiento esperado, no falla).
    pub fn row_skipped_silently(&mut self) {
        self.skipped_rows += 1;
    }

    pub fn rows_skipped_silently(&mut self, count: usize) {
        self.skipped_rows += count;
    }

    /// Fila descartada con su mensaje de error.
    pub fn row_skipped(&mut self, line_number: usize, message: impl Into<String>) {
        self.rows_skipped(line_number, message, 1);
    }

    /// Grupo de filas descartado con un único mensaje.
    pub fn rows_skipped(&mut self, line_number: usize, message: impl Into<String>, count: usize) {
        self.skipped_rows += count;
        self.errors.push((line_number, message.into()));
    }

    pub fn warning(&mut self, line_number: usize, message: impl Into<String>) {
        self.warnings.push((line_number, message.into()));
    }

    fn table_mut(&mut self, table: &str) -> &mut TableSummary {
        // Las tres tablas se registran en new(); esta búsqueda no falla.
        self.tables
            .iter_mut()
            .find(|t| t.table == table)
            .expect("tabla de destino registrada")
    }

    pub fn table_inserted(&mut self, table: &str) {
        self.table_mut(table).inserted += 1;
    }

    pub fn table_updated(&mut self, table: &str) {
        self.table_mut(table).updated += 1;
    }

    pub fn table_skipped(&mut self, table: &str) {
        self.table_mut(table).skipped += 1;
    }

    /// Construye el resultado final. Los mensajes quedan ordenados
    /// por línea de origen ("Fila <n>: <mensaje>").
    pub fn finish(mut self) -> ImportResult {
        self.errors.sort_by_key(|(line, _)| *line);
        self.warnings.sort_by_key(|(line, _)| *line);

        ImportResult {
            total_rows: self.total_rows,
            persisted_rows: self.persisted_rows,
            skipped_rows: self.skipped_rows,
            dry_run: self.dry_run,
            errors: self
                .errors
                .into_iter()
                .map(|(line, msg)| format!("Fila {line}: {msg}"))
                .collect(),
            warnings: self
                .warnings
                .into_iter()
                .map(|(line, msg)| format!("Fila {line}: {msg}"))
                .collect(),
            tables: self.tables,
        }
    }
}
