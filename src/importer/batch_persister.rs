// ==========================================
// Sistema de Inventario y Kardex - Persistidor por lotes
// ==========================================
// Consume las filas aceptadas (ya validadas y resueltas)
// en chunks de tamaño fijo. La fila es la unidad de
// aislamiento de fallas: un error de almacén se convierte
// en error de fila y no toca lo ya confirmado. En dry-run
// clasifica igual que una corrida real, sin escribir.
// ==========================================

use crate::domain::movement::{MovementHeader, MovementLine};
use crate::domain::product::Product;
use crate::importer::result_aggregator::{
    ResultAggregator, TABLE_MOVEMENTS, TABLE_MOVEMENT_LINES, TABLE_PRODUCTS,
};
use crate::repository::movement_repo::MovementRepository;
use crate::repository::product_repo::ProductRepository;
use tracing::{debug, warn};

/// Asiento de kardex pendiente (movimiento, o apertura de un producto).
#[derive(Debug, Clone)]
pub struct PlannedMovement {
    pub header: MovementHeader,
    pub lines: Vec<MovementLine>,
}

// ==========================================
// Fila planificada
// ==========================================
// El persistidor no vuelve a validar reglas de negocio:
// todo lo que llega aquí ya pasó el normalizador, el chequeo
// de idempotencia y la resolución de catálogo.
#[derive(Debug, Clone)]
pub enum PlannedRow {
    Product {
        line_number: usize,
        /// Filas de origen que representa (>1 solo en plegado).
        weight: usize,
        product: Product,
        /// Ya existía en el catálogo (clasifica update vs insert).
        exists: bool,
        /// Contenido idéntico al ya persistido: no se escribe la ficha.
        noop: bool,
        /// Asiento de apertura, si corresponde y no está duplicado.
        opening: Option<PlannedMovement>,
    },
    Movement {
        line_number: usize,
        header: MovementHeader,
        lines: Vec<MovementLine>,
    },
}

pub struct BatchPersister<'a> {
    products: &'a dyn ProductRepository,
    movements: &'a dyn MovementRepository,
    dry_run: bool,
    chunk_size: usize,
}

impl<'a> BatchPersister<'a> {
    pub fn new(
        products: &'a dyn ProductRepository,
        movements: &'a dyn MovementRepository,
        dry_run: bool,
        chunk_size: usize,
    ) -> Self {
        Self {
            products,
            movements,
            dry_run,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Persiste todas las filas planificadas, chunk a chunk y en
    /// orden de archivo, fusionando los conteos en el agregador.
    pub async fn persist(&self, planned: Vec<PlannedRow>, agg: &mut ResultAggregator) {
        for (chunk_idx, chunk) in planned.chunks(self.chunk_size).enumerate() {
            debug!(
                chunk = chunk_idx,
                rows = chunk.len(),
                dry_run = self.dry_run,
                "persistiendo chunk"
            );
            for row in chunk {
                self.persist_row(row, agg).await;
            }
        }
    }

    async fn persist_row(&self, row: &PlannedRow, agg: &mut ResultAggregator) {
        match row {
            PlannedRow::Product {
                line_number,
                weight,
                product,
                exists,
                noop,
                opening,
            } => {
                let mut wrote_product = false;

                if *noop {
                    agg.table_skipped(TABLE_PRODUCTS);
                } else {
                    if !self.dry_run {
                        if let Err(e) = self.products.save(product).await {
                            warn!(line = line_number, error = %e, "falló el upsert de producto");
                            agg.rows_skipped(*line_number, format!("productos: {e}"), *weight);
                            agg.table_skipped(TABLE_PRODUCTS);
                            return;
                        }
                    }
                    wrote_product = true;
                    if *exists {
                        agg.table_updated(TABLE_PRODUCTS);
                    } else {
                        agg.table_inserted(TABLE_PRODUCTS);
                    }
                }

                let wrote_opening = match opening {
                    Some(planned) => self.persist_opening(*line_number, planned, agg).await,
                    None => false,
                };

                // La fila cuenta como persistida si escribió su ficha
                // o su asiento de apertura; idéntica y sin asiento
                // nuevo = descarte silencioso (re-importación).
                if wrote_product || wrote_opening {
                    agg.rows_persisted(*weight);
                } else {
                    agg.rows_skipped_silently(*weight);
                }
            }

            PlannedRow::Movement {
                line_number,
                header,
                lines,
            } => {
                if !self.dry_run {
                    if let Err(e) = self.movements.save_header_and_lines(header, lines).await {
                        warn!(line = line_number, error = %e, "falló la inserción de movimiento");
                        agg.row_skipped(*line_number, format!("movimientos: {e}"));
                        agg.table_skipped(TABLE_MOVEMENTS);
                        return;
                    }
                }
                agg.row_persisted();
                agg.table_inserted(TABLE_MOVEMENTS);
                for _ in lines {
                    agg.table_inserted(TABLE_MOVEMENT_LINES);
                }
            }
        }
    }

    /// Apertura de stock: su falla no anula la ficha ya escrita,
    /// queda como advertencia y el asiento se cuenta descartado.
    async fn persist_opening(
        &self,
        line_number: usize,
        planned: &PlannedMovement,
        agg: &mut ResultAggregator,
    ) -> bool {
        if !self.dry_run {
            if let Err(e) = self
                .movements
                .save_header_and_lines(&planned.header, &planned.lines)
                .await
            {
                warn!(line = line_number, error = %e, "falló el asiento de apertura");
                agg.warning(line_number, format!("asiento de apertura: {e}"));
                agg.table_skipped(TABLE_MOVEMENTS);
                return false;
            }
        }
        agg.table_inserted(TABLE_MOVEMENTS);
        for _ in &planned.lines {
            agg.table_inserted(TABLE_MOVEMENT_LINES);
        }
        true
    }
}
