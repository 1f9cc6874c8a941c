// ==========================================
// Sistema de Inventario y Kardex - Importador (implementación)
// ==========================================
// Orquesta el pipeline completo:
// parsear -> resolver esquema -> normalizar -> (plegar) ->
// idempotencia -> catálogo -> persistir por chunks -> resultado
// ==========================================
// Una corrida es secuencial de punta a punta: el orden de las
// filas afecta las colisiones de clave dentro del archivo y los
// chunks confirman en orden para totales reproducibles.
// ==========================================

use crate::domain::import::{ImportOptions, ImportResult};
use crate::domain::movement::{MovementHeader, MovementLine};
use crate::domain::product::Product;
use crate::domain::record::{CanonicalRecord, MovementRecord, ProductRecord};
use crate::importer::batch_persister::{BatchPersister, PlannedMovement, PlannedRow};
use crate::importer::catalog_resolver::CatalogResolver;
use crate::importer::error::ImportError;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::fold::fold_movements_into_products;
use crate::importer::idempotency::{initial_stock_key, movement_key};
use crate::importer::inventory_importer_trait::InventoryImporter;
use crate::importer::result_aggregator::{ResultAggregator, TABLE_MOVEMENTS, TABLE_PRODUCTS};
use crate::importer::row_normalizer::{normalize_movement_row, normalize_row};
use crate::importer::schema_resolver::{resolve_schema, ImportKind};
use crate::repository::movement_repo::MovementRepository;
use crate::repository::product_repo::ProductRepository;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// InventoryImporterImpl
// ==========================================
pub struct InventoryImporterImpl<P, M>
where
    P: ProductRepository,
    M: MovementRepository,
{
    products: P,
    movements: M,
    file_parser: UniversalFileParser,
}

impl<P, M> InventoryImporterImpl<P, M>
where
    P: ProductRepository,
    M: MovementRepository,
{
    pub fn new(products: P, movements: M) -> Self {
        Self {
            products,
            movements,
            file_parser: UniversalFileParser,
        }
    }
}

#[async_trait::async_trait]
impl<P, M> InventoryImporter for InventoryImporterImpl<P, M>
where
    P: ProductRepository + Send + Sync,
    M: MovementRepository + Send + Sync,
{
    #[instrument(skip(self, file_path, options), fields(batch_id))]
    async fn import_file<F: AsRef<Path> + Send>(
        &self,
        file_path: F,
        options: &ImportOptions,
    ) -> Result<ImportResult, ImportError> {
        let start = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let path_str = file_path.as_ref().display().to_string();

        info!(
            batch_id = %batch_id,
            file = %path_str,
            dry_run = options.dry_run,
            "inicio de importación"
        );

        // === Etapa 1: parseo del archivo (fatal si falla) ===
        let parsed = self.file_parser.parse(file_path.as_ref())?;

        // === Etapa 2: resolución de esquema (fatal si faltan columnas) ===
        let index = resolve_schema(&parsed.headers)?;
        info!(
            batch_id = %batch_id,
            kind = ?index.kind,
            total_rows = parsed.rows.len(),
            "esquema resuelto"
        );

        let mut agg = ResultAggregator::new(options.dry_run);
        agg.set_total_rows(parsed.rows.len());
        for w in &parsed.warnings {
            agg.warning(w.line_number, w.message.clone());
        }

        let mut resolver =
            CatalogResolver::new(&self.products, options.catalog_mode, options.dry_run);
        let mut seen_keys: HashSet<String> = HashSet::new();
        let mut planned: Vec<PlannedRow> = Vec::new();

        // === Etapas 3-5: normalizar, idempotencia, catálogo ===
        match index.kind {
            ImportKind::Movement if options.fold_movements => {
                // Plegado: materializa el set completo de filas aceptadas
                // antes de emitir productos (neto por código de barras).
                let mut accepted: Vec<MovementRecord> = Vec::new();
                for row in &parsed.rows {
                    match normalize_movement_row(row, &index, options.default_timestamp) {
                        Err(err) => agg.row_skipped(err.line_number, err.joined()),
                        Ok((record, warnings)) => {
                            for w in warnings {
                                agg.warning(w.line_number, w.message);
                            }
                            accepted.push(record);
                        }
                    }
                }

                for folded in fold_movements_into_products(&accepted) {
                    if let Some(p) = self
                        .plan_product(
                            folded.record,
                            folded.contributing_rows,
                            &mut resolver,
                            &mut seen_keys,
                            options,
                            &mut agg,
                        )
                        .await
                    {
                        planned.push(p);
                    }
                }
            }

            _ => {
                for row in &parsed.rows {
                    match normalize_row(row, &index, options.default_timestamp) {
                        Err(err) => agg.row_skipped(err.line_number, err.joined()),
                        Ok((record, warnings)) => {
                            for w in warnings {
                                agg.warning(w.line_number, w.message);
                            }
                            let planned_row = match record {
                                CanonicalRecord::Product(r) => {
                                    self.plan_product(
                                        r,
                                        1,
                                        &mut resolver,
                                        &mut seen_keys,
                                        options,
                                        &mut agg,
                                    )
                                    .await
                                }
                                CanonicalRecord::Movement(r) => {
                                    self.plan_movement(r, &mut resolver, &mut seen_keys, &mut agg)
                                        .await
                                }
                            };
                            if let Some(p) = planned_row {
                                planned.push(p);
                            }
                        }
                    }
                }
            }
        }

        // === Etapa 6: persistencia por chunks ===
        let persister = BatchPersister::new(
            &self.products,
            &self.movements,
            options.dry_run,
            options.effective_chunk_size(),
        );
        persister.persist(planned, &mut agg).await;

        // === Etapa 7: resultado ===
        let result = agg.finish();
        debug_assert_eq!(
            result.persisted_rows + result.skipped_rows,
            result.total_rows
        );

        info!(
            batch_id = %batch_id,
            total = result.total_rows,
            persisted = result.persisted_rows,
            skipped = result.skipped_rows,
            errors = result.errors.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "importación completada"
        );

        Ok(result)
    }

    async fn import_files<F: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<F>,
        options: &ImportOptions,
    ) -> Result<Vec<Result<ImportResult, String>>, ImportError> {
        info!(count = file_paths.len(), "inicio de importación múltiple");

        let mut results = Vec::with_capacity(file_paths.len());
        for path in file_paths {
            let path_str = path.as_ref().display().to_string();
            match self.import_file(path, options).await {
                Ok(result) => results.push(Ok(result)),
                Err(e) => {
                    error!(file = %path_str, error = %e, "falló la importación del archivo");
                    results.push(Err(format!("archivo {}: {}", path_str, e)));
                }
            }
        }

        info!(
            total = results.len(),
            ok = results.iter().filter(|r| r.is_ok()).count(),
            "importación múltiple completada"
        );
        Ok(results)
    }
}

// Métodos de planificación
impl<P, M> InventoryImporterImpl<P, M>
where
    P: ProductRepository + Send + Sync,
    M: MovementRepository + Send + Sync,
{
    /// Planifica una fila de producto: clasificación insert/update/no-op
    /// contra el catálogo y asiento de apertura con su chequeo de clave.
    async fn plan_product(
        &self,
        record: ProductRecord,
        weight: usize,
        resolver: &mut CatalogResolver<'_>,
        seen_keys: &mut HashSet<String>,
        options: &ImportOptions,
        agg: &mut ResultAggregator,
    ) -> Option<PlannedRow> {
        let existing = match resolver.lookup(&record.barcode).await {
            Ok(found) => found,
            Err(msg) => {
                agg.rows_skipped(record.line_number, msg, weight);
                return None;
            }
        };

        let (product, exists, noop) = apply_record_to_product(existing.as_ref(), &record);

        // Asiento de apertura, deduplicado por (codigo, fecha_stock)
        let mut opening = None;
        if let (Some(quantity), Some(stock_date)) = (record.initial_stock, record.stock_date) {
            let key = initial_stock_key(&record.barcode, stock_date);

            let already_applied = if seen_keys.contains(&key) {
                true
            } else {
                match self.movements.exists_by_idempotency_key(&key).await {
                    Ok(found) => found,
                    Err(e) => {
                        agg.rows_skipped(record.line_number, format!("kardex: {e}"), weight);
                        return None;
                    }
                }
            };

            if already_applied {
                agg.table_skipped(TABLE_MOVEMENTS);
            } else {
                seen_keys.insert(key.clone());
                opening = Some(PlannedMovement {
                    header: MovementHeader {
                        movement_id: Uuid::new_v4().to_string(),
                        idempotency_key: key,
                        kind: options.initial_stock_policy.movement_kind(),
                        occurred_at: stock_date
                            .and_hms_opt(0, 0, 0)
                            .expect("medianoche válida"),
                        motive: Some("Stock inicial".to_string()),
                    },
                    lines: vec![MovementLine {
                        barcode: record.barcode.clone(),
                        quantity,
                    }],
                });
            }
        }

        // Las filas siguientes del mismo código ven este estado,
        // igual en corrida real que en dry-run.
        resolver.remember(product.clone());

        debug!(
            line = record.line_number,
            barcode = %record.barcode,
            exists,
            noop,
            opening = opening.is_some(),
            "fila de producto planificada"
        );

        Some(PlannedRow::Product {
            line_number: record.line_number,
            weight,
            product,
            exists,
            noop,
            opening,
        })
    }

    /// Planifica una fila de movimiento: clave de idempotencia primero,
    /// resolución de catálogo después.
    async fn plan_movement(
        &self,
        record: MovementRecord,
        resolver: &mut CatalogResolver<'_>,
        seen_keys: &mut HashSet<String>,
        agg: &mut ResultAggregator,
    ) -> Option<PlannedRow> {
        let key = movement_key(
            &record.barcode,
            record.occurred_at,
            record.kind,
            record.quantity,
        );

        // Duplicado (en el archivo o ya aplicado): descarte silencioso
        let duplicate = if seen_keys.contains(&key) {
            true
        } else {
            match self.movements.exists_by_idempotency_key(&key).await {
                Ok(found) => found,
                Err(e) => {
                    agg.row_skipped(record.line_number, format!("kardex: {e}"));
                    return None;
                }
            }
        };

        if duplicate {
            debug!(line = record.line_number, "movimiento duplicado, descartado");
            agg.row_skipped_silently();
            agg.table_skipped(TABLE_MOVEMENTS);
            return None;
        }
        seen_keys.insert(key.clone());

        let resolution = match resolver.resolve(&record.barcode).await {
            Ok(r) => r,
            Err(msg) => {
                agg.row_skipped(record.line_number, msg);
                return None;
            }
        };
        if resolution.created {
            agg.table_inserted(TABLE_PRODUCTS);
        }

        Some(PlannedRow::Movement {
            line_number: record.line_number,
            header: MovementHeader {
                movement_id: Uuid::new_v4().to_string(),
                idempotency_key: key,
                kind: record.kind,
                occurred_at: record.occurred_at,
                motive: record.motive.clone(),
            },
            lines: vec![MovementLine {
                barcode: record.barcode.clone(),
                quantity: record.quantity,
            }],
        })
    }
}

/// Mapeo explícito registro canónico -> entidad de catálogo.
/// Los opcionales ausentes conservan lo ya persistido; devuelve
/// además la clasificación (existe, contenido idéntico).
fn apply_record_to_product(
    existing: Option<&Product>,
    record: &ProductRecord,
) -> (Product, bool, bool) {
    let now = Utc::now();

    let merged = match existing {
        Some(prev) => Product {
            id: prev.id,
            barcode: record.barcode.clone(),
            name: record.name.clone(),
            brand: record.brand.clone().or_else(|| prev.brand.clone()),
            category: record.category,
            base_unit: record.base_unit,
            volume_ml: record.volume_ml.or(prev.volume_ml),
            alcohol_degree: record.alcohol_degree.or(prev.alcohol_degree),
            purchase_price: record.purchase_price.or(prev.purchase_price),
            sale_price: record.sale_price.or(prev.sale_price),
            active: record.active,
            created_at: prev.created_at,
            updated_at: now,
        },
        None => Product {
            id: None,
            barcode: record.barcode.clone(),
            name: record.name.clone(),
            brand: record.brand.clone(),
            category: record.category,
            base_unit: record.base_unit,
            volume_ml: record.volume_ml,
            alcohol_degree: record.alcohol_degree,
            purchase_price: record.purchase_price,
            sale_price: record.sale_price,
            active: record.active,
            created_at: now,
            updated_at: now,
        },
    };

    let exists = existing.is_some();
    let noop = existing.is_some_and(|prev| {
        prev.name == merged.name
            && prev.brand == merged.brand
            && prev.category == merged.category
            && prev.base_unit == merged.base_unit
            && prev.volume_ml == merged.volume_ml
            && prev.alcohol_degree == merged.alcohol_degree
            && prev.purchase_price == merged.purchase_price
            && prev.sale_price == merged.sale_price
            && prev.active == merged.active
    });

    (merged, exists, noop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BaseUnit, Category};
    use rust_decimal::Decimal;

    fn record(barcode: &str, name: &str) -> ProductRecord {
        ProductRecord {
            line_number: 2,
            barcode: barcode.to_string(),
            name: name.to_string(),
            brand: None,
            category: Category::General,
            base_unit: BaseUnit::Unidad,
            volume_ml: None,
            alcohol_degree: None,
            purchase_price: None,
            sale_price: None,
            initial_stock: None,
            stock_date: None,
            active: true,
        }
    }

    #[test]
    fn test_apply_record_new_product() {
        let rec = record("111", "Cerveza");
        let (product, exists, noop) = apply_record_to_product(None, &rec);

        assert_eq!(product.barcode, "111");
        assert!(!exists);
        assert!(!noop);
        assert!(product.id.is_none());
    }

    #[test]
    fn test_apply_record_preserves_existing_optionals() {
        let rec = record("111", "Cerveza");
        let mut prev = Product::placeholder("111");
        prev.id = Some(7);
        prev.brand = Some("Austral".to_string());
        prev.sale_price = Some(Decimal::from(1990));

        let (merged, exists, _) = apply_record_to_product(Some(&prev), &rec);

        assert!(exists);
        assert_eq!(merged.id, Some(7));
        assert_eq!(merged.brand.as_deref(), Some("Austral"));
        assert_eq!(merged.sale_price, Some(Decimal::from(1990)));
        assert_eq!(merged.name, "Cerveza"); // el nombre siempre se actualiza
    }

    #[test]
    fn test_apply_record_detects_noop() {
        let rec = record("111", "Cerveza");
        let (first, _, _) = apply_record_to_product(None, &rec);

        // Re-importar el mismo contenido contra lo ya persistido
        let (_, exists, noop) = apply_record_to_product(Some(&first), &rec);
        assert!(exists);
        assert!(noop);

        // Un cambio de nombre deja de ser no-op
        let changed = record("111", "Cerveza Lager");
        let (_, _, noop) = apply_record_to_product(Some(&first), &changed);
        assert!(!noop);
    }
}
