// ==========================================
// Sistema de Inventario y Kardex - Plegado de movimientos
// ==========================================
// Convierte un archivo de movimientos en filas de producto:
// cantidad neta por código de barras como stock de apertura.
// Requiere materializar el set completo de filas en memoria;
// es la única etapa del pipeline que lo hace.
// ==========================================

use crate::domain::record::{MovementRecord, ProductRecord};
use crate::domain::types::MovementKind;
use std::collections::HashMap;

/// Producto plegado + cuántas filas de origen lo componen
/// (para que los totales de filas sigan cuadrando).
#[derive(Debug, Clone)]
pub struct FoldedProduct {
    pub record: ProductRecord,
    pub contributing_rows: usize,
}

/// Neto por código: ENTRADA suma, SALIDA resta, AJUSTE suma.
/// Un neto <= 0 produce la ficha sin stock de apertura.
/// El orden de salida respeta la primera aparición de cada código.
pub fn fold_movements_into_products(records: &[MovementRecord]) -> Vec<FoldedProduct> {
    struct Group {
        first_line: usize,
        net: i64,
        last_date: chrono::NaiveDate,
        rows: usize,
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for record in records {
        let delta = match record.kind {
            MovementKind::Entrada | MovementKind::Ajuste => record.quantity,
            MovementKind::Salida => -record.quantity,
        };
        let date = record.occurred_at.date();

        match groups.get_mut(&record.barcode) {
            Some(group) => {
                group.net += delta;
                group.rows += 1;
                if date > group.last_date {
                    group.last_date = date;
                }
            }
            None => {
                order.push(record.barcode.clone());
                groups.insert(
                    record.barcode.clone(),
                    Group {
                        first_line: record.line_number,
                        net: delta,
                        last_date: date,
                        rows: 1,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .map(|barcode| {
            let group = groups.remove(&barcode).expect("grupo registrado");
            let has_stock = group.net > 0;

            FoldedProduct {
                record: ProductRecord {
                    line_number: group.first_line,
                    name: format!("Producto {}", barcode),
                    barcode,
                    brand: None,
                    category: Default::default(),
                    base_unit: Default::default(),
                    volume_ml: None,
                    alcohol_degree: None,
                    purchase_price: None,
                    sale_price: None,
                    initial_stock: has_stock.then_some(group.net),
                    stock_date: has_stock.then_some(group.last_date),
                    active: true,
                },
                contributing_rows: group.rows,
            }
        })
        .collect()
}
