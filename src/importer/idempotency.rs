// ==========================================
// Sistema de Inventario y Kardex - Clave de idempotencia
// ==========================================
// Hash determinista de los campos definitorios del registro
// lógico. Función pura de la entrada normalizada: nunca del
// reloj, del azar ni de la posición de la fila. Re-importar
// el mismo archivo es un no-op.
// ==========================================

use crate::domain::types::MovementKind;
use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};

fn digest_hex(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// Clave de un movimiento: (codigo_barras, fecha-hora, tipo, cantidad).
pub fn movement_key(
    barcode: &str,
    occurred_at: NaiveDateTime,
    kind: MovementKind,
    quantity: i64,
) -> String {
    let payload = format!(
        "{}|{}|{}|{}",
        barcode,
        occurred_at.format("%Y-%m-%dT%H:%M:%S"),
        kind.as_str(),
        quantity
    );
    digest_hex(&payload)
}

/// Clave del asiento de apertura de un producto: (codigo_barras, fecha).
/// Re-importar la misma planilla de productos nunca duplica el saldo
/// inicial, aunque cambie la cantidad declarada.
pub fn initial_stock_key(barcode: &str, stock_date: NaiveDate) -> String {
    let payload = format!("{}|{}|STOCK_INICIAL", barcode, stock_date.format("%Y-%m-%d"));
    digest_hex(&payload)
}
