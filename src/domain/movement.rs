// ==========================================
// Sistema de Inventario y Kardex - Movimiento
// ==========================================
// Cabecera + detalle del kardex. La cabecera lleva
// la clave de idempotencia; una fila aceptada del
// archivo produce una cabecera y sus líneas en una
// sola transacción.
// ==========================================

use crate::domain::types::MovementKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Cabecera de movimiento
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementHeader {
    pub movement_id: String,       // UUID v4
    pub idempotency_key: String,   // Hash hex de los campos definitorios (única)
    pub kind: MovementKind,
    pub occurred_at: NaiveDateTime,
    pub motive: Option<String>,    // Glosa libre de la planilla
}

// ==========================================
// Línea de movimiento
// ==========================================
// Cantidad siempre positiva; el signo lo aporta el
// tipo de la cabecera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementLine {
    pub barcode: String,
    pub quantity: i64,
}
