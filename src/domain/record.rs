// ==========================================
// Sistema de Inventario y Kardex - Registros canónicos
// ==========================================
// Salida del normalizador: filas ya tipadas y
// validadas, listas para persistir. El persistidor
// no vuelve a validar reglas de negocio.
// ==========================================

use crate::domain::types::{BaseUnit, Category, MovementKind};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// Registro canónico (variante etiquetada)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanonicalRecord {
    Product(ProductRecord),
    Movement(MovementRecord),
}

impl CanonicalRecord {
    /// Número de línea en el archivo original (1-based, la cabecera es la línea 1).
    pub fn line_number(&self) -> usize {
        match self {
            CanonicalRecord::Product(r) => r.line_number,
            CanonicalRecord::Movement(r) => r.line_number,
        }
    }

    pub fn barcode(&self) -> &str {
        match self {
            CanonicalRecord::Product(r) => &r.barcode,
            CanonicalRecord::Movement(r) => &r.barcode,
        }
    }
}

// ==========================================
// Fila de producto
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub line_number: usize,

    // ===== Obligatorios =====
    pub barcode: String,              // Solo dígitos, no vacío
    pub name: String,

    // ===== Opcionales de ficha =====
    pub brand: Option<String>,
    pub category: Category,           // Default GENERAL
    pub base_unit: BaseUnit,          // Default UNIDAD
    pub volume_ml: Option<i32>,
    pub alcohol_degree: Option<f64>,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,

    // ===== Stock de apertura =====
    pub initial_stock: Option<i64>,   // > 0 cuando viene
    pub stock_date: Option<NaiveDate>,

    pub active: bool,                 // Default true
}

// ==========================================
// Fila de movimiento
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub line_number: usize,

    pub barcode: String,
    pub kind: MovementKind,
    pub quantity: i64,                // Estrictamente positiva
    pub occurred_at: NaiveDateTime,
    pub motive: Option<String>,
}

// ==========================================
// Error de fila (todos los problemas de campo juntos)
// ==========================================
// Una fila puede acumular varios mensajes; se decide
// aceptar/rechazar recién cuando corrieron todas las
// validaciones de campo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub line_number: usize,
    pub messages: Vec<String>,
}

impl RowError {
    pub fn new(line_number: usize) -> Self {
        RowError {
            line_number,
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Mensaje único para el ImportResult: "campo a inválido; campo b inválido"
    pub fn joined(&self) -> String {
        self.messages.join("; ")
    }
}
