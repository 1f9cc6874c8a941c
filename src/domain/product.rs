// ==========================================
// Sistema de Inventario y Kardex - Producto
// ==========================================
// Entidad del catálogo. La clave natural es el
// código de barras; el id autoincremental es de
// la base de datos.
// ==========================================

use crate::domain::types::{BaseUnit, Category};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // ===== Identidad =====
    pub id: Option<i64>,          // rowid en SQLite (None antes de persistir)
    pub barcode: String,          // Clave natural, solo dígitos

    // ===== Ficha =====
    pub name: String,
    pub brand: Option<String>,
    pub category: Category,
    pub base_unit: BaseUnit,

    // ===== Atributos de botillería =====
    pub volume_ml: Option<i32>,       // Contenido neto (ml)
    pub alcohol_degree: Option<f64>,  // Graduación alcohólica (°GL)

    // ===== Precios =====
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,

    // ===== Estado =====
    pub active: bool,

    // ===== Metadatos =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Placeholder mínimo para modo upsert: un movimiento referencia un
    /// código que el catálogo no conoce y se crea la ficha con defaults
    /// seguros, a enriquecer después desde la pantalla de productos.
    pub fn placeholder(barcode: &str) -> Self {
        let now = Utc::now();
        Product {
            id: None,
            barcode: barcode.to_string(),
            name: format!("Producto {}", barcode),
            brand: None,
            category: Category::General,
            base_unit: BaseUnit::Unidad,
            volume_ml: None,
            alcohol_degree: None,
            purchase_price: None,
            sale_price: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
