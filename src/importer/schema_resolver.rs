// ==========================================
// Sistema de Inventario y Kardex - Resolutor de esquema
// ==========================================
// Mapea encabezados arbitrarios/localizados al vocabulario
// canónico mediante tablas de alias (muchos-a-uno, insensible
// a mayúsculas y acentos vía la normalización compartida).
// Falla rápido si falta una columna obligatoria.
// ==========================================

use crate::importer::error::{ImportEngineResult, ImportError};
use crate::importer::file_parser::RawRow;
use std::collections::HashMap;

// ==========================================
// Tipo de archivo de importación
// ==========================================
// Se autodetecta: si el set completo de columnas obligatorias
// de movimiento está presente, es archivo de movimientos;
// si no, se asume archivo de productos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Product,
    Movement,
}

// ===== Vocabulario canónico: productos =====
pub const F_BARCODE: &str = "codigo_barras";
pub const F_NAME: &str = "nombre";
pub const F_BRAND: &str = "marca";
pub const F_CATEGORY: &str = "categoria";
pub const F_UNIT: &str = "unidad";
pub const F_VOLUME: &str = "volumen_ml";
pub const F_ALCOHOL: &str = "grado_alcoholico";
pub const F_PURCHASE_PRICE: &str = "precio_compra";
pub const F_SALE_PRICE: &str = "precio_venta";
pub const F_INITIAL_STOCK: &str = "stock_inicial";
pub const F_STOCK_DATE: &str = "fecha_stock";
pub const F_ACTIVE: &str = "activo";

// ===== Vocabulario canónico: movimientos =====
pub const F_KIND: &str = "tipo";
pub const F_QUANTITY: &str = "cantidad";
pub const F_DATE: &str = "fecha";
pub const F_MOTIVE: &str = "motivo";

/// Tabla de alias de productos: canónico -> grafías aceptadas
/// (ya en forma normalizada).
const PRODUCT_ALIASES: &[(&str, &[&str])] = &[
    (F_BARCODE, &["codigo_barras", "codigo_de_barras", "cod_barras", "barcode", "ean", "codigo"]),
    (F_NAME, &["nombre", "nombre_producto", "producto", "descripcion", "name"]),
    (F_BRAND, &["marca", "brand"]),
    (F_CATEGORY, &["categoria", "rubro", "tipo_producto", "category"]),
    (F_UNIT, &["unidad", "unidad_base", "unidad_medida", "um", "unit"]),
    (F_VOLUME, &["volumen_ml", "volumen", "ml", "contenido", "cc"]),
    (F_ALCOHOL, &["grado_alcoholico", "grados", "alcohol", "abv"]),
    (F_PURCHASE_PRICE, &["precio_compra", "costo", "precio_costo"]),
    (F_SALE_PRICE, &["precio_venta", "precio", "pvp"]),
    (F_INITIAL_STOCK, &["stock_inicial", "stock", "existencia", "cantidad_inicial"]),
    (F_STOCK_DATE, &["fecha_stock", "fecha_inventario", "fecha_conteo"]),
    (F_ACTIVE, &["activo", "habilitado", "vigente", "active"]),
];

/// Tabla de alias de movimientos.
const MOVEMENT_ALIASES: &[(&str, &[&str])] = &[
    (F_BARCODE, &["codigo_barras", "codigo_de_barras", "cod_barras", "barcode", "ean", "codigo", "producto"]),
    (F_KIND, &["tipo", "tipo_movimiento", "movimiento", "operacion"]),
    (F_QUANTITY, &["cantidad", "cant", "unidades", "qty"]),
    (F_DATE, &["fecha", "fecha_movimiento", "fecha_hora", "date"]),
    (F_MOTIVE, &["motivo", "comentario", "observacion", "glosa", "detalle"]),
];

const PRODUCT_REQUIRED: &[&str] = &[F_BARCODE, F_NAME];
const MOVEMENT_REQUIRED: &[&str] = &[F_BARCODE, F_KIND, F_QUANTITY];

// ==========================================
// Índice encabezado -> campo canónico
// ==========================================
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    pub kind: ImportKind,
    /// canónico -> encabezado presente en el archivo
    map: HashMap<&'static str, String>,
}

impl HeaderIndex {
    /// Valor no vacío de un campo canónico en una fila cruda.
    pub fn value<'a>(&self, row: &'a RawRow, canonical: &str) -> Option<&'a str> {
        self.map.get(canonical).and_then(|header| row.get(header))
    }

    pub fn has(&self, canonical: &str) -> bool {
        self.map.contains_key(canonical)
    }
}

fn build_index(
    headers: &[String],
    aliases: &[(&'static str, &[&str])],
) -> HashMap<&'static str, String> {
    let mut map = HashMap::new();
    for (canonical, spellings) in aliases {
        if let Some(found) = headers
            .iter()
            .find(|h| spellings.contains(&h.as_str()))
        {
            map.insert(*canonical, found.clone());
        }
    }
    map
}

fn missing_required(
    map: &HashMap<&'static str, String>,
    required: &[&'static str],
) -> Vec<&'static str> {
    required
        .iter()
        .filter(|canonical| !map.contains_key(*canonical))
        .copied()
        .collect()
}

/// Resuelve encabezados ya normalizados contra las tablas de alias.
///
/// Detección de tipo: el set obligatorio completo de movimientos
/// presente -> archivo de movimientos; si no, productos.
pub fn resolve_schema(headers: &[String]) -> ImportEngineResult<HeaderIndex> {
    let movement_map = build_index(headers, MOVEMENT_ALIASES);
    if missing_required(&movement_map, MOVEMENT_REQUIRED).is_empty() {
        return Ok(HeaderIndex {
            kind: ImportKind::Movement,
            map: movement_map,
        });
    }

    let product_map = build_index(headers, PRODUCT_ALIASES);
    let missing = missing_required(&product_map, PRODUCT_REQUIRED);
    if missing.is_empty() {
        return Ok(HeaderIndex {
            kind: ImportKind::Product,
            map: product_map,
        });
    }

    Err(ImportError::MissingColumns {
        missing: missing.join(", "),
        observed: headers.join(", "),
    })
}
