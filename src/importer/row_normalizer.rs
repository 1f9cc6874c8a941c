// ==========================================
// Sistema de Inventario y Kardex - Normalizador de filas
// ==========================================
// Fila cruda + índice de esquema -> registro canónico o
// RowError. Corren TODAS las validaciones de campo antes
// de decidir, así una misma fila reporta todos sus
// problemas de una vez.
// ==========================================

use crate::domain::record::{CanonicalRecord, MovementRecord, ProductRecord, RowError};
use crate::domain::types::{BaseUnit, Category, MovementKind};
use crate::importer::file_parser::{ParseWarning, RawRow};
use crate::importer::schema_resolver::{self as schema, HeaderIndex, ImportKind};
use crate::importer::text::normalize_token;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

// Formatos de fecha/hora aceptados, en orden de intento.
// ISO primero; dd/mm/yyyy por las planillas antiguas.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

// ==========================================
// Parseo de campos individuales
// ==========================================

/// Código de barras: se eliminan separadores (espacios, guiones)
/// y debe quedar al menos un dígito.
pub fn parse_barcode(raw: &str) -> Result<String, String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        Err(format!("codigo_barras inválido: '{}'", raw.trim()))
    } else {
        Ok(digits)
    }
}

/// Montos de dinero con coma o punto decimal.
///
/// "1.234,56" (coma decimal, punto de miles) y "1234.56" terminan
/// en el mismo Decimal. Se descartan espacios y símbolos de moneda.
pub fn parse_money(raw: &str) -> Result<Decimal, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != '€')
        .collect();

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let normalized = match (last_comma, last_dot) {
        // Coma como separador decimal: "1.234,56" o "123,45"
        (Some(c), dot) if dot.map_or(true, |d| c > d) => {
            cleaned.replace('.', "").replace(',', ".")
        }
        // Punto decimal; las comas que queden son de miles
        _ => cleaned.replace(',', ""),
    };

    Decimal::from_str(&normalized).map_err(|_| format!("monto inválido: '{}'", raw.trim()))
}

/// Cantidad entera: se eliminan todos los caracteres que no sean
/// dígito o signo menos antes de parsear.
pub fn parse_quantity(raw: &str) -> Result<i64, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    cleaned
        .parse::<i64>()
        .map_err(|_| format!("cantidad inválida: '{}'", raw.trim()))
}

/// Booleano de planilla: {1,true,yes,si,sí,y} / {0,false,no,n}.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match normalize_token(raw).as_str() {
        "1" | "TRUE" | "YES" | "SI" | "Y" => Ok(true),
        "0" | "FALSE" | "NO" | "N" => Ok(false),
        _ => Err(format!("valor booleano inválido: '{}'", raw.trim())),
    }
}

/// Número real con punto decimal (volumen, graduación).
pub fn parse_f64(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("número inválido: '{}'", raw.trim()))
}

/// Fecha-hora: ISO primero, luego fecha sola (a medianoche).
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let value = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(d.and_hms_opt(0, 0, 0).expect("medianoche válida"));
        }
    }
    Err(format!("fecha ilegible: '{value}'"))
}

/// Fecha sola (stock inicial).
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let value = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(d);
        }
    }
    Err(format!("fecha ilegible: '{value}'"))
}

// ==========================================
// Normalización por tipo de archivo
// ==========================================

/// Resultado de normalizar una fila: registro + advertencias propias.
pub type NormalizedRow<T> = Result<(T, Vec<ParseWarning>), RowError>;

/// Despacho por tipo de archivo: fila cruda -> registro canónico.
pub fn normalize_row(
    row: &RawRow,
    index: &HeaderIndex,
    default_timestamp: Option<NaiveDateTime>,
) -> NormalizedRow<CanonicalRecord> {
    match index.kind {
        ImportKind::Product => normalize_product_row(row, index, default_timestamp)
            .map(|(record, warnings)| (CanonicalRecord::Product(record), warnings)),
        ImportKind::Movement => normalize_movement_row(row, index, default_timestamp)
            .map(|(record, warnings)| (CanonicalRecord::Movement(record), warnings)),
    }
}

/// Fila de producto -> ProductRecord.
///
/// categoria/unidad no reconocidas caen al default documentado
/// (GENERAL / UNIDAD); los campos numéricos y booleanos ilegibles
/// sí son errores de campo.
pub fn normalize_product_row(
    row: &RawRow,
    index: &HeaderIndex,
    default_timestamp: Option<NaiveDateTime>,
) -> NormalizedRow<ProductRecord> {
    debug_assert_eq!(index.kind, ImportKind::Product);

    let mut error = RowError::new(row.line_number);
    let mut warnings = Vec::new();

    let barcode = match index.value(row, schema::F_BARCODE) {
        Some(raw) => match parse_barcode(raw) {
            Ok(b) => Some(b),
            Err(msg) => {
                error.push(msg);
                None
            }
        },
        None => {
            error.push("codigo_barras vacío");
            None
        }
    };

    let name = match index.value(row, schema::F_NAME) {
        Some(raw) => Some(raw.to_string()),
        None => {
            error.push("nombre vacío");
            None
        }
    };

    let brand = index.value(row, schema::F_BRAND).map(|v| v.to_string());

    let category = index
        .value(row, schema::F_CATEGORY)
        .and_then(|raw| Category::from_token(&normalize_token(raw)))
        .unwrap_or_default();

    let base_unit = index
        .value(row, schema::F_UNIT)
        .and_then(|raw| BaseUnit::from_token(&normalize_token(raw)))
        .unwrap_or_default();

    let volume_ml = match index.value(row, schema::F_VOLUME) {
        Some(raw) => match parse_f64(raw) {
            Ok(v) => Some(v.round() as i32),
            Err(msg) => {
                error.push(format!("volumen_ml: {msg}"));
                None
            }
        },
        None => None,
    };

    let alcohol_degree = match index.value(row, schema::F_ALCOHOL) {
        Some(raw) => match parse_f64(raw) {
            Ok(v) => Some(v),
            Err(msg) => {
                error.push(format!("grado_alcoholico: {msg}"));
                None
            }
        },
        None => None,
    };

    let purchase_price = match index.value(row, schema::F_PURCHASE_PRICE) {
        Some(raw) => match parse_money(raw) {
            Ok(v) => Some(v),
            Err(msg) => {
                error.push(format!("precio_compra: {msg}"));
                None
            }
        },
        None => None,
    };

    let sale_price = match index.value(row, schema::F_SALE_PRICE) {
        Some(raw) => match parse_money(raw) {
            Ok(v) => Some(v),
            Err(msg) => {
                error.push(format!("precio_venta: {msg}"));
                None
            }
        },
        None => None,
    };

    let initial_stock = match index.value(row, schema::F_INITIAL_STOCK) {
        Some(raw) => match parse_quantity(raw) {
            // Cantidad <= 0 se rechaza siempre, sin importar el resto
            Ok(q) if q <= 0 => {
                error.push(format!("stock_inicial debe ser positivo: {q}"));
                None
            }
            Ok(q) => Some(q),
            Err(msg) => {
                error.push(format!("stock_inicial: {msg}"));
                None
            }
        },
        None => None,
    };

    // La fecha del stock ancla la clave de idempotencia del asiento
    // de apertura; nunca se usa el reloj.
    let stock_date = match index.value(row, schema::F_STOCK_DATE) {
        Some(raw) => match parse_date(raw) {
            Ok(d) => Some(d),
            Err(msg) => {
                if let Some(default) = default_timestamp {
                    warnings.push(ParseWarning {
                        line_number: row.line_number,
                        message: format!("{msg}; se usó la fecha por defecto"),
                    });
                    Some(default.date())
                } else {
                    error.push(format!("fecha_stock: {msg}"));
                    None
                }
            }
        },
        None => None,
    };

    let stock_date = match (initial_stock, stock_date) {
        (Some(_), None) => {
            if let Some(default) = default_timestamp {
                Some(default.date())
            } else {
                error.push("stock_inicial sin fecha_stock ni fecha por defecto");
                None
            }
        }
        (_, d) => d,
    };

    let active = match index.value(row, schema::F_ACTIVE) {
        Some(raw) => match parse_bool(raw) {
            Ok(v) => v,
            Err(msg) => {
                error.push(format!("activo: {msg}"));
                true
            }
        },
        None => true,
    };

    if !error.is_empty() {
        return Err(error);
    }

    Ok((
        ProductRecord {
            line_number: row.line_number,
            barcode: barcode.expect("validado arriba"),
            name: name.expect("validado arriba"),
            brand,
            category,
            base_unit,
            volume_ml,
            alcohol_degree,
            purchase_price,
            sale_price,
            initial_stock,
            stock_date,
            active,
        },
        warnings,
    ))
}

/// Fila de movimiento -> MovementRecord.
///
/// El tipo de movimiento es obligatorio: un valor no reconocido
/// es error duro, nunca fallback.
pub fn normalize_movement_row(
    row: &RawRow,
    index: &HeaderIndex,
    default_timestamp: Option<NaiveDateTime>,
) -> NormalizedRow<MovementRecord> {
    debug_assert_eq!(index.kind, ImportKind::Movement);

    let mut error = RowError::new(row.line_number);
    let mut warnings = Vec::new();

    let barcode = match index.value(row, schema::F_BARCODE) {
        Some(raw) => match parse_barcode(raw) {
            Ok(b) => Some(b),
            Err(msg) => {
                error.push(msg);
                None
            }
        },
        None => {
            error.push("codigo_barras vacío");
            None
        }
    };

    let kind = match index.value(row, schema::F_KIND) {
        Some(raw) => match MovementKind::from_token(&normalize_token(raw)) {
            Some(k) => Some(k),
            None => {
                error.push(format!("tipo de movimiento desconocido: '{}'", raw.trim()));
                None
            }
        },
        None => {
            error.push("tipo de movimiento vacío");
            None
        }
    };

    let quantity = match index.value(row, schema::F_QUANTITY) {
        Some(raw) => match parse_quantity(raw) {
            // Cantidad <= 0 se rechaza siempre, aunque el resto valide
            Ok(q) if q <= 0 => {
                error.push(format!("cantidad debe ser positiva: {q}"));
                None
            }
            Ok(q) => Some(q),
            Err(msg) => {
                error.push(msg);
                None
            }
        },
        None => {
            error.push("cantidad vacía");
            None
        }
    };

    let occurred_at = match index.value(row, schema::F_DATE) {
        Some(raw) => match parse_datetime(raw) {
            Ok(dt) => Some(dt),
            Err(msg) => {
                if let Some(default) = default_timestamp {
                    warnings.push(ParseWarning {
                        line_number: row.line_number,
                        message: format!("{msg}; se usó la fecha por defecto"),
                    });
                    Some(default)
                } else {
                    error.push(msg);
                    None
                }
            }
        },
        None => {
            if let Some(default) = default_timestamp {
                Some(default)
            } else {
                error.push("fecha vacía y sin fecha por defecto");
                None
            }
        }
    };

    let motive = index.value(row, schema::F_MOTIVE).map(|v| v.to_string());

    if !error.is_empty() {
        return Err(error);
    }

    Ok((
        MovementRecord {
            line_number: row.line_number,
            barcode: barcode.expect("validado arriba"),
            kind: kind.expect("validado arriba"),
            quantity: quantity.expect("validado arriba"),
            occurred_at: occurred_at.expect("validado arriba"),
            motive,
        },
        warnings,
    ))
}
