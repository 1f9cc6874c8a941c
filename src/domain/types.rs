// ==========================================
// Sistema de Inventario y Kardex - Tipos de dominio
// ==========================================
// Vocabulario canónico de categorías, unidades y
// tipos de movimiento. Los alias de planilla se
// resuelven en el normalizador, no aquí.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Categoría de producto
// ==========================================
// Serialización: MAYÚSCULAS (igual que la base de datos)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    General,   // Fallback cuando la planilla no trae categoría
    Cerveza,
    Vino,
    Destilado, // Piscos, whiskies, rones
    Bebida,    // Analcohólicos
    Snack,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "GENERAL",
            Category::Cerveza => "CERVEZA",
            Category::Vino => "VINO",
            Category::Destilado => "DESTILADO",
            Category::Bebida => "BEBIDA",
            Category::Snack => "SNACK",
        }
    }

    /// Reconoce un token ya normalizado (mayúsculas, sin acentos).
    /// Devuelve None cuando el valor no calza con ningún alias conocido;
    /// el llamador decide el fallback (GENERAL para productos).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GENERAL" | "OTRO" | "OTROS" => Some(Category::General),
            "CERVEZA" | "CERVEZAS" => Some(Category::Cerveza),
            "VINO" | "VINOS" | "ESPUMANTE" => Some(Category::Vino),
            "DESTILADO" | "DESTILADOS" | "LICOR" | "LICORES" => Some(Category::Destilado),
            "BEBIDA" | "BEBIDAS" | "ANALCOHOLICO" | "ANALCOHOLICOS" => Some(Category::Bebida),
            "SNACK" | "SNACKS" | "ABARROTES" => Some(Category::Snack),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Unidad base de venta
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseUnit {
    #[default]
    Unidad,
    Pack,
    Caja,
    Litro,
}

impl BaseUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseUnit::Unidad => "UNIDAD",
            BaseUnit::Pack => "PACK",
            BaseUnit::Caja => "CAJA",
            BaseUnit::Litro => "LITRO",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "UNIDAD" | "UNIDADES" | "UN" | "U" | "UND" | "BOTELLA" | "BOT" => {
                Some(BaseUnit::Unidad)
            }
            "PACK" | "PAQUETE" | "SIXPACK" => Some(BaseUnit::Pack),
            "CAJA" | "CAJAS" | "CJ" => Some(BaseUnit::Caja),
            "LITRO" | "LITROS" | "LT" | "L" => Some(BaseUnit::Litro),
            _ => None,
        }
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Tipo de movimiento de kardex
// ==========================================
// ENTRADA suma stock, SALIDA resta, AJUSTE corrige.
// Campo obligatorio en filas de movimiento: un valor
// no reconocido es error de fila, nunca fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Entrada,
    Salida,
    Ajuste,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entrada => "ENTRADA",
            MovementKind::Salida => "SALIDA",
            MovementKind::Ajuste => "AJUSTE",
        }
    }

    /// Alias heredados de las planillas históricas:
    /// "I"/"IN"/"E" -> ENTRADA, "S"/"OUT" -> SALIDA, "A"/"ADJ" -> AJUSTE.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ENTRADA" | "E" | "I" | "IN" | "INGRESO" | "COMPRA" => Some(MovementKind::Entrada),
            "SALIDA" | "S" | "OUT" | "EGRESO" | "VENTA" => Some(MovementKind::Salida),
            "AJUSTE" | "A" | "ADJ" | "AJ" => Some(MovementKind::Ajuste),
            _ => None,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Modo de resolución contra el catálogo
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogMode {
    /// Código de barras desconocido = error de fila.
    Strict,
    /// Código de barras desconocido = crear placeholder mínimo.
    #[default]
    Upsert,
}

// ==========================================
// Política de contabilización del stock inicial
// ==========================================
// Las dos cargas históricas no coincidían en si el stock
// inicial se asienta como ENTRADA o como AJUSTE; queda
// como política explícita del llamador.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitialStockPolicy {
    #[default]
    Entrada,
    Ajuste,
}

impl InitialStockPolicy {
    pub fn movement_kind(&self) -> MovementKind {
        match self {
            InitialStockPolicy::Entrada => MovementKind::Entrada,
            InitialStockPolicy::Ajuste => MovementKind::Ajuste,
        }
    }
}
