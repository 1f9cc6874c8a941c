// ==========================================
// Sistema de Inventario y Kardex - Repositorio de catálogo (trait)
// ==========================================
// Interfaz angosta que consume el motor de importación.
// Regla: sin reglas de negocio, solo CRUD por clave natural.
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::StoreResult;
use async_trait::async_trait;

// ==========================================
// ProductRepository Trait
// ==========================================
// Implementa: ProductRepositoryImpl (rusqlite)
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Busca un producto por código de barras.
    async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Product>>;

    /// Upsert por clave natural (codigo_barras). Devuelve la fila
    /// persistida con su id.
    async fn save(&self, product: &Product) -> StoreResult<Product>;

    /// Existencia por código de barras, sin materializar la fila.
    async fn exists_by_barcode(&self, barcode: &str) -> StoreResult<bool>;
}
