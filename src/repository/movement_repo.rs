// ==========================================
// Sistema de Inventario y Kardex - Repositorio de kardex (trait)
// ==========================================
// Interfaz angosta del libro de movimientos.
// Contrato: cabecera + detalle se escriben en una sola
// transacción; la clave de idempotencia es única.
// ==========================================

use crate::domain::movement::{MovementHeader, MovementLine};
use crate::repository::error::StoreResult;
use async_trait::async_trait;

// ==========================================
// MovementRepository Trait
// ==========================================
// Implementa: MovementRepositoryImpl (rusqlite)
#[async_trait]
pub trait MovementRepository: Send + Sync {
    /// ¿Ya fue aplicado este registro lógico? (clave de idempotencia)
    async fn exists_by_idempotency_key(&self, key: &str) -> StoreResult<bool>;

    /// Inserta cabecera y líneas atómicamente. Devuelve el id de la
    /// cabecera. Un fallo en cualquier línea revierte la cabecera.
    async fn save_header_and_lines(
        &self,
        header: &MovementHeader,
        lines: &[MovementLine],
    ) -> StoreResult<i64>;
}
