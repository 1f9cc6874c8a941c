// ==========================================
// Sistema de Inventario y Kardex - Repositorio de kardex (rusqlite)
// ==========================================
// Cabecera + detalle en una transacción: el registro
// lógico se escribe completo o no se escribe.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::movement::{MovementHeader, MovementLine};
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::movement_repo::MovementRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// MovementRepositoryImpl
// ==========================================
pub struct MovementRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl MovementRepositoryImpl {
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_shared(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl MovementRepository for MovementRepositoryImpl {
    async fn exists_by_idempotency_key(&self, key: &str) -> StoreResult<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM movimientos WHERE idempotency_key = ?1 LIMIT 1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    async fn save_header_and_lines(
        &self,
        header: &MovementHeader,
        lines: &[MovementLine],
    ) -> StoreResult<i64> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO movimientos (movement_id, idempotency_key, tipo, fecha, motivo)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                header.movement_id,
                header.idempotency_key,
                header.kind.as_str(),
                header.occurred_at,
                header.motive,
            ],
        )?;

        let header_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO movimiento_detalles (movimiento_id, codigo_barras, cantidad)
                 VALUES (?1, ?2, ?3)",
            )?;
            for line in lines {
                stmt.execute(params![header_id, line.barcode, line.quantity])?;
            }
        }

        tx.commit()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(header_id)
    }
}
