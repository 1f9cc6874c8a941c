// ==========================================
// Sistema de Inventario y Kardex - Inicialización SQLite
// ==========================================
// Objetivo:
// - Unificar PRAGMA en todas las Connection::open, evitando
//   "algunos módulos con foreign keys y otros sin"
// - Unificar busy_timeout para escrituras concurrentes
// - Bootstrap mínimo del esquema que usan los almacenes
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// busy_timeout por defecto (milisegundos)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// PRAGMA unificados de cada conexión
///
/// - foreign_keys se habilita por conexión
/// - busy_timeout se configura por conexión
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Abre una conexión SQLite con la configuración unificada
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Esquema mínimo del catálogo y del kardex.
///
/// La migración completa vive fuera de este motor; esto existe para que
/// los almacenes SQLite y los tests puedan partir de una base vacía.
/// Claves relevantes para la importación:
/// - productos.codigo_barras UNIQUE (upsert por clave natural)
/// - movimientos.idempotency_key UNIQUE (re-importar = no-op)
/// - detalle con FK a la cabecera (se escriben juntos o ninguno)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS productos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codigo_barras TEXT NOT NULL UNIQUE,
            nombre TEXT NOT NULL,
            marca TEXT,
            categoria TEXT NOT NULL DEFAULT 'GENERAL',
            unidad_base TEXT NOT NULL DEFAULT 'UNIDAD',
            volumen_ml INTEGER,
            grado_alcoholico REAL,
            precio_compra TEXT,
            precio_venta TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS movimientos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            movement_id TEXT NOT NULL UNIQUE,
            idempotency_key TEXT NOT NULL UNIQUE,
            tipo TEXT NOT NULL,
            fecha TEXT NOT NULL,
            motivo TEXT
        );

        CREATE TABLE IF NOT EXISTS movimiento_detalles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            movimiento_id INTEGER NOT NULL REFERENCES movimientos(id),
            codigo_barras TEXT NOT NULL REFERENCES productos(codigo_barras),
            cantidad INTEGER NOT NULL CHECK (cantidad > 0)
        );

        CREATE INDEX IF NOT EXISTS idx_detalles_movimiento
            ON movimiento_detalles(movimiento_id);
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('productos','movimientos','movimiento_detalles')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_idempotency_key_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO movimientos (movement_id, idempotency_key, tipo, fecha) VALUES ('a', 'k1', 'ENTRADA', '2025-01-01')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO movimientos (movement_id, idempotency_key, tipo, fecha) VALUES ('b', 'k1', 'ENTRADA', '2025-01-01')",
            [],
        );
        assert!(dup.is_err());
    }
}
