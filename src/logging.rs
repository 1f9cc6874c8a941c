// ==========================================
// Inicialización de logging
// ==========================================
// tracing + tracing-subscriber, nivel configurable
// por variable de entorno.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Inicializa el sistema de logs
///
/// # Variables de entorno
/// - RUST_LOG: filtro de nivel (default: info)
///   p. ej. RUST_LOG=debug o RUST_LOG=inventario_kardex=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Inicialización para tests: más verboso y tolerante a doble init.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
