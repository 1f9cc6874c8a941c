// ==========================================
// Sistema de Inventario y Kardex - Tests de integración del importador
// ==========================================
// Pipeline completo contra SQLite temporal: parseo, esquema,
// normalización, idempotencia, catálogo y persistencia.
// ==========================================


use inventario_kardex::domain::types::CatalogMode;
use inventario_kardex::importer::error::ImportError;
use inventario_kardex::importer::{InventoryImporter, InventoryImporterImpl};
use inventario_kardex::repository::{MovementRepositoryImpl, ProductRepositoryImpl};
use inventario_kardex::ImportOptions;
use test_helpers::{count, create_test_db, scalar_text, write_csv};

fn importer(db_path: &str) -> InventoryImporterImpl<ProductRepositoryImpl, MovementRepositoryImpl> {
    InventoryImporterImpl::new(
        ProductRepositoryImpl::new(db_path).expect("repo de productos"),
        MovementRepositoryImpl::new(db_path).expect("repo de kardex"),
    )
}

// ==========================================
// Archivos de producto
// ==========================================

#[tokio::test]
async fn test_product_import_with_empty_category_defaults_to_general() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,nombre,marca,categoria\n\
         7801234567890,Cerveza Lager 330ml,Austral,\n",
    );

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.total_rows, 1);
    assert_eq!(result.persisted_rows, 1);
    assert_eq!(result.skipped_rows, 0);
    assert!(result.errors.is_empty());

    let categoria = scalar_text(
        &db_path,
        "SELECT categoria FROM productos WHERE codigo_barras = '7801234567890'",
    );
    assert_eq!(categoria, "GENERAL");
}

#[tokio::test]
async fn test_product_import_posts_opening_stock_once() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "Código_Barras;Nombre;Stock_Inicial;Fecha_Stock\n\
         111;Pisco Reservado 750ml;12;2025-01-01\n",
    );
    let engine = importer(&db_path);

    let first = engine
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(first.persisted_rows, 1);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM productos"), 1);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 1);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimiento_detalles"), 1);

    let movimientos = first
        .tables
        .iter()
        .find(|t| t.table == "movimientos")
        .unwrap();
    assert_eq!(movimientos.inserted, 1);

    // Re-importar el archivo intacto: no-op completo
    let second = engine
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(second.persisted_rows, 0);
    assert_eq!(second.skipped_rows, second.total_rows);
    assert!(second.errors.is_empty());
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 1);
}

#[tokio::test]
async fn test_product_reimport_with_changed_price_updates_without_double_stock() {
    let (_db, db_path) = create_test_db();
    let engine = importer(&db_path);

    let v1 = write_csv(
        "codigo_barras,nombre,precio_venta,stock_inicial,fecha_stock\n\
         111,Vino Tinto,3990,6,2025-01-01\n",
    );
    engine
        .import_file(v1.path(), &ImportOptions::default())
        .await
        .unwrap();

    // Mismo producto, precio nuevo, misma fecha de stock
    let v2 = write_csv(
        "codigo_barras,nombre,precio_venta,stock_inicial,fecha_stock\n\
         111,Vino Tinto,4490,6,2025-01-01\n",
    );
    let result = engine
        .import_file(v2.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.persisted_rows, 1); // la ficha se actualiza
    let productos = result.tables.iter().find(|t| t.table == "productos").unwrap();
    assert_eq!(productos.updated, 1);

    // El asiento de apertura no se duplica: clave (codigo, fecha)
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 1);
    assert_eq!(
        scalar_text(&db_path, "SELECT precio_venta FROM productos WHERE codigo_barras='111'"),
        "4490"
    );
}

#[tokio::test]
async fn test_product_row_with_multiple_field_errors_reports_all() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,nombre,precio_venta,activo\n\
         ABC,X,caro,quizas\n\
         222,Bien,1990,si\n",
    );

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.total_rows, 2);
    assert_eq!(result.persisted_rows, 1);
    assert_eq!(result.skipped_rows, 1);
    assert_eq!(result.errors.len(), 1);

    // Todos los problemas de la fila 2 en un solo mensaje
    let msg = &result.errors[0];
    assert!(msg.starts_with("Fila 2:"), "mensaje: {msg}");
    assert!(msg.contains("codigo_barras"));
    assert!(msg.contains("precio_venta"));
    assert!(msg.contains("activo"));
}

// ==========================================
// Archivos de movimiento
// ==========================================

#[tokio::test]
async fn test_movement_scenario_bad_quantity_and_silent_duplicate() {
    let (_db, db_path) = create_test_db();
    let engine = importer(&db_path);

    // Corrida previa que deja un movimiento aplicado
    let previous = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         111,ENTRADA,24,2025-02-01 10:00:00\n",
    );
    engine
        .import_file(previous.path(), &ImportOptions::default())
        .await
        .unwrap();

    // 3 filas: la 2 con cantidad -5, la 3 repite exacto el movimiento previo
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         222,ENTRADA,12,2025-02-02T09:00:00\n\
         333,SALIDA,-5,2025-02-02T09:30:00\n\
         111,ENTRADA,24,2025-02-01T10:00:00\n",
    );
    let result = engine
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.total_rows, 3);
    assert_eq!(result.persisted_rows, 1);
    assert_eq!(result.skipped_rows, 2);

    // Un solo error (la fila de cantidad negativa); el duplicado es silencioso
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Fila 3:"), "mensaje: {}", result.errors[0]);
    assert!(result.errors[0].contains("positiva"));

    let movimientos = result.tables.iter().find(|t| t.table == "movimientos").unwrap();
    assert_eq!(movimientos.inserted, 1);
    assert_eq!(movimientos.skipped, 1);
}

#[tokio::test]
async fn test_movement_upsert_mode_creates_placeholder_product() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha,motivo\n\
         7801112223334,I,6,2025-03-01,reposición\n",
    );

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.persisted_rows, 1);
    let productos = result.tables.iter().find(|t| t.table == "productos").unwrap();
    assert_eq!(productos.inserted, 1);

    assert_eq!(
        scalar_text(&db_path, "SELECT nombre FROM productos WHERE codigo_barras='7801112223334'"),
        "Producto 7801112223334"
    );
    assert_eq!(
        scalar_text(&db_path, "SELECT tipo FROM movimientos LIMIT 1"),
        "ENTRADA"
    );
}

#[tokio::test]
async fn test_movement_strict_mode_unknown_barcode_is_row_error() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         999,SALIDA,2,2025-03-01\n",
    );

    let options = ImportOptions {
        catalog_mode: CatalogMode::Strict,
        ..Default::default()
    };
    let result = importer(&db_path)
        .import_file(file.path(), &options)
        .await
        .unwrap();

    assert_eq!(result.total_rows, 1);
    assert_eq!(result.persisted_rows, 0);
    assert_eq!(result.skipped_rows, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("no existe en el catálogo"));
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM productos"), 0);
}

#[tokio::test]
async fn test_movement_duplicate_within_same_file_is_silent() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         111,ENTRADA,5,2025-03-01T08:00:00\n\
         111,ENTRADA,5,2025-03-01T08:00:00\n",
    );

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.total_rows, 2);
    assert_eq!(result.persisted_rows, 1);
    assert_eq!(result.skipped_rows, 1);
    assert!(result.errors.is_empty());
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 1);
}

#[tokio::test]
async fn test_movement_tab_delimited_file() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras\ttipo\tcantidad\tfecha\n\
         111\tE\t3\t2025-03-02\n",
    );

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(result.persisted_rows, 1);
}

#[tokio::test]
async fn test_movement_without_date_uses_caller_default_with_warning() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         111,ENTRADA,4,no es fecha\n",
    );

    let default = chrono::NaiveDate::from_ymd_opt(2025, 4, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let options = ImportOptions {
        default_timestamp: Some(default),
        ..Default::default()
    };

    let result = importer(&db_path)
        .import_file(file.path(), &options)
        .await
        .unwrap();

    assert_eq!(result.persisted_rows, 1);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Fila 2:"));

    // Sin default la misma fila queda como error
    let (_db2, db_path2) = create_test_db();
    let strict = importer(&db_path2)
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(strict.persisted_rows, 0);
    assert_eq!(strict.errors.len(), 1);
}

// ==========================================
// Dry-run
// ==========================================

#[tokio::test]
async fn test_dry_run_reports_like_real_run_and_writes_nothing() {
    let (_db, db_path) = create_test_db();
    let engine = importer(&db_path);
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         111,ENTRADA,24,2025-02-01T10:00:00\n\
         222,SALIDA,-1,2025-02-01T11:00:00\n\
         111,ENTRADA,24,2025-02-01T10:00:00\n",
    );

    let dry = engine
        .import_file(
            file.path(),
            &ImportOptions {
                dry_run: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Nada escrito, ni catálogo ni kardex
    assert!(dry.dry_run);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM productos"), 0);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 0);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimiento_detalles"), 0);

    // La corrida real clasifica idéntico
    let real = engine
        .import_file(file.path(), &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(dry.total_rows, real.total_rows);
    assert_eq!(dry.persisted_rows, real.persisted_rows);
    assert_eq!(dry.skipped_rows, real.skipped_rows);
    assert_eq!(dry.errors, real.errors);
    assert_eq!(dry.tables, real.tables);
}

#[tokio::test]
async fn test_dry_run_product_file_leaves_catalog_untouched() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,nombre,stock_inicial,fecha_stock\n\
         111,Cerveza,10,2025-01-01\n",
    );

    let result = importer(&db_path)
        .import_file(
            file.path(),
            &ImportOptions {
                dry_run: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.persisted_rows, 1);
    let productos = result.tables.iter().find(|t| t.table == "productos").unwrap();
    assert_eq!(productos.inserted, 1);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM productos"), 0);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 0);
}

// ==========================================
// Plegado de movimientos en productos
// ==========================================

#[tokio::test]
async fn test_fold_movements_creates_products_with_net_stock() {
    let (_db, db_path) = create_test_db();
    let file = write_csv(
        "codigo_barras,tipo,cantidad,fecha\n\
         111,ENTRADA,10,2025-01-01\n\
         111,SALIDA,4,2025-01-02\n\
         222,ENTRADA,5,2025-01-01\n",
    );

    let options = ImportOptions {
        fold_movements: true,
        ..Default::default()
    };
    let result = importer(&db_path)
        .import_file(file.path(), &options)
        .await
        .unwrap();

    // Las 3 filas de origen quedan cubiertas por los 2 upserts
    assert_eq!(result.total_rows, 3);
    assert_eq!(result.persisted_rows, 3);
    assert_eq!(result.skipped_rows, 0);

    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM productos"), 2);
    // Asientos de apertura: neto 6 para 111, 5 para 222
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM movimientos"), 2);
    assert_eq!(
        count(&db_path, "SELECT cantidad FROM movimiento_detalles WHERE codigo_barras='111'"),
        6
    );
}

// ==========================================
// Errores fatales
// ==========================================

#[tokio::test]
async fn test_missing_required_columns_is_fatal() {
    let (_db, db_path) = create_test_db();
    let file = write_csv("marca,precio\nAustral,1990\n");

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await;

    match result {
        Err(ImportError::MissingColumns { missing, .. }) => {
            assert!(missing.contains("codigo_barras"));
        }
        other => panic!("se esperaba MissingColumns, hubo: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_file_is_fatal() {
    let (_db, db_path) = create_test_db();
    let file = write_csv("");

    let result = importer(&db_path)
        .import_file(file.path(), &ImportOptions::default())
        .await;
    assert!(matches!(result, Err(ImportError::EmptyFile)));
}

// ==========================================
// Importación múltiple
// ==========================================

#[tokio::test]
async fn test_import_files_isolates_per_file_failures() {
    let (_db, db_path) = create_test_db();
    let good = write_csv("codigo_barras,nombre\n111,Cerveza\n");
    let bad = write_csv("");

    let results = importer(&db_path)
        .import_files(vec![good.path(), bad.path()], &ImportOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM productos"), 1);
}
