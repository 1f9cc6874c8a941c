// ==========================================
// Sistema de Inventario y Kardex - Repositorio de catálogo (rusqlite)
// ==========================================
// Productos por clave natural codigo_barras.
// Precios se guardan como TEXT (decimal exacto).
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::Product;
use crate::domain::types::{BaseUnit, Category};
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::product_repo::ProductRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepositoryImpl
// ==========================================
pub struct ProductRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepositoryImpl {
    /// Abre una conexión propia sobre el archivo de base de datos.
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Comparte una conexión ya abierta (tests, o un solo archivo para
    /// catálogo y kardex).
    pub fn from_shared(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
        let category: String = row.get("categoria")?;
        let base_unit: String = row.get("unidad_base")?;
        let purchase: Option<String> = row.get("precio_compra")?;
        let sale: Option<String> = row.get("precio_venta")?;

        Ok(Product {
            id: Some(row.get("id")?),
            barcode: row.get("codigo_barras")?,
            name: row.get("nombre")?,
            brand: row.get("marca")?,
            category: Category::from_token(&category).unwrap_or_default(),
            base_unit: BaseUnit::from_token(&base_unit).unwrap_or_default(),
            volume_ml: row.get("volumen_ml")?,
            alcohol_degree: row.get("grado_alcoholico")?,
            purchase_price: purchase.and_then(|v| Decimal::from_str(&v).ok()),
            sale_price: sale.and_then(|v| Decimal::from_str(&v).ok()),
            active: row.get::<_, i64>("activo")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Product>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let product = conn
            .query_row(
                "SELECT * FROM productos WHERE codigo_barras = ?1",
                params![barcode],
                Self::row_to_product,
            )
            .optional()?;

        Ok(product)
    }

    async fn save(&self, product: &Product) -> StoreResult<Product> {
        {
            let conn = self
                .conn
                .lock()
                .map_err(|e| StoreError::Lock(e.to_string()))?;

            conn.execute(
                r#"
                INSERT INTO productos (
                    codigo_barras, nombre, marca, categoria, unidad_base,
                    volumen_ml, grado_alcoholico, precio_compra, precio_venta,
                    activo, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                ON CONFLICT(codigo_barras) DO UPDATE SET
                    nombre = excluded.nombre,
                    marca = COALESCE(excluded.marca, productos.marca),
                    categoria = excluded.categoria,
                    unidad_base = excluded.unidad_base,
                    volumen_ml = COALESCE(excluded.volumen_ml, productos.volumen_ml),
                    grado_alcoholico = COALESCE(excluded.grado_alcoholico, productos.grado_alcoholico),
                    precio_compra = COALESCE(excluded.precio_compra, productos.precio_compra),
                    precio_venta = COALESCE(excluded.precio_venta, productos.precio_venta),
                    activo = excluded.activo,
                    updated_at = excluded.updated_at
                "#,
                params![
                    product.barcode,
                    product.name,
                    product.brand,
                    product.category.as_str(),
                    product.base_unit.as_str(),
                    product.volume_ml,
                    product.alcohol_degree,
                    product.purchase_price.map(|p| p.to_string()),
                    product.sale_price.map(|p| p.to_string()),
                    product.active as i64,
                    product.created_at,
                    product.updated_at,
                ],
            )?;
        }

        // Relee la fila para devolverla con id y valores efectivos
        self.find_by_barcode(&product.barcode)
            .await?
            .ok_or_else(|| StoreError::Query("producto recién guardado no encontrado".to_string()))
    }

    async fn exists_by_barcode(&self, barcode: &str) -> StoreResult<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;

        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM productos WHERE codigo_barras = ?1 LIMIT 1",
                params![barcode],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }
}
