// ==========================================
// Sistema de Inventario y Kardex - Resolutor de catálogo
// ==========================================
// Resuelve el código de barras de una fila contra el
// catálogo. Estricto: código desconocido = error de fila.
// Upsert: se crea un placeholder mínimo y se persiste antes
// de que un movimiento lo referencie (salvo dry-run).
// Cache por importación: el mismo código resuelve a la
// misma entidad durante toda la corrida.
// ==========================================

use crate::domain::product::Product;
use crate::domain::types::CatalogMode;
use crate::repository::product_repo::ProductRepository;
use std::collections::HashMap;
use tracing::debug;

/// Resultado de una resolución
#[derive(Debug, Clone)]
pub struct Resolution {
    pub product: Product,
    /// true solo la primera vez que esta corrida creó el placeholder
    pub created: bool,
}

pub struct CatalogResolver<'a> {
    products: &'a dyn ProductRepository,
    mode: CatalogMode,
    dry_run: bool,
    cache: HashMap<String, Product>,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(products: &'a dyn ProductRepository, mode: CatalogMode, dry_run: bool) -> Self {
        Self {
            products,
            mode,
            dry_run,
            cache: HashMap::new(),
        }
    }

    /// Resuelve un código de barras. Err = problema de fila (código
    /// desconocido en modo estricto, o fallo del almacén), nunca fatal.
    pub async fn resolve(&mut self, barcode: &str) -> Result<Resolution, String> {
        if let Some(product) = self.cache.get(barcode) {
            return Ok(Resolution {
                product: product.clone(),
                created: false,
            });
        }

        let existing = self
            .products
            .find_by_barcode(barcode)
            .await
            .map_err(|e| format!("catálogo: {e}"))?;

        if let Some(product) = existing {
            self.cache.insert(barcode.to_string(), product.clone());
            return Ok(Resolution {
                product,
                created: false,
            });
        }

        match self.mode {
            CatalogMode::Strict => {
                Err(format!("producto no existe en el catálogo: {barcode}"))
            }
            CatalogMode::Upsert => {
                let placeholder = Product::placeholder(barcode);

                // En corrida real el placeholder se persiste antes de que
                // lo referencie el movimiento: la consistencia referencial
                // se mantiene aunque fallen filas posteriores del mismo código.
                let product = if self.dry_run {
                    placeholder
                } else {
                    self.products
                        .save(&placeholder)
                        .await
                        .map_err(|e| format!("catálogo: {e}"))?
                };

                debug!(barcode = %barcode, dry_run = self.dry_run, "placeholder de producto creado");
                self.cache.insert(barcode.to_string(), product.clone());
                Ok(Resolution {
                    product,
                    created: true,
                })
            }
        }
    }

    /// Búsqueda sin creación: cache de la corrida primero, luego el
    /// almacén. La usan las filas de producto para clasificar
    /// insert/update sin fabricar placeholders.
    pub async fn lookup(&mut self, barcode: &str) -> Result<Option<Product>, String> {
        if let Some(product) = self.cache.get(barcode) {
            return Ok(Some(product.clone()));
        }

        let existing = self
            .products
            .find_by_barcode(barcode)
            .await
            .map_err(|e| format!("catálogo: {e}"))?;

        if let Some(product) = &existing {
            self.cache.insert(barcode.to_string(), product.clone());
        }
        Ok(existing)
    }

    /// Registra en el cache un producto ya planificado por el pipeline
    /// (fila de producto), para que las filas posteriores del mismo
    /// código vean el mismo estado en corrida real y en dry-run.
    pub fn remember(&mut self, product: Product) {
        self.cache.insert(product.barcode.clone(), product);
    }
}
