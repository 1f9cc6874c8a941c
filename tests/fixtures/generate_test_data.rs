// ==========================================
// Generador de datos de prueba
// ==========================================
// Produce planillas CSV sintéticas de productos y movimientos
// en tests/fixtures/datasets/. La semilla es explícita para que
// cada escenario sea reproducible:
//   cargo run --bin generate_test_data -- [semilla]
// ==========================================

use csv::Writer;
use std::error::Error;
use std::fs;
use std::path::Path;

const PRODUCT_HEADER: &[&str] = &[
    "Código_Barras",
    "Nombre",
    "Marca",
    "Categoría",
    "Unidad",
    "Volumen_ml",
    "Grado_Alcohólico",
    "Precio_Compra",
    "Precio_Venta",
    "Stock_Inicial",
    "Fecha_Stock",
    "Activo",
];

const MOVEMENT_HEADER: &[&str] = &[
    "Código_Barras",
    "Tipo",
    "Cantidad",
    "Fecha",
    "Motivo",
];

const BRANDS: &[&str] = &["Austral", "Kunstmann", "Capel", "Mistral", "Casillero", ""];
const CATEGORIES: &[&str] = &["CERVEZA", "VINO", "DESTILADO", "BEBIDA", ""];
const KINDS: &[&str] = &["ENTRADA", "SALIDA", "AJUSTE", "I", "S"];
const MOTIVES: &[&str] = &["reposición", "venta", "merma", "conteo físico", ""];

// ==========================================
// Generador congruencial lineal con semilla explícita
// ==========================================
// Constantes de Numerical Recipes; suficiente para datos
// sintéticos reproducibles.
struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.below(options.len() as u64) as usize]
    }
}

fn barcode(rng: &mut SeededRng) -> String {
    format!("780{:010}", rng.below(10_000_000_000))
}

fn generate_products(rng: &mut SeededRng, count: usize, out: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(out)?;
    writer.write_record(PRODUCT_HEADER)?;

    for i in 0..count {
        let code = barcode(rng);
        let volume = [330, 500, 750, 1000][rng.below(4) as usize];
        let degree = (rng.below(400) as f64) / 10.0;
        let purchase = 500 + rng.below(5000);
        let sale = purchase + rng.below(3000);
        let stock = rng.below(48);
        let day = 1 + rng.below(28);

        let row: Vec<String> = vec![
            code,
            format!("Producto Sintético {:04}", i + 1),
            rng.pick(BRANDS).to_string(),
            rng.pick(CATEGORIES).to_string(),
            "UNIDAD".to_string(),
            volume.to_string(),
            format!("{degree:.1}"),
            // Monto con coma decimal para ejercitar el parser de moneda
            format!("{}.{:03},00", purchase / 1000, purchase % 1000),
            sale.to_string(),
            stock.to_string(),
            format!("2025-01-{day:02}"),
            "si".to_string(),
        ];
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn generate_movements(rng: &mut SeededRng, count: usize, out: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(out)?;
    writer.write_record(MOVEMENT_HEADER)?;

    for _ in 0..count {
        let code = barcode(rng);
        let quantity = 1 + rng.below(36);
        let day = 1 + rng.below(28);
        let hour = rng.below(24);

        let row: Vec<String> = vec![
            code,
            rng.pick(KINDS).to_string(),
            quantity.to_string(),
            format!("2025-02-{day:02}T{hour:02}:00:00"),
            rng.pick(MOTIVES).to_string(),
        ];
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let seed: u64 = std::env::args()
        .nth(1)
        .map(|s| s.parse().expect("semilla numérica"))
        .unwrap_or(42);

    let out_dir = Path::new("tests/fixtures/datasets");
    fs::create_dir_all(out_dir)?;

    let mut rng = SeededRng::new(seed);
    generate_products(&mut rng, 200, &out_dir.join("productos.csv"))?;
    generate_movements(&mut rng, 500, &out_dir.join("movimientos.csv"))?;

    println!(
        "datasets generados en {} (semilla {})",
        out_dir.display(),
        seed
    );
    Ok(())
}
