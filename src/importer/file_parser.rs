// ==========================================
// Sistema de Inventario y Kardex - Lector de planillas
// ==========================================
// Soporta: CSV (, ; tab autodetectado) / Excel (.xlsx/.xls)
// Entrega filas crudas con encabezados ya normalizados;
// la semántica de negocio vive aguas abajo.
// ==========================================

use crate::importer::error::{ImportEngineResult, ImportError};
use crate::importer::text::normalize_header;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// BOM UTF-8: se consume antes de decodificar.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// ==========================================
// Fila cruda
// ==========================================
// Mapa encabezado-normalizado -> valor crudo. Sin semántica.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Línea 1-based en el archivo original (la cabecera es la línea 1).
    pub line_number: usize,
    pub values: HashMap<String, String>,
}

impl RawRow {
    /// Valor no vacío de una columna, ya recortado.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values
            .get(header)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Advertencia no fatal del parseo (fila larga truncada, fecha con default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line_number: usize,
    pub message: String,
}

// ==========================================
// Archivo parseado
// ==========================================
// Materializado: re-iterable desde el inicio, acotado por
// el tamaño del archivo.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Encabezados normalizados, en orden de aparición.
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub warnings: Vec<ParseWarning>,
}

// ==========================================
// FileParser Trait
// ==========================================
// Implementan: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    fn parse(&self, path: &Path) -> ImportEngineResult<ParsedFile>;
}

// ==========================================
// Inferencia de delimitador
// ==========================================
// Cuenta , ; tab en la línea de encabezado; gana el de mayor
// frecuencia, con empate a favor de coma, luego punto y coma.
fn sniff_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semis = header_line.matches(';').count();
    let tabs = header_line.matches('\t').count();

    if semis > commas && semis >= tabs {
        b';'
    } else if tabs > commas && tabs > semis {
        b'\t'
    } else {
        b','
    }
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, path: &Path) -> ImportEngineResult<ParsedFile> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut bytes = std::fs::read(path)?;
        if bytes.starts_with(UTF8_BOM) {
            bytes.drain(..UTF8_BOM.len());
        }
        let content = String::from_utf8_lossy(&bytes).into_owned();

        let header_line = content.lines().next().unwrap_or("");
        if header_line.trim().is_empty() {
            return Err(ImportError::EmptyFile);
        }
        let delimiter = sniff_delimiter(header_line);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true) // filas cortas/largas se toleran aquí
            .from_reader(Cursor::new(content));

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // Posición 1-based sobre el archivo completo; la cabecera
            // ya cuenta como línea 1.
            let line_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            if record.len() > headers.len() {
                warnings.push(ParseWarning {
                    line_number,
                    message: format!(
                        "fila con {} columnas, se esperaban {}; columnas extra descartadas",
                        record.len(),
                        headers.len()
                    ),
                });
            }

            let mut values = HashMap::with_capacity(headers.len());
            for (col_idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue; // columna sin encabezado: se ignora
                }
                // Fila corta: las columnas faltantes quedan como vacío
                let value = record.get(col_idx).unwrap_or("").trim().to_string();
                values.insert(header.clone(), value);
            }

            // Filas completamente en blanco se saltan
            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                line_number,
                values,
            });
        }

        Ok(ParsedFile {
            headers,
            rows,
            warnings,
        })
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// Celda -> texto. Las celdas con formato de fecha se entregan
    /// como ISO para que el normalizador las trate igual que en CSV.
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => {
                    if naive.time() == chrono::NaiveTime::MIN {
                        naive.date().format("%Y-%m-%d").to_string()
                    } else {
                        naive.format("%Y-%m-%dT%H:%M:%S").to_string()
                    }
                }
                None => String::new(),
            },
            Data::DateTimeIso(s) => s.trim().to_string(),
            Data::DurationIso(s) => s.trim().to_string(),
            Data::Error(_) => String::new(),
        }
    }

    fn row_is_blank(row: &[Data]) -> bool {
        row.iter().all(|c| Self::cell_to_string(c).is_empty())
    }
}

impl FileParser for ExcelParser {
    fn parse(&self, path: &Path) -> ImportEngineResult<ParsedFile> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(path)?;

        // Solo la primera hoja
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or(ImportError::EmptyFile)?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParse(e.to_string()))?;

        // La cabecera es la primera fila no vacía
        let mut sheet_rows = range.rows().enumerate();
        let (_, header_row) = sheet_rows
            .by_ref()
            .find(|(_, row)| !Self::row_is_blank(row))
            .ok_or(ImportError::EmptyFile)?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&Self::cell_to_string(cell)))
            .collect();

        let mut rows = Vec::new();
        for (idx, data_row) in sheet_rows {
            if Self::row_is_blank(data_row) {
                continue;
            }

            let mut values = HashMap::with_capacity(headers.len());
            for (col_idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let value = data_row
                    .get(col_idx)
                    .map(Self::cell_to_string)
                    .unwrap_or_default();
                values.insert(header.clone(), value);
            }

            rows.push(RawRow {
                line_number: idx + 1, // filas de la hoja, 1-based
                values,
            });
        }

        Ok(ParsedFile {
            headers,
            rows,
            warnings: Vec::new(),
        })
    }
}

// ==========================================
// Parser universal (según extensión, fallback CSV)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportEngineResult<ParsedFile> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xls" | "xlsm" => ExcelParser.parse(path),
            // csv / txt / tsv / desconocido: texto delimitado
            _ => CsvParser.parse(path),
        }
    }
}
