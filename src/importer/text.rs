// ==========================================
// Sistema de Inventario y Kardex - Normalización de texto
// ==========================================
// Compartida por el lector de planillas (encabezados)
// y el normalizador de filas (tokens de enumeración).
// ==========================================

/// Reemplaza vocales acentuadas, diéresis y eñes por su forma base.
/// Cubre el repertorio que aparece en las planillas en español;
/// cualquier otro carácter pasa intacto.
pub fn strip_diacritics(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Normaliza un encabezado de columna a su forma canónica:
/// trim, sin acentos, minúsculas, corridas de no-alfanuméricos
/// colapsadas a un solo `_`, sin `_` en los bordes.
///
/// "Código_Barras", "codigo barras" y "CODIGO-BARRAS" terminan
/// todas en "codigo_barras".
pub fn normalize_header(raw: &str) -> String {
    let lowered = strip_diacritics(raw.trim()).to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_sep = false;
    for c in lowered.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Normaliza un valor de celda para matching de enumeraciones:
/// trim, sin acentos, MAYÚSCULAS.
pub fn normalize_token(raw: &str) -> String {
    strip_diacritics(raw.trim()).to_uppercase()
}

/// "" / espacios -> None (estándar NULL de las planillas)
pub fn normalize_null(value: Option<&str>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
