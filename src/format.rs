//! Formateo de campos de ancho fijo para el archivo .HAB.
//!
//! Cada campo del registro ocupa una cantidad exacta de posiciones. El loader
//! bancario no tolera corrimientos: la longitud de salida SIEMPRE es `longitud`,
//! sin importar el valor de entrada.

/// Tipo de campo según la especificación del banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tipo {
    /// 'N': numérico, relleno con ceros a la izquierda.
    Numerico,
    /// 'A': alfanumérico, relleno con espacios a la derecha.
    Alfanumerico,
}

/// Formatea un campo según tipo y longitud.
///
/// - Valor vacío → se usa `default`.
/// - Numérico: se descartan los caracteres no numéricos; si no queda nada se
///   usa "0"; se rellena con ceros a la izquierda y se recorta a `longitud`
///   conservando los dígitos de la izquierda. Esa política de recorte es la
///   del sistema receptor y no debe cambiarse.
/// - Alfanumérico: trim, se recorta a `longitud` y se rellena con espacios a
///   la derecha.
///
/// Las longitudes se cuentan en caracteres, no en bytes: la 'ñ' sobrevive a la
/// sanitización y ocupa una sola posición en el archivo latin-1.
pub fn format_field(valor: &str, longitud: usize, tipo: Tipo, default: &str) -> String {
    let valor = if valor.is_empty() { default } else { valor };
    let valor = valor.trim();

    match tipo {
        Tipo::Numerico => {
            let mut digitos: String = valor.chars().filter(|c| c.is_ascii_digit()).collect();
            if digitos.is_empty() {
                digitos.push('0');
            }
            if digitos.len() >= longitud {
                // Recorte desde la derecha: quedan los primeros `longitud` dígitos
                digitos[..longitud].to_string()
            } else {
                let mut out = "0".repeat(longitud - digitos.len());
                out.push_str(&digitos);
                out
            }
        }
        Tipo::Alfanumerico => {
            let mut out: String = valor.chars().take(longitud).collect();
            let usados = out.chars().count();
            out.extend(std::iter::repeat(' ').take(longitud - usados));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerico_relleno_y_recorte() {
        assert_eq!(format_field("7", 3, Tipo::Numerico, ""), "007");
        assert_eq!(format_field("12345", 5, Tipo::Numerico, ""), "12345");
        // Recorte: se conservan los dígitos de la IZQUIERDA (zfill + slice)
        assert_eq!(format_field("123456", 3, Tipo::Numerico, ""), "123");
        assert_eq!(format_field("12345", 3, Tipo::Numerico, ""), "123");
    }

    #[test]
    fn test_numerico_descarta_no_digitos() {
        assert_eq!(format_field("20-11222333-4", 11, Tipo::Numerico, ""), "20112223334");
        assert_eq!(format_field("abc", 4, Tipo::Numerico, ""), "0000");
        assert_eq!(format_field("a1b2", 4, Tipo::Numerico, ""), "0012");
    }

    #[test]
    fn test_numerico_vacio_y_default() {
        assert_eq!(format_field("", 2, Tipo::Numerico, ""), "00");
        assert_eq!(format_field("", 2, Tipo::Numerico, "1"), "01");
        assert_eq!(format_field("", 5, Tipo::Numerico, "1137"), "01137");
        // Default explícito equivale a pasar el default como valor
        assert_eq!(
            format_field("", 3, Tipo::Numerico, "4"),
            format_field("4", 3, Tipo::Numerico, "")
        );
    }

    #[test]
    fn test_alfanumerico() {
        assert_eq!(format_field("ABCDE", 3, Tipo::Alfanumerico, ""), "ABC");
        assert_eq!(format_field("AB", 5, Tipo::Alfanumerico, ""), "AB   ");
        assert_eq!(format_field("  Garcia  ", 10, Tipo::Alfanumerico, ""), "Garcia    ");
        assert_eq!(format_field("", 4, Tipo::Alfanumerico, "OTRO"), "OTRO");
        assert_eq!(format_field("", 3, Tipo::Alfanumerico, ""), "   ");
    }

    #[test]
    fn test_alfanumerico_cuenta_caracteres_no_bytes() {
        // 'Ñ' es multibyte en UTF-8 pero ocupa una sola posición
        assert_eq!(format_field("Ñoño", 6, Tipo::Alfanumerico, ""), "Ñoño  ");
        assert_eq!(format_field("Ñoño", 2, Tipo::Alfanumerico, "").chars().count(), 2);
    }

    #[test]
    fn test_longitud_siempre_exacta() {
        for v in ["", "x", "12345678901234567890", "José Ñoño", "  "] {
            for len in [0usize, 1, 5, 30] {
                assert_eq!(format_field(v, len, Tipo::Alfanumerico, "").chars().count(), len);
                let n = format_field(v, len, Tipo::Numerico, "");
                assert_eq!(n.chars().count(), len);
                assert!(n.chars().all(|c| c.is_ascii_digit()));
            }
        }
    }
}
