//! Normalizadores puros aplicados antes de armar la línea HAB.
//!
//! Todas las funciones reciben texto crudo de la planilla y devuelven valores
//! limpios; ninguna valida ni falla. La validación numérica final la hace el
//! formateador de campos.

/// Prefijos de área de 3 dígitos reconocidos (Córdoba y alrededores).
const PREFIJOS_3: [&str; 3] = ["351", "358", "353"];

/// Email de reemplazo cuando el original supera el ancho del campo.
pub const MAIL_GENERICO: &str = "mailgenerica@bancor.com.ar";

/// Barrio por defecto cuando la planilla no trae el dato.
pub const BARRIO_DEFAULT: &str = "OTRO";

/// Tabla fija de vocales acentuadas → sin acento. La 'ñ' no se toca.
const REEMPLAZOS: [(char, char); 30] = [
    ('á', 'a'), ('é', 'e'), ('í', 'i'), ('ó', 'o'), ('ú', 'u'),
    ('Á', 'A'), ('É', 'E'), ('Í', 'I'), ('Ó', 'O'), ('Ú', 'U'),
    ('ä', 'a'), ('ë', 'e'), ('ï', 'i'), ('ö', 'o'), ('ü', 'u'),
    ('Ä', 'A'), ('Ë', 'E'), ('Ï', 'I'), ('Ö', 'O'), ('Ü', 'U'),
    ('à', 'a'), ('è', 'e'), ('ì', 'i'), ('ò', 'o'), ('ù', 'u'),
    ('À', 'A'), ('È', 'E'), ('Ì', 'I'), ('Ò', 'O'), ('Ù', 'U'),
];

/// Separa apellido (o nombre) en primero y segundo.
///
/// Si hay más de dos palabras, el resto se descarta: el formato HAB solo
/// tiene lugar para dos.
pub fn split_name(texto: &str) -> (String, String) {
    let mut partes = texto.split_whitespace();
    let primero = partes.next().unwrap_or("").to_string();
    let segundo = partes.next().unwrap_or("").to_string();
    (primero, segundo)
}

/// Descompone un celular en (prefijo, número).
///
/// Se quita un "0" inicial si existe. Luego:
/// - "11" (Buenos Aires) → prefijo de 2
/// - 351/358/353 → prefijo de 3
/// - cualquier otro → prefijo de 4 caracteres
///
/// No se valida que el resto sean dígitos; eso lo resuelve el campo numérico.
pub fn split_phone(celular: &str) -> (String, String) {
    let celular = celular.trim();
    if celular.is_empty() {
        return (String::new(), String::new());
    }

    let celular = celular.strip_prefix('0').unwrap_or(celular);
    let chars: Vec<char> = celular.chars().collect();

    let corte = if chars.len() >= 2 && chars[0] == '1' && chars[1] == '1' {
        2
    } else if chars.len() >= 3 && PREFIJOS_3.contains(&chars[..3].iter().collect::<String>().as_str()) {
        3
    } else {
        4.min(chars.len())
    };

    let prefijo: String = chars[..corte].iter().collect();
    let numero: String = chars[corte..].iter().collect();
    (prefijo, numero)
}

/// Mapea SEXO al código HAB: 1 = VARON, 2 = MUJER.
///
/// Acepta las variantes que aparecen en las planillas (texto, letra o código
/// con/sin cero). Cualquier otro valor queda vacío.
pub fn map_sexo_hab(sexo: &str) -> &'static str {
    match sexo.trim().to_uppercase().as_str() {
        "MUJER" | "F" | "2" | "02" => "2",
        "VARON" | "M" | "1" | "01" => "1",
        _ => "",
    }
}

/// Mapea ID_SEXO numérico a letra: 1 → M, 2 → F.
///
/// Es un mapeo independiente de [`map_sexo_hab`] (dominio y codominio
/// distintos); no unificar.
pub fn map_sexo_letra(id_sexo: &str) -> &'static str {
    match id_sexo.trim() {
        "1" | "01" => "M",
        "2" | "02" => "F",
        _ => "",
    }
}

/// Elimina acentos de vocales y apóstrofes. Solo se aplica a nombres y
/// apellidos; el resto de los campos viaja tal cual.
pub fn sanitize_text(texto: &str) -> String {
    texto
        .chars()
        .filter(|&c| c != '\'')
        .map(|c| {
            REEMPLAZOS
                .iter()
                .find(|(acento, _)| *acento == c)
                .map(|(_, limpio)| *limpio)
                .unwrap_or(c)
        })
        .collect()
}

/// Barrio: si la planilla no trae dato se usa "OTRO".
pub fn barrio_or_default(barrio: &str) -> String {
    if barrio.trim().is_empty() {
        BARRIO_DEFAULT.to_string()
    } else {
        barrio.to_string()
    }
}

/// Email: si supera los 30 caracteres del campo se reemplaza entero por la
/// casilla genérica. El trim fino lo hace después el formateador.
pub fn email_or_generic(mail: &str) -> String {
    if !mail.is_empty() && mail.chars().count() > 30 {
        MAIL_GENERICO.to_string()
    } else {
        mail.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("García López"), ("García".to_string(), "López".to_string()));
        assert_eq!(split_name("Perez"), ("Perez".to_string(), String::new()));
        assert_eq!(split_name(""), (String::new(), String::new()));
        assert_eq!(split_name("   "), (String::new(), String::new()));
        // Más de dos palabras: el resto se descarta
        assert_eq!(
            split_name("Maria del Carmen"),
            ("Maria".to_string(), "del".to_string())
        );
    }

    #[test]
    fn test_split_phone_buenos_aires() {
        assert_eq!(split_phone("0111234567"), ("11".to_string(), "1234567".to_string()));
        assert_eq!(split_phone("111234567"), ("11".to_string(), "1234567".to_string()));
    }

    #[test]
    fn test_split_phone_cordoba() {
        assert_eq!(split_phone("03511234567"), ("351".to_string(), "1234567".to_string()));
        assert_eq!(split_phone("3584112233"), ("358".to_string(), "4112233".to_string()));
        assert_eq!(split_phone("353111222"), ("353".to_string(), "111222".to_string()));
    }

    #[test]
    fn test_split_phone_resto() {
        // Prefijo desconocido: se toman 4 caracteres
        assert_eq!(split_phone("02995551234"), ("2995".to_string(), "551234".to_string()));
        assert_eq!(split_phone("29"), ("29".to_string(), String::new()));
        assert_eq!(split_phone(""), (String::new(), String::new()));
        assert_eq!(split_phone("0"), (String::new(), String::new()));
    }

    #[test]
    fn test_map_sexo_hab() {
        assert_eq!(map_sexo_hab("MUJER"), "2");
        assert_eq!(map_sexo_hab("mujer"), "2");
        assert_eq!(map_sexo_hab(" F "), "2");
        assert_eq!(map_sexo_hab("02"), "2");
        assert_eq!(map_sexo_hab("Varon"), "1");
        assert_eq!(map_sexo_hab("M"), "1");
        assert_eq!(map_sexo_hab("01"), "1");
        assert_eq!(map_sexo_hab("X"), "");
        assert_eq!(map_sexo_hab(""), "");
    }

    #[test]
    fn test_map_sexo_letra() {
        assert_eq!(map_sexo_letra("1"), "M");
        assert_eq!(map_sexo_letra("01"), "M");
        assert_eq!(map_sexo_letra("2"), "F");
        assert_eq!(map_sexo_letra("02"), "F");
        assert_eq!(map_sexo_letra("M"), "");
        assert_eq!(map_sexo_letra(""), "");
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("José Ñoño'"), "Jose Ñoño");
        assert_eq!(sanitize_text("PÉREZ D'ALESSANDRO"), "PEREZ DALESSANDRO");
        assert_eq!(sanitize_text("Agüero"), "Aguero");
        assert_eq!(sanitize_text("Ítalo Véliz"), "Italo Veliz");
        assert_eq!(sanitize_text("À la vista"), "A la vista");
        // La 'ñ' no está en la tabla y debe quedar intacta
        assert_eq!(sanitize_text("ñandú"), "ñandu");
    }

    #[test]
    fn test_barrio_or_default() {
        assert_eq!(barrio_or_default(""), "OTRO");
        assert_eq!(barrio_or_default("  "), "OTRO");
        assert_eq!(barrio_or_default("Centro"), "Centro");
    }

    #[test]
    fn test_email_or_generic() {
        assert_eq!(email_or_generic("corto@mail.com"), "corto@mail.com");
        assert_eq!(email_or_generic(""), "");
        // 31 caracteres → casilla genérica
        let largo = "una.casilla.muy.larga@dom.com.x";
        assert_eq!(largo.chars().count(), 31);
        assert_eq!(email_or_generic(largo), MAIL_GENERICO);
        // 30 justos pasa sin tocar
        let justo = "una.casilla.muy.larga@dom.com.";
        assert_eq!(justo.chars().count(), 30);
        assert_eq!(email_or_generic(justo), justo);
    }
}
