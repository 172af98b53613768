use std::error::Error;
use std::io::Write;

use chrono::NaiveDate;
use csv::{Reader, WriterBuilder};

/// Conversión de una columna de fechas DD/MM/YYYY al formato YYYYMMDD que
/// espera el campo numérico de 8 posiciones del registro HAB.
///
/// Las planillas exportadas del sistema viejo traen las fechas con barras; si
/// se mandan así al generador, el campo numérico conserva los dígitos en el
/// orden equivocado (DDMMYYYY). Este paso previo deja la columna lista.
pub fn convert_date(input_file: &str, output_file: &str, date_column: &str) -> Result<(), Box<dyn Error>> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Conversor de fechas (DD/MM/YYYY → YYYYMMDD)                ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!("📄 Entrada: {}", input_file);
    println!("📝 Salida:  {}", output_file);
    println!("📅 Columna: {}", date_column);
    println!();

    let mut rdr = Reader::from_path(input_file)?;
    let headers = rdr.headers()?.clone();

    let date_col_idx = headers
        .iter()
        .position(|h| h.trim() == date_column)
        .ok_or_else(|| format!("Columna '{}' no encontrada", date_column))?;

    let mut wtr = WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(output_file)?;

    wtr.write_record(&headers)?;

    let mut total = 0usize;
    let mut convertidas = 0usize;
    let mut sin_cambio = 0usize;
    let mut invalidas = 0usize;

    for result in rdr.records() {
        total += 1;
        let record = result?;

        let mut new_record = csv::StringRecord::new();
        for (i, field) in record.iter().enumerate() {
            if i == date_col_idx {
                match try_convert_fecha_hab(field) {
                    Some(fecha) => {
                        new_record.push_field(&fecha);
                        convertidas += 1;
                    }
                    None => {
                        new_record.push_field(field);
                        if field.trim().is_empty() || es_fecha_hab(field) {
                            sin_cambio += 1;
                        } else {
                            invalidas += 1;
                        }
                    }
                }
            } else {
                new_record.push_field(field);
            }
        }

        wtr.write_record(&new_record)?;

        if total % 10_000 == 0 {
            print!("\r📊 Procesadas: {} | Convertidas: {}", total, convertidas);
            std::io::stdout().flush()?;
        }
    }

    wtr.flush()?;

    println!("\r📊 Procesadas: {} | Convertidas: {} | Sin cambio: {}", total, convertidas, sin_cambio);
    if invalidas > 0 {
        println!("⚠️  Valores que no pudieron interpretarse como fecha: {}", invalidas);
    }
    println!("✅ Conversión de fechas completada");

    Ok(())
}

/// Valor ya en formato HAB (8 dígitos).
fn es_fecha_hab(valor: &str) -> bool {
    let v = valor.trim();
    v.len() == 8 && v.chars().all(|c| c.is_ascii_digit())
}

/// Intenta convertir una fecha DD/MM/YYYY a YYYYMMDD.
///
/// Devuelve `None` si el valor no tiene esa forma o no es una fecha real
/// (31/02 no pasa).
fn try_convert_fecha_hab(valor: &str) -> Option<String> {
    let valor = valor.trim();
    if valor.len() != 10 {
        return None;
    }

    NaiveDate::parse_from_str(valor, "%d/%m/%Y")
        .ok()
        .map(|fecha| fecha.format("%Y%m%d").to_string())
}
