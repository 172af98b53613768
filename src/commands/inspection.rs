use std::error::Error;

use csv::ReaderBuilder;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{select_person, ColumnIndex, RowView, COLUMNAS_APODERADO, COLUMNAS_BENEFICIARIO};
use crate::normalize::{map_sexo_hab, map_sexo_letra, split_name, split_phone};
use crate::record::ANCHO_LINEA;

lazy_static! {
    /// Fecha en formato HAB: YYYYMMDD, 8 dígitos exactos.
    static ref RE_FECHA_HAB: Regex = Regex::new(r"^\d{8}$").unwrap();
    /// CUIL/CUIT: 11 dígitos exactos, sin guiones.
    static ref RE_CUIL: Regex = Regex::new(r"^\d{11}$").unwrap();
}

/// Fecha con la forma que espera el campo numérico de 8 posiciones.
fn fecha_hab_valida(valor: &str) -> bool {
    RE_FECHA_HAB.is_match(valor.trim())
}

/// CUIL con los 11 dígitos que espera el campo de clave fiscal.
fn cuil_valido(valor: &str) -> bool {
    RE_CUIL.is_match(valor.trim())
}

/// Revisa el esquema de la planilla y cuenta filas por rama, sin generar nada.
pub fn check_schema(input_path: &str) -> Result<(), Box<dyn Error>> {
    println!("🔍 Revisando planilla: {}", input_path);
    println!();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input_path)?;

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::new(&headers);

    println!("📋 Columnas encontradas ({}):", headers.len());
    for (i, h) in index.headers().iter().enumerate() {
        println!("   [{:2}] {}", i + 1, h);
    }
    println!();

    let tiene_apoderado = COLUMNAS_APODERADO.iter().all(|c| index.contains(c));
    let tiene_beneficiario = COLUMNAS_BENEFICIARIO.iter().all(|c| index.contains(c));

    println!("📊 Esquema:");
    println!(
        "   Campos de apoderado ({}): {}",
        COLUMNAS_APODERADO.join(", "),
        if tiene_apoderado { "✅" } else { "❌" }
    );
    println!(
        "   Campos de beneficiario ({}): {}",
        COLUMNAS_BENEFICIARIO.join(", "),
        if tiene_beneficiario { "✅" } else { "❌" }
    );

    if !tiene_apoderado && !tiene_beneficiario {
        println!();
        println!("❌ El archivo debe contener campos de beneficiario o apoderado");
        println!("💡 Campos mínimos beneficiario: SEXO, NUMERO_DOCUMENTO, APELLIDO, NOMBRE, CUIL");
        println!("💡 Campos mínimos apoderado: APO_SEXO, IdApoderado, APO_APELLIDO, APO_NOMBRE, APO_CUIL");
        return Ok(());
    }

    let mut total = 0usize;
    let mut con_apoderado = 0usize;

    for result in reader.records() {
        let record = result?;
        let row = RowView::new(&index, &record);
        total += 1;
        if row.tiene_apoderado() {
            con_apoderado += 1;
        }
    }

    println!();
    println!("📊 Registros totales: {}", total);
    println!("📊 Registros con apoderado válido (IdApoderado): {}", con_apoderado);
    println!("📊 Registros sin apoderado válido: {}", total - con_apoderado);
    println!();
    println!("✅ La planilla puede procesarse ({} posiciones por línea)", ANCHO_LINEA);

    Ok(())
}

/// Muestra las primeras N filas como las vería el ensamblador: rama elegida,
/// nombres partidos, teléfono descompuesto y códigos de sexo.
///
/// Las advertencias son informativas; la generación nunca se bloquea por una
/// fecha o CUIL con mala pinta (el campo numérico degrada a ceros).
pub fn preview(input_path: &str, cantidad: usize) -> Result<(), Box<dyn Error>> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Vista previa de procesamiento                               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!("📄 Planilla: {}", input_path);
    println!("👁️  Filas a mostrar: {}", cantidad);
    println!();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input_path)?;

    let headers = reader.headers()?.clone();
    let index = ColumnIndex::new(&headers);
    index.validate_schema()?;

    let mut advertencias = 0usize;

    for (i, result) in reader.records().take(cantidad).enumerate() {
        let record = result?;
        let row = RowView::new(&index, &record);
        let datos = select_person(&row);

        let rama = if row.tiene_apoderado() { "APODERADO" } else { "BENEFICIARIO" };
        let (primer_apellido, segundo_apellido) = split_name(&datos.apellido);
        let (primer_nombre, segundo_nombre) = split_name(&datos.nombre);
        let (prefijo, numero) = split_phone(&datos.celular);

        println!("── Fila {} [{}]", i + 1, rama);
        println!("   Apellidos: '{}' / '{}'", primer_apellido, segundo_apellido);
        println!("   Nombres:   '{}' / '{}'", primer_nombre, segundo_nombre);
        println!("   Teléfono:  prefijo '{}' número '{}'", prefijo, numero);
        println!(
            "   Sexo:      HAB '{}' | letra '{}'",
            map_sexo_hab(&datos.sexo),
            map_sexo_letra(&datos.sexo)
        );
        println!("   Documento: '{}' | CUIL: '{}'", datos.nro_documento, datos.cuil);

        if !datos.cuil.trim().is_empty() && !cuil_valido(&datos.cuil) {
            println!("   ⚠️  CUIL sin forma de 11 dígitos: '{}'", datos.cuil);
            advertencias += 1;
        }
        if !datos.fec_nacimiento.trim().is_empty() && !fecha_hab_valida(&datos.fec_nacimiento) {
            println!("   ⚠️  Fecha de nacimiento fuera de formato YYYYMMDD: '{}'", datos.fec_nacimiento);
            advertencias += 1;
        }
        if map_sexo_hab(&datos.sexo).is_empty() {
            println!("   ⚠️  Sexo sin mapeo HAB: '{}'", datos.sexo);
            advertencias += 1;
        }
    }

    println!();
    if advertencias > 0 {
        println!("⚠️  Advertencias encontradas: {} (no bloquean la generación)", advertencias);
    } else {
        println!("✅ Sin advertencias en las filas revisadas");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fecha_hab_valida() {
        assert!(fecha_hab_valida("19850321"));
        assert!(fecha_hab_valida(" 19850321 "));
        assert!(!fecha_hab_valida("21/03/1985"));
        assert!(!fecha_hab_valida("1985032"));
        assert!(!fecha_hab_valida("198503211"));
        assert!(!fecha_hab_valida(""));
    }

    #[test]
    fn test_cuil_valido() {
        assert!(cuil_valido("27301112224"));
        assert!(!cuil_valido("27-30111222-4"));
        assert!(!cuil_valido("2730111222"));
        assert!(!cuil_valido("abc"));
    }
}
