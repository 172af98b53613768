use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use csv::ReaderBuilder;

use crate::file_utils::{ensure_directory_exists, format_bytes, list_input_files, validate_file_exists};
use crate::models::{ColumnIndex, ResumenGeneracion, RowView};
use crate::progress::ProgressTracker;
use crate::record::{assemble_line, encode_latin1, ANCHO_LINEA, FIN_DE_LINEA};

/// Núcleo del lote: recorre las filas EN ORDEN, aplica el filtro de apoderado
/// y escribe cada línea codificada en latin-1 más el terminador CR-LF.
///
/// Devuelve (lineas_generadas, lineas_saltadas). El esquema se valida antes
/// de tocar la primera fila; si no alcanza, el lote entero se rechaza.
pub fn escribir_lote<R: io::Read, W: io::Write>(
    reader: &mut csv::Reader<R>,
    writer: &mut W,
    hoy: NaiveDate,
    incluir_todos: bool,
) -> Result<(usize, usize), Box<dyn Error>> {
    let headers = reader.headers()?.clone();
    let index = ColumnIndex::new(&headers);
    index.validate_schema()?;

    let mut generadas = 0usize;
    let mut saltadas = 0usize;
    let mut progress = ProgressTracker::new(1000);

    for result in reader.records() {
        let record = result?;
        let row = RowView::new(&index, &record);

        // Validación: sin IdApoderado la fila no entra al lote
        if !incluir_todos && !row.tiene_apoderado() {
            saltadas += 1;
            continue;
        }

        let linea = assemble_line(&row, hoy);
        writer.write_all(&encode_latin1(&linea))?;
        writer.write_all(FIN_DE_LINEA.as_bytes())?;
        generadas += 1;

        progress.update((generadas + saltadas) as u64);
    }

    writer.flush()?;
    progress.finish();
    Ok((generadas, saltadas))
}

/// Copia normalizada de la planilla: mismos datos, encabezados con trim.
fn escribir_copia_normalizada(input_path: &str, output_path: &Path) -> Result<(), Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input_path)?;

    let headers = reader.headers()?.clone();
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(output_path)?;

    writer.write_record(headers.iter().map(|h| h.trim()))?;
    for result in reader.records() {
        writer.write_record(&result?)?;
    }
    writer.flush()?;

    Ok(())
}

/// Procesa una planilla CSV y genera el archivo .HAB en `output_dir`.
///
/// El archivo se escribe primero como temporal y recién se publica con el
/// nombre final cuando el lote terminó completo; un .HAB a medias nunca
/// queda con extensión .HAB.
pub fn generate_hab_file(
    input_path: &str,
    output_dir: &str,
    incluir_todos: bool,
) -> Result<ResumenGeneracion, Box<dyn Error>> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Generación de archivo .HAB                                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!("📄 Planilla:  {}", input_path);
    println!("📁 Salida:    {}", output_dir);
    if incluir_todos {
        println!("👤 Modo:      todos los registros (sin filtro de apoderado)");
    } else {
        println!("👤 Modo:      solo registros con IdApoderado");
    }

    validate_file_exists(input_path)?;
    ensure_directory_exists(output_dir)?;

    if let Ok(meta) = fs::metadata(input_path) {
        println!("💾 Tamaño:    {}", format_bytes(meta.len()));
    }
    println!();

    let stem = Path::new(input_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("salida");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let hab_name = format!("{}_{}.HAB", stem, timestamp);
    let hab_path = Path::new(output_dir).join(&hab_name);
    let tmp_path = Path::new(output_dir).join(format!("{}.tmp", hab_name));

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input_path)?;

    let hoy = Local::now().date_naive();

    println!("📝 Generando archivo .HAB...");
    let (generadas, saltadas) = {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        match escribir_lote(&mut reader, &mut writer, hoy, incluir_todos) {
            Ok(conteos) => conteos,
            Err(e) => {
                // Lote incompleto: el temporal no se publica
                drop(writer);
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        }
    };

    fs::rename(&tmp_path, &hab_path)?;

    // Copia normalizada de la planilla junto al .HAB
    let copia_path = Path::new(output_dir).join(format!("procesado_{}_{}.csv", stem, timestamp));
    escribir_copia_normalizada(input_path, &copia_path)?;

    let resumen = ResumenGeneracion {
        archivo_entrada: input_path.to_string(),
        archivo_hab: hab_path.to_string_lossy().to_string(),
        lineas_generadas: generadas,
        lineas_saltadas: saltadas,
        longitud_linea: ANCHO_LINEA,
        fecha_proceso: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };

    let resumen_path = Path::new(output_dir).join(format!("{}.resumen.json", hab_name));
    let mut resumen_file = File::create(&resumen_path)?;
    resumen_file.write_all(serde_json::to_string_pretty(&resumen)?.as_bytes())?;

    println!();
    println!("✅ Archivo .HAB generado: {}", hab_path.display());
    println!("💾 Copia normalizada: {}", copia_path.display());
    println!("📝 Resumen: {}", resumen_path.display());
    println!("📊 Líneas generadas: {}", generadas);
    if saltadas > 0 {
        println!("⚠️  Registros saltados (IdApoderado vacío): {}", saltadas);
    }
    println!();

    Ok(resumen)
}

/// Procesa todas las planillas .csv de un directorio.
pub fn generate_all(input_dir: &str, output_dir: &str, incluir_todos: bool) -> Result<(), Box<dyn Error>> {
    println!("🚀 Iniciando procesamiento de planillas...");
    println!("📁 Directorio de entrada: {}", input_dir);
    println!("📁 Directorio de salida: {}", output_dir);
    println!();

    let files = list_input_files(input_dir)?;
    if files.is_empty() {
        println!("❌ No se encontraron archivos .csv en {}", input_dir);
        return Ok(());
    }

    println!("📋 Se encontraron {} planilla(s) para procesar", files.len());

    let mut procesados = 0usize;
    let mut con_error = 0usize;
    let mut total_generadas = 0usize;
    let mut total_saltadas = 0usize;

    for file in files {
        let path = file.to_string_lossy().to_string();
        println!("\n🔄 Procesando planilla: {}", path);

        match generate_hab_file(&path, output_dir, incluir_todos) {
            Ok(resumen) => {
                procesados += 1;
                total_generadas += resumen.lineas_generadas;
                total_saltadas += resumen.lineas_saltadas;
            }
            Err(e) => {
                eprintln!("❌ Error procesando {}: {}", path, e);
                con_error += 1;
            }
        }
    }

    println!("\n🎉 Procesamiento completado!");
    println!("📊 Planillas procesadas: {}", procesados);
    println!("📊 Líneas generadas: {} | saltadas: {}", total_generadas, total_saltadas);
    if con_error > 0 {
        eprintln!("⚠️  Planillas con error: {}", con_error);
    }

    Ok(())
}
