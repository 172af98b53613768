use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;

// Importar módulos locales
mod commands;
mod file_utils;
mod format;
mod models;
mod normalize;
mod progress;
mod record;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        help();
        return Ok(());
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => {
            if args.len() < 4 {
                eprintln!("Usage: hab_tools generate <input.csv> <output_dir> [--todos]");
                return Ok(());
            }
            let input_file = &args[2];
            let output_dir = &args[3];
            let incluir_todos = args.iter().any(|a| a == "--todos");
            commands::generate::generate_hab_file(input_file, output_dir, incluir_todos)?;
        },
        "generate_all" => {
            if args.len() < 4 {
                eprintln!("Usage: hab_tools generate_all <input_dir> <output_dir> [--todos]");
                return Ok(());
            }
            let input_dir = &args[2];
            let output_dir = &args[3];
            let incluir_todos = args.iter().any(|a| a == "--todos");
            commands::generate::generate_all(input_dir, output_dir, incluir_todos)?;
        },
        "check_schema" => {
            if args.len() != 3 {
                eprintln!("Usage: hab_tools check_schema <input.csv>");
                return Ok(());
            }
            commands::inspection::check_schema(&args[2])?;
        },
        "preview" => {
            if args.len() < 3 {
                eprintln!("Usage: hab_tools preview <input.csv> [cantidad]");
                return Ok(());
            }
            let input_file = &args[2];
            let cantidad: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(10);
            commands::inspection::preview(input_file, cantidad)?;
        },
        "convert_date" => {
            if args.len() != 5 {
                eprintln!("❌ Error: convert_date requires 3 arguments");
                eprintln!("Usage: hab_tools convert_date <input.csv> <output.csv> <columna>");
                eprintln!("\nConvierte fechas DD/MM/YYYY al formato YYYYMMDD del registro HAB");
                return Ok(());
            }
            commands::date_ops::convert_date(&args[2], &args[3], &args[4])?;
        },
        "count" => {
            if args.len() != 3 {
                eprintln!("Usage: hab_tools count <input.csv>");
                return Ok(());
            }
            println!("Counting csv rows...");
            let line_count = count_lines(&args[2])?;
            println!("Number of lines in the file: {}", line_count);
        },
        "help" => {
            help();
        },
        _ => {
            eprintln!("Unknown command: {}", command);
            help();
        }
    }

    Ok(())
}

fn help() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  HAB Tools - Generador de archivos .HAB                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!(
        "Versión {} (Build #{} - {})",
        env!("HAB_TOOLS_VERSION"),
        env!("BUILD_NUMBER"),
        env!("BUILD_DATE")
    );
    println!();
    println!("Convierte planillas CSV de beneficiarios/apoderados al formato de");
    println!("ancho fijo .HAB que consume el loader del banco.");
    println!();
    println!("COMMANDS:");
    println!("  generate <input.csv> <output_dir> [--todos]");
    println!("    Genera el archivo .HAB de una planilla");
    println!("    - Salta registros sin IdApoderado (con --todos los incluye)");
    println!("    - Escribe copia normalizada de la planilla y resumen JSON");
    println!("    - Codifica latin-1, terminador CR-LF, {} posiciones por línea", record::ANCHO_LINEA);
    println!();
    println!("  generate_all <input_dir> <output_dir> [--todos]");
    println!("    Procesa todas las planillas .csv de un directorio");
    println!("    - Ignora temporales de Office (~$...)");
    println!();
    println!("  check_schema <input.csv>");
    println!("    Revisa columnas mínimas y cuenta registros con/sin apoderado");
    println!();
    println!("  preview <input.csv> [cantidad]");
    println!("    Muestra cómo quedarían las primeras filas ya normalizadas");
    println!("    - Advierte CUIL/fechas con formato sospechoso (no bloquea)");
    println!();
    println!("  convert_date <input.csv> <output.csv> <columna>");
    println!("    Convierte una columna DD/MM/YYYY a YYYYMMDD (formato HAB)");
    println!();
    println!("  count <input.csv>");
    println!("    Cuenta las líneas de una planilla");
    println!();
    println!("EXAMPLES:");
    println!();
    println!("  # Generar el .HAB de una planilla");
    println!("  hab_tools generate beneficiarios.csv procesados/");
    println!();
    println!("  # Procesar un directorio completo incluyendo filas sin apoderado");
    println!("  hab_tools generate_all planillas/ procesados/ --todos");
    println!();
    println!("  # Ver el esquema antes de generar");
    println!("  hab_tools check_schema beneficiarios.csv");
    println!();
    println!("  # Arreglar la columna de fecha de nacimiento y generar");
    println!("  hab_tools convert_date export.csv export_fechas.csv FER_NAC");
    println!("  hab_tools generate export_fechas.csv procesados/");
    println!();
    println!("NOTES:");
    println!("  - Campos mínimos beneficiario: SEXO, NUMERO_DOCUMENTO, APELLIDO, NOMBRE, CUIL");
    println!("  - Campos mínimos apoderado: APO_SEXO, IdApoderado, APO_APELLIDO, APO_NOMBRE, APO_CUIL");
    println!("  - Los encabezados se indexan con trim (espacios alrededor no molestan)");
    println!("  - Emails de más de 30 caracteres se reemplazan por la casilla genérica");
    println!("  - Barrio vacío sale como \"OTRO\"");
}

fn count_lines(input_file: &str) -> Result<usize, Box<dyn Error>> {
    print!("Counting lines in file: {}...", input_file);
    let start = Instant::now();
    let file = File::open(input_file)?;
    let reader = BufReader::new(file);

    let line_count = reader.lines().count();

    println!("Time taken to count {} lines: {:.2} seconds", line_count, start.elapsed().as_secs_f64());

    Ok(line_count)
}
