use std::error::Error;
use std::path::{Path, PathBuf};

/// Valida que un archivo exista
pub fn validate_file_exists(path: &str) -> Result<(), Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Err(format!("File not found: {}", path).into());
    }
    Ok(())
}

/// Crea un directorio si no existe
pub fn ensure_directory_exists(path: &str) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Lista las planillas .csv de un directorio, en orden alfabético.
///
/// Se descartan los temporales de Office (prefijo "~$") que quedan cuando
/// alguien tiene la planilla abierta.
pub fn list_input_files(dir: &str) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let nombre = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");

        if nombre.starts_with("~$") {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("csv")) == Some(true) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Formatea bytes en formato legible (KB, MB, GB)
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
