//! Modelos de fila y selección de persona (beneficiario vs. apoderado).

use std::collections::HashMap;
use std::error::Error;

use csv::StringRecord;
use serde::Serialize;

use crate::normalize::sanitize_text;

/// Columnas mínimas para operar con apoderado.
pub const COLUMNAS_APODERADO: [&str; 2] = ["IdApoderado", "APO_SEXO"];
/// Columnas mínimas para operar con beneficiario.
pub const COLUMNAS_BENEFICIARIO: [&str; 2] = ["NUMERO_DOCUMENTO", "SEXO"];

/// Índice de columnas por nombre, construido una sola vez por archivo.
///
/// Los nombres se indexan con trim porque las planillas suelen venir con
/// espacios alrededor de los encabezados.
#[derive(Debug)]
pub struct ColumnIndex {
    indices: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(headers: &StringRecord) -> Self {
        let mut indices = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            indices.entry(h.trim().to_string()).or_insert(i);
        }
        Self { indices }
    }

    pub fn contains(&self, columna: &str) -> bool {
        self.indices.contains_key(columna)
    }

    /// Encabezados ya normalizados (con trim), en orden de archivo.
    pub fn headers(&self) -> Vec<String> {
        let mut pares: Vec<(&String, &usize)> = self.indices.iter().collect();
        pares.sort_by_key(|&(_, &i)| i);
        pares.into_iter().map(|(h, _)| h.clone()).collect()
    }

    /// Valida que el archivo tenga el esquema mínimo ANTES de procesar filas.
    ///
    /// Alcanza con el juego de columnas de apoderado o el de beneficiario;
    /// si no hay ninguno el lote entero se rechaza.
    pub fn validate_schema(&self) -> Result<(), Box<dyn Error>> {
        let tiene_apoderado = COLUMNAS_APODERADO.iter().all(|c| self.contains(c));
        let tiene_beneficiario = COLUMNAS_BENEFICIARIO.iter().all(|c| self.contains(c));

        if !tiene_apoderado && !tiene_beneficiario {
            return Err(format!(
                "El archivo debe contener campos de beneficiario o apoderado\n\
                 Campos mínimos beneficiario: SEXO, NUMERO_DOCUMENTO, APELLIDO, NOMBRE, CUIL\n\
                 Campos mínimos apoderado: APO_SEXO, IdApoderado, APO_APELLIDO, APO_NOMBRE, APO_CUIL"
            )
            .into());
        }

        Ok(())
    }
}

/// Vista de una fila: acceso opcional por nombre de columna.
///
/// Devuelve `None` tanto para columnas ausentes como para celdas fuera de
/// rango; el llamador decide el default.
pub struct RowView<'a> {
    index: &'a ColumnIndex,
    record: &'a StringRecord,
}

impl<'a> RowView<'a> {
    pub fn new(index: &'a ColumnIndex, record: &'a StringRecord) -> Self {
        Self { index, record }
    }

    pub fn get(&self, columna: &str) -> Option<&str> {
        self.index
            .indices
            .get(columna)
            .and_then(|&i| self.record.get(i))
    }

    /// Valor de celda o cadena vacía si la columna no existe.
    pub fn get_or_empty(&self, columna: &str) -> &str {
        self.get(columna).unwrap_or("")
    }

    /// La fila tiene apoderado si IdApoderado viene con contenido real.
    pub fn tiene_apoderado(&self) -> bool {
        !self.get_or_empty("IdApoderado").trim().is_empty()
    }
}

/// Los 14 campos canónicos que alimentan la línea HAB, ya resueltos a una
/// sola persona. Se construye por fila y se descarta al emitir la línea.
#[derive(Debug, Default, PartialEq)]
pub struct PersonData {
    pub sexo: String,
    pub nro_documento: String,
    pub apellido: String,
    pub nombre: String,
    pub cuil: String,
    pub fec_nacimiento: String,
    pub celular: String,
    pub mail: String,
    pub calle: String,
    pub altura: String,
    pub barrio: String,
    pub localidad: String,
    pub codigo_postal: String,
    pub cod_sucursal: String,
}

/// Selecciona la persona que puebla el registro.
///
/// Si la fila trae IdApoderado válido se usan TODOS los campos APO_*; si no,
/// todos los del beneficiario. Nunca se mezclan campos de ambos. Apellido y
/// nombre salen ya sanitizados.
pub fn select_person(row: &RowView) -> PersonData {
    if row.tiene_apoderado() {
        PersonData {
            sexo: row.get_or_empty("APO_SEXO").to_string(),
            nro_documento: row.get_or_empty("APO_DNI").to_string(),
            apellido: sanitize_text(row.get_or_empty("APO_APELLIDO")),
            nombre: sanitize_text(row.get_or_empty("APO_NOMBRE")),
            cuil: row.get_or_empty("APO_CUIL").to_string(),
            fec_nacimiento: row.get_or_empty("APO_FEC_NAC").to_string(),
            celular: row.get_or_empty("APO_CELULAR").to_string(),
            mail: row.get_or_empty("APO_EMAIL").to_string(),
            calle: row.get_or_empty("APO_CALLE").to_string(),
            altura: row.get_or_empty("APO_NRO").to_string(),
            barrio: row.get_or_empty("APO_BARRIO").to_string(),
            localidad: row.get_or_empty("APO_LOCALIDAD").to_string(),
            codigo_postal: row.get_or_empty("APO_CP").to_string(),
            cod_sucursal: row.get_or_empty("APO_COD_SUC").to_string(),
        }
    } else {
        PersonData {
            sexo: row.get_or_empty("SEXO").to_string(),
            nro_documento: row.get_or_empty("NUMERO_DOCUMENTO").to_string(),
            apellido: sanitize_text(row.get_or_empty("APELLIDO")),
            nombre: sanitize_text(row.get_or_empty("NOMBRE")),
            cuil: row.get_or_empty("CUIL").to_string(),
            fec_nacimiento: row.get_or_empty("FER_NAC").to_string(),
            celular: row.get_or_empty("TEL_CELULAR").to_string(),
            mail: row.get_or_empty("MAIL").to_string(),
            calle: row.get_or_empty("CALLE").to_string(),
            altura: row.get_or_empty("NUMERO").to_string(),
            barrio: row.get_or_empty("BARRIO").to_string(),
            localidad: row.get_or_empty("N_LOCALIDAD").to_string(),
            codigo_postal: row.get_or_empty("CODIGO_POSTAL").to_string(),
            cod_sucursal: row.get_or_empty("BEN_COD_SUC").to_string(),
        }
    }
}

/// Resumen de una corrida de generación. Se imprime por consola y se guarda
/// como sidecar JSON junto al .HAB.
#[derive(Debug, Serialize)]
pub struct ResumenGeneracion {
    pub archivo_entrada: String,
    pub archivo_hab: String,
    pub lineas_generadas: usize,
    pub lineas_saltadas: usize,
    pub longitud_linea: usize,
    pub fecha_proceso: String,
}
