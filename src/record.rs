//! Armado de la línea .HAB: tabla posicional de campos + ensamblador.
//!
//! La tabla `LAYOUT` reproduce campo por campo el diseño de registro del
//! convenio de habilitación de cuentas (ancho, tipo, default y origen del
//! dato). Es UNA sola tabla declarativa para poder auditarla contra la
//! documentación del banco sin leer código.

use chrono::NaiveDate;

use crate::format::{format_field, Tipo};
use crate::models::{select_person, RowView};
use crate::normalize::{
    barrio_or_default, email_or_generic, map_sexo_hab, split_name, split_phone,
};

/// Terminador de línea del archivo .HAB (formato Windows del loader).
pub const FIN_DE_LINEA: &str = "\r\n";

/// De dónde sale el valor de un campo.
#[derive(Debug, Clone, Copy)]
pub enum Fuente {
    /// Valor fijo del convenio.
    Constante(&'static str),
    /// Valor dinámico de la fila, ya normalizado.
    Dato(Dato),
    /// Región reservada, viaja en blanco.
    Relleno,
}

/// Valores dinámicos disponibles por fila.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dato {
    Sucursal,
    NroDocumento,
    Cuil,
    FechaAlta,
    PrimerApellido,
    SegundoApellido,
    PrimerNombre,
    SegundoNombre,
    Calle,
    Altura,
    Barrio,
    Localidad,
    CodigoPostal,
    PrefijoTelefono,
    NumeroTelefono,
    FecNacimiento,
    Sexo,
    Email,
}

/// Un campo posicional del registro.
pub struct Campo {
    pub nombre: &'static str,
    pub longitud: usize,
    pub tipo: Tipo,
    pub default: &'static str,
    pub fuente: Fuente,
}

use Fuente::{Constante, Dato as D, Relleno};
use Tipo::{Alfanumerico as A, Numerico as N};

/// Diseño de registro completo, en orden de archivo.
///
/// El prefijo y número de teléfono se repiten en los tres juegos (particular,
/// celular y comercial) y el domicilio particular se duplica como comercial:
/// así lo pide el convenio aunque el origen sea el mismo dato.
pub const LAYOUT: &[Campo] = &[
    Campo { nombre: "TIPO DE REGISTRO",            longitud: 1,   tipo: A, default: "",     fuente: Constante("A") },
    Campo { nombre: "SUCURSAL",                    longitud: 5,   tipo: N, default: "",     fuente: D(Dato::Sucursal) },
    Campo { nombre: "MONEDA",                      longitud: 2,   tipo: N, default: "1",    fuente: Constante("1") },
    Campo { nombre: "TIPO DOCUMENTO",              longitud: 3,   tipo: N, default: "1",    fuente: Constante("1") },
    Campo { nombre: "NRO DOCUMENTO",               longitud: 11,  tipo: N, default: "",     fuente: D(Dato::NroDocumento) },
    Campo { nombre: "CLAVE FISCAL",                longitud: 3,   tipo: N, default: "",     fuente: Constante("7") },
    Campo { nombre: "NRO CLAVE FISCAL",            longitud: 11,  tipo: N, default: "",     fuente: D(Dato::Cuil) },
    Campo { nombre: "TIPO CUENTA",                 longitud: 2,   tipo: N, default: "0",    fuente: Constante("0") },
    Campo { nombre: "NRO CUENTA",                  longitud: 9,   tipo: N, default: "0",    fuente: Constante("0") },
    Campo { nombre: "FECHA ALTA",                  longitud: 8,   tipo: N, default: "",     fuente: D(Dato::FechaAlta) },
    Campo { nombre: "PRIMER APELLIDO",             longitud: 15,  tipo: A, default: "",     fuente: D(Dato::PrimerApellido) },
    Campo { nombre: "SEGUNDO APELLIDO",            longitud: 15,  tipo: A, default: "",     fuente: D(Dato::SegundoApellido) },
    Campo { nombre: "PRIMER NOMBRE",               longitud: 15,  tipo: A, default: "",     fuente: D(Dato::PrimerNombre) },
    Campo { nombre: "SEGUNDO NOMBRE",              longitud: 15,  tipo: A, default: "",     fuente: D(Dato::SegundoNombre) },
    Campo { nombre: "CONDICION IVA",               longitud: 2,   tipo: N, default: "4",    fuente: Constante("4") },
    Campo { nombre: "DOMICILIO PARTICULAR",        longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Calle) },
    Campo { nombre: "NRO DOMICILIO",               longitud: 5,   tipo: N, default: "",     fuente: D(Dato::Altura) },
    Campo { nombre: "PISO",                        longitud: 2,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "DEPARTAMENTO",                longitud: 3,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "BARRIO",                      longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Barrio) },
    Campo { nombre: "LOCALIDAD",                   longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Localidad) },
    Campo { nombre: "CODIGO PROVINCIA",            longitud: 3,   tipo: N, default: "4",    fuente: Constante("4") },
    Campo { nombre: "CODIGO POSTAL",               longitud: 5,   tipo: N, default: "",     fuente: D(Dato::CodigoPostal) },
    Campo { nombre: "CODIGO POSTAL EXTENDIDO",     longitud: 8,   tipo: N, default: "0",    fuente: Constante("0") },
    Campo { nombre: "PREF. TEL PARTICULAR",        longitud: 5,   tipo: A, default: "",     fuente: D(Dato::PrefijoTelefono) },
    Campo { nombre: "TEL PARTICULAR",              longitud: 11,  tipo: N, default: "",     fuente: D(Dato::NumeroTelefono) },
    Campo { nombre: "PREF. TEL CELULAR",           longitud: 5,   tipo: A, default: "",     fuente: D(Dato::PrefijoTelefono) },
    Campo { nombre: "TEL MOVIL",                   longitud: 11,  tipo: N, default: "",     fuente: D(Dato::NumeroTelefono) },
    Campo { nombre: "DOMICILIO COMERCIAL",         longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Calle) },
    Campo { nombre: "NRO DOMICILIO COMERCIAL",     longitud: 5,   tipo: N, default: "",     fuente: D(Dato::Altura) },
    Campo { nombre: "PISO COMERCIAL",              longitud: 2,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "DEPARTAMENTO COMERCIAL",      longitud: 3,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "BARRIO COMERCIAL",            longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Barrio) },
    Campo { nombre: "LOCALIDAD COMERCIAL",         longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Localidad) },
    Campo { nombre: "COD. PROVINCIA COMERCIAL",    longitud: 3,   tipo: N, default: "4",    fuente: Constante("4") },
    Campo { nombre: "COD. POSTAL COMERCIAL",       longitud: 5,   tipo: N, default: "",     fuente: D(Dato::CodigoPostal) },
    Campo { nombre: "COD. POSTAL EXT. COMERCIAL",  longitud: 8,   tipo: N, default: "0",    fuente: Constante("0") },
    Campo { nombre: "PREF. TEL COMERCIAL",         longitud: 5,   tipo: A, default: "",     fuente: D(Dato::PrefijoTelefono) },
    Campo { nombre: "TELEFONO COMERCIAL",          longitud: 11,  tipo: N, default: "",     fuente: D(Dato::NumeroTelefono) },
    Campo { nombre: "FECHA NACIMIENTO",            longitud: 8,   tipo: N, default: "",     fuente: D(Dato::FecNacimiento) },
    Campo { nombre: "ESTADO CIVIL",                longitud: 4,   tipo: N, default: "1",    fuente: Constante("1") },
    Campo { nombre: "RESIDENTE",                   longitud: 1,   tipo: A, default: "S",    fuente: Constante("S") },
    Campo { nombre: "SEXO",                        longitud: 1,   tipo: A, default: "",     fuente: D(Dato::Sexo) },
    Campo { nombre: "NACIONALIDAD",                longitud: 3,   tipo: N, default: "1",    fuente: Constante("1") },
    Campo { nombre: "EMAIL",                       longitud: 30,  tipo: A, default: "",     fuente: D(Dato::Email) },
    Campo { nombre: "TIPO PERSONA",                longitud: 1,   tipo: A, default: "F",    fuente: Constante("F") },
    Campo { nombre: "COD. ACTIVIDAD BCRA",         longitud: 5,   tipo: N, default: "2",    fuente: Constante("2") },
    Campo { nombre: "COD. NATURALEZA JURIDICA",    longitud: 3,   tipo: N, default: "27",   fuente: Constante("27") },
    Campo { nombre: "PRIMER APELLIDO CONYUGE",     longitud: 15,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "SEGUNDO APELLIDO CONYUGE",    longitud: 15,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "PRIMER NOMBRE CONYUGE",       longitud: 15,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "SEGUNDO NOMBRE CONYUGE",      longitud: 15,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "SEXO CONYUGE",                longitud: 1,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "TIPO DOC CONYUGE",            longitud: 3,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "NRO DOC CONYUGE",             longitud: 11,  tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "CUIT CONYUGE",                longitud: 11,  tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "FECHA NACIMIENTO CONYUGE",    longitud: 8,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "NACIONALIDAD CONYUGE",        longitud: 3,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "NRO EMPRESA",                 longitud: 5,   tipo: N, default: "1137", fuente: Constante("1137") },
    Campo { nombre: "TIPO CONVENIO",               longitud: 3,   tipo: N, default: "0",    fuente: Constante("0") },
    Campo { nombre: "VALIDA NOMBRE",               longitud: 1,   tipo: A, default: "1",    fuente: Constante("1") },
    Campo { nombre: "NOMBRE CLIENTE SEGUN PATRON", longitud: 30,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "FILLER",                      longitud: 409, tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "TIPO SOLICITUD",              longitud: 2,   tipo: N, default: "",     fuente: Relleno },
    Campo { nombre: "CRU",                         longitud: 22,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "FILLER 2",                    longitud: 330, tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "DATOS PARA EMPRESA",          longitud: 21,  tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 1",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 2",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 3",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 4",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 5",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 6",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
    Campo { nombre: "MOTIVO DEL ERROR 7",          longitud: 5,   tipo: A, default: "",     fuente: Relleno },
];

/// Ancho total de línea; constante para todo el archivo.
pub const ANCHO_LINEA: usize = ancho_linea();

const fn ancho_linea() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < LAYOUT.len() {
        total += LAYOUT[i].longitud;
        i += 1;
    }
    total
}

/// Valores dinámicos de una fila, ya pasados por los normalizadores.
struct ValoresFila {
    sucursal: String,
    nro_documento: String,
    cuil: String,
    fecha_alta: String,
    primer_apellido: String,
    segundo_apellido: String,
    primer_nombre: String,
    segundo_nombre: String,
    calle: String,
    altura: String,
    barrio: String,
    localidad: String,
    codigo_postal: String,
    prefijo_telefono: String,
    numero_telefono: String,
    fec_nacimiento: String,
    sexo: String,
    email: String,
}

impl ValoresFila {
    fn resolver(&self, dato: Dato) -> &str {
        match dato {
            Dato::Sucursal => &self.sucursal,
            Dato::NroDocumento => &self.nro_documento,
            Dato::Cuil => &self.cuil,
            Dato::FechaAlta => &self.fecha_alta,
            Dato::PrimerApellido => &self.primer_apellido,
            Dato::SegundoApellido => &self.segundo_apellido,
            Dato::PrimerNombre => &self.primer_nombre,
            Dato::SegundoNombre => &self.segundo_nombre,
            Dato::Calle => &self.calle,
            Dato::Altura => &self.altura,
            Dato::Barrio => &self.barrio,
            Dato::Localidad => &self.localidad,
            Dato::CodigoPostal => &self.codigo_postal,
            Dato::PrefijoTelefono => &self.prefijo_telefono,
            Dato::NumeroTelefono => &self.numero_telefono,
            Dato::FecNacimiento => &self.fec_nacimiento,
            Dato::Sexo => &self.sexo,
            Dato::Email => &self.email,
        }
    }
}

fn valores_de(row: &RowView, hoy: NaiveDate) -> ValoresFila {
    let datos = select_person(row);

    let (primer_apellido, segundo_apellido) = split_name(&datos.apellido);
    let (primer_nombre, segundo_nombre) = split_name(&datos.nombre);
    let (prefijo_telefono, numero_telefono) = split_phone(&datos.celular);

    ValoresFila {
        sucursal: datos.cod_sucursal,
        nro_documento: datos.nro_documento,
        cuil: datos.cuil,
        fecha_alta: hoy.format("%Y%m%d").to_string(),
        primer_apellido,
        segundo_apellido,
        primer_nombre,
        segundo_nombre,
        calle: datos.calle,
        altura: datos.altura,
        barrio: barrio_or_default(&datos.barrio),
        localidad: datos.localidad,
        codigo_postal: datos.codigo_postal,
        prefijo_telefono,
        numero_telefono,
        fec_nacimiento: datos.fec_nacimiento,
        sexo: map_sexo_hab(&datos.sexo).to_string(),
        email: email_or_generic(&datos.mail),
    }
}

/// Arma la línea HAB completa para una fila.
///
/// Determinística dada la fila y `hoy`: la fecha de alta se estampa con el
/// valor inyectado, nunca con el reloj ambiente.
pub fn assemble_line(row: &RowView, hoy: NaiveDate) -> String {
    let valores = valores_de(row, hoy);

    let mut linea = String::with_capacity(ANCHO_LINEA + 2);
    for campo in LAYOUT {
        let valor = match campo.fuente {
            Constante(v) => v,
            D(dato) => valores.resolver(dato),
            Relleno => "",
        };
        linea.push_str(&format_field(valor, campo.longitud, campo.tipo, campo.default));
    }
    linea
}

/// Codifica la línea a latin-1 para el loader. Los caracteres fuera del
/// rango (no debería quedar ninguno tras la sanitización) salen como '?'.
pub fn encode_latin1(texto: &str) -> Vec<u8> {
    texto
        .chars()
        .map(|c| {
            let cp = c as u32;
            if cp <= 0xFF {
                cp as u8
            } else {
                b'?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnIndex;
    use csv::StringRecord;

    /// Offset y longitud (en caracteres) de un campo por nombre.
    fn posicion(nombre: &str) -> (usize, usize) {
        let mut offset = 0;
        for campo in LAYOUT {
            if campo.nombre == nombre {
                return (offset, campo.longitud);
            }
            offset += campo.longitud;
        }
        panic!("campo desconocido: {}", nombre);
    }

    fn campo_de(linea: &str, nombre: &str) -> String {
        let (ini, len) = posicion(nombre);
        linea.chars().skip(ini).take(len).collect()
    }

    fn fila_apoderado() -> (ColumnIndex, StringRecord) {
        let cols = vec![
            "IdApoderado", "APO_SEXO", "APO_DNI", "APO_APELLIDO", "APO_NOMBRE",
            "APO_CUIL", "APO_FEC_NAC", "APO_CELULAR", "APO_EMAIL", "APO_CALLE",
            "APO_NRO", "APO_BARRIO", "APO_LOCALIDAD", "APO_CP", "APO_COD_SUC",
        ];
        let vals = vec![
            "987", "MUJER", "30111222", "García López", "María José",
            "27301112224", "19850321", "03511234567", "mjgarcia@mail.com", "San Martín",
            "1250", "", "Córdoba", "5000", "23",
        ];
        let headers = StringRecord::from(cols);
        (ColumnIndex::new(&headers), StringRecord::from(vals))
    }

    fn hoy() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_ancho_total_y_cantidad_de_campos() {
        assert_eq!(LAYOUT.len(), 74);
        assert_eq!(ANCHO_LINEA, 1408);
    }

    #[test]
    fn test_linea_tiene_ancho_exacto() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());
        assert_eq!(linea.chars().count(), ANCHO_LINEA);
    }

    #[test]
    fn test_constantes_y_fecha_alta() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());

        assert_eq!(campo_de(&linea, "TIPO DE REGISTRO"), "A");
        assert_eq!(campo_de(&linea, "MONEDA"), "01");
        assert_eq!(campo_de(&linea, "TIPO DOCUMENTO"), "001");
        assert_eq!(campo_de(&linea, "CLAVE FISCAL"), "007");
        assert_eq!(campo_de(&linea, "FECHA ALTA"), "20240315");
        assert_eq!(campo_de(&linea, "SUCURSAL"), "00023");
        assert_eq!(campo_de(&linea, "NRO EMPRESA"), "01137");
        assert_eq!(campo_de(&linea, "COD. NATURALEZA JURIDICA"), "027");
        assert_eq!(campo_de(&linea, "RESIDENTE"), "S");
        assert_eq!(campo_de(&linea, "TIPO PERSONA"), "F");
    }

    #[test]
    fn test_apellido_sanitizado_y_partido() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());

        assert_eq!(campo_de(&linea, "PRIMER APELLIDO"), "Garcia         ");
        assert_eq!(campo_de(&linea, "SEGUNDO APELLIDO"), "Lopez          ");
        assert_eq!(campo_de(&linea, "PRIMER NOMBRE"), "Maria          ");
        assert_eq!(campo_de(&linea, "SEGUNDO NOMBRE"), "Jose           ");
    }

    #[test]
    fn test_telefono_repetido_en_los_tres_juegos() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());

        // 03511234567 → prefijo 351, número 1234567
        assert_eq!(campo_de(&linea, "PREF. TEL PARTICULAR"), "351  ");
        assert_eq!(campo_de(&linea, "TEL PARTICULAR"), "00001234567");
        assert_eq!(campo_de(&linea, "PREF. TEL CELULAR"), "351  ");
        assert_eq!(campo_de(&linea, "TEL MOVIL"), "00001234567");
        assert_eq!(campo_de(&linea, "PREF. TEL COMERCIAL"), "351  ");
        assert_eq!(campo_de(&linea, "TELEFONO COMERCIAL"), "00001234567");
    }

    #[test]
    fn test_domicilio_duplicado_y_barrio_default() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());

        let particular = campo_de(&linea, "DOMICILIO PARTICULAR");
        let comercial = campo_de(&linea, "DOMICILIO COMERCIAL");
        assert_eq!(particular, comercial);
        assert_eq!(particular.trim_end(), "San Martín");

        // APO_BARRIO vacío → "OTRO" en ambos bloques
        assert_eq!(campo_de(&linea, "BARRIO").trim_end(), "OTRO");
        assert_eq!(campo_de(&linea, "BARRIO COMERCIAL").trim_end(), "OTRO");
    }

    #[test]
    fn test_sexo_y_email() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());

        assert_eq!(campo_de(&linea, "SEXO"), "2"); // MUJER → 2
        assert_eq!(campo_de(&linea, "EMAIL").trim_end(), "mjgarcia@mail.com");
    }

    #[test]
    fn test_email_largo_usa_casilla_generica() {
        let (index, mut record) = fila_apoderado();
        // 31 caracteres
        record = {
            let mut vals: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            vals[8] = "direccion.demasiado.larga@x.com".to_string();
            StringRecord::from(vals)
        };
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());
        assert_eq!(
            campo_de(&linea, "EMAIL").trim_end(),
            crate::normalize::MAIL_GENERICO
        );
    }

    #[test]
    fn test_rellenos_en_blanco() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let linea = assemble_line(&row, hoy());

        assert_eq!(campo_de(&linea, "PISO"), "00");
        assert_eq!(campo_de(&linea, "NRO DOC CONYUGE"), "00000000000");
        assert_eq!(campo_de(&linea, "FILLER"), " ".repeat(409));
        assert_eq!(campo_de(&linea, "TIPO SOLICITUD"), "00");
        assert_eq!(campo_de(&linea, "MOTIVO DEL ERROR 7"), "     ");
    }

    #[test]
    fn test_idempotencia_con_fecha_inyectada() {
        let (index, record) = fila_apoderado();
        let row = RowView::new(&index, &record);
        let a = assemble_line(&row, hoy());
        let b = assemble_line(&row, hoy());
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_latin1() {
        assert_eq!(encode_latin1("ABC"), b"ABC");
        // 'ñ' existe en latin-1 (0xF1)
        assert_eq!(encode_latin1("ñ"), vec![0xF1]);
        // Fuera de latin-1 → '?'
        assert_eq!(encode_latin1("€"), b"?");
        assert_eq!(encode_latin1("año 1枚"), vec![b'a', 0xF1, b'o', b' ', b'1', b'?']);
    }
}
