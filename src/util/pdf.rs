//! Document composer for quotation PDFs.
//!
//! Renders the formal proposal for a finalized quote: letterhead, client
//! block, unit summary (from the frozen snapshot, never the live unit),
//! discount and payment breakdown, legal notes, contact block, and an
//! optional final page with the unit photo. Layout is A4 with builtin
//! Helvetica fonts; all coordinates are in millimetres from the bottom-left
//! corner.

use chrono::{DateTime, Duration, FixedOffset, Local};
use printpdf::image_crate::DynamicImage;
use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};
use tracing::{debug, info, warn};

use crate::config::CotizacionConfig;
use crate::model::cotizacion::{Cotizacion, TipoDescuento};
use crate::service::pricing;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
const RIGHT: f32 = PAGE_W - MARGIN;
/// X position of the value column in label/value rows.
const COL_VALOR: f32 = 70.0;
const LINE_H: f32 = 6.5;

const EMPRESA: &str = "INMOBILIARIA GRUPO M&E";
const CONTACTO_DIRECCION: &str = "Av. Javier Prado Este 1234, San Isidro, Lima";
const CONTACTO_TELEFONO: &str = "Central de ventas: (01) 555-0134";
const CONTACTO_EMAIL: &str = "ventas@grupomye.com";

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// A quotation document without a price is not a valid business artifact.
    #[error("La cotización no tiene precio final calculado")]
    PrecioFaltante,

    #[error("Error al generar el PDF: {0}")]
    RenderFailed(String),
}

impl From<printpdf::Error> for PdfError {
    fn from(err: printpdf::Error) -> Self {
        PdfError::RenderFailed(err.to_string())
    }
}

/// Attachment filename: `cotizacion_NN_YYYYMMDD.pdf`.
pub fn nombre_archivo(numero_cotizacion: &str, fecha: DateTime<Local>) -> String {
    format!("{}_{}.pdf", numero_cotizacion, fecha.format("%Y%m%d"))
}

/// Renders the proposal document and returns the PDF bytes.
///
/// `asesor` is the display name of the creating seller, when known. `foto`
/// is the already-decoded unit photo; pass `None` to omit the photo page
/// (fetch/decode failures are the caller's to log — generation never fails
/// because of the photo).
pub fn generar_pdf_cotizacion(
    cotizacion: &Cotizacion,
    asesor: Option<&str>,
    config: &CotizacionConfig,
    foto: Option<DynamicImage>,
) -> Result<Vec<u8>, PdfError> {
    let precio_final = cotizacion.precio_final.ok_or(PdfError::PrecioFaltante)?;

    info!(
        numero = cotizacion.numero_cotizacion.as_deref().unwrap_or("-"),
        "Generando PDF de cotización"
    );

    let (doc, page1, layer1) = PdfDocument::new(
        "Cotización de Departamento",
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Contenido",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut y = PAGE_H - 25.0;

    // --- Letterhead ---
    layer.set_fill_color(azul_corporativo());
    texto(&layer, &bold, EMPRESA, 11.0, MARGIN, y);
    layer.set_fill_color(negro());
    y -= 12.0;

    texto_centrado(&layer, &bold, "COTIZACIÓN DE DEPARTAMENTO", 18.0, y);
    y -= 8.0;

    // `cotizacion_NN` is an internal key; the document shows the bare number.
    let numero = cotizacion
        .numero_cotizacion
        .as_deref()
        .map(pricing::numero_para_documento)
        .unwrap_or_default();
    texto_centrado(&layer, &regular, &format!("N° {}", numero), 12.0, y);
    y -= 4.0;
    regla(&layer, MARGIN, RIGHT, y);
    y -= 10.0;

    // --- Client block ---
    let fecha_emision = fecha_de_emision(cotizacion);
    let fecha_vencimiento = fecha_emision + Duration::days(config.validez_dias);

    subtitulo(&layer, &bold, "DATOS DEL CLIENTE", y);
    y -= 8.0;
    y = fila(&layer, &bold, &regular, "Nombre:", &cotizacion.nombre_cliente, y);
    y = fila(&layer, &bold, &regular, "DNI:", &cotizacion.dni_cliente, y);
    y = fila(&layer, &bold, &regular, "Dirección:", &cotizacion.direccion_cliente, y);
    y = fila(&layer, &bold, &regular, "Distrito:", &cotizacion.distrito_cliente, y);
    y = fila(&layer, &bold, &regular, "Teléfono:", &cotizacion.telefono_cliente, y);
    if let Some(email) = cotizacion.email_cliente.as_deref() {
        y = fila(&layer, &bold, &regular, "Email:", email, y);
    }
    if let Some(asesor) = asesor {
        y = fila(&layer, &bold, &regular, "Asesor:", asesor, y);
    }
    y = fila(
        &layer,
        &bold,
        &regular,
        "Fecha de emisión:",
        &fecha_emision.format("%d/%m/%Y").to_string(),
        y,
    );
    y = fila(
        &layer,
        &bold,
        &regular,
        "Válida hasta:",
        &fecha_vencimiento.format("%d/%m/%Y").to_string(),
        y,
    );
    y -= 6.0;

    // --- Unit summary, sourced from the frozen snapshot only ---
    subtitulo(&layer, &bold, "INFORMACIÓN DEL DEPARTAMENTO", y);
    y -= 8.0;
    match cotizacion.departamento_snapshot.as_ref() {
        Some(snap) => {
            y = fila(&layer, &bold, &regular, "Nombre:", &snap.nombre, y);
            y = fila(&layer, &bold, &regular, "Código:", &snap.codigo_corto, y);
            y = fila(&layer, &bold, &regular, "Área techada:", &snap.area_m2, y);
            y = fila(&layer, &bold, &regular, "Área libre:", &snap.area_libre, y);
            y = fila(&layer, &bold, &regular, "Precio de lista:", &snap.precio_lista, y);
        }
        None => {
            // Renderable even if finalize somehow skipped the snapshot;
            // blanks instead of failure.
            warn!("Cotización sin snapshot de departamento, se renderiza en blanco");
            y = fila(&layer, &bold, &regular, "Nombre:", "", y);
            y = fila(&layer, &bold, &regular, "Código:", "", y);
        }
    }
    y -= 6.0;

    // --- Investment summary ---
    subtitulo(&layer, &bold, "RESUMEN DE INVERSIÓN", y);
    y -= 8.0;

    if cotizacion.valor_descuento > 0.0 {
        let linea = match cotizacion.tipo_descuento {
            TipoDescuento::Porcentaje => {
                match pricing::monto_descuento(
                    cotizacion.tipo_descuento,
                    cotizacion.valor_descuento,
                    precio_final,
                ) {
                    Some(monto) => format!(
                        "- {} ({}%)",
                        pricing::formatear_moneda(monto),
                        cotizacion.valor_descuento
                    ),
                    None => format!("{}%", cotizacion.valor_descuento),
                }
            }
            TipoDescuento::Monto => {
                format!("- {}", pricing::formatear_moneda(cotizacion.valor_descuento))
            }
        };
        y = fila(&layer, &bold, &regular, "Descuento:", &linea, y);
    }

    regla(&layer, MARGIN, RIGHT, y + 1.5);
    y -= 2.0;
    layer.set_fill_color(azul_corporativo());
    texto(&layer, &bold, "PRECIO FINAL:", 13.0, MARGIN, y);
    texto(
        &layer,
        &bold,
        &pricing::formatear_moneda(precio_final),
        13.0,
        COL_VALOR,
        y,
    );
    layer.set_fill_color(negro());
    y -= 12.0;

    // --- Payment breakdown ---
    subtitulo(&layer, &bold, "FORMA DE PAGO", y);
    y -= 8.0;
    let cuota_inicial = cotizacion.cuota_inicial.unwrap_or(0.0);
    let saldo = pricing::saldo_a_financiar(precio_final, cuota_inicial, config.costo_separacion);
    y = fila(
        &layer,
        &bold,
        &regular,
        "Precio total:",
        &pricing::formatear_moneda(precio_final),
        y,
    );
    y = fila(
        &layer,
        &bold,
        &regular,
        "Cuota inicial:",
        &pricing::formatear_moneda(cuota_inicial),
        y,
    );
    y = fila(
        &layer,
        &bold,
        &regular,
        "Separación:",
        &pricing::formatear_moneda(config.costo_separacion),
        y,
    );
    y = fila(
        &layer,
        &bold,
        &regular,
        "Saldo a financiar:",
        &pricing::formatear_moneda(saldo),
        y,
    );
    y -= 6.0;

    if let Some(obs) = cotizacion.observaciones.as_deref() {
        if !obs.trim().is_empty() {
            subtitulo(&layer, &bold, "OBSERVACIONES", y);
            y -= 8.0;
            for linea in dividir_lineas(obs, 95) {
                texto(&layer, &regular, &linea, 10.0, MARGIN, y);
                y -= 5.0;
            }
            y -= 4.0;
        }
    }

    // --- Process / legal notes ---
    subtitulo(&layer, &bold, "PROCESO DE COMPRA", y);
    y -= 8.0;
    let notas = [
        format!(
            "Esta cotización tiene una validez de {} días a partir de la fecha de emisión.",
            config.validez_dias
        ),
        "Los precios están sujetos a cambios sin previo aviso.".to_string(),
        format!(
            "La separación del departamento se realiza con el pago de {} y se descuenta del precio final.",
            pricing::formatear_moneda(config.costo_separacion)
        ),
        "El saldo puede financiarse con la entidad bancaria de su preferencia.".to_string(),
    ];
    for nota in &notas {
        for linea in dividir_lineas(nota, 105) {
            texto(&layer, &regular, &linea, 9.0, MARGIN, y);
            y -= 4.5;
        }
    }
    y -= 6.0;

    // --- Contact block ---
    regla(&layer, MARGIN, RIGHT, y + 2.0);
    y -= 4.0;
    layer.set_fill_color(gris());
    texto(&layer, &bold, EMPRESA, 9.0, MARGIN, y);
    y -= 4.5;
    texto(&layer, &regular, CONTACTO_DIRECCION, 9.0, MARGIN, y);
    y -= 4.5;
    texto(&layer, &regular, CONTACTO_TELEFONO, 9.0, MARGIN, y);
    y -= 4.5;
    texto(&layer, &regular, CONTACTO_EMAIL, 9.0, MARGIN, y);
    layer.set_fill_color(negro());

    // --- Optional photo page ---
    if let Some(imagen) = foto {
        agregar_pagina_foto(&doc, imagen);
    }

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| PdfError::RenderFailed(e.to_string()))?;

    debug!(size = bytes.len(), "PDF generado");
    Ok(bytes)
}

/// Appends a page with the unit photo rotated 90°, scaled to fit.
fn agregar_pagina_foto(doc: &printpdf::PdfDocumentReference, imagen: DynamicImage) {
    let rotada = imagen.rotate90();
    let (px_w, px_h) = rotada.dimensions();

    let (page, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Fotografía");
    let layer = doc.get_page(page).get_layer(layer_idx);

    let dpi = 150.0;
    let natural_w_mm = px_w as f32 / dpi * 25.4;
    let natural_h_mm = px_h as f32 / dpi * 25.4;

    let max_w = PAGE_W - 2.0 * MARGIN;
    let max_h = PAGE_H - 2.0 * MARGIN;
    let scale = (max_w / natural_w_mm.max(1.0))
        .min(max_h / natural_h_mm.max(1.0))
        .min(1.0)
        .max(0.01);

    let scaled_w = natural_w_mm * scale;
    let scaled_h = natural_h_mm * scale;
    let x = (PAGE_W - scaled_w) / 2.0;
    let y = (PAGE_H - scaled_h) / 2.0;

    let image = Image::from_dynamic_image(&rotada);
    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            rotate: None,
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(dpi),
        },
    );
}

fn fecha_de_emision(cotizacion: &Cotizacion) -> DateTime<FixedOffset> {
    cotizacion
        .fecha_creacion
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .unwrap_or_else(|| Local::now().fixed_offset())
}

fn texto(layer: &PdfLayerReference, font: &IndirectFontRef, s: &str, size: f32, x: f32, y: f32) {
    layer.use_text(s, size, Mm(x), Mm(y), font);
}

/// printpdf has no text metrics for builtin fonts; center with the usual
/// Helvetica width heuristic (~0.5 em per character).
fn texto_centrado(layer: &PdfLayerReference, font: &IndirectFontRef, s: &str, size: f32, y: f32) {
    let ancho_mm = s.chars().count() as f32 * size * 0.5 * 0.3528;
    let x = ((PAGE_W - ancho_mm) / 2.0).max(MARGIN);
    texto(layer, font, s, size, x, y);
}

fn subtitulo(layer: &PdfLayerReference, bold: &IndirectFontRef, s: &str, y: f32) {
    layer.set_fill_color(azul_corporativo());
    texto(layer, bold, s, 12.0, MARGIN, y);
    layer.set_fill_color(negro());
}

fn fila(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    etiqueta: &str,
    valor: &str,
    y: f32,
) -> f32 {
    texto(layer, bold, etiqueta, 10.0, MARGIN, y);
    texto(layer, regular, valor, 10.0, COL_VALOR, y);
    y - LINE_H
}

fn regla(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    layer.set_outline_color(gris());
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn dividir_lineas(texto: &str, max_chars: usize) -> Vec<String> {
    let mut lineas = Vec::new();
    let mut actual = String::new();

    for palabra in texto.split_whitespace() {
        if actual.is_empty() {
            actual.push_str(palabra);
        } else if actual.chars().count() + 1 + palabra.chars().count() <= max_chars {
            actual.push(' ');
            actual.push_str(palabra);
        } else {
            lineas.push(std::mem::take(&mut actual));
            actual.push_str(palabra);
        }
    }
    if !actual.is_empty() {
        lineas.push(actual);
    }
    lineas
}

fn azul_corporativo() -> Color {
    Color::Rgb(Rgb::new(0.102, 0.329, 0.565, None))
}

fn gris() -> Color {
    Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None))
}

fn negro() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_nombre_archivo() {
        let fecha = Local.with_ymd_and_hms(2025, 3, 9, 10, 30, 0).unwrap();
        assert_eq!(nombre_archivo("cotizacion_07", fecha), "cotizacion_07_20250309.pdf");
    }

    #[test]
    fn test_dividir_lineas_respeta_limite() {
        let lineas = dividir_lineas("uno dos tres cuatro cinco", 9);
        assert_eq!(lineas, vec!["uno dos", "tres", "cuatro", "cinco"]);
    }

    #[test]
    fn test_dividir_lineas_texto_vacio() {
        assert!(dividir_lineas("", 20).is_empty());
    }
}
