use bson::oid::ObjectId;
use chrono::{Local, TimeZone};
use cotizador_backend::config::CotizacionConfig;
use cotizador_backend::model::cotizacion::{
    Cotizacion, DepartamentoSnapshot, TipoDescuento, SNAPSHOT_VERSION,
};
use cotizador_backend::util::pdf::{generar_pdf_cotizacion, nombre_archivo, PdfError};
use printpdf::image_crate::{DynamicImage, Rgb, RgbImage};

fn cotizacion_de_prueba() -> Cotizacion {
    Cotizacion {
        id: Some(ObjectId::new()),
        numero_cotizacion: Some("cotizacion_07".to_string()),
        nombre_cliente: "Carlos Huamán Ríos".to_string(),
        dni_cliente: "45678912".to_string(),
        direccion_cliente: "Jr. Los Cipreses 240".to_string(),
        distrito_cliente: "Surco".to_string(),
        telefono_cliente: "998877665".to_string(),
        email_cliente: Some("carlos.huaman@example.com".to_string()),
        departamento_id: ObjectId::new(),
        observaciones: Some("Cliente interesado en financiamiento directo".to_string()),
        tipo_descuento: TipoDescuento::Porcentaje,
        valor_descuento: 10.0,
        cuota_inicial: Some(50_000.0),
        precio_final: Some(495_000.0),
        departamento_snapshot: Some(DepartamentoSnapshot {
            version: SNAPSHOT_VERSION,
            nombre: "Departamento Vista Parque".to_string(),
            codigo_corto: "101".to_string(),
            area_m2: "75.50 m²".to_string(),
            area_libre: "12.00 m²".to_string(),
            precio_lista: "S/. 550,000.00".to_string(),
        }),
        fecha_creacion: Some("2025-03-09T10:30:00-05:00".to_string()),
        creado_por: None,
        activo: true,
    }
}

fn foto_sintetica() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(320, 240, Rgb([180, 160, 140])))
}

#[test]
fn genera_pdf_valido_sin_foto() {
    let config = CotizacionConfig::default();
    let bytes = generar_pdf_cotizacion(&cotizacion_de_prueba(), Some("Vendedor Uno"), &config, None)
        .expect("PDF sin foto debe generarse");

    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn genera_pdf_con_pagina_de_foto() {
    let config = CotizacionConfig::default();
    let sin_foto =
        generar_pdf_cotizacion(&cotizacion_de_prueba(), None, &config, None).expect("sin foto");
    let con_foto =
        generar_pdf_cotizacion(&cotizacion_de_prueba(), None, &config, Some(foto_sintetica()))
            .expect("con foto");

    assert!(con_foto.starts_with(b"%PDF"));
    // The photo page carries the embedded image, so the document grows.
    assert!(con_foto.len() > sin_foto.len());
}

#[test]
fn precio_faltante_es_error_fatal() {
    let config = CotizacionConfig::default();
    let mut cotizacion = cotizacion_de_prueba();
    cotizacion.precio_final = None;

    let resultado = generar_pdf_cotizacion(&cotizacion, None, &config, None);
    assert!(matches!(resultado, Err(PdfError::PrecioFaltante)));
}

#[test]
fn campos_opcionales_ausentes_no_impiden_generar() {
    let config = CotizacionConfig::default();
    let mut cotizacion = cotizacion_de_prueba();
    cotizacion.email_cliente = None;
    cotizacion.observaciones = None;
    cotizacion.cuota_inicial = None;
    cotizacion.departamento_snapshot = None;
    cotizacion.fecha_creacion = None;

    let bytes = generar_pdf_cotizacion(&cotizacion, None, &config, None)
        .expect("los campos opcionales se renderizan en blanco");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn descuento_por_monto_se_renderiza() {
    let config = CotizacionConfig::default();
    let mut cotizacion = cotizacion_de_prueba();
    cotizacion.tipo_descuento = TipoDescuento::Monto;
    cotizacion.valor_descuento = 20_000.0;
    cotizacion.precio_final = Some(530_000.0);

    let bytes = generar_pdf_cotizacion(&cotizacion, None, &config, None).expect("PDF con monto");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn nombre_de_archivo_sigue_el_patron() {
    let fecha = Local.with_ymd_and_hms(2025, 3, 9, 16, 45, 0).unwrap();
    assert_eq!(
        nombre_archivo("cotizacion_07", fecha),
        "cotizacion_07_20250309.pdf"
    );
}
