use bson::oid::ObjectId;
use cotizador_backend::model::cotizacion::{
    Cotizacion, DepartamentoSnapshot, TipoDescuento, SNAPSHOT_VERSION,
};
use cotizador_backend::service::pricing;

fn snapshot_de_prueba() -> DepartamentoSnapshot {
    DepartamentoSnapshot {
        version: SNAPSHOT_VERSION,
        nombre: "Departamento Vista Parque".to_string(),
        codigo_corto: "101".to_string(),
        area_m2: "75.50 m²".to_string(),
        area_libre: "12.00 m²".to_string(),
        precio_lista: "S/. 550,000.00".to_string(),
    }
}

fn cotizacion_finalizada() -> Cotizacion {
    Cotizacion {
        id: Some(ObjectId::new()),
        numero_cotizacion: Some("cotizacion_01".to_string()),
        nombre_cliente: "María Torres Quispe".to_string(),
        dni_cliente: "12345678".to_string(),
        direccion_cliente: "Av. Arequipa 1050".to_string(),
        distrito_cliente: "Lince".to_string(),
        telefono_cliente: "987654321".to_string(),
        email_cliente: Some("maria.torres@example.com".to_string()),
        departamento_id: ObjectId::new(),
        observaciones: None,
        tipo_descuento: TipoDescuento::Monto,
        valor_descuento: 20_000.0,
        cuota_inicial: Some(50_000.0),
        precio_final: Some(530_000.0),
        departamento_snapshot: Some(snapshot_de_prueba()),
        fecha_creacion: Some("2025-03-09T10:30:00-05:00".to_string()),
        creado_por: Some(ObjectId::new()),
        activo: true,
    }
}

#[test]
fn descuento_porcentual_sobre_base_ajustada() {
    // 500,000 base + 50,000 markup = 550,000; 10% off → 495,000
    let precio = pricing::calcular_precio_final(500_000.0, TipoDescuento::Porcentaje, 10.0, 50_000.0);
    assert_eq!(precio, 495_000.0);
}

#[test]
fn descuento_por_monto_fijo() {
    // 550,000 adjusted base, 20,000 off → 530,000
    let precio = pricing::calcular_precio_final(500_000.0, TipoDescuento::Monto, 20_000.0, 50_000.0);
    assert_eq!(precio, 530_000.0);
}

#[test]
fn saldo_con_inicial_y_separacion() {
    // 530,000 − 50,000 inicial − 1,500 separación = 478,500
    assert_eq!(pricing::saldo_a_financiar(530_000.0, 50_000.0, 1_500.0), 478_500.0);
}

#[test]
fn dni_de_siete_digitos_es_rechazado() {
    assert!(!pricing::validar_dni("1234567"));
    assert!(pricing::validar_dni("12345678"));
}

#[test]
fn numeracion_secuencial_sin_huecos_ni_repetidos() {
    // The formatted sequence for 1..N parses back to exactly {1, ..., N}.
    let numeros: Vec<String> = (1..=25).map(pricing::formatear_numero).collect();
    let parseados: Vec<u64> = numeros
        .iter()
        .map(|n| pricing::parsear_numero(n).expect("numero válido"))
        .collect();
    assert_eq!(parseados, (1..=25).collect::<Vec<u64>>());

    // No two distinct indices format to the same number.
    let mut unicos = parseados.clone();
    unicos.dedup();
    assert_eq!(unicos.len(), parseados.len());
}

#[test]
fn numero_crece_de_dos_a_tres_digitos_sin_truncar() {
    assert_eq!(pricing::formatear_numero(99), "cotizacion_99");
    assert_eq!(pricing::formatear_numero(100), "cotizacion_100");
    assert_eq!(pricing::parsear_numero("cotizacion_100"), Some(100));
}

#[test]
fn cotizacion_finalizada_no_se_vuelve_a_finalizar() {
    // The one-time guard: number + snapshot + price present means finalize
    // is a no-op on re-save.
    let cotizacion = cotizacion_finalizada();
    assert!(cotizacion.esta_finalizada());

    let mut parcial = cotizacion.clone();
    parcial.departamento_snapshot = None;
    assert!(!parcial.esta_finalizada());

    let mut sin_numero = cotizacion;
    sin_numero.numero_cotizacion = None;
    assert!(!sin_numero.esta_finalizada());
}

#[test]
fn snapshot_es_inmutable_frente_a_ediciones() {
    let cotizacion = cotizacion_finalizada();
    let snap = cotizacion.departamento_snapshot.clone().unwrap();

    // Another quote finalized later against an edited unit would capture a
    // different snapshot, but this one keeps its original display values.
    assert_eq!(snap.precio_lista, "S/. 550,000.00");
    assert_eq!(snap.codigo_corto, "101");
    assert_eq!(snap.version, SNAPSHOT_VERSION);
}
