use cotizador_backend::dto::cotizacion_dto::CreateCotizacionRequest;
use cotizador_backend::dto::departamento_dto::CreateDepartamentoRequest;
use cotizador_backend::dto::user_dto::LoginRequest;
use serde_json::json;
use validator::Validate;

fn cotizacion_valida() -> serde_json::Value {
    json!({
        "nombre_cliente": "María Torres Quispe",
        "dni_cliente": "12345678",
        "direccion_cliente": "Av. Arequipa 1050",
        "distrito_cliente": "Lince",
        "telefono_cliente": "987654321",
        "email_cliente": "maria.torres@example.com",
        "departamento_id": "65f2ab1234567890abcdef12",
        "tipo_descuento": "porcentaje",
        "valor_descuento": 10.0,
        "cuota_inicial": 50000.0
    })
}

#[test]
fn cotizacion_request_valida_pasa() {
    let dto: CreateCotizacionRequest = serde_json::from_value(cotizacion_valida()).unwrap();
    assert!(dto.validate().is_ok());
}

#[test]
fn dni_de_siete_digitos_falla_validacion() {
    let mut payload = cotizacion_valida();
    payload["dni_cliente"] = json!("1234567");
    let dto: CreateCotizacionRequest = serde_json::from_value(payload).unwrap();
    assert!(dto.validate().is_err());
}

#[test]
fn email_invalido_falla_validacion() {
    let mut payload = cotizacion_valida();
    payload["email_cliente"] = json!("no-es-un-email");
    let dto: CreateCotizacionRequest = serde_json::from_value(payload).unwrap();
    assert!(dto.validate().is_err());
}

#[test]
fn departamento_id_corto_falla_validacion() {
    let mut payload = cotizacion_valida();
    payload["departamento_id"] = json!("abc123");
    let dto: CreateCotizacionRequest = serde_json::from_value(payload).unwrap();
    assert!(dto.validate().is_err());
}

#[test]
fn descuento_negativo_falla_validacion() {
    let mut payload = cotizacion_valida();
    payload["valor_descuento"] = json!(-5.0);
    let dto: CreateCotizacionRequest = serde_json::from_value(payload).unwrap();
    assert!(dto.validate().is_err());
}

#[test]
fn descuento_por_defecto_es_porcentaje_cero() {
    let mut payload = cotizacion_valida();
    payload.as_object_mut().unwrap().remove("tipo_descuento");
    payload.as_object_mut().unwrap().remove("valor_descuento");
    let dto: CreateCotizacionRequest = serde_json::from_value(payload).unwrap();
    assert_eq!(dto.valor_descuento, 0.0);
    assert!(dto.validate().is_ok());
}

#[test]
fn departamento_request_precio_cero_falla() {
    let payload = json!({
        "codigo": "DPTO_101",
        "nombre": "Departamento Vista Parque",
        "descripcion": "Piso alto",
        "precio": 0.0,
        "area_m2": 75.5,
        "area_libre": 12.0,
        "habitaciones": 3,
        "banos": 2,
        "pisos": "7"
    });
    let dto: CreateDepartamentoRequest = serde_json::from_value(payload).unwrap();
    assert!(dto.validate().is_err());
}

#[test]
fn departamento_request_disponible_por_defecto() {
    let payload = json!({
        "codigo": "DPTO_101",
        "nombre": "Departamento Vista Parque",
        "precio": 500000.0,
        "area_m2": 75.5,
        "habitaciones": 3,
        "banos": 2
    });
    let dto: CreateDepartamentoRequest = serde_json::from_value(payload).unwrap();
    assert!(dto.disponible);
    assert!(dto.validate().is_ok());
}

#[test]
fn login_request_password_corta_falla() {
    let dto = LoginRequest {
        username: "vendedor1".to_string(),
        password: "corta".to_string(),
    };
    assert!(dto.validate().is_err());
}
