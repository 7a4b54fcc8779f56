//! Pricing engine for quotes.
//!
//! Pure, deterministic computations only: adjusted base price, discount
//! application, quote numbering, payment breakdown, and capture of the
//! display snapshot. Persistence lives in the repositories; the quote
//! service calls into this module before writing anything, so every rule
//! here is testable without a database.

use crate::model::cotizacion::{DepartamentoSnapshot, TipoDescuento, SNAPSHOT_VERSION};
use crate::model::departamento::Departamento;

/// Prefix of the business quote number, e.g. `cotizacion_07`.
pub const PREFIJO_NUMERO: &str = "cotizacion_";

/// Base price plus the fixed commercial markup. Every discount applies on
/// top of this value, never on the raw unit price.
pub fn precio_base_ajustado(precio: f64, recargo_fijo: f64) -> f64 {
    precio + recargo_fijo
}

/// Final quote price. Percentage discounts multiply the adjusted base by
/// `(1 - valor/100)`; fixed-amount discounts subtract directly. No clamping:
/// if a discount drives the price negative, presentation decides what to do.
pub fn calcular_precio_final(
    precio: f64,
    tipo_descuento: TipoDescuento,
    valor_descuento: f64,
    recargo_fijo: f64,
) -> f64 {
    let ajustado = precio_base_ajustado(precio, recargo_fijo);
    match tipo_descuento {
        TipoDescuento::Porcentaje => ajustado * (1.0 - valor_descuento / 100.0),
        TipoDescuento::Monto => ajustado - valor_descuento,
    }
}

/// Discount amount in PEN, derived without re-reading the unit: for a
/// percentage discount the adjusted base is `final / (1 - v/100)`, so the
/// amount is `final * v / (100 - v)`. Returns `None` for a 100% discount,
/// where the amount cannot be recovered from the final price.
pub fn monto_descuento(
    tipo_descuento: TipoDescuento,
    valor_descuento: f64,
    precio_final: f64,
) -> Option<f64> {
    match tipo_descuento {
        TipoDescuento::Monto => Some(valor_descuento),
        TipoDescuento::Porcentaje => {
            if valor_descuento >= 100.0 {
                None
            } else {
                Some(precio_final * valor_descuento / (100.0 - valor_descuento))
            }
        }
    }
}

/// Balance left to finance after the down payment and the reservation fee.
pub fn saldo_a_financiar(precio_final: f64, cuota_inicial: f64, costo_separacion: f64) -> f64 {
    precio_final - cuota_inicial - costo_separacion
}

/// Formats a sequential number as `cotizacion_NN`, zero-padded to two
/// digits; larger numbers simply widen.
pub fn formatear_numero(numero: u64) -> String {
    format!("{}{:02}", PREFIJO_NUMERO, numero)
}

/// Parses the numeric suffix out of `cotizacion_NN`.
pub fn parsear_numero(numero_cotizacion: &str) -> Option<u64> {
    numero_cotizacion
        .strip_prefix(PREFIJO_NUMERO)
        .and_then(|s| s.parse().ok())
}

/// The document shows the bare zero-padded number, not the internal key.
pub fn numero_para_documento(numero_cotizacion: &str) -> &str {
    numero_cotizacion
        .strip_prefix(PREFIJO_NUMERO)
        .unwrap_or(numero_cotizacion)
}

/// Short inventory code for display: the part after the first `_` or `-`
/// separator (`DPTO_101` → `101`); codes without a separator stay whole.
pub fn codigo_corto(codigo: &str) -> &str {
    match codigo.split_once(['_', '-']) {
        Some((_, resto)) if !resto.is_empty() => resto,
        _ => codigo,
    }
}

/// Currency display: `S/. 1,234.56`.
pub fn formatear_moneda(valor: f64) -> String {
    let negativo = valor < 0.0;
    let centavos = (valor.abs() * 100.0).round() as u64;
    let enteros = centavos / 100;
    let decimales = centavos % 100;

    let digitos = enteros.to_string();
    let con_comas = digitos
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect::<Vec<_>>()
        .join(",");

    let signo = if negativo { "-" } else { "" };
    format!("{}S/. {}.{:02}", signo, con_comas, decimales)
}

/// Area display: `75.50 m²`.
pub fn formatear_area(valor: f64) -> String {
    format!("{:.2} m²", valor)
}

/// Exactly eight ASCII digits.
pub fn validar_dni(dni: &str) -> bool {
    dni.len() == 8 && dni.chars().all(|c| c.is_ascii_digit())
}

/// Freezes the unit's display attributes onto the quote. Captured once at
/// finalization; later unit edits never touch it. The list price shown is
/// the adjusted base (base + markup) — what the client is quoted against.
pub fn capturar_snapshot(departamento: &Departamento, recargo_fijo: f64) -> DepartamentoSnapshot {
    DepartamentoSnapshot {
        version: SNAPSHOT_VERSION,
        nombre: departamento.nombre.clone(),
        codigo_corto: codigo_corto(&departamento.codigo).to_string(),
        area_m2: formatear_area(departamento.area_m2),
        area_libre: formatear_area(departamento.area_libre),
        precio_lista: formatear_moneda(precio_base_ajustado(departamento.precio, recargo_fijo)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECARGO: f64 = 50_000.0;

    fn departamento() -> Departamento {
        Departamento {
            id: None,
            codigo: "DPTO_101".to_string(),
            nombre: "Departamento Vista Parque".to_string(),
            descripcion: "Vista al parque, piso alto".to_string(),
            precio: 500_000.0,
            area_m2: 75.5,
            area_libre: 12.0,
            habitaciones: 3,
            banos: 2,
            pisos: Some("7".to_string()),
            disponible: true,
            estado: Default::default(),
            imagen: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_precio_base_ajustado() {
        assert_eq!(precio_base_ajustado(500_000.0, RECARGO), 550_000.0);
    }

    #[test]
    fn test_descuento_porcentaje() {
        let final_ = calcular_precio_final(500_000.0, TipoDescuento::Porcentaje, 10.0, RECARGO);
        assert_eq!(final_, 495_000.0);
    }

    #[test]
    fn test_descuento_monto() {
        let final_ = calcular_precio_final(500_000.0, TipoDescuento::Monto, 20_000.0, RECARGO);
        assert_eq!(final_, 530_000.0);
    }

    #[test]
    fn test_sin_descuento() {
        let final_ = calcular_precio_final(500_000.0, TipoDescuento::Porcentaje, 0.0, RECARGO);
        assert_eq!(final_, 550_000.0);
    }

    #[test]
    fn test_precio_final_puede_ser_negativo() {
        // The engine does not clamp; presentation decides.
        let final_ = calcular_precio_final(1_000.0, TipoDescuento::Monto, 100_000.0, RECARGO);
        assert!(final_ < 0.0);
    }

    #[test]
    fn test_monto_descuento_porcentaje() {
        // Adjusted base 550,000 at 10% → discount of 55,000, final 495,000.
        let monto = monto_descuento(TipoDescuento::Porcentaje, 10.0, 495_000.0).unwrap();
        assert!((monto - 55_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_monto_descuento_total_no_recuperable() {
        assert_eq!(monto_descuento(TipoDescuento::Porcentaje, 100.0, 0.0), None);
    }

    #[test]
    fn test_saldo_a_financiar() {
        assert_eq!(saldo_a_financiar(530_000.0, 50_000.0, 1_500.0), 478_500.0);
    }

    #[test]
    fn test_formatear_numero() {
        assert_eq!(formatear_numero(1), "cotizacion_01");
        assert_eq!(formatear_numero(42), "cotizacion_42");
        assert_eq!(formatear_numero(100), "cotizacion_100");
    }

    #[test]
    fn test_parsear_numero() {
        assert_eq!(parsear_numero("cotizacion_07"), Some(7));
        assert_eq!(parsear_numero("cotizacion_123"), Some(123));
        assert_eq!(parsear_numero("otra_cosa_01"), None);
    }

    #[test]
    fn test_numeros_consecutivos_sin_huecos() {
        // Formatting and parsing round-trip over a whole sequence.
        for n in 1..=150u64 {
            assert_eq!(parsear_numero(&formatear_numero(n)), Some(n));
        }
    }

    #[test]
    fn test_numero_para_documento() {
        assert_eq!(numero_para_documento("cotizacion_07"), "07");
        assert_eq!(numero_para_documento("07"), "07");
    }

    #[test]
    fn test_codigo_corto() {
        assert_eq!(codigo_corto("DPTO_101"), "101");
        assert_eq!(codigo_corto("TORRE-A-502"), "A-502");
        assert_eq!(codigo_corto("101"), "101");
        assert_eq!(codigo_corto("DPTO_"), "DPTO_");
    }

    #[test]
    fn test_formatear_moneda() {
        assert_eq!(formatear_moneda(550_000.0), "S/. 550,000.00");
        assert_eq!(formatear_moneda(1_234.5), "S/. 1,234.50");
        assert_eq!(formatear_moneda(0.0), "S/. 0.00");
        assert_eq!(formatear_moneda(-1_500.0), "-S/. 1,500.00");
    }

    #[test]
    fn test_validar_dni() {
        assert!(validar_dni("12345678"));
        assert!(!validar_dni("1234567"));
        assert!(!validar_dni("123456789"));
        assert!(!validar_dni("1234567a"));
    }

    #[test]
    fn test_capturar_snapshot() {
        let snap = capturar_snapshot(&departamento(), RECARGO);
        assert_eq!(snap.version, SNAPSHOT_VERSION);
        assert_eq!(snap.nombre, "Departamento Vista Parque");
        assert_eq!(snap.codigo_corto, "101");
        assert_eq!(snap.area_m2, "75.50 m²");
        assert_eq!(snap.area_libre, "12.00 m²");
        assert_eq!(snap.precio_lista, "S/. 550,000.00");
    }

    #[test]
    fn test_snapshot_no_cambia_con_ediciones_posteriores() {
        let mut depto = departamento();
        let snap = capturar_snapshot(&depto, RECARGO);
        depto.precio = 999_999.0;
        depto.nombre = "Otro nombre".to_string();
        // The captured value object is unaffected by later unit edits.
        assert_eq!(snap.precio_lista, "S/. 550,000.00");
        assert_eq!(snap.nombre, "Departamento Vista Parque");
    }
}
