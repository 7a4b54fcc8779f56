//! Role-based authorization policy.
//!
//! Every capability check lives here so the routers/middlewares consult one
//! place instead of sprinkling string comparisons against session claims.

/// System roles. Administrators manage the unit master data; vendedores
/// (sales agents) issue quotes with a personalized discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rol {
    Admin,
    Vendedor,
}

impl Rol {
    pub fn from_str(role: &str) -> Option<Rol> {
        match role {
            "admin" => Some(Rol::Admin),
            "vendedor" => Some(Rol::Vendedor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Vendedor => "vendedor",
        }
    }
}

/// Only administrators may create, edit, or delete units (and their photos).
pub fn puede_gestionar_departamentos(rol: Rol) -> bool {
    matches!(rol, Rol::Admin)
}

/// Any authenticated role may issue and manage quotes; the discount is the
/// seller's personalization knob.
pub fn puede_gestionar_cotizaciones(rol: Rol) -> bool {
    matches!(rol, Rol::Admin | Rol::Vendedor)
}

/// Unit deletion cascades to its quotes; same capability as unit management.
pub fn puede_eliminar_departamentos(rol: Rol) -> bool {
    puede_gestionar_departamentos(rol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rol_round_trip() {
        assert_eq!(Rol::from_str("admin"), Some(Rol::Admin));
        assert_eq!(Rol::from_str("vendedor"), Some(Rol::Vendedor));
        assert_eq!(Rol::from_str("otro"), None);
        assert_eq!(Rol::Admin.as_str(), "admin");
        assert_eq!(Rol::Vendedor.as_str(), "vendedor");
    }

    #[test]
    fn test_solo_admin_gestiona_departamentos() {
        assert!(puede_gestionar_departamentos(Rol::Admin));
        assert!(!puede_gestionar_departamentos(Rol::Vendedor));
        assert!(puede_eliminar_departamentos(Rol::Admin));
        assert!(!puede_eliminar_departamentos(Rol::Vendedor));
    }

    #[test]
    fn test_ambos_roles_gestionan_cotizaciones() {
        assert!(puede_gestionar_cotizaciones(Rol::Admin));
        assert!(puede_gestionar_cotizaciones(Rol::Vendedor));
    }
}
