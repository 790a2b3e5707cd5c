//! Tabla estática (categoría, subcategoría) -> visibilidad de campos.
//!
//! Se mantiene como datos, no como código: el validador la recibe como
//! lookup puro y puede sustituirse por despliegue/locale. Las entradas
//! farmhouse y studio son casos especiales que no salen de la
//! generalización categoría/subcategoría.
use serde::{Deserialize, Serialize};

use crate::listing::{Category, SubCategory};

/// Flags de visibilidad/requeridos por campo. `true` = el campo se muestra
/// y es requerido para esa combinación de tipo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVisibility {
    pub bedrooms: bool,
    pub bathrooms: bool,
    pub balconies: bool,
    pub floor: bool,
    pub total_floors: bool,
    pub facing: bool,
    pub furnishing: bool,
    pub age: bool,
    pub carpet_area: bool,
    /// Studio: bedrooms se fuerza a un valor fijo en lugar de capturarse.
    pub forced_bedrooms: Option<u32>,
}

const ALL_ON: FieldVisibility = FieldVisibility { bedrooms: true,
                                                 bathrooms: true,
                                                 balconies: true,
                                                 floor: true,
                                                 total_floors: true,
                                                 facing: true,
                                                 furnishing: true,
                                                 age: true,
                                                 carpet_area: true,
                                                 forced_bedrooms: None };

const LAND_LIKE: FieldVisibility = FieldVisibility { bedrooms: false,
                                                     bathrooms: false,
                                                     balconies: false,
                                                     floor: false,
                                                     total_floors: false,
                                                     facing: true,
                                                     furnishing: false,
                                                     age: false,
                                                     carpet_area: false,
                                                     forced_bedrooms: None };

const COMMERCIAL_UNIT: FieldVisibility = FieldVisibility { bedrooms: false,
                                                           bathrooms: true,
                                                           balconies: false,
                                                           floor: true,
                                                           total_floors: true,
                                                           facing: true,
                                                           furnishing: true,
                                                           age: true,
                                                           carpet_area: true,
                                                           forced_bedrooms: None };

/// Visibilidad de campos para una combinación de tipo.
pub fn field_visibility(category: Category, sub: SubCategory) -> FieldVisibility {
    // Casos especiales primero: no dependen de la categoría.
    match sub {
        SubCategory::Studio => {
            return FieldVisibility { bedrooms: false,
                                     forced_bedrooms: Some(1),
                                     balconies: true,
                                     floor: true,
                                     total_floors: true,
                                     ..ALL_ON };
        }
        SubCategory::Farmhouse => {
            return FieldVisibility { floor: false,
                                     total_floors: false,
                                     balconies: false,
                                     ..ALL_ON };
        }
        SubCategory::PlotLand => return LAND_LIKE,
        _ => {}
    }
    match (category, sub) {
        (Category::Residential, SubCategory::Apartment) => ALL_ON,
        (Category::Residential, SubCategory::Villa) => {
            FieldVisibility { floor: false, ..ALL_ON }
        }
        (Category::Commercial, SubCategory::Office)
        | (Category::Commercial, SubCategory::Shop) => COMMERCIAL_UNIT,
        (Category::Commercial, SubCategory::Warehouse) => {
            FieldVisibility { bathrooms: false, furnishing: false, ..COMMERCIAL_UNIT }
        }
        // Combinaciones no catalogadas: pedir todo lo genérico.
        _ => ALL_ON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_land_hides_room_fields() {
        let v = field_visibility(Category::Residential, SubCategory::PlotLand);
        assert!(!v.bedrooms && !v.bathrooms && !v.floor && !v.carpet_area);
        assert!(v.facing);
    }

    #[test]
    fn studio_forces_single_bedroom() {
        let v = field_visibility(Category::Residential, SubCategory::Studio);
        assert!(!v.bedrooms);
        assert_eq!(v.forced_bedrooms, Some(1));
    }

    #[test]
    fn farmhouse_has_no_floor_fields() {
        let v = field_visibility(Category::Residential, SubCategory::Farmhouse);
        assert!(!v.floor && !v.total_floors);
        assert!(v.bedrooms);
    }
}
