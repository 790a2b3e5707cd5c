//! Tabla estática (categoría, subcategoría) -> amenities permitidas.
//!
//! Al cambiar el tipo de propiedad, la selección previa se filtra contra
//! el nuevo conjunto permitido: nunca debe sobrevivir una amenity fuera
//! del set del tipo actual (p.ej. "gym" sobre un Plot / Land).
use crate::listing::{Category, SubCategory};

const RESIDENTIAL_FULL: &[&str] = &["gym",
                                    "swimming_pool",
                                    "lift",
                                    "parking",
                                    "security",
                                    "garden",
                                    "power_backup",
                                    "water_supply",
                                    "clubhouse",
                                    "play_area"];

const HOUSE: &[&str] = &["parking",
                         "security",
                         "garden",
                         "power_backup",
                         "water_supply",
                         "borewell"];

const LAND: &[&str] = &["water_supply", "fencing", "road_access", "borewell"];

const COMMERCIAL_UNIT: &[&str] = &["lift",
                                   "parking",
                                   "security",
                                   "power_backup",
                                   "water_supply",
                                   "cafeteria"];

const WAREHOUSE: &[&str] = &["parking", "security", "power_backup", "road_access", "loading_bay"];

/// Conjunto de amenity-ids permitido para una combinación de tipo.
pub fn allowed_amenities(category: Category, sub: SubCategory) -> &'static [&'static str] {
    match sub {
        SubCategory::PlotLand => return LAND,
        SubCategory::Farmhouse => return HOUSE,
        _ => {}
    }
    match (category, sub) {
        (Category::Residential, SubCategory::Apartment)
        | (Category::Residential, SubCategory::Studio) => RESIDENTIAL_FULL,
        (Category::Residential, SubCategory::Villa) => HOUSE,
        (Category::Commercial, SubCategory::Office)
        | (Category::Commercial, SubCategory::Shop) => COMMERCIAL_UNIT,
        (Category::Commercial, SubCategory::Warehouse) => WAREHOUSE,
        _ => RESIDENTIAL_FULL,
    }
}

/// Filtra una selección previa contra el set permitido del tipo nuevo.
/// Preserva el orden de la selección original.
pub fn filter_amenities(selected: &[String], category: Category, sub: SubCategory) -> Vec<String> {
    let allowed = allowed_amenities(category, sub);
    selected.iter()
            .filter(|a| allowed.contains(&a.as_str()))
            .cloned()
            .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gym_is_dropped_when_switching_to_plot_land() {
        let selected = vec!["gym".to_string(), "water_supply".to_string()];
        let kept = filter_amenities(&selected, Category::Residential, SubCategory::PlotLand);
        assert_eq!(kept, vec!["water_supply".to_string()]);
    }

    #[test]
    fn filtered_selection_is_subset_of_allowed_for_every_type() {
        let selected: Vec<String> =
            RESIDENTIAL_FULL.iter().chain(LAND).chain(WAREHOUSE).map(|s| s.to_string()).collect();
        for cat in [Category::Residential, Category::Commercial] {
            for sub in [SubCategory::Apartment,
                        SubCategory::Villa,
                        SubCategory::PlotLand,
                        SubCategory::Studio,
                        SubCategory::Farmhouse,
                        SubCategory::Office,
                        SubCategory::Shop,
                        SubCategory::Warehouse]
            {
                let allowed = allowed_amenities(cat, sub);
                for a in filter_amenities(&selected, cat, sub) {
                    assert!(allowed.contains(&a.as_str()), "{a} escaped the {sub:?} set");
                }
            }
        }
    }
}
