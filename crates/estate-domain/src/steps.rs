//! Definición de pasos del formulario.
//!
//! La secuencia es inmutable por tipo de anuncio: 5 pasos para propiedad,
//! 10 para proyecto. El validador despacha sobre `StepKind`, no sobre el
//! ordinal, de modo que reordenar pasos no rompe reglas.
use serde::{Deserialize, Serialize};

use crate::listing::ListingKind;

/// Naturaleza de un paso. Decide qué subconjunto de reglas aplica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Details,
    Location,
    Units,
    Pricing,
    Timeline,
    Builder,
    Amenities,
    Description,
    Brochure,
    Media,
}

/// Un paso del formulario: ordinal estable + etiqueta + naturaleza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub ordinal: usize,
    pub label: &'static str,
    pub kind: StepKind,
}

/// Secuencia de pasos para un tipo de anuncio. Orden = orden de captura.
pub fn steps_for(kind: ListingKind) -> Vec<StepDefinition> {
    match kind {
        ListingKind::Property => vec![
            StepDefinition { ordinal: 0, label: "Basic details", kind: StepKind::Details },
            StepDefinition { ordinal: 1, label: "Location", kind: StepKind::Location },
            StepDefinition { ordinal: 2, label: "Photos", kind: StepKind::Media },
            StepDefinition { ordinal: 3, label: "Pricing & area", kind: StepKind::Pricing },
            StepDefinition { ordinal: 4, label: "Amenities & description", kind: StepKind::Amenities },
        ],
        ListingKind::Project => vec![
            StepDefinition { ordinal: 0, label: "Project details", kind: StepKind::Details },
            StepDefinition { ordinal: 1, label: "Location", kind: StepKind::Location },
            StepDefinition { ordinal: 2, label: "Unit mix", kind: StepKind::Units },
            StepDefinition { ordinal: 3, label: "Pricing", kind: StepKind::Pricing },
            StepDefinition { ordinal: 4, label: "Timeline & RERA", kind: StepKind::Timeline },
            StepDefinition { ordinal: 5, label: "Builder info", kind: StepKind::Builder },
            StepDefinition { ordinal: 6, label: "Photos", kind: StepKind::Media },
            StepDefinition { ordinal: 7, label: "Amenities", kind: StepKind::Amenities },
            StepDefinition { ordinal: 8, label: "Description", kind: StepKind::Description },
            StepDefinition { ordinal: 9, label: "Brochure & video", kind: StepKind::Brochure },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counts_per_listing_kind() {
        assert_eq!(steps_for(ListingKind::Property).len(), 5);
        assert_eq!(steps_for(ListingKind::Project).len(), 10);
    }

    #[test]
    fn ordinals_are_dense_and_sorted() {
        for kind in [ListingKind::Property, ListingKind::Project] {
            for (i, s) in steps_for(kind).iter().enumerate() {
                assert_eq!(s.ordinal, i);
            }
        }
    }
}
