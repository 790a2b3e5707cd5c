//! Validador de pasos: función pura de (paso, formulario, media) -> errores.
//!
//! Contrato:
//! - Nunca muta el formulario ni la colección de media.
//! - Mapa vacío = paso válido. Las claves son nombres de campo, los valores
//!   mensajes listos para mostrar.
//! - La requeridez condicional viene de la tabla de visibilidad; las reglas
//!   de contenido de la descripción rechazan teléfonos/emails embebidos.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::amenities::allowed_amenities;
use crate::listing::FormState;
use crate::media::{MediaItem, MediaStatus};
use crate::steps::{StepDefinition, StepKind};
use crate::visibility::{field_visibility, FieldVisibility};

/// Mapa campo -> mensaje de error, en orden de inserción.
pub type ErrorMap = IndexMap<String, String>;

const DESCRIPTION_MIN: usize = 30;
const DESCRIPTION_MAX: usize = 1000;
const TITLE_MIN: usize = 10;
const TITLE_MAX: usize = 100;

// Secuencias tipo teléfono: 10+ dígitos admitiendo separadores comunes.
static PHONE_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s\-\.\(\)]{8,}\d").unwrap());
static EMAIL_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());
static PINCODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());

/// Valida el paso indicado contra el estado actual. Puro: no muta nada.
pub fn validate(step: &StepDefinition, form: &FormState, media: &[MediaItem]) -> ErrorMap {
    let mut errors = ErrorMap::new();
    match step.kind {
        StepKind::Details => validate_details(form, &mut errors),
        StepKind::Location => validate_location(form, &mut errors),
        StepKind::Units => validate_units(form, &mut errors),
        StepKind::Pricing => validate_pricing(form, &mut errors),
        StepKind::Timeline => validate_timeline(form, &mut errors),
        StepKind::Builder => validate_builder(form, &mut errors),
        StepKind::Amenities => {
            validate_amenities(form, &mut errors);
            validate_description(form, &mut errors);
        }
        StepKind::Description => validate_description(form, &mut errors),
        StepKind::Brochure => {} // ambos adjuntos son opcionales
        StepKind::Media => validate_media(media, &mut errors),
    }
    errors
}

fn require_text(form: &FormState, field: &str, label: &str, errors: &mut ErrorMap) -> bool {
    match form.get_str(field) {
        Some(s) if !s.is_empty() => true,
        _ => {
            errors.insert(field.to_string(), format!("{label} is required"));
            false
        }
    }
}

fn require_range(form: &FormState, field: &str, label: &str, min: f64, max: f64, errors: &mut ErrorMap) {
    match form.get_num(field) {
        Some(n) if n >= min && n <= max => {}
        Some(_) => {
            errors.insert(field.to_string(),
                          format!("{label} must be between {min} and {max}"));
        }
        None => {
            errors.insert(field.to_string(), format!("{label} is required"));
        }
    }
}

fn visibility_of(form: &FormState) -> Option<FieldVisibility> {
    Some(field_visibility(form.category()?, form.sub_category()?))
}

fn validate_details(form: &FormState, errors: &mut ErrorMap) {
    if let Some(title) = form.get_str("title") {
        let len = title.chars().count();
        if len < TITLE_MIN || len > TITLE_MAX {
            errors.insert("title".into(),
                          format!("Title must be {TITLE_MIN}-{TITLE_MAX} characters"));
        }
    } else {
        errors.insert("title".into(), "Title is required".into());
    }
    if form.category().is_none() {
        errors.insert("category".into(), "Select a category".into());
    }
    if form.sub_category().is_none() {
        errors.insert("sub_category".into(), "Select a property type".into());
    }

    let Some(v) = visibility_of(form) else { return };
    if v.bedrooms {
        require_range(form, "bedrooms", "Bedrooms", 0.0, 10.0, errors);
    } else if let Some(forced) = v.forced_bedrooms {
        // Studio: si viene un valor, debe ser el fijo.
        if let Some(n) = form.get_num("bedrooms") {
            if n != f64::from(forced) {
                errors.insert("bedrooms".into(),
                              format!("This property type always has {forced} bedroom"));
            }
        }
    }
    if v.bathrooms {
        require_range(form, "bathrooms", "Bathrooms", 0.0, 10.0, errors);
    }
    if v.balconies {
        require_range(form, "balconies", "Balconies", 0.0, 5.0, errors);
    }
    if v.furnishing {
        require_text(form, "furnishing", "Furnishing", errors);
    }
    if v.facing {
        require_text(form, "facing", "Facing", errors);
    }
}

fn validate_location(form: &FormState, errors: &mut ErrorMap) {
    require_text(form, "city", "City", errors);
    require_text(form, "locality", "Locality", errors);
    if let Some(pin) = form.get_str("pincode") {
        if !pin.is_empty() && !PINCODE.is_match(pin) {
            errors.insert("pincode".into(), "Pincode must be 6 digits".into());
        }
    }
}

fn validate_units(form: &FormState, errors: &mut ErrorMap) {
    if form.get_list("unit_types").is_empty() {
        errors.insert("unit_types".into(), "Add at least one unit type".into());
    }
    require_range(form, "total_units", "Total units", 1.0, 10000.0, errors);
}

fn validate_pricing(form: &FormState, errors: &mut ErrorMap) {
    match form.get_num("price") {
        Some(p) if p > 0.0 => {
            // Depósito acotado respecto al precio (listados de alquiler).
            if let Some(d) = form.get_num("deposit") {
                if d < 0.0 || d > p * 10.0 {
                    errors.insert("deposit".into(),
                                  "Deposit cannot exceed 10x the price".into());
                }
            }
        }
        _ => {
            errors.insert("price".into(), "Price is required".into());
        }
    }

    let v = visibility_of(form);
    let needs_carpet = v.map(|v| v.carpet_area).unwrap_or(true);
    if needs_carpet {
        match form.get_num("carpet_area") {
            Some(c) if c > 0.0 => {
                if let Some(b) = form.get_num("built_up_area") {
                    if c > b {
                        errors.insert("carpet_area".into(),
                                      "Carpet area cannot exceed built-up area".into());
                    }
                }
            }
            _ => {
                errors.insert("carpet_area".into(), "Carpet area is required".into());
            }
        }
    }
    if v.map(|v| v.floor && v.total_floors).unwrap_or(false) {
        let floor = form.get_num("floor");
        let total = form.get_num("total_floors");
        match (floor, total) {
            (Some(f), Some(t)) => {
                if f > t {
                    errors.insert("floor".into(),
                                  "Floor cannot be above the total floors".into());
                }
            }
            (None, _) => {
                errors.insert("floor".into(), "Floor is required".into());
            }
            (_, None) => {
                errors.insert("total_floors".into(), "Total floors is required".into());
            }
        }
    }
    if v.map(|v| v.age).unwrap_or(false) {
        require_range(form, "age", "Property age", 0.0, 100.0, errors);
    }
}

fn validate_timeline(form: &FormState, errors: &mut ErrorMap) {
    require_text(form, "possession_date", "Possession date", errors);
    if let Some(rera) = form.get_str("rera_id") {
        if !rera.is_empty() && (rera.len() > 32 || !rera.chars().all(|c| c.is_ascii_alphanumeric())) {
            errors.insert("rera_id".into(), "RERA id must be alphanumeric (max 32)".into());
        }
    }
}

fn validate_builder(form: &FormState, errors: &mut ErrorMap) {
    require_text(form, "builder_name", "Builder name", errors);
}

fn validate_amenities(form: &FormState, errors: &mut ErrorMap) {
    let (Some(cat), Some(sub)) = (form.category(), form.sub_category()) else { return };
    let allowed = allowed_amenities(cat, sub);
    let outside: Vec<String> = form.get_list("amenities")
                                   .into_iter()
                                   .filter(|a| !allowed.contains(&a.as_str()))
                                   .collect();
    if !outside.is_empty() {
        errors.insert("amenities".into(),
                      format!("Not available for this property type: {}", outside.join(", ")));
    }
}

fn validate_description(form: &FormState, errors: &mut ErrorMap) {
    let Some(desc) = form.get_str("description") else {
        errors.insert("description".into(), "Description is required".into());
        return;
    };
    let len = desc.chars().count();
    if len < DESCRIPTION_MIN {
        errors.insert("description".into(),
                      format!("Description must be at least {DESCRIPTION_MIN} characters"));
    } else if len > DESCRIPTION_MAX {
        errors.insert("description".into(),
                      format!("Description must be under {DESCRIPTION_MAX} characters"));
    } else if PHONE_LIKE.is_match(desc) {
        errors.insert("description".into(),
                      "Description cannot contain phone numbers".into());
    } else if EMAIL_LIKE.is_match(desc) {
        errors.insert("description".into(),
                      "Description cannot contain email addresses".into());
    }
}

/// Gate del paso de fotos: bloquea con items sin resolver o rechazados, y
/// exige al menos un aprobado. `PendingReview` no bloquea ni aprueba.
fn validate_media(media: &[MediaItem], errors: &mut ErrorMap) {
    let pending = media.iter().filter(|m| m.status == MediaStatus::Pending).count();
    let checking = media.iter().filter(|m| m.status == MediaStatus::Checking).count();
    let rejected = media.iter().filter(|m| m.status == MediaStatus::Rejected).count();
    let approved = media.iter().filter(|m| m.status == MediaStatus::Approved).count();

    if checking > 0 || pending > 0 {
        errors.insert("media".into(), "Wait for photo checks to finish".into());
    } else if rejected > 0 {
        errors.insert("media".into(), "Remove rejected photos before continuing".into());
    } else if approved == 0 {
        errors.insert("media".into(), "Add at least one approved photo".into());
    }
}
