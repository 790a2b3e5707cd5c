//! Tipos base de un anuncio (listing) y su estado de formulario.
//!
//! Rol en el flujo:
//! - `ListingKind` decide la secuencia de pasos y los límites de media.
//! - `FormState` es el único estado mutable del formulario; se modifica
//!   exclusivamente vía `set_field` para que el motor pueda registrar cada
//!   edición como evento.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DomainError;

/// Tipo de anuncio. Propiedad individual o proyecto de constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingKind {
    Property,
    Project,
}

impl ListingKind {
    /// Límite duro de fotos por anuncio (10 propiedad, 20 proyecto).
    pub fn media_bound(&self) -> usize {
        match self {
            ListingKind::Property => 10,
            ListingKind::Project => 20,
        }
    }
}

/// Categoría principal de la propiedad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Residential,
    Commercial,
}

impl Category {
    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "residential" => Some(Category::Residential),
            "commercial" => Some(Category::Commercial),
            _ => None,
        }
    }
}

/// Subcategoría. Las entradas tipo farmhouse/studio tienen reglas propias
/// que no encajan en la generalización categoría/subcategoría.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubCategory {
    Apartment,
    Villa,
    PlotLand,
    Studio,
    Farmhouse,
    Office,
    Shop,
    Warehouse,
}

impl SubCategory {
    pub fn parse(s: &str) -> Option<SubCategory> {
        match s {
            "apartment" => Some(SubCategory::Apartment),
            "villa" => Some(SubCategory::Villa),
            "plot_land" => Some(SubCategory::PlotLand),
            "studio" => Some(SubCategory::Studio),
            "farmhouse" => Some(SubCategory::Farmhouse),
            "office" => Some(SubCategory::Office),
            "shop" => Some(SubCategory::Shop),
            "warehouse" => Some(SubCategory::Warehouse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubCategory::Apartment => "apartment",
            SubCategory::Villa => "villa",
            SubCategory::PlotLand => "plot_land",
            SubCategory::Studio => "studio",
            SubCategory::Farmhouse => "farmhouse",
            SubCategory::Office => "office",
            SubCategory::Shop => "shop",
            SubCategory::Warehouse => "warehouse",
        }
    }
}

/// Estado del formulario: nombre de campo -> valor JSON.
///
/// Los valores numéricos viajan como strings numéricas (igual que el
/// backend); los accesores tipados hacen el parse en el punto de uso.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormState {
    fields: IndexMap<String, Value>,
}

impl FormState {
    pub fn new() -> Self {
        Self { fields: IndexMap::new() }
    }

    /// Crea un estado pre-poblado (flujo de edición).
    pub fn from_fields(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Hidrata el estado desde el JSON crudo del backend (flujo de
    /// edición). Rechaza payloads que no son objeto y tipos de propiedad
    /// que el formulario no conoce.
    pub fn from_json_str(raw: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(DomainError::InvalidPayload("el payload no es un objeto".into()));
        };
        let form = Self { fields: map.into_iter().collect() };
        if let Some(cat) = form.get_str("category") {
            if Category::parse(cat).is_none() {
                return Err(DomainError::UnknownPropertyType(cat.to_string()));
            }
        }
        if let Some(sub) = form.get_str("sub_category") {
            if SubCategory::parse(sub).is_none() {
                return Err(DomainError::UnknownPropertyType(sub.to_string()));
            }
        }
        Ok(form)
    }

    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Valor como texto recortado; `None` si falta o no es string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str()).map(|s| s.trim())
    }

    /// Valor numérico: acepta número JSON o string numérica.
    pub fn get_num(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Lista de strings (p.ej. amenities seleccionadas).
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default()
    }

    pub fn category(&self) -> Option<Category> {
        self.get_str("category").and_then(Category::parse)
    }

    pub fn sub_category(&self) -> Option<SubCategory> {
        self.get_str("sub_category").and_then(SubCategory::parse)
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }
}
