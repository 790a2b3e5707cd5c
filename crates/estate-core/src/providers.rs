//! Traits de colaboradores externos del motor de publicación.
//!
//! El backend real es un servicio HTTP JSON opaco; aquí sólo se modela el
//! contrato que el motor consume. Las implementaciones (HTTP o in-memory
//! para tests) viven en `estate-adapters`.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use estate_domain::{FormState, MediaFile};

use crate::errors::CoreEngineError;

/// `property_id` centinela mientras el registro padre no existe: la
/// moderación evalúa sin persistir (`validate_only = true`).
pub const VALIDATE_ONLY_PARENT: i64 = 0;

/// Payload de la API de moderación, pasado tal cual desde el backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationResponse {
    /// "success", "pending_review" u otro valor libre.
    pub status: String,
    pub message: Option<String>,
    pub data: Option<ModerationData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationData {
    pub image_id: String,
    pub image_url: String,
}

/// Servicio de moderación de imágenes.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Evalúa una imagen. Un `Err` de transporte se trata aguas arriba
    /// igual que un rechazo, con mensaje genérico.
    async fn validate_image(&self,
                            file: &MediaFile,
                            property_id: i64,
                            validate_only: bool)
                            -> Result<ModerationResponse, CoreEngineError>;
}

/// API de propiedades/proyectos (CRUD del registro padre + subida de fotos).
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Crea el registro padre con lista de media vacía; devuelve el id
    /// asignado por el servidor.
    async fn create(&self, form: &FormState) -> Result<i64, CoreEngineError>;

    /// Actualización parcial de un registro existente (flujo de edición).
    async fn update(&self, id: i64, form: &FormState) -> Result<(), CoreEngineError>;

    /// Sube una foto ya aprobada asociada al padre; devuelve la URL remota.
    async fn upload_image(&self, file: &MediaFile, parent_id: i64) -> Result<String, CoreEngineError>;

    /// Adjunta al padre la lista consolidada de URLs (existentes + nuevas).
    async fn attach_media(&self, id: i64, urls: &[String]) -> Result<(), CoreEngineError>;
}
