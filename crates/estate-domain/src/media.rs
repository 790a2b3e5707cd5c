//! Items de media (fotos, brochure, video) y su ciclo de vida.
//!
//! Transiciones válidas de `MediaStatus`:
//! - `Pending` -> `Checking`
//! - `Checking` -> `Approved` | `Rejected` | `PendingReview`
//!
//! Un item `Rejected` nunca vuelve a `Pending` in place: el usuario lo
//! elimina y agrega otro archivo. El orden de la colección es el orden de
//! display; el primer item es la foto de portada.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Archivo fuente opaco. El contenido no se interpreta en el dominio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Estado de un item de media en tiempo de ejecución.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaStatus {
    /// Seleccionado, aún sin despachar a moderación.
    Pending,
    /// Request de moderación en vuelo.
    Checking,
    /// Aprobado por moderación; `remote_id`/`remote_url` presentes.
    Approved,
    /// Rechazado (moderación o error de transporte). Terminal.
    Rejected,
    /// Revisión humana pendiente: no bloquea el avance pero tampoco
    /// cuenta como aprobado.
    PendingReview,
}

/// Referencia transitoria de preview (object-URL en el cliente original).
/// Debe liberarse exactamente una vez al remover el item o desmontar.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    released: Arc<AtomicBool>,
}

impl PreviewHandle {
    pub fn new() -> Self {
        Self { released: Arc::new(AtomicBool::new(false)) }
    }

    /// Libera el recurso. Devuelve `true` sólo en la primera llamada.
    pub fn release(&self) -> bool {
        !self.released.swap(true, Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Default for PreviewHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Un adjunto del formulario con su estado de moderación.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Id estable: las resoluciones asíncronas se aplican por id, nunca por
    /// posición en el vector (una remoción desplaza posiciones).
    pub id: Uuid,
    pub file: MediaFile,
    pub preview: PreviewHandle,
    pub status: MediaStatus,
    /// Motivo legible de rechazo, ya normalizado.
    pub reason: Option<String>,
    pub remote_id: Option<String>,
    pub remote_url: Option<String>,
}

impl MediaItem {
    /// Item nuevo recién seleccionado (estado `Pending`).
    pub fn new(file: MediaFile) -> Self {
        Self { id: Uuid::new_v4(),
               file,
               preview: PreviewHandle::new(),
               status: MediaStatus::Pending,
               reason: None,
               remote_id: None,
               remote_url: None }
    }

    /// Item que ya existe en el backend (flujo de edición): aprobado y con
    /// URL remota, no requiere re-subida.
    pub fn existing_remote(file: MediaFile, remote_id: String, remote_url: String) -> Self {
        Self { id: Uuid::new_v4(),
               file,
               preview: PreviewHandle::new(),
               status: MediaStatus::Approved,
               reason: None,
               remote_id: Some(remote_id),
               remote_url: Some(remote_url) }
    }
}
