//! Tipos de evento del workflow de publicación.
//!
//! Rol en el flujo:
//! - Cada transición observable del `SubmissionWorkflow` se apendea a un
//!   `WorkflowEventStore` append-only.
//! - El log es la superficie de observabilidad y de test del motor: el
//!   orden relativo de los eventos es parte del contrato (p.ej.
//!   `ParentCreated` precede a todo `MediaUploaded` del mismo envío).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use estate_domain::{ErrorMap, ListingKind, MediaStatus};

/// Tipos de eventos emitidos por el workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkflowEventKind {
    /// Apertura del formulario. Debe ser el primer evento de un workflow.
    WorkflowOpened { kind: ListingKind, step_count: usize, editing: bool },
    /// Edición de un campo del formulario.
    FieldEdited { field: String },
    /// Avance de paso permitido por el validador.
    StepAdvanced { from: usize, to: usize },
    /// Intento de avance bloqueado, con el mapa de errores del validador.
    StepBlocked { step: usize, errors: ErrorMap },
    /// Retroceso de paso (nunca valida).
    StepBack { from: usize, to: usize },
    /// Item de media agregado a la colección (estado `Pending`).
    MediaAdded { item_id: Uuid },
    /// Item removido; su preview queda liberado.
    MediaRemoved { item_id: Uuid },
    /// Una resolución de moderación aplicada a un item presente.
    MediaResolved { item_id: Uuid, status: MediaStatus },
    /// Resolución tardía descartada: el item ya no estaba en la colección.
    StaleResolutionDiscarded { item_id: Uuid },
    /// Todos los items del batch quedaron aprobados.
    BatchApproved { approved: usize },
    /// Registro padre creado en el backend (fase 1 del envío).
    ParentCreated { listing_id: i64 },
    /// Una foto subida y asociada al padre (fase 2).
    MediaUploaded { item_id: Uuid, url: String },
    /// Una subida falló; el envío continúa con el resto.
    MediaUploadFailed { item_id: Uuid, message: String },
    /// Envío terminado con el padre persistido. `failed > 0` = parcial.
    SubmissionCompleted { listing_id: i64, uploaded: usize, failed: usize },
    /// Envío abortado sin efectos (fallo de creación del padre).
    SubmissionFailed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub seq: u64, // orden de append dentro del workflow
    pub workflow_id: Uuid,
    pub kind: WorkflowEventKind,
    pub ts: DateTime<Utc>, // metadato, no participa en aserciones de orden
}
