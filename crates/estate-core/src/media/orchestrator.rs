//! Orquestador de validación de media.
//!
//! Responsable de la colección acotada de adjuntos y de la moderación
//! asíncrona: fan-out de un request por item (siempre en paralelo, nunca
//! serializado) y fan-in aplicando cada resolución según llega.
//!
//! Invariantes:
//! - A lo sumo un request en vuelo por item (`in_flight` guarda los ids
//!   despachados sin resolver).
//! - Las resoluciones se aplican por id estable, nunca por posición: una
//!   remoción durante el vuelo no puede desviar la respuesta a otro slot.
//! - Toda mutación de la colección es un read-modify-write del snapshot
//!   completo; no hay updates parciales entre completions consecutivas.
use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use uuid::Uuid;

use estate_domain::{MediaFile, MediaItem, MediaStatus};

use crate::errors::CoreEngineError;
use crate::media::classify::{classify, ModerationOutcome};
use crate::providers::{ModerationProvider, VALIDATE_ONLY_PARENT};

/// Conteo por estado de la colección actual; decide el gate del paso de
/// fotos y la condición de auto-avance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaGate {
    pub pending: usize,
    pub checking: usize,
    pub approved: usize,
    pub rejected: usize,
    pub soft_pending: usize,
}

impl MediaGate {
    /// Avance permitido: nada sin resolver ni rechazado y al menos una
    /// aprobada. `soft_pending` no bloquea.
    pub fn passes(&self) -> bool {
        self.pending == 0 && self.checking == 0 && self.rejected == 0 && self.approved > 0
    }

    /// Auto-avance: el batch completo quedó aprobado (el soft-pending no
    /// cuenta como aprobado).
    pub fn batch_approved(&self) -> bool {
        self.approved > 0
        && self.pending == 0
        && self.checking == 0
        && self.rejected == 0
        && self.soft_pending == 0
    }
}

/// Resultado de una pasada de validación.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Resoluciones aplicadas, en orden de llegada.
    pub resolved: Vec<(Uuid, MediaStatus)>,
    /// Respuestas tardías descartadas (item ya removido).
    pub discarded: Vec<Uuid>,
    /// La colección quedó íntegramente aprobada tras esta pasada.
    pub batch_approved: bool,
}

pub struct MediaOrchestrator<M: ModerationProvider> {
    provider: Arc<M>,
    items: Vec<MediaItem>,
    bound: usize,
    in_flight: HashSet<Uuid>,
}

impl<M: ModerationProvider> MediaOrchestrator<M> {
    pub fn new(provider: Arc<M>, bound: usize) -> Self {
        Self { provider,
               items: Vec::new(),
               bound,
               in_flight: HashSet::new() }
    }

    /// Pre-carga items ya remotos (flujo de edición).
    pub fn with_items(provider: Arc<M>, bound: usize, items: Vec<MediaItem>) -> Self {
        Self { provider, items, bound, in_flight: HashSet::new() }
    }

    /// Agrega un archivo: item `Pending` con preview transitorio, de forma
    /// síncrona. La moderación se despacha aparte en `run_validation`.
    pub fn add_file(&mut self, file: MediaFile) -> Result<Uuid, CoreEngineError> {
        if self.items.len() >= self.bound {
            return Err(CoreEngineError::MediaLimitReached(self.bound));
        }
        let item = MediaItem::new(file);
        let id = item.id;
        let mut snapshot = self.items.clone();
        snapshot.push(item);
        self.items = snapshot;
        Ok(id)
    }

    /// Remueve un item liberando su preview. No cancela un request en
    /// vuelo: la respuesta tardía se descartará al aplicar.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(pos) = self.items.iter().position(|m| m.id == id) else {
            return false;
        };
        let mut snapshot = self.items.clone();
        let removed = snapshot.remove(pos);
        removed.preview.release();
        self.items = snapshot;
        true
    }

    /// Libera todos los previews (cierre/desmontaje del formulario).
    pub fn teardown(&mut self) {
        for item in &self.items {
            item.preview.release();
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn approved_items(&self) -> Vec<&MediaItem> {
        self.items.iter().filter(|m| m.status == MediaStatus::Approved).collect()
    }

    pub fn gate(&self) -> MediaGate {
        let count = |s: MediaStatus| self.items.iter().filter(|m| m.status == s).count();
        MediaGate { pending: count(MediaStatus::Pending),
                    checking: count(MediaStatus::Checking),
                    approved: count(MediaStatus::Approved),
                    rejected: count(MediaStatus::Rejected),
                    soft_pending: count(MediaStatus::PendingReview) }
    }

    /// Despacha la moderación de todo lo `Pending` en paralelo y aplica
    /// cada resolución según llega. Sin `parent_id` los requests viajan en
    /// modo evaluación (`property_id = 0`, `validate_only = true`).
    pub async fn run_validation(&mut self, parent_id: Option<i64>) -> RunSummary {
        let (property_id, validate_only) = match parent_id {
            Some(id) => (id, false),
            None => (VALIDATE_ONLY_PARENT, true),
        };

        // Marca Checking y arma el batch. Un item ya en vuelo no se
        // re-despacha.
        let mut batch: Vec<(Uuid, MediaFile)> = Vec::new();
        let mut snapshot = self.items.clone();
        for item in snapshot.iter_mut() {
            if item.status == MediaStatus::Pending && !self.in_flight.contains(&item.id) {
                item.status = MediaStatus::Checking;
                self.in_flight.insert(item.id);
                batch.push((item.id, item.file.clone()));
            }
        }
        self.items = snapshot;

        let mut futs: FuturesUnordered<_> =
            batch.into_iter()
                 .map(|(id, file)| {
                     let provider = Arc::clone(&self.provider);
                     async move { (id, provider.validate_image(&file, property_id, validate_only).await) }
                 })
                 .collect();

        let mut summary = RunSummary::default();
        while let Some((id, result)) = futs.next().await {
            let outcome = classify(result);
            match self.apply_resolution(id, outcome) {
                Some(status) => summary.resolved.push((id, status)),
                None => summary.discarded.push(id),
            }
        }
        summary.batch_approved = self.gate().batch_approved();
        summary
    }

    /// Aplica una resolución por id. Devuelve el estado final del item, o
    /// `None` si la respuesta es tardía (item removido) y se descarta.
    pub fn apply_resolution(&mut self, id: Uuid, outcome: ModerationOutcome) -> Option<MediaStatus> {
        self.in_flight.remove(&id);
        if !self.items.iter().any(|m| m.id == id) {
            log::debug!("discarding stale moderation response for {id}");
            return None;
        }
        let mut snapshot = self.items.clone();
        let item = snapshot.iter_mut().find(|m| m.id == id)?;
        match outcome {
            ModerationOutcome::Approved { remote_id, remote_url } => {
                item.status = MediaStatus::Approved;
                item.remote_id = remote_id;
                item.remote_url = remote_url;
                item.reason = None;
            }
            ModerationOutcome::SoftPending => {
                item.status = MediaStatus::PendingReview;
            }
            ModerationOutcome::Rejected { reason } => {
                item.status = MediaStatus::Rejected;
                item.reason = Some(reason);
            }
        }
        let status = item.status;
        self.items = snapshot;
        Some(status)
    }
}
