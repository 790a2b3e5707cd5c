//! Motor del formulario multi-paso de publicación.
//!
//! Responsable de orquestar el cursor de pasos, el gate de validación por
//! paso, la colección de media y el envío en dos fases, emitiendo cada
//! transición observable al event store.
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use estate_domain::{filter_amenities, steps_for, validate, ErrorMap, FormState, ListingKind, MediaItem,
                    StepDefinition, StepKind};

use crate::errors::CoreEngineError;
use crate::event::{WorkflowEvent, WorkflowEventKind, WorkflowEventStore};
use crate::media::{MediaGate, MediaOrchestrator, RunSummary};
use crate::providers::{ListingProvider, ModerationProvider};
use crate::submit::{SubmissionPipeline, SubmissionReport};

/// Retardo por defecto del auto-avance tras la aprobación del batch. Es
/// una constante de UX, no de correctitud: el `next` explícito siempre
/// re-valida.
pub const DEFAULT_AUTO_ADVANCE: Duration = Duration::from_millis(400);

/// Motor de publicación de un anuncio.
///
/// Una instancia por formulario abierto; se descarta al cerrar o tras un
/// envío exitoso.
pub struct SubmissionWorkflow<M, L, E>
    where M: ModerationProvider,
          L: ListingProvider,
          E: WorkflowEventStore
{
    id: Uuid,
    kind: ListingKind,
    steps: Vec<StepDefinition>,
    cursor: usize,
    form: FormState,
    media: MediaOrchestrator<M>,
    pipeline: SubmissionPipeline<L>,
    events: E,
    existing: Option<i64>,
    auto_advance_delay: Duration,
}

impl<M, L, E> SubmissionWorkflow<M, L, E>
    where M: ModerationProvider,
          L: ListingProvider,
          E: WorkflowEventStore
{
    /// Abre un formulario vacío de alta.
    pub fn open(kind: ListingKind, moderation: Arc<M>, listing: Arc<L>, events: E) -> Self {
        Self::build(kind, FormState::new(), Vec::new(), None, moderation, listing, events)
    }

    /// Abre un formulario pre-poblado de edición. La media existente llega
    /// ya aprobada y con URL remota; no se re-sube.
    pub fn open_for_edit(kind: ListingKind,
                         form: FormState,
                         media: Vec<MediaItem>,
                         existing_id: i64,
                         moderation: Arc<M>,
                         listing: Arc<L>,
                         events: E)
                         -> Self {
        Self::build(kind, form, media, Some(existing_id), moderation, listing, events)
    }

    fn build(kind: ListingKind,
             form: FormState,
             media: Vec<MediaItem>,
             existing: Option<i64>,
             moderation: Arc<M>,
             listing: Arc<L>,
             mut events: E)
             -> Self {
        let id = Uuid::new_v4();
        let steps = steps_for(kind);
        events.append_kind(id,
                           WorkflowEventKind::WorkflowOpened { kind,
                                                               step_count: steps.len(),
                                                               editing: existing.is_some() });
        let media = MediaOrchestrator::with_items(moderation, kind.media_bound(), media);
        Self { id,
               kind,
               steps,
               cursor: 0,
               form,
               media,
               pipeline: SubmissionPipeline::new(listing),
               events,
               existing,
               auto_advance_delay: DEFAULT_AUTO_ADVANCE }
    }

    /// Ajusta el retardo de auto-avance (cero en tests).
    pub fn with_auto_advance(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.steps[self.cursor]
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn media_items(&self) -> &[MediaItem] {
        self.media.items()
    }

    pub fn media_gate(&self) -> MediaGate {
        self.media.gate()
    }

    /// Lista los eventos emitidos por este workflow.
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.list(self.id)
    }

    /// Edita un campo. Un cambio de tipo de propiedad filtra la selección
    /// de amenities contra el set permitido del tipo nuevo.
    pub fn set_field(&mut self, name: &str, value: serde_json::Value) {
        self.form.set_field(name, value);
        self.events.append_kind(self.id, WorkflowEventKind::FieldEdited { field: name.to_string() });
        if name == "category" || name == "sub_category" {
            if let (Some(cat), Some(sub)) = (self.form.category(), self.form.sub_category()) {
                let selected = self.form.get_list("amenities");
                let kept = filter_amenities(&selected, cat, sub);
                if kept.len() != selected.len() {
                    self.form.set_field("amenities", serde_json::json!(kept));
                }
            }
        }
    }

    /// Errores del paso actual según el validador puro.
    pub fn validate_current(&self) -> ErrorMap {
        validate(self.current_step(), &self.form, self.media.items())
    }

    /// Avanza al paso siguiente si el validador lo permite.
    pub fn next_step(&mut self) -> Result<(), CoreEngineError> {
        let errors = self.validate_current();
        if !errors.is_empty() {
            self.events.append_kind(self.id,
                                    WorkflowEventKind::StepBlocked { step: self.cursor,
                                                                     errors: errors.clone() });
            return Err(CoreEngineError::StepBlocked(errors));
        }
        if self.cursor + 1 >= self.steps.len() {
            return Err(CoreEngineError::AtLastStep);
        }
        let from = self.cursor;
        self.cursor += 1;
        self.events.append_kind(self.id,
                                WorkflowEventKind::StepAdvanced { from, to: self.cursor });
        Ok(())
    }

    /// Retrocede un paso. Nunca valida.
    pub fn prev_step(&mut self) -> Result<(), CoreEngineError> {
        if self.cursor == 0 {
            return Err(CoreEngineError::AtFirstStep);
        }
        let from = self.cursor;
        self.cursor -= 1;
        self.events.append_kind(self.id, WorkflowEventKind::StepBack { from, to: self.cursor });
        Ok(())
    }

    /// Agrega un archivo a la colección de media (estado `Pending`).
    pub fn add_media(&mut self, file: estate_domain::MediaFile) -> Result<Uuid, CoreEngineError> {
        let id = self.media.add_file(file)?;
        self.events.append_kind(self.id, WorkflowEventKind::MediaAdded { item_id: id });
        Ok(id)
    }

    /// Remueve un item; su preview queda liberado.
    pub fn remove_media(&mut self, item_id: Uuid) -> bool {
        let removed = self.media.remove(item_id);
        if removed {
            self.events.append_kind(self.id, WorkflowEventKind::MediaRemoved { item_id });
        }
        removed
    }

    /// Corre la moderación de lo pendiente y, si el batch completo quedó
    /// aprobado estando en el paso de fotos, auto-avanza tras el retardo
    /// configurado. El auto-avance es una conveniencia: re-verifica el
    /// gate después de dormir por si la colección cambió.
    pub async fn run_media_validation(&mut self) -> RunSummary {
        let summary = self.media.run_validation(self.existing).await;
        for (item_id, status) in &summary.resolved {
            self.events.append_kind(self.id,
                                    WorkflowEventKind::MediaResolved { item_id: *item_id,
                                                                       status: *status });
        }
        for item_id in &summary.discarded {
            self.events.append_kind(self.id,
                                    WorkflowEventKind::StaleResolutionDiscarded { item_id: *item_id });
        }
        if summary.batch_approved {
            self.events.append_kind(self.id,
                                    WorkflowEventKind::BatchApproved { approved: self.media
                                                                                     .gate()
                                                                                     .approved });
            let on_media_step = self.current_step().kind == StepKind::Media;
            if on_media_step && self.cursor + 1 < self.steps.len() {
                tokio::time::sleep(self.auto_advance_delay).await;
                if self.media.gate().batch_approved() {
                    let from = self.cursor;
                    self.cursor += 1;
                    self.events.append_kind(self.id,
                                            WorkflowEventKind::StepAdvanced { from, to: self.cursor });
                }
            }
        }
        summary
    }

    /// Aplica una resolución de moderación suelta (respuestas que llegan
    /// fuera de una pasada, p.ej. tras una remoción).
    pub fn apply_media_resolution(&mut self,
                                  item_id: Uuid,
                                  outcome: crate::media::ModerationOutcome)
                                  -> Option<estate_domain::MediaStatus> {
        match self.media.apply_resolution(item_id, outcome) {
            Some(status) => {
                self.events.append_kind(self.id,
                                        WorkflowEventKind::MediaResolved { item_id, status });
                Some(status)
            }
            None => {
                self.events.append_kind(self.id,
                                        WorkflowEventKind::StaleResolutionDiscarded { item_id });
                None
            }
        }
    }

    /// Envío final: re-valida todos los pasos y ejecuta el pipeline de
    /// dos fases. Un fallo de creación del padre aborta sin efectos; los
    /// fallos de subida quedan reportados en el `SubmissionReport`.
    pub async fn submit(&mut self) -> Result<SubmissionReport, CoreEngineError> {
        for step in &self.steps {
            let errors = validate(step, &self.form, self.media.items());
            if !errors.is_empty() {
                self.events.append_kind(self.id,
                                        WorkflowEventKind::StepBlocked { step: step.ordinal,
                                                                         errors: errors.clone() });
                return Err(CoreEngineError::StepBlocked(errors));
            }
        }

        let result = self.pipeline
                         .submit(self.id, &self.form, self.media.items(), self.existing, &mut self.events)
                         .await;
        match &result {
            Ok(report) => {
                self.events.append_kind(self.id,
                                        WorkflowEventKind::SubmissionCompleted { listing_id:
                                                                                     report.listing_id,
                                                                                 uploaded: report.uploaded,
                                                                                 failed: report.failed });
            }
            Err(e) => {
                self.events.append_kind(self.id,
                                        WorkflowEventKind::SubmissionFailed { message: e.to_string() });
            }
        }
        result
    }

    /// Cierre sin envío: libera todos los previews.
    pub fn close(&mut self) {
        self.media.teardown();
    }
}
