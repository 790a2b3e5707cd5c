use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{WorkflowEvent, WorkflowEventKind};

/// Almacenamiento de eventos append-only, por workflow.
pub trait WorkflowEventStore {
    /// Apendea un evento a partir de su kind y devuelve el evento completo
    /// (con seq y ts asignados).
    fn append_kind(&mut self, workflow_id: Uuid, kind: WorkflowEventKind) -> WorkflowEvent;
    /// Lista los eventos de un workflow en orden ascendente de seq.
    fn list(&self, workflow_id: Uuid) -> Vec<WorkflowEvent>;
    /// Cantidad de eventos registrados para un workflow.
    fn count(&self, workflow_id: Uuid) -> usize {
        self.list(workflow_id).len()
    }
}

#[derive(Default)]
pub struct InMemoryWorkflowEventStore {
    inner: HashMap<Uuid, Vec<WorkflowEvent>>,
}

impl WorkflowEventStore for InMemoryWorkflowEventStore {
    fn append_kind(&mut self, workflow_id: Uuid, kind: WorkflowEventKind) -> WorkflowEvent {
        let vec = self.inner.entry(workflow_id).or_default();
        let ev = WorkflowEvent { seq: vec.len() as u64,
                                 workflow_id,
                                 kind,
                                 ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, workflow_id: Uuid) -> Vec<WorkflowEvent> {
        self.inner.get(&workflow_id).cloned().unwrap_or_default()
    }
}
