//! Eventos del workflow y su almacenamiento.
mod store;
mod types;

pub use store::{InMemoryWorkflowEventStore, WorkflowEventStore};
pub use types::{WorkflowEvent, WorkflowEventKind};
