//! estate-core: motor de publicación multi-paso (media + envío en dos fases).
pub mod errors;
pub mod event;
pub mod media;
pub mod providers;
pub mod submit;
pub mod workflow;

pub use errors::CoreEngineError;
pub use event::{InMemoryWorkflowEventStore, WorkflowEvent, WorkflowEventKind, WorkflowEventStore};
pub use media::{classify, normalize_rejection, MediaGate, MediaOrchestrator, ModerationOutcome, RunSummary,
                GENERIC_REJECTION};
pub use providers::{ListingProvider, ModerationData, ModerationProvider, ModerationResponse,
                    VALIDATE_ONLY_PARENT};
pub use submit::{SubmissionPipeline, SubmissionReport};
pub use workflow::{SubmissionWorkflow, DEFAULT_AUTO_ADVANCE};
