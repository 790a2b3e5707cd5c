//! Moderación de media: clasificación y orquestación.
pub mod classify;
pub mod orchestrator;

pub use classify::{classify, normalize_rejection, ModerationOutcome, GENERIC_REJECTION};
pub use orchestrator::{MediaGate, MediaOrchestrator, RunSummary};
