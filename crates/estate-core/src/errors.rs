//! Errores del motor de publicación (simples, serializables).
//!
//! Taxonomía: `StepBlocked` es local y recuperable editando el formulario;
//! `Transport` normaliza fallos de red/parse de cualquier colaborador;
//! `ParentCreationFailed` es terminal para el intento de envío (sin media
//! huérfana); `MediaAttachFailed` ocurre con el padre ya creado.
use estate_domain::ErrorMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("media limit reached ({0} items)")] MediaLimitReached(usize),
    #[error("step blocked by validation errors")] StepBlocked(ErrorMap),
    #[error("already at the last step")] AtLastStep,
    #[error("already at the first step")] AtFirstStep,
    #[error("listing could not be created: {0}")] ParentCreationFailed(String),
    #[error("uploaded photos could not be attached: {0}")] MediaAttachFailed(String),
    #[error("network error: {0}")] Transport(String),
    #[error("internal: {0}")] Internal(String),
}
