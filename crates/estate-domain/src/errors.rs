//! Errores del dominio. La validación por paso usa `ErrorMap` (campo ->
//! mensaje); este enum cubre los fallos de hidratación de datos que llegan
//! del backend, no los de captura del usuario.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("payload de formulario inválido: {0}")]
    InvalidPayload(String),

    #[error("tipo de propiedad desconocido: {0}")]
    UnknownPropertyType(String),

    #[error("error de serialización: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
