// errors.rs
use thiserror::Error;

/// Errores del motor de conversaciones.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ChatError {
    #[error("network error: {0}")] Transport(String),
    #[error("room not found: {0}")] RoomNotFound(String),
    #[error("conversation not found: {0}")] ConversationNotFound(String),
    #[error("could not mark conversation read: {0}")] ReadStatusWriteFailed(String),
    #[error("internal: {0}")] Internal(String),
}
