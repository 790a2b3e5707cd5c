//! Clasificación de respuestas de moderación.
//!
//! El colaborador sólo devuelve texto libre, así que el mapeo por
//! substring queda aislado aquí como función pura testeable, en lugar de
//! condicionales inline en el orquestador. Frases conocidas del backend se
//! traducen a etiquetas cortas; lo desconocido pasa tal cual.
use serde::{Deserialize, Serialize};

use crate::errors::CoreEngineError;
use crate::providers::ModerationResponse;

/// Mensaje genérico para fallos de transporte/parse: indistinguibles de un
/// rechazo desde el punto de vista del usuario.
pub const GENERIC_REJECTION: &str = "This photo could not be verified. Try a different one.";

/// Resultado ya clasificado de una pasada de moderación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModerationOutcome {
    /// Aprobado. En modo evaluación (`validate_only`) el backend no
    /// persiste, así que los campos remotos pueden faltar.
    Approved { remote_id: Option<String>, remote_url: Option<String> },
    /// Revisión humana pendiente: no bloquea, no aprueba.
    SoftPending,
    Rejected { reason: String },
}

const KNOWN_PHRASES: &[(&str, &str)] = &[("animal appearance", "Animals are not allowed in photos"),
                                         ("human appearance", "People are not allowed in photos"),
                                         ("blurry", "Photo is too blurry"),
                                         ("low quality", "Photo quality is too low")];

/// Normaliza el texto libre del backend a un motivo corto para el usuario.
pub fn normalize_rejection(message: &str) -> String {
    let lower = message.to_lowercase();
    for (phrase, label) in KNOWN_PHRASES {
        if lower.contains(phrase) {
            return (*label).to_string();
        }
    }
    // Sin frase conocida: el mensaje del backend pasa tal cual.
    message.to_string()
}

/// Clasifica el resultado crudo del colaborador. Un `Err` de transporte se
/// trata exactamente igual que un rechazo con mensaje genérico.
pub fn classify(result: Result<ModerationResponse, CoreEngineError>) -> ModerationOutcome {
    let resp = match result {
        Ok(r) => r,
        Err(e) => {
            log::debug!("moderation transport failure treated as rejection: {e}");
            return ModerationOutcome::Rejected { reason: GENERIC_REJECTION.to_string() };
        }
    };
    match resp.status.as_str() {
        "success" => {
            let (remote_id, remote_url) = match resp.data {
                Some(d) => (Some(d.image_id), Some(d.image_url)),
                None => (None, None),
            };
            ModerationOutcome::Approved { remote_id, remote_url }
        }
        "pending_review" => ModerationOutcome::SoftPending,
        _ => {
            let reason = resp.message
                             .as_deref()
                             .map(normalize_rejection)
                             .unwrap_or_else(|| GENERIC_REJECTION.to_string());
            ModerationOutcome::Rejected { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ModerationData;

    fn resp(status: &str, message: Option<&str>) -> ModerationResponse {
        ModerationResponse { status: status.into(),
                             message: message.map(String::from),
                             data: None }
    }

    #[test]
    fn known_phrases_map_to_short_labels() {
        assert_eq!(normalize_rejection("Rejected due to animal appearance in frame"),
                   "Animals are not allowed in photos");
        assert_eq!(normalize_rejection("image is BLURRY"), "Photo is too blurry");
    }

    #[test]
    fn unknown_message_passes_through() {
        assert_eq!(normalize_rejection("watermark detected"), "watermark detected");
    }

    #[test]
    fn success_with_data_is_approved() {
        let r = ModerationResponse { status: "success".into(),
                                     message: None,
                                     data: Some(ModerationData { image_id: "41".into(),
                                                                 image_url: "http://img/41".into() }) };
        assert_eq!(classify(Ok(r)),
                   ModerationOutcome::Approved { remote_id: Some("41".into()),
                                                 remote_url: Some("http://img/41".into()) });
    }

    #[test]
    fn success_without_data_is_a_validate_only_approval() {
        assert_eq!(classify(Ok(resp("success", None))),
                   ModerationOutcome::Approved { remote_id: None, remote_url: None });
    }

    #[test]
    fn pending_review_is_soft() {
        assert_eq!(classify(Ok(resp("pending_review", Some("queued")))), ModerationOutcome::SoftPending);
    }

    #[test]
    fn transport_error_is_generic_rejection() {
        let out = classify(Err(CoreEngineError::Transport("timeout".into())));
        assert_eq!(out, ModerationOutcome::Rejected { reason: GENERIC_REJECTION.into() });
    }
}
