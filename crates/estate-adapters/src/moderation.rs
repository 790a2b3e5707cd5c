//! Proveedor de moderación con guion: cada archivo (por nombre) puede
//! tener un resultado pre-armado. Sin guion, aprueba. Cuenta los requests
//! emitidos para poder asertar el fan-out exacto (N archivos = N calls).
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use estate_core::{CoreEngineError, ModerationData, ModerationProvider, ModerationResponse};
use estate_domain::MediaFile;

/// Resultado pre-armado para un archivo.
#[derive(Debug, Clone)]
pub enum ModerationScript {
    Approve,
    Reject(String),
    PendingReview,
    TransportError,
}

#[derive(Clone, Default)]
pub struct ScriptedModerationProvider {
    scripts: Arc<Mutex<HashMap<String, ModerationScript>>>,
    calls: Arc<AtomicUsize>,
    next_id: Arc<AtomicU64>,
    /// Retardo artificial por request, para ensanchar la ventana de
    /// solapamiento en tests.
    delay: Option<Duration>,
}

impl ScriptedModerationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Programa el resultado para un nombre de archivo.
    pub fn script(&self, file_name: &str, script: ModerationScript) {
        self.scripts.lock().unwrap().insert(file_name.to_string(), script);
    }

    /// Requests emitidos hasta ahora.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationProvider for ScriptedModerationProvider {
    async fn validate_image(&self,
                            file: &MediaFile,
                            _property_id: i64,
                            validate_only: bool)
                            -> Result<ModerationResponse, CoreEngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let script = self.scripts
                         .lock()
                         .unwrap()
                         .get(&file.name)
                         .cloned()
                         .unwrap_or(ModerationScript::Approve);
        match script {
            ModerationScript::Approve => {
                // En modo evaluación el backend no persiste: sin payload.
                let data = if validate_only {
                    None
                } else {
                    let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                    Some(ModerationData { image_id: n.to_string(),
                                          image_url: format!("http://cdn.test/img/{n}") })
                };
                Ok(ModerationResponse { status: "success".into(), message: None, data })
            }
            ModerationScript::Reject(message) => Ok(ModerationResponse { status: "rejected".into(),
                                                                         message: Some(message),
                                                                         data: None }),
            ModerationScript::PendingReview => Ok(ModerationResponse { status: "pending_review".into(),
                                                                       message: Some("queued".into()),
                                                                       data: None }),
            ModerationScript::TransportError => Err(CoreEngineError::Transport("connection reset".into())),
        }
    }
}
