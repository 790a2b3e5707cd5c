//! Pipeline de envío en dos fases.
//!
//! Fase 1: crear (o actualizar) el registro padre con media vacía. Si la
//! creación falla, se aborta sin subir nada: no queda media huérfana.
//! Fase 2: subir en paralelo cada item aprobado que aún no tiene URL
//! remota, particionar resultados y adjuntar al padre las URLs que sí
//! subieron, aunque otras hayan fallado. El padre nunca se revierte por
//! fallos de media: el usuario reintenta el adjunto, no pierde el anuncio.
use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use estate_domain::{FormState, MediaItem, MediaStatus};

use crate::errors::CoreEngineError;
use crate::event::{WorkflowEventKind, WorkflowEventStore};
use crate::providers::ListingProvider;

/// Resultado de un envío con el padre persistido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub listing_id: i64,
    pub uploaded: usize,
    pub failed: usize,
    /// Lista consolidada adjuntada al padre (URLs existentes + nuevas).
    pub attached: Vec<String>,
    /// Mensaje de fallo parcial o total de media, si aplica.
    pub message: Option<String>,
}

pub struct SubmissionPipeline<L: ListingProvider> {
    provider: Arc<L>,
}

impl<L: ListingProvider> SubmissionPipeline<L> {
    pub fn new(provider: Arc<L>) -> Self {
        Self { provider }
    }

    /// Ejecuta el envío completo. `existing` distingue alta de edición: en
    /// edición los items con URL remota no se re-suben y la actualización
    /// consolida URLs existentes + nuevas en una sola lista.
    pub async fn submit<E: WorkflowEventStore>(&self,
                                               workflow_id: Uuid,
                                               form: &FormState,
                                               media: &[MediaItem],
                                               existing: Option<i64>,
                                               events: &mut E)
                                               -> Result<SubmissionReport, CoreEngineError> {
        let approved: Vec<&MediaItem> =
            media.iter().filter(|m| m.status == MediaStatus::Approved).collect();

        // Fase 1: registro padre. Fallo aquí es terminal, cero subidas.
        let parent_id = match existing {
            Some(id) => {
                self.provider.update(id, form).await?;
                id
            }
            None => {
                let id = self.provider
                             .create(form)
                             .await
                             .map_err(|e| CoreEngineError::ParentCreationFailed(e.to_string()))?;
                events.append_kind(workflow_id, WorkflowEventKind::ParentCreated { listing_id: id });
                id
            }
        };

        let existing_urls: Vec<String> =
            approved.iter().filter_map(|m| m.remote_url.clone()).collect();
        let to_upload: Vec<(Uuid, estate_domain::MediaFile)> =
            approved.iter()
                    .filter(|m| m.remote_url.is_none())
                    .map(|m| (m.id, m.file.clone()))
                    .collect();
        let total = to_upload.len();

        // Fase 2: fan-out de subidas, una por item, todas en paralelo.
        let futs = to_upload.into_iter().map(|(id, file)| {
                                            let provider = Arc::clone(&self.provider);
                                            async move { (id, provider.upload_image(&file, parent_id).await) }
                                        });
        let results = join_all(futs).await;

        let mut uploaded_urls: Vec<String> = Vec::new();
        let mut failed = 0usize;
        for (item_id, res) in results {
            match res {
                Ok(url) => {
                    events.append_kind(workflow_id,
                                       WorkflowEventKind::MediaUploaded { item_id, url: url.clone() });
                    uploaded_urls.push(url);
                }
                Err(e) => {
                    failed += 1;
                    events.append_kind(workflow_id,
                                       WorkflowEventKind::MediaUploadFailed { item_id,
                                                                              message: e.to_string() });
                }
            }
        }

        // Las URLs que sí subieron se adjuntan aunque haya hermanas
        // fallidas.
        let mut attached = existing_urls;
        attached.extend(uploaded_urls.iter().cloned());
        if !attached.is_empty() {
            self.provider
                .attach_media(parent_id, &attached)
                .await
                .map_err(|e| CoreEngineError::MediaAttachFailed(e.to_string()))?;
        }

        let uploaded = uploaded_urls.len();
        let message = if failed > 0 && uploaded > 0 {
            Some(format!("{failed} of {total} photos failed to upload; the listing was saved with the rest"))
        } else if failed > 0 {
            Some(format!("The listing was saved but none of the {total} photos could be uploaded. \
                          Retry from the listing's edit screen."))
        } else {
            None
        };

        Ok(SubmissionReport { listing_id: parent_id,
                              uploaded,
                              failed,
                              attached,
                              message })
    }
}
