//! API de propiedades/proyectos in-memory, con inyección de fallos por
//! operación para ejercitar la semántica de fallo parcial del pipeline.
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use estate_core::{CoreEngineError, ListingProvider};
use estate_domain::{FormState, MediaFile};

#[derive(Debug, Clone)]
pub struct StoredListing {
    pub id: i64,
    pub form: FormState,
    pub media: Vec<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryListingProvider {
    listings: Arc<Mutex<HashMap<i64, StoredListing>>>,
    next_id: Arc<AtomicI64>,
    fail_create: Arc<AtomicBool>,
    fail_attach: Arc<AtomicBool>,
    /// Nombres de archivo cuya subida debe fallar.
    fail_uploads: Arc<Mutex<HashSet<String>>>,
    upload_calls: Arc<AtomicUsize>,
}

impl InMemoryListingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_attach(&self, fail: bool) {
        self.fail_attach.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upload_of(&self, file_name: &str) {
        self.fail_uploads.lock().unwrap().insert(file_name.to_string());
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn listing(&self, id: i64) -> Option<StoredListing> {
        self.listings.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl ListingProvider for InMemoryListingProvider {
    async fn create(&self, form: &FormState) -> Result<i64, CoreEngineError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(CoreEngineError::Transport("create failed".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.listings.lock().unwrap().insert(id,
                                             StoredListing { id,
                                                             form: form.clone(),
                                                             media: Vec::new() });
        Ok(id)
    }

    async fn update(&self, id: i64, form: &FormState) -> Result<(), CoreEngineError> {
        let mut listings = self.listings.lock().unwrap();
        match listings.get_mut(&id) {
            Some(stored) => {
                stored.form = form.clone();
                Ok(())
            }
            None => Err(CoreEngineError::Transport(format!("listing {id} not found"))),
        }
    }

    async fn upload_image(&self, file: &MediaFile, parent_id: i64) -> Result<String, CoreEngineError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.lock().unwrap().contains(&file.name) {
            return Err(CoreEngineError::Transport(format!("upload of {} failed", file.name)));
        }
        Ok(format!("http://cdn.test/{parent_id}/{}", file.name))
    }

    async fn attach_media(&self, id: i64, urls: &[String]) -> Result<(), CoreEngineError> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(CoreEngineError::Transport("attach failed".into()));
        }
        let mut listings = self.listings.lock().unwrap();
        match listings.get_mut(&id) {
            Some(stored) => {
                stored.media = urls.to_vec();
                Ok(())
            }
            None => Err(CoreEngineError::Transport(format!("listing {id} not found"))),
        }
    }
}
