//! API relacional de inquiries in-memory + perfiles de comprador. Cuenta
//! los fetches de perfil para asertar el cacheo por pasada del
//! reconciliador.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use estate_chat::{ChatError, InquiryProvider};
use estate_domain::{BuyerProfile, Inquiry, InquiryStatus};

#[derive(Clone, Default)]
pub struct InMemoryInquiryProvider {
    inquiries: Arc<Mutex<Vec<Inquiry>>>,
    buyers: Arc<Mutex<HashMap<String, BuyerProfile>>>,
    buyer_fetches: Arc<AtomicUsize>,
    fail_update_status: Arc<AtomicBool>,
}

impl InMemoryInquiryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_inquiry(&self, inquiry: Inquiry) {
        self.inquiries.lock().unwrap().push(inquiry);
    }

    pub fn put_buyer(&self, profile: BuyerProfile) {
        self.buyers.lock().unwrap().insert(profile.id.clone(), profile);
    }

    pub fn fail_update_status(&self, fail: bool) {
        self.fail_update_status.store(fail, Ordering::SeqCst);
    }

    /// Fetches de perfil emitidos hasta ahora.
    pub fn buyer_fetches(&self) -> usize {
        self.buyer_fetches.load(Ordering::SeqCst)
    }

    pub fn inquiry_status(&self, inquiry_id: &str) -> Option<InquiryStatus> {
        self.inquiries.lock().unwrap().iter().find(|i| i.id == inquiry_id).map(|i| i.status)
    }
}

#[async_trait]
impl InquiryProvider for InMemoryInquiryProvider {
    async fn list_inquiries(&self, _owner_id: &str) -> Result<Vec<Inquiry>, ChatError> {
        Ok(self.inquiries.lock().unwrap().clone())
    }

    async fn update_status(&self, inquiry_id: &str, status: InquiryStatus) -> Result<(), ChatError> {
        if self.fail_update_status.load(Ordering::SeqCst) {
            return Err(ChatError::Transport("legacy API unavailable".into()));
        }
        let mut inquiries = self.inquiries.lock().unwrap();
        match inquiries.iter_mut().find(|i| i.id == inquiry_id) {
            Some(inq) => {
                inq.status = status;
                Ok(())
            }
            None => Err(ChatError::Transport(format!("inquiry {inquiry_id} not found"))),
        }
    }

    async fn fetch_buyer(&self, buyer_id: &str) -> Result<BuyerProfile, ChatError> {
        self.buyer_fetches.fetch_add(1, Ordering::SeqCst);
        let buyers = self.buyers.lock().unwrap();
        Ok(buyers.get(buyer_id).cloned().unwrap_or_else(|| BuyerProfile { id: buyer_id.to_string(),
                                                                          name: "Unknown buyer".into(),
                                                                          email: String::new(),
                                                                          phone: String::new() }))
    }
}
