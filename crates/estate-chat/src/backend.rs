//! Traits de colaboradores del motor de conversaciones.
//!
//! El backend realtime (publish/subscribe key-value) y la API relacional
//! de inquiries se consumen como servicios opacos. Las implementaciones
//! in-memory viven en `estate-adapters`.
use async_trait::async_trait;
use tokio::sync::mpsc;

use estate_domain::{BuyerProfile, ChatMessage, ChatRoom, Inquiry, InquiryStatus, SenderRole};

use crate::errors::ChatError;

/// Suscripción activa a los mensajes de un room. Al soltarla (drop) se da
/// de baja en el backend: a lo sumo una suscripción viva por conversación
/// mostrada.
pub struct Subscription {
    room_id: String,
    rx: mpsc::UnboundedReceiver<ChatMessage>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(room_id: String,
               rx: mpsc::UnboundedReceiver<ChatMessage>,
               cancel: Box<dyn FnOnce() + Send>)
               -> Self {
        Self { room_id, rx, cancel: Some(cancel) }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Siguiente mensaje entregado; `None` si el emisor cerró.
    pub async fn recv(&mut self) -> Option<ChatMessage> {
        self.rx.recv().await
    }

    /// Mensaje ya entregado, sin esperar.
    pub fn try_recv(&mut self) -> Option<ChatMessage> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("room_id", &self.room_id).finish()
    }
}

/// Backend de chat realtime.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Clave determinista de room para (comprador, contraparte, propiedad).
    fn room_id(&self, buyer_id: &str, counterpart_id: &str, property_id: &str) -> String {
        format!("room_{buyer_id}_{counterpart_id}_{property_id}")
    }

    async fn create_or_get_room(&self,
                                buyer_id: &str,
                                receiver_id: &str,
                                property_id: &str)
                                -> Result<ChatRoom, ChatError>;

    /// Alta de suscripción a un room; la baja es el drop del guard.
    async fn subscribe(&self, room_id: &str) -> Result<Subscription, ChatError>;

    async fn send_message(&self,
                          room_id: &str,
                          sender_id: &str,
                          role: SenderRole,
                          text: &str)
                          -> Result<(), ChatError>;

    async fn rooms_for_user(&self, user_id: &str) -> Result<Vec<ChatRoom>, ChatError>;

    /// Escritura autoritativa del read-status per-user.
    async fn update_read_status(&self, room_id: &str, user_id: &str, status: &str) -> Result<(), ChatError>;

    async fn read_status(&self, room_id: &str, user_id: &str) -> Result<Option<String>, ChatError>;

    async fn messages(&self, room_id: &str) -> Result<Vec<ChatMessage>, ChatError>;
}

/// API relacional de inquiries + lookup de perfiles de comprador.
#[async_trait]
pub trait InquiryProvider: Send + Sync {
    async fn list_inquiries(&self, owner_id: &str) -> Result<Vec<Inquiry>, ChatError>;

    /// Sincronización legacy del status. Best-effort: sus fallos se
    /// loguean y nunca revierten la operación primaria.
    async fn update_status(&self, inquiry_id: &str, status: InquiryStatus) -> Result<(), ChatError>;

    async fn fetch_buyer(&self, buyer_id: &str) -> Result<BuyerProfile, ChatError>;
}
