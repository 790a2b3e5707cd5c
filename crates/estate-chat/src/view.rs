//! Vista de conversaciones: selección, watermark de lectura y suscripción.
//!
//! El watermark por conversación es el número de mensajes ya marcados
//! leídos; sólo avanza con un evento explícito de "visto" (abrir la vista
//! de mensajes con lista no vacía), nunca por mera recepción: un badge no
//! puede limpiarse sin que el usuario haya visto el contenido.
use std::collections::HashMap;
use std::sync::Arc;

use estate_domain::{ChatMessage, EnrichedConversation, InquiryStatus};

use crate::backend::{ChatBackend, InquiryProvider, Subscription};
use crate::errors::ChatError;
use crate::reconcile::reconcile;

/// Estado de la bandeja de conversaciones de un agente/vendedor.
pub struct ConversationView<C, I>
    where C: ChatBackend,
          I: InquiryProvider
{
    backend: Arc<C>,
    inquiries: Arc<I>,
    current_user: String,
    conversations: Vec<EnrichedConversation>,
    selected: Option<String>,
    watermarks: HashMap<String, usize>,
    subscription: Option<Subscription>,
}

impl<C, I> ConversationView<C, I>
    where C: ChatBackend,
          I: InquiryProvider
{
    pub fn new(backend: Arc<C>, inquiries: Arc<I>, current_user: &str) -> Self {
        Self { backend,
               inquiries,
               current_user: current_user.to_string(),
               conversations: Vec::new(),
               selected: None,
               watermarks: HashMap::new(),
               subscription: None }
    }

    /// Recarga ambas fuentes y reconcilia. La conversación seleccionada se
    /// conserva si su clave sigue presente.
    pub async fn refresh(&mut self) -> Result<&[EnrichedConversation], ChatError> {
        let inquiries = self.inquiries.list_inquiries(&self.current_user).await?;
        let rooms = self.backend.rooms_for_user(&self.current_user).await?;
        self.conversations = reconcile(&inquiries, &rooms, &self.current_user, self.inquiries.as_ref()).await?;
        if let Some(sel) = &self.selected {
            if !self.conversations.iter().any(|c| &c.key == sel) {
                self.selected = None;
                self.subscription = None;
            }
        }
        Ok(&self.conversations)
    }

    pub fn conversations(&self) -> &[EnrichedConversation] {
        &self.conversations
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription.is_some()
    }

    fn conversation(&self, key: &str) -> Result<&EnrichedConversation, ChatError> {
        self.conversations
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ChatError::ConversationNotFound(key.to_string()))
    }

    fn room_id_for(&self, conv: &EnrichedConversation) -> String {
        self.backend.room_id(&conv.buyer_id, &self.current_user, &conv.property_id)
    }

    /// Selecciona una conversación: baja la suscripción anterior, sube la
    /// nueva (a lo sumo una viva). Abrir la vista es el evento explícito de
    /// lectura: una conversación `new` se voltea a leída aunque todavía no
    /// tenga mensajes; el watermark, en cambio, sólo avanza con lista no
    /// vacía.
    pub async fn select(&mut self, key: &str) -> Result<(), ChatError> {
        let conv = self.conversation(key)?.clone();
        let room_id = self.room_id_for(&conv);

        // Reemplazo del guard: el drop da de baja la suscripción previa.
        self.subscription = None;
        self.backend
            .create_or_get_room(&conv.buyer_id, &self.current_user, &conv.property_id)
            .await?;
        self.subscription = Some(self.backend.subscribe(&room_id).await?);
        self.selected = Some(key.to_string());

        let messages = self.backend.messages(&room_id).await?;
        if !messages.is_empty() {
            self.watermarks.insert(key.to_string(), messages.len());
        }
        if conv.status == InquiryStatus::New {
            self.mark_read(key).await?;
        }
        Ok(())
    }

    /// Evento explícito de "visto": avanza el watermark al largo actual de
    /// la lista. Sin mensajes no avanza nada.
    pub async fn mark_viewed(&mut self, key: &str) -> Result<(), ChatError> {
        let conv = self.conversation(key)?.clone();
        let room_id = self.room_id_for(&conv);
        let messages = self.backend.messages(&room_id).await?;
        if !messages.is_empty() {
            self.watermarks.insert(key.to_string(), messages.len());
        }
        Ok(())
    }

    /// Flip de lectura en dos fases: (a) flip optimista local, (b)
    /// escritura autoritativa al backend realtime, (c) sync best-effort al
    /// backend relacional. Un fallo de (b) revierte (a) y se propaga; un
    /// fallo de (c) sólo se loguea.
    pub async fn mark_read(&mut self, key: &str) -> Result<(), ChatError> {
        let (idx, old_status, room_id, inquiry_id) = {
            let idx = self.conversations
                          .iter()
                          .position(|c| c.key == key)
                          .ok_or_else(|| ChatError::ConversationNotFound(key.to_string()))?;
            let conv = &self.conversations[idx];
            (idx, conv.status, self.room_id_for(conv), conv.inquiry.as_ref().map(|i| i.id.clone()))
        };

        // (a) flip optimista.
        self.conversations[idx].status = InquiryStatus::Read;

        // (b) escritura autoritativa; su fallo revierte el flip.
        if let Err(e) = self.backend
                            .update_read_status(&room_id, &self.current_user, InquiryStatus::Read.as_str())
                            .await
        {
            self.conversations[idx].status = old_status;
            return Err(ChatError::ReadStatusWriteFailed(e.to_string()));
        }

        // (c) sync legacy, fire-and-forget.
        if let Some(inquiry_id) = inquiry_id {
            if let Err(e) = self.inquiries.update_status(&inquiry_id, InquiryStatus::Read).await {
                log::warn!("legacy inquiry status sync failed for {inquiry_id}: {e}");
            }
        }
        Ok(())
    }

    /// No-leídos de una conversación sobre una lista de mensajes dada:
    /// mensajes de la contraparte con índice >= watermark. Sin watermark
    /// registrado, cuenta todos los de la contraparte.
    pub fn unread_in(&self, key: &str, messages: &[ChatMessage]) -> usize {
        let watermark = self.watermarks.get(key).copied().unwrap_or(0);
        messages.iter()
                .enumerate()
                .filter(|(i, m)| *i >= watermark && m.sender_id != self.current_user)
                .count()
    }

    /// No-leídos consultando la lista actual del backend.
    pub async fn unread_count(&self, key: &str) -> Result<usize, ChatError> {
        let conv = self.conversation(key)?;
        let room_id = self.room_id_for(conv);
        let messages = self.backend.messages(&room_id).await?;
        Ok(self.unread_in(key, &messages))
    }

    /// Siguiente mensaje realtime de la conversación seleccionada.
    pub async fn next_message(&mut self) -> Option<ChatMessage> {
        match &mut self.subscription {
            Some(sub) => sub.recv().await,
            None => None,
        }
    }
}
