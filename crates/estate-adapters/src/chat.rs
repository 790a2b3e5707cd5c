//! Backend de chat realtime in-memory: rooms con read-status per-user,
//! mensajes ordenados y entrega por suscripción (canal por suscriptor, la
//! baja es el drop del guard).
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

use estate_chat::{ChatBackend, ChatError, Subscription};
use estate_domain::{ChatMessage, ChatRoom, SenderRole};

struct RoomState {
    room: ChatRoom,
    messages: Vec<ChatMessage>,
    subscribers: HashMap<u64, mpsc::UnboundedSender<ChatMessage>>,
}

#[derive(Clone, Default)]
pub struct InMemoryChatBackend {
    rooms: Arc<Mutex<HashMap<String, RoomState>>>,
    next_sub: Arc<AtomicU64>,
    fail_read_status_write: Arc<AtomicBool>,
}

impl InMemoryChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_read_status_write(&self, fail: bool) {
        self.fail_read_status_write.store(fail, Ordering::SeqCst);
    }

    /// Siembra un room arbitrario (estado de partida de tests).
    pub fn seed_room(&self, room: ChatRoom, messages: Vec<ChatMessage>) {
        let mut rooms = self.rooms.lock().unwrap();
        rooms.insert(room.id.clone(), RoomState { room, messages, subscribers: HashMap::new() });
    }

    /// Suscriptores vivos de un room.
    pub fn subscriber_count(&self, room_id: &str) -> usize {
        self.rooms
            .lock()
            .unwrap()
            .get(room_id)
            .map(|r| r.subscribers.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ChatBackend for InMemoryChatBackend {
    async fn create_or_get_room(&self,
                                buyer_id: &str,
                                receiver_id: &str,
                                property_id: &str)
                                -> Result<ChatRoom, ChatError> {
        let id = self.room_id(buyer_id, receiver_id, property_id);
        let mut rooms = self.rooms.lock().unwrap();
        let state = rooms.entry(id.clone()).or_insert_with(|| {
                                               RoomState { room: ChatRoom { id: id.clone(),
                                                                            buyer_id: buyer_id.into(),
                                                                            property_id: property_id.into(),
                                                                            receiver_id: receiver_id.into(),
                                                                            last_message: None,
                                                                            updated_at: Utc::now(),
                                                                            read_status: HashMap::new() },
                                                           messages: Vec::new(),
                                                           subscribers: HashMap::new() }
                                           });
        Ok(state.room.clone())
    }

    async fn subscribe(&self, room_id: &str) -> Result<Subscription, ChatError> {
        let sub_id = self.next_sub.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut rooms = self.rooms.lock().unwrap();
            let state = rooms.get_mut(room_id)
                             .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;
            state.subscribers.insert(sub_id, tx);
        }
        let rooms = Arc::clone(&self.rooms);
        let room_key = room_id.to_string();
        let cancel = Box::new(move || {
            if let Some(state) = rooms.lock().unwrap().get_mut(&room_key) {
                state.subscribers.remove(&sub_id);
            }
        });
        Ok(Subscription::new(room_id.to_string(), rx, cancel))
    }

    async fn send_message(&self,
                          room_id: &str,
                          sender_id: &str,
                          role: SenderRole,
                          text: &str)
                          -> Result<(), ChatError> {
        let msg = ChatMessage { sender_id: sender_id.to_string(),
                                role,
                                text: text.to_string(),
                                sent_at: Utc::now() };
        let mut rooms = self.rooms.lock().unwrap();
        let state = rooms.get_mut(room_id)
                         .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;
        state.messages.push(msg.clone());
        state.room.last_message = Some(msg.text.clone());
        state.room.updated_at = msg.sent_at;
        // Entrega a los suscriptores vivos; los canales cerrados se purgan.
        state.subscribers.retain(|_, tx| tx.send(msg.clone()).is_ok());
        Ok(())
    }

    async fn rooms_for_user(&self, user_id: &str) -> Result<Vec<ChatRoom>, ChatError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.values()
                .filter(|s| s.room.receiver_id == user_id || s.room.buyer_id == user_id)
                .map(|s| s.room.clone())
                .collect())
    }

    async fn update_read_status(&self, room_id: &str, user_id: &str, status: &str) -> Result<(), ChatError> {
        if self.fail_read_status_write.load(Ordering::SeqCst) {
            return Err(ChatError::Transport("realtime backend unavailable".into()));
        }
        let mut rooms = self.rooms.lock().unwrap();
        let state = rooms.get_mut(room_id)
                         .ok_or_else(|| ChatError::RoomNotFound(room_id.to_string()))?;
        state.room.read_status.insert(user_id.to_string(), status.to_string());
        Ok(())
    }

    async fn read_status(&self, room_id: &str, user_id: &str) -> Result<Option<String>, ChatError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(room_id).and_then(|s| s.room.read_status.get(user_id).cloned()))
    }

    async fn messages(&self, room_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(room_id).map(|s| s.messages.clone()).unwrap_or_default())
    }
}
