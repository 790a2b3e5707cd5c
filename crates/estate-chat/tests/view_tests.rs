use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use estate_adapters::{InMemoryChatBackend, InMemoryInquiryProvider};
use estate_chat::{ChatBackend, ChatError, ConversationView};
use estate_domain::{ChatMessage, ChatRoom, Inquiry, InquiryStatus, SenderRole};

const AGENT: &str = "agent1";
const BUYER: &str = "7";
const PROPERTY: &str = "3";

fn inquiry(status: InquiryStatus) -> Inquiry {
    Inquiry { id: "i1".into(),
              conversation_key: None,
              buyer_id: BUYER.into(),
              property_id: PROPERTY.into(),
              buyer_name: "Asha".into(),
              buyer_email: "asha@mail.test".into(),
              buyer_phone: "9000007".into(),
              message: "Interested in this flat".into(),
              status,
              created_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap() }
}

fn buyer_messages(n: usize) -> Vec<ChatMessage> {
    (0..n).map(|i| ChatMessage { sender_id: BUYER.into(),
                                 role: SenderRole::Buyer,
                                 text: format!("message {i}"),
                                 sent_at: Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap()
                                          + Duration::minutes(i as i64) })
          .collect()
}

fn seeded(status: InquiryStatus,
          messages: Vec<ChatMessage>)
          -> (Arc<InMemoryChatBackend>, Arc<InMemoryInquiryProvider>, String) {
    let backend = Arc::new(InMemoryChatBackend::new());
    let inquiries = Arc::new(InMemoryInquiryProvider::new());
    inquiries.push_inquiry(inquiry(status));
    let room_id = backend.room_id(BUYER, AGENT, PROPERTY);
    backend.seed_room(ChatRoom { id: room_id.clone(),
                                 buyer_id: BUYER.into(),
                                 property_id: PROPERTY.into(),
                                 receiver_id: AGENT.into(),
                                 last_message: Some("message".into()),
                                 updated_at: Utc.with_ymd_and_hms(2026, 3, 1, 11, 30, 0).unwrap(),
                                 read_status: HashMap::new() },
                      messages);
    (backend, inquiries, room_id)
}

#[tokio::test]
async fn unread_count_follows_the_watermark() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::Replied, buyer_messages(4));
    let mut view = ConversationView::new(Arc::clone(&backend), inquiries, AGENT);
    view.refresh().await.unwrap();
    let key = format!("{BUYER}_{PROPERTY}");

    assert_eq!(view.unread_count(&key).await.unwrap(), 4);

    view.mark_viewed(&key).await.unwrap();
    assert_eq!(view.unread_count(&key).await.unwrap(), 0);

    backend.send_message(&room_id, BUYER, SenderRole::Buyer, "one more").await.unwrap();
    assert_eq!(view.unread_count(&key).await.unwrap(), 1);
}

#[tokio::test]
async fn own_messages_never_count_as_unread() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::Replied, buyer_messages(2));
    backend.send_message(&room_id, AGENT, SenderRole::Agent, "my reply").await.unwrap();

    let mut view = ConversationView::new(backend, inquiries, AGENT);
    view.refresh().await.unwrap();
    assert_eq!(view.unread_count(&format!("{BUYER}_{PROPERTY}")).await.unwrap(), 2);
}

#[tokio::test]
async fn selecting_a_new_conversation_flips_it_to_read_everywhere() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::New, buyer_messages(3));
    let mut view = ConversationView::new(Arc::clone(&backend), Arc::clone(&inquiries), AGENT);
    view.refresh().await.unwrap();
    let key = format!("{BUYER}_{PROPERTY}");

    view.select(&key).await.unwrap();

    assert_eq!(view.conversations()[0].status, InquiryStatus::Read);
    assert_eq!(backend.read_status(&room_id, AGENT).await.unwrap().as_deref(), Some("read"));
    assert_eq!(inquiries.inquiry_status("i1"), Some(InquiryStatus::Read));
    // Los propios mensajes quedan vistos por la selección.
    assert_eq!(view.unread_count(&key).await.unwrap(), 0);
}

#[tokio::test]
async fn selecting_an_empty_new_conversation_still_flips_it_to_read() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::New, Vec::new());
    let mut view = ConversationView::new(Arc::clone(&backend), Arc::clone(&inquiries), AGENT);
    view.refresh().await.unwrap();
    let key = format!("{BUYER}_{PROPERTY}");

    // Opening the chat is the explicit read event even with zero messages.
    view.select(&key).await.unwrap();
    assert_eq!(view.conversations()[0].status, InquiryStatus::Read);
    assert_eq!(backend.read_status(&room_id, AGENT).await.unwrap().as_deref(), Some("read"));
    assert_eq!(inquiries.inquiry_status("i1"), Some(InquiryStatus::Read));

    // The watermark did not move: a message arriving later is still unread.
    backend.send_message(&room_id, BUYER, SenderRole::Buyer, "hello?").await.unwrap();
    assert_eq!(view.unread_count(&key).await.unwrap(), 1);
}

#[tokio::test]
async fn authoritative_write_failure_reverts_the_optimistic_flip() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::New, buyer_messages(1));
    backend.fail_read_status_write(true);
    let mut view = ConversationView::new(Arc::clone(&backend), Arc::clone(&inquiries), AGENT);
    view.refresh().await.unwrap();
    let key = format!("{BUYER}_{PROPERTY}");

    let err = view.select(&key).await.unwrap_err();
    assert!(matches!(err, ChatError::ReadStatusWriteFailed(_)));

    // El flip se revierte y el backend relacional no se toca.
    assert_eq!(view.conversations()[0].status, InquiryStatus::New);
    assert_eq!(backend.read_status(&room_id, AGENT).await.unwrap(), None);
    assert_eq!(inquiries.inquiry_status("i1"), Some(InquiryStatus::New));
}

#[tokio::test]
async fn legacy_sync_failure_does_not_undo_the_read_flip() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::New, buyer_messages(1));
    inquiries.fail_update_status(true);
    let mut view = ConversationView::new(Arc::clone(&backend), Arc::clone(&inquiries), AGENT);
    view.refresh().await.unwrap();

    view.select(&format!("{BUYER}_{PROPERTY}")).await.unwrap();

    assert_eq!(view.conversations()[0].status, InquiryStatus::Read);
    assert_eq!(backend.read_status(&room_id, AGENT).await.unwrap().as_deref(), Some("read"));
    // El backend relacional quedó atrás, pero eso es sólo un warn.
    assert_eq!(inquiries.inquiry_status("i1"), Some(InquiryStatus::New));
}

#[tokio::test]
async fn switching_conversations_replaces_the_subscription() {
    let (backend, inquiries, room_a) = seeded(InquiryStatus::Replied, buyer_messages(1));
    let mut other = inquiry(InquiryStatus::Replied);
    other.id = "i2".into();
    other.property_id = "4".into();
    inquiries.push_inquiry(other);
    let room_b = backend.room_id(BUYER, AGENT, "4");

    let mut view = ConversationView::new(Arc::clone(&backend), inquiries, AGENT);
    view.refresh().await.unwrap();

    view.select(&format!("{BUYER}_{PROPERTY}")).await.unwrap();
    assert_eq!(backend.subscriber_count(&room_a), 1);

    view.select(&format!("{BUYER}_4")).await.unwrap();
    assert_eq!(backend.subscriber_count(&room_a), 0, "previous guard dropped on switch");
    assert_eq!(backend.subscriber_count(&room_b), 1);
    assert_eq!(view.selected(), Some("7_4"));
}

#[tokio::test]
async fn subscription_delivers_realtime_messages() {
    let (backend, inquiries, room_id) = seeded(InquiryStatus::Replied, buyer_messages(1));
    let mut view = ConversationView::new(Arc::clone(&backend), inquiries, AGENT);
    view.refresh().await.unwrap();
    view.select(&format!("{BUYER}_{PROPERTY}")).await.unwrap();

    backend.send_message(&room_id, BUYER, SenderRole::Buyer, "are you there?").await.unwrap();
    let msg = view.next_message().await.unwrap();
    assert_eq!(msg.text, "are you there?");
    assert_eq!(msg.sender_id, BUYER);
}
