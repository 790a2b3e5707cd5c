//! Recorrido completo contra los adapters in-memory: publicación de una
//! propiedad (con un rechazo de moderación en el medio) y luego la bandeja
//! de conversaciones del agente sobre ese anuncio.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use estate_adapters::{InMemoryChatBackend, InMemoryInquiryProvider, InMemoryListingProvider,
                      ModerationScript, ScriptedModerationProvider};
use estate_chat::{ChatBackend, ConversationView};
use estate_core::{InMemoryWorkflowEventStore, SubmissionWorkflow, WorkflowEventKind};
use estate_domain::{ChatRoom, Inquiry, InquiryStatus, ListingKind, MediaFile, StepKind};

fn file(name: &str) -> MediaFile {
    MediaFile { name: name.into(), content_type: "image/jpeg".into(), bytes: vec![1] }
}

type Workflow =
    SubmissionWorkflow<ScriptedModerationProvider, InMemoryListingProvider, InMemoryWorkflowEventStore>;

fn fill_property_form(wf: &mut Workflow) {
    wf.set_field("title", json!("Garden-facing 3BHK in Kharadi"));
    wf.set_field("category", json!("residential"));
    wf.set_field("sub_category", json!("apartment"));
    wf.set_field("bedrooms", json!("3"));
    wf.set_field("bathrooms", json!("2"));
    wf.set_field("balconies", json!("2"));
    wf.set_field("furnishing", json!("unfurnished"));
    wf.set_field("facing", json!("north"));
}

#[tokio::test]
async fn property_submission_then_conversation_inbox() {
    let moderation = ScriptedModerationProvider::new();
    moderation.script("party.jpg", ModerationScript::Reject("human appearance detected".into()));
    let listing = InMemoryListingProvider::new();

    let mut wf = SubmissionWorkflow::open(ListingKind::Property,
                                          Arc::new(moderation.clone()),
                                          Arc::new(listing.clone()),
                                          InMemoryWorkflowEventStore::default())
        .with_auto_advance(Duration::ZERO);

    // Datos y ubicación.
    fill_property_form(&mut wf);
    wf.next_step().unwrap();
    wf.set_field("city", json!("Pune"));
    wf.set_field("locality", json!("Kharadi"));
    wf.set_field("pincode", json!("411014"));
    wf.next_step().unwrap();

    // Fotos: una se rechaza, se reemplaza, y la colección aprobada
    // auto-avanza.
    assert_eq!(wf.current_step().kind, StepKind::Media);
    wf.add_media(file("living.jpg")).unwrap();
    let bad = wf.add_media(file("party.jpg")).unwrap();
    let summary = wf.run_media_validation().await;
    assert!(!summary.batch_approved);
    let rejected = wf.media_items().iter().find(|m| m.id == bad).unwrap();
    assert_eq!(rejected.reason.as_deref(), Some("People are not allowed in photos"));

    assert!(wf.remove_media(bad));
    wf.add_media(file("terrace.jpg")).unwrap();
    let summary = wf.run_media_validation().await;
    assert!(summary.batch_approved);
    assert_eq!(wf.current_step().kind, StepKind::Pricing);

    wf.set_field("price", json!("8200000"));
    wf.set_field("carpet_area", json!("1100"));
    wf.set_field("built_up_area", json!("1350"));
    wf.set_field("floor", json!("7"));
    wf.set_field("total_floors", json!("14"));
    wf.set_field("age", json!("1"));
    wf.next_step().unwrap();
    wf.set_field("amenities", json!(["gym", "lift", "power_backup"]));
    wf.set_field("description",
                 json!("Spacious three bedroom apartment overlooking the society garden."));

    let report = wf.submit().await.unwrap();
    assert_eq!(report.uploaded, 2);
    assert_eq!(report.failed, 0);
    let stored = listing.listing(report.listing_id).unwrap();
    assert_eq!(stored.media.len(), 2);
    assert!(matches!(wf.events().last().unwrap().kind,
                     WorkflowEventKind::SubmissionCompleted { .. }));

    // Un comprador pregunta por el anuncio y además chatea.
    let property_id = report.listing_id.to_string();
    let backend = Arc::new(InMemoryChatBackend::new());
    let inquiries = Arc::new(InMemoryInquiryProvider::new());
    inquiries.push_inquiry(Inquiry { id: "i1".into(),
                                     conversation_key: None,
                                     buyer_id: "buyer9".into(),
                                     property_id: property_id.clone(),
                                     buyer_name: "Ravi".into(),
                                     buyer_email: "ravi@mail.test".into(),
                                     buyer_phone: "9822000000".into(),
                                     message: "Is the price negotiable?".into(),
                                     status: InquiryStatus::New,
                                     created_at: Utc::now() });
    let room_id = backend.room_id("buyer9", "agent1", &property_id);
    backend.seed_room(ChatRoom { id: room_id.clone(),
                                 buyer_id: "buyer9".into(),
                                 property_id: property_id.clone(),
                                 receiver_id: "agent1".into(),
                                 last_message: Some("Is the price negotiable?".into()),
                                 updated_at: Utc::now(),
                                 read_status: HashMap::new() },
                      vec![]);
    backend.send_message(&room_id, "buyer9", estate_domain::SenderRole::Buyer, "Is the price negotiable?")
           .await
           .unwrap();

    let mut view = ConversationView::new(Arc::clone(&backend), Arc::clone(&inquiries), "agent1");
    let conversations = view.refresh().await.unwrap();
    assert_eq!(conversations.len(), 1);
    let key = format!("buyer9_{property_id}");
    assert_eq!(conversations[0].key, key);
    assert_eq!(conversations[0].status, InquiryStatus::New);
    assert_eq!(view.unread_count(&key).await.unwrap(), 1);

    // Abrir la conversación la marca leída en ambos backends.
    view.select(&key).await.unwrap();
    assert_eq!(view.unread_count(&key).await.unwrap(), 0);
    assert_eq!(backend.read_status(&room_id, "agent1").await.unwrap().as_deref(), Some("read"));
    assert_eq!(inquiries.inquiry_status("i1"), Some(InquiryStatus::Read));
}
