//! Demo de punta a punta sobre los adapters in-memory: publica una
//! propiedad (con un rechazo de moderación en el medio) y luego recorre la
//! bandeja de conversaciones del agente.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use estate_adapters::{InMemoryChatBackend, InMemoryInquiryProvider, InMemoryListingProvider,
                      ModerationScript, ScriptedModerationProvider};
use estate_chat::{ChatBackend, ChatError, ConversationView};
use estate_core::{CoreEngineError, InMemoryWorkflowEventStore, SubmissionWorkflow};
use estate_domain::{ChatRoom, Inquiry, InquiryStatus, ListingKind, MediaFile, SenderRole};

use estateflow_rust::config::CONFIG;

fn photo(name: &str) -> MediaFile {
    MediaFile { name: name.into(), content_type: "image/jpeg".into(), bytes: vec![0xFF, 0xD8] }
}

async fn run_submission(listing: &InMemoryListingProvider) -> Result<i64, CoreEngineError> {
    let moderation = ScriptedModerationProvider::new();
    moderation.script("crowd.jpg", ModerationScript::Reject("human appearance detected".into()));

    let mut wf = SubmissionWorkflow::open(ListingKind::Property,
                                          Arc::new(moderation),
                                          Arc::new(listing.clone()),
                                          InMemoryWorkflowEventStore::default())
        .with_auto_advance(CONFIG.workflow.auto_advance);

    wf.set_field("title", json!("Sunny 2BHK near Baner road"));
    wf.set_field("category", json!("residential"));
    wf.set_field("sub_category", json!("apartment"));
    wf.set_field("bedrooms", json!("2"));
    wf.set_field("bathrooms", json!("2"));
    wf.set_field("balconies", json!("1"));
    wf.set_field("furnishing", json!("semi_furnished"));
    wf.set_field("facing", json!("east"));
    wf.next_step()?;

    wf.set_field("city", json!("Pune"));
    wf.set_field("locality", json!("Baner"));
    wf.set_field("pincode", json!("411045"));
    wf.next_step()?;

    wf.add_media(photo("hall.jpg"))?;
    let bad = wf.add_media(photo("crowd.jpg"))?;
    let summary = wf.run_media_validation().await;
    log::info!("first moderation pass: {} resolved, batch approved: {}",
               summary.resolved.len(),
               summary.batch_approved);
    if let Some(item) = wf.media_items().iter().find(|m| m.id == bad) {
        println!("photo {} rejected: {}", item.file.name, item.reason.as_deref().unwrap_or("?"));
    }
    wf.remove_media(bad);
    wf.add_media(photo("balcony.jpg"))?;
    let summary = wf.run_media_validation().await;
    println!("second pass batch approved: {}, step: {:?}",
             summary.batch_approved,
             wf.current_step().kind);

    wf.set_field("price", json!("4500000"));
    wf.set_field("carpet_area", json!("850"));
    wf.set_field("built_up_area", json!("1000"));
    wf.set_field("floor", json!("3"));
    wf.set_field("total_floors", json!("10"));
    wf.set_field("age", json!("4"));
    wf.next_step()?;

    wf.set_field("amenities", json!(["gym", "lift"]));
    wf.set_field("description",
                 json!("Sunlit two bedroom apartment close to the lakefront promenade."));

    let report = wf.submit().await?;
    println!("listing {} published: {}",
             report.listing_id,
             report.message.as_deref().unwrap_or("all photos uploaded"));
    println!("events: {}", wf.events().len());
    Ok(report.listing_id)
}

async fn run_inbox(listing_id: i64) -> Result<(), ChatError> {
    let backend = Arc::new(InMemoryChatBackend::new());
    let inquiries = Arc::new(InMemoryInquiryProvider::new());
    let property_id = listing_id.to_string();

    inquiries.push_inquiry(Inquiry { id: "inq-1".into(),
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
                                 property_id,
                                 receiver_id: "agent1".into(),
                                 last_message: None,
                                 updated_at: Utc::now(),
                                 read_status: HashMap::new() },
                      Vec::new());
    backend.send_message(&room_id, "buyer9", SenderRole::Buyer, "Is the price negotiable?")
           .await?;

    let mut view = ConversationView::new(Arc::clone(&backend), inquiries, "agent1");
    view.refresh().await?;
    for conv in view.conversations() {
        println!("conversation {}: {} ({:?}, chat_only={})",
                 conv.key,
                 conv.buyer_name,
                 conv.status,
                 conv.chat_only);
    }
    let key = view.conversations()[0].key.clone();
    println!("unread before opening: {}", view.unread_count(&key).await?);
    view.select(&key).await?;
    println!("unread after opening: {}", view.unread_count(&key).await?);
    println!("read status: {:?}", backend.read_status(&room_id, "agent1").await?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let listing = InMemoryListingProvider::new();
    match run_submission(&listing).await {
        Ok(listing_id) => {
            if let Err(e) = run_inbox(listing_id).await {
                eprintln!("inbox demo failed: {e}");
            }
        }
        Err(e) => eprintln!("submission demo failed: {e}"),
    }
}
