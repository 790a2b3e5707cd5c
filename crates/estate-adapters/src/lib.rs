//! estate-adapters: implementaciones in-memory de los colaboradores
//! externos (moderación, listings, inquiries, chat realtime), usadas por
//! los tests y el binario de demo.
pub mod chat;
pub mod inquiry;
pub mod listing;
pub mod moderation;

pub use chat::InMemoryChatBackend;
pub use inquiry::InMemoryInquiryProvider;
pub use listing::{InMemoryListingProvider, StoredListing};
pub use moderation::{ModerationScript, ScriptedModerationProvider};
