//! estate-domain: modelo de datos puro y validación del marketplace.
pub mod amenities;
pub mod conversation;
pub mod errors;
pub mod listing;
pub mod media;
pub mod steps;
pub mod validation;
pub mod visibility;

pub use amenities::{allowed_amenities, filter_amenities};
pub use conversation::{conversation_key, BuyerProfile, ChatMessage, ChatRoom, EnrichedConversation, Inquiry,
                       InquiryStatus, SenderRole};
pub use errors::DomainError;
pub use listing::{Category, FormState, ListingKind, SubCategory};
pub use media::{MediaFile, MediaItem, MediaStatus, PreviewHandle};
pub use steps::{steps_for, StepDefinition, StepKind};
pub use validation::{validate, ErrorMap};
pub use visibility::{field_visibility, FieldVisibility};
