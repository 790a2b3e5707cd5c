//! estate-chat: reconciliación de inquiries con chat realtime.
pub mod backend;
pub mod errors;
pub mod reconcile;
pub mod view;

pub use backend::{ChatBackend, InquiryProvider, Subscription};
pub use errors::ChatError;
pub use reconcile::reconcile;
pub use view::ConversationView;
