//! estateflow: motor de publicación de anuncios inmobiliarios y
//! reconciliación de conversaciones.
//!
//! La fachada re-exporta los crates del workspace:
//! - `estate-domain`: tipos del dominio, pasos y validación pura.
//! - `estate-core`: workflow de publicación, moderación de media y envío.
//! - `estate-chat`: merge de inquiries con chat realtime y read-state.
//! - `estate-adapters`: colaboradores in-memory para tests y demos.
pub mod config;

pub use estate_adapters;
pub use estate_chat;
pub use estate_core;
pub use estate_domain;
