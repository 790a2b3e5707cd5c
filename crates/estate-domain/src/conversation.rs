//! Registros de conversación: inquiries (API relacional), chat rooms
//! (backend realtime) y la conversación enriquecida resultado del merge.
//!
//! La clave de conversación es `buyerId_propertyId` salvo que el backend
//! provea una explícita. El motor de reconciliación garantiza exactamente
//! una `EnrichedConversation` por clave.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado de una inquiry en el backend relacional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Read,
    Replied,
    Contacted,
    Interested,
    NotInterested,
    Closed,
}

impl InquiryStatus {
    /// Parse tolerante: las entradas del mapa realtime llegan como strings.
    pub fn parse(s: &str) -> Option<InquiryStatus> {
        match s {
            "new" => Some(InquiryStatus::New),
            "read" => Some(InquiryStatus::Read),
            "replied" => Some(InquiryStatus::Replied),
            "contacted" => Some(InquiryStatus::Contacted),
            "interested" => Some(InquiryStatus::Interested),
            "not_interested" => Some(InquiryStatus::NotInterested),
            "closed" => Some(InquiryStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Read => "read",
            InquiryStatus::Replied => "replied",
            InquiryStatus::Contacted => "contacted",
            InquiryStatus::Interested => "interested",
            InquiryStatus::NotInterested => "not_interested",
            InquiryStatus::Closed => "closed",
        }
    }
}

/// Clave canónica de conversación: `buyerId_propertyId`.
pub fn conversation_key(buyer_id: &str, property_id: &str) -> String {
    format!("{buyer_id}_{property_id}")
}

/// Inquiry del backend relacional. Inmutable salvo `status`, que el motor
/// puede actualizar de forma optimista.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: String,
    /// Clave explícita del backend; si falta se deriva.
    pub conversation_key: Option<String>,
    pub buyer_id: String,
    pub property_id: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub message: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn key(&self) -> String {
        self.conversation_key
            .clone()
            .unwrap_or_else(|| conversation_key(&self.buyer_id, &self.property_id))
    }
}

/// Room del backend realtime. Autoritativo para el read-status por usuario
/// una vez presente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: String,
    pub buyer_id: String,
    pub property_id: String,
    pub receiver_id: String,
    pub last_message: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// userId -> status string ("new", "read", ...).
    pub read_status: std::collections::HashMap<String, String>,
}

impl ChatRoom {
    pub fn key(&self) -> String {
        conversation_key(&self.buyer_id, &self.property_id)
    }
}

/// Quién escribió un mensaje dentro de la conversación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    Buyer,
    Agent,
}

/// Mensaje realtime. La posición en la lista es la unidad del watermark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender_id: String,
    pub role: SenderRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Perfil de comprador, para resolver display-fields de conversaciones
/// chat-only sin inquiry de respaldo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Resultado del merge: como mucho una inquiry y un room por clave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedConversation {
    pub key: String,
    pub inquiry: Option<Inquiry>,
    pub buyer_id: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub property_id: String,
    pub last_message: Option<String>,
    pub last_activity: DateTime<Utc>,
    /// Estado resuelto: entrada per-user del room si existe, si no el
    /// status de la inquiry.
    pub status: InquiryStatus,
    /// Conversación que empezó como chat puro, sin inquiry formal.
    pub chat_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_derived_when_not_explicit() {
        let inq = Inquiry { id: "i1".into(),
                            conversation_key: None,
                            buyer_id: "7".into(),
                            property_id: "3".into(),
                            buyer_name: "Asha".into(),
                            buyer_email: "a@x.in".into(),
                            buyer_phone: "99".into(),
                            message: "hi".into(),
                            status: InquiryStatus::New,
                            created_at: Utc::now() };
        assert_eq!(inq.key(), "7_3");
    }

    #[test]
    fn explicit_key_wins_over_derivation() {
        let inq = Inquiry { id: "i1".into(),
                            conversation_key: Some("custom".into()),
                            buyer_id: "7".into(),
                            property_id: "3".into(),
                            buyer_name: "Asha".into(),
                            buyer_email: "a@x.in".into(),
                            buyer_phone: "99".into(),
                            message: "hi".into(),
                            status: InquiryStatus::New,
                            created_at: Utc::now() };
        assert_eq!(inq.key(), "custom");
    }

    #[test]
    fn status_roundtrips_through_strings() {
        for s in [InquiryStatus::New,
                  InquiryStatus::Read,
                  InquiryStatus::Replied,
                  InquiryStatus::Contacted,
                  InquiryStatus::Interested,
                  InquiryStatus::NotInterested,
                  InquiryStatus::Closed]
        {
            assert_eq!(InquiryStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(InquiryStatus::parse("weird"), None);
    }
}
