//! Reconciliación de inquiries (API relacional) con chat rooms (backend
//! realtime).
//!
//! Garantías:
//! - Exactamente una `EnrichedConversation` por clave, aun con filas de
//!   inquiry duplicadas (gana la de `created_at` más reciente).
//! - Un room sin inquiry sólo aporta conversación sintética si su
//!   `receiver_id` es el usuario actual: un agente nunca ve conversaciones
//!   de otro agente aunque compartan propiedad.
//! - Idempotente: mismas entradas, misma lista resultado.
use std::collections::HashMap;

use estate_domain::{BuyerProfile, ChatRoom, EnrichedConversation, Inquiry, InquiryStatus};

use crate::backend::InquiryProvider;
use crate::errors::ChatError;

/// Status mostrado: la entrada per-user del room es autoritativa cuando
/// existe; si no, el status propio de la inquiry.
fn resolve_status(room: Option<&ChatRoom>, inquiry: Option<&Inquiry>, current_user: &str) -> InquiryStatus {
    if let Some(room) = room {
        if let Some(s) = room.read_status.get(current_user).and_then(|s| InquiryStatus::parse(s)) {
            return s;
        }
    }
    inquiry.map(|i| i.status).unwrap_or(InquiryStatus::New)
}

/// Merge de las dos fuentes parcialmente solapadas, con lookup de perfiles
/// para las conversaciones chat-only. El lookup cachea por pasada: un solo
/// fetch por buyer_id faltante.
pub async fn reconcile(inquiries: &[Inquiry],
                       rooms: &[ChatRoom],
                       current_user: &str,
                       buyers: &dyn InquiryProvider)
                       -> Result<Vec<EnrichedConversation>, ChatError> {
    // 1. clave -> inquiry más reciente (created_at posterior gana).
    let mut by_key: HashMap<String, &Inquiry> = HashMap::new();
    for inq in inquiries {
        let key = inq.key();
        match by_key.get(&key) {
            Some(prev) if prev.created_at >= inq.created_at => {}
            _ => {
                by_key.insert(key, inq);
            }
        }
    }

    // 2. clave -> room.
    let mut rooms_by_key: HashMap<String, &ChatRoom> = HashMap::new();
    for room in rooms {
        rooms_by_key.insert(room.key(), room);
    }

    let mut out: Vec<EnrichedConversation> = Vec::with_capacity(by_key.len());

    // 3. conversaciones con inquiry de respaldo. Se recorre en orden de
    // clave para que los empates de actividad queden deterministas.
    let mut inquiry_keys: Vec<&String> = by_key.keys().collect();
    inquiry_keys.sort();
    for key in inquiry_keys {
        let inq = by_key[key];
        let room = rooms_by_key.get(key).copied();
        let last_message = room.and_then(|r| r.last_message.clone());
        let last_activity = room.map(|r| r.updated_at).unwrap_or(inq.created_at);
        out.push(EnrichedConversation { key: key.clone(),
                                        inquiry: Some((*inq).clone()),
                                        buyer_id: inq.buyer_id.clone(),
                                        buyer_name: inq.buyer_name.clone(),
                                        buyer_email: inq.buyer_email.clone(),
                                        buyer_phone: inq.buyer_phone.clone(),
                                        property_id: inq.property_id.clone(),
                                        last_message,
                                        last_activity,
                                        status: resolve_status(room, Some(inq), current_user),
                                        chat_only: false });
    }

    // 4-5. rooms sin inquiry: sintéticas, sólo para el receptor correcto.
    // Se recorre el mapa deduplicado (no el slice crudo) para que dos filas
    // de room con la misma clave no produzcan dos conversaciones.
    let mut buyer_cache: HashMap<String, BuyerProfile> = HashMap::new();
    let mut room_keys: Vec<&String> = rooms_by_key.keys().collect();
    room_keys.sort();
    for key in room_keys {
        let room = rooms_by_key[key];
        if by_key.contains_key(key) || room.receiver_id != current_user {
            continue;
        }
        let profile = lookup_buyer(&room.buyer_id, inquiries, &mut buyer_cache, buyers).await?;
        out.push(EnrichedConversation { key: key.clone(),
                                        inquiry: None,
                                        buyer_id: room.buyer_id.clone(),
                                        buyer_name: profile.name,
                                        buyer_email: profile.email,
                                        buyer_phone: profile.phone,
                                        property_id: room.property_id.clone(),
                                        last_message: room.last_message.clone(),
                                        last_activity: room.updated_at,
                                        status: resolve_status(Some(room), None, current_user),
                                        chat_only: true });
    }

    // 6. última actividad primero. Sort estable: empates conservan orden
    // de construcción, lo que mantiene la idempotencia.
    out.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    Ok(out)
}

/// Display-fields del comprador: primero se reusa la info embebida en
/// cualquier otra inquiry del mismo comprador; si no hay, un único fetch
/// por pasada al colaborador.
async fn lookup_buyer(buyer_id: &str,
                      inquiries: &[Inquiry],
                      cache: &mut HashMap<String, BuyerProfile>,
                      buyers: &dyn InquiryProvider)
                      -> Result<BuyerProfile, ChatError> {
    if let Some(hit) = cache.get(buyer_id) {
        return Ok(hit.clone());
    }
    let profile = match inquiries.iter().find(|i| i.buyer_id == buyer_id) {
        Some(inq) => BuyerProfile { id: buyer_id.to_string(),
                                    name: inq.buyer_name.clone(),
                                    email: inq.buyer_email.clone(),
                                    phone: inq.buyer_phone.clone() },
        None => buyers.fetch_buyer(buyer_id).await?,
    };
    cache.insert(buyer_id.to_string(), profile.clone());
    Ok(profile)
}
