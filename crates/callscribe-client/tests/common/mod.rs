//! Common test utilities and fixtures for client integration tests

#![allow(dead_code)]

use callscribe_client::{Backend, Session};
use callscribe_core::types::{Role, User};
use serde_json::{Value, json};

/// Token the fixtures authenticate with
pub const TEST_TOKEN: &str = "test-token";

/// Authorization header value the backend expects for [`TEST_TOKEN`]
pub const TEST_AUTH_HEADER: &str = "bearer test-token";

/// Backend client pointed at a mock server
pub fn backend(uri: &str) -> Backend {
    Backend::new(uri).expect("backend client should build")
}

/// Ready-made admin session, skipping the login round-trip
pub fn admin_session() -> Session {
    Session {
        token: TEST_TOKEN.to_string(),
        user: User {
            id: 3,
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Admin,
            created_at: None,
        },
    }
}

/// Sample audio list payloads as the backend serves them
pub struct ListFixtures;

impl ListFixtures {
    /// List without audios
    pub fn minimal(id: i64) -> Value {
        json!({
            "id": id,
            "accountcode": "ACME",
            "start_date": "2025-08-25T00:00:00",
            "end_date": "2025-08-25T23:59:59",
            "status": "draft",
        })
    }

    /// List carrying two audios, one already transcribed
    pub fn with_audios(id: i64) -> Value {
        json!({
            "id": id,
            "accountcode": "ACME",
            "start_date": "2025-08-25T00:00:00",
            "end_date": "2025-08-25T23:59:59",
            "status": "generated",
            "totalAudios": 2,
            "totalDuration": 279,
            "audios": [
                {
                    "id": 7,
                    "list_id": id,
                    "title": "1724322000.17",
                    "url": "https://cdn.example.com/rec-17.mp3",
                    "external_id": "900142",
                    "linkedid": "1724322000.17",
                    "duration": 184,
                    "status": "draft",
                    "transcript_human": "Cliente pediu segunda via do boleto",
                    "tags": ["cobrança"],
                },
                {
                    "id": 8,
                    "list_id": id,
                    "title": "1724322000.29",
                    "url": "https://cdn.example.com/rec-29.mp3",
                    "external_id": "900188",
                    "linkedid": "1724322000.29",
                    "duration": 95,
                    "status": "draft",
                },
            ],
        })
    }
}

/// Sample raw payloads as the external ticketing service serves them
pub struct TicketFixtures;

impl TicketFixtures {
    /// Ticket with a secure recording URL
    pub fn secure(id: &str, linkedid: &str) -> Value {
        json!({
            "banco_id": id,
            "linkedid": linkedid,
            "TMA": 184,
            "TME": 6,
            "audiorecord": format!("https://cdn.example.com/{linkedid}.mp3"),
            "chamada_status": "ATENDIDA NA FILA",
        })
    }

    /// Ticket whose recording URL is plain http
    pub fn insecure(id: &str, linkedid: &str) -> Value {
        json!({
            "banco_id": id,
            "linkedid": linkedid,
            "TMA": 51,
            "audiorecord": format!("http://cdn.example.com/{linkedid}.mp3"),
        })
    }

    /// Ticket without any recording
    pub fn missing(id: &str, linkedid: &str) -> Value {
        json!({
            "banco_id": id,
            "linkedid": linkedid,
            "TMA": 12,
            "audiorecord": null,
        })
    }

    /// Search response envelope around the given tickets
    pub fn page(tickets: &[Value], total: u64, total_pages: u32) -> Value {
        json!({
            "data": tickets,
            "pagination": {
                "page": 1,
                "limit": 10,
                "total_itens": total,
                "total_pages": total_pages,
            },
        })
    }
}

/// User payload as the backend serves it
pub fn user_json(id: i64, name: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "role": role,
    })
}
