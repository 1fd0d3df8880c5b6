//! Search client for the external call ticketing service
//!
//! One search may be in flight at a time; a newer search cancels the
//! older one and the cancelled call resolves to `Ok(None)` without
//! touching the stored page. [`TicketSearch::reset`] disables the
//! client for good, which keeps a dismissed search screen from writing
//! results after the operator has moved on.

use crate::error::ClientResult;
use crate::flight::{FlightGuard, supersedable};
use crate::http::Backend;
use callscribe_core::timefmt::to_ticket_timestamp;
use callscribe_core::types::{Pagination, TicketRecord};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument, warn};

const SEARCH_KEY: &str = "tickets.search";

/// Ticket status filter the search is pinned to
///
/// Part of the external wire contract; only answered queue calls carry
/// recordings worth importing.
const STATUS_ANSWERED_IN_QUEUE: &str = "ATENDIDA NA FILA";

/// Search parameters for one ticket page
#[derive(Debug, Clone)]
pub struct TicketQuery {
    /// Account to search under
    pub accountcode: String,
    /// Optional site scoping within the account
    pub condominium_id: Option<String>,
    /// Inclusive window start, `YYYY-MM-DDTHH:MM:SS`
    pub start_date: String,
    /// Inclusive window end
    pub end_date: String,
    /// Page to fetch, 1-based
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl TicketQuery {
    /// Query for the first page at the default page size
    #[must_use]
    pub fn new(
        accountcode: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            accountcode: accountcode.into(),
            condominium_id: None,
            start_date: start_date.into(),
            end_date: end_date.into(),
            page: 1,
            limit: 10,
        }
    }
}

/// One page of mapped ticket results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPage {
    /// Tickets on this page
    pub tickets: Vec<TicketRecord>,
    /// Pagination block for the search
    pub pagination: Pagination,
}

// The external service mixes naming styles on the wire; renames keep
// those quirks (including the misspelled total_itens) out of our types.
#[derive(Debug, Deserialize)]
struct RawTicket {
    banco_id: String,
    linkedid: String,
    #[serde(rename = "TMA")]
    tma: i64,
    audiorecord: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPagination {
    page: Option<u32>,
    limit: Option<u32>,
    total_itens: Option<u64>,
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    data: Vec<RawTicket>,
    pagination: Option<RawPagination>,
}

#[derive(Debug, Serialize)]
struct SearchBody {
    start_date: String,
    end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    condominium: Option<String>,
    status: &'static str,
}

/// Single-flight search client for the ticketing service
#[derive(Debug)]
pub struct TicketSearch {
    backend: Backend,
    state: RwLock<TicketPage>,
    flights: FlightGuard,
    active: AtomicBool,
}

impl TicketSearch {
    /// Create an active search client against the ticket API
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            state: RwLock::new(TicketPage::default()),
            flights: FlightGuard::new(),
            active: AtomicBool::new(true),
        }
    }

    /// Snapshot of the last stored page
    #[must_use]
    pub fn current(&self) -> TicketPage {
        self.state.read().clone()
    }

    /// Whether the client still accepts searches
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Fetch one page of tickets, superseding any search in flight
    ///
    /// Returns `Ok(None)` when the call was superseded or the client has
    /// been reset; the stored page stays as it was in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error on a request failure. The stored page is cleared
    /// first so stale results cannot outlive the error.
    #[instrument(skip(self, query), fields(accountcode = %query.accountcode, page = query.page))]
    pub async fn fetch(&self, query: &TicketQuery) -> ClientResult<Option<TicketPage>> {
        if !self.is_active() {
            debug!("Search client is reset, ignoring fetch");
            return Ok(None);
        }

        let body = SearchBody {
            start_date: to_ticket_timestamp(&query.start_date),
            end_date: to_ticket_timestamp(&query.end_date),
            condominium: query.condominium_id.clone(),
            status: STATUS_ANSWERED_IN_QUEUE,
        };
        let params = [
            ("accountcode", query.accountcode.clone()),
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];

        let token = self.flights.begin(SEARCH_KEY);
        let request = self
            .backend
            .post_with_query("/custom-ticktes", &params, &body);
        let Some(result) = supersedable(&token, request).await else {
            debug!("Ticket search superseded");
            return Ok(None);
        };

        match result {
            Ok(response) => {
                let page = map_response(response);
                *self.state.write() = page.clone();
                Ok(Some(page))
            }
            Err(error) => {
                warn!(%error, "Ticket search failed, clearing results");
                *self.state.write() = TicketPage::default();
                Err(error)
            }
        }
    }

    /// Permanently disable the client and clear its state
    ///
    /// Any in-flight search is cancelled. Further [`Self::fetch`] calls
    /// return `Ok(None)`; there is no way to re-enable the instance.
    pub fn reset(&self) {
        self.active.store(false, Ordering::Release);
        self.flights.cancel(SEARCH_KEY);
        *self.state.write() = TicketPage::default();
        debug!("Ticket search client reset");
    }
}

fn map_response(raw: RawSearchResponse) -> TicketPage {
    let tickets = raw.data.into_iter().map(map_ticket).collect();
    let pagination = map_pagination(raw.pagination.unwrap_or_default());
    TicketPage {
        tickets,
        pagination,
    }
}

/// Reduce a raw ticket to the fields the importer needs
///
/// A recording URL only counts when it is secure; an insecure or absent
/// URL yields `has_audio = false` and no URL at all.
fn map_ticket(raw: RawTicket) -> TicketRecord {
    let has_audio = raw
        .audiorecord
        .as_deref()
        .is_some_and(|url| url.starts_with("https://"));

    TicketRecord {
        id: raw.banco_id,
        linkedid: raw.linkedid,
        duration: raw.tma,
        has_audio,
        audiorecord: if has_audio { raw.audiorecord } else { None },
    }
}

fn map_pagination(raw: RawPagination) -> Pagination {
    Pagination {
        page: raw.page.unwrap_or(1),
        limit: raw.limit.unwrap_or(10),
        total: raw.total_itens.unwrap_or(0),
        total_pages: raw.total_pages.unwrap_or(0),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(audiorecord: Option<&str>) -> RawTicket {
        RawTicket {
            banco_id: "900142".to_string(),
            linkedid: "1724322000.17".to_string(),
            tma: 184,
            audiorecord: audiorecord.map(ToString::to_string),
        }
    }

    #[test]
    fn test_map_ticket_accepts_secure_url() {
        let ticket = map_ticket(raw(Some("https://cdn.example.com/rec.mp3")));

        assert!(ticket.has_audio);
        assert_eq!(
            ticket.audiorecord.as_deref(),
            Some("https://cdn.example.com/rec.mp3")
        );
        assert_eq!(ticket.id, "900142");
        assert_eq!(ticket.duration, 184);
    }

    #[test]
    fn test_map_ticket_drops_insecure_url() {
        let ticket = map_ticket(raw(Some("http://cdn.example.com/rec.mp3")));

        assert!(!ticket.has_audio);
        assert_eq!(ticket.audiorecord, None);
    }

    #[test]
    fn test_map_ticket_requires_scheme_separator() {
        // "httpsomething" must not pass as secure.
        let ticket = map_ticket(raw(Some("httpsomething")));

        assert!(!ticket.has_audio);
        assert_eq!(ticket.audiorecord, None);
    }

    #[test]
    fn test_map_ticket_handles_missing_url() {
        let ticket = map_ticket(raw(None));

        assert!(!ticket.has_audio);
        assert_eq!(ticket.audiorecord, None);
    }

    #[test]
    fn test_map_pagination_defaults_missing_fields() {
        let pagination = map_pagination(RawPagination::default());
        assert_eq!(pagination, Pagination::empty());
    }

    #[test]
    fn test_raw_response_parses_external_shape() {
        let json = r#"{
            "data": [
                {
                    "banco_id": "321",
                    "linkedid": "1724322000.17",
                    "TMA": 95,
                    "audiorecord": "https://cdn.example.com/a.mp3",
                    "chamada_status": "ATENDIDA NA FILA",
                    "TME": 4
                }
            ],
            "pagination": {"page": 2, "limit": 10, "total_itens": 31, "total_pages": 4}
        }"#;

        let raw: RawSearchResponse = serde_json::from_str(json).unwrap();
        let page = map_response(raw);

        assert_eq!(page.tickets.len(), 1);
        assert_eq!(page.tickets[0].id, "321");
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.total, 31);
        assert_eq!(page.pagination.total_pages, 4);
    }

    #[test]
    fn test_search_body_omits_absent_condominium() {
        let body = SearchBody {
            start_date: "2025-08-25 00:00:00".to_string(),
            end_date: "2025-08-25 23:59:59".to_string(),
            condominium: None,
            status: STATUS_ANSWERED_IN_QUEUE,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], "ATENDIDA NA FILA");
        assert_eq!(value["start_date"], "2025-08-25 00:00:00");
        assert!(value.get("condominium").is_none());
    }
}
