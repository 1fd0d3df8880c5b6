//! REST clients for the Callscribe audio list backend
//!
//! This crate wires the pure types from `callscribe-core` to the two HTTP
//! services the dashboard talks to: the audio list backend and the external
//! call ticketing API. Collection reads follow a single-flight discipline
//! where a newer request cancels the older one, and mutations reconcile a
//! local cache against the server.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod audios;
pub mod error;
pub mod flight;
pub mod http;
pub mod lists;
pub mod session;
pub mod tickets;
pub mod transcription;
pub mod users;

// Re-export commonly used types
pub use audios::{AudioCollection, BulkOutcome};
pub use error::{ClientError, ClientResult};
pub use flight::{FlightGuard, supersedable};
pub use http::Backend;
pub use lists::{DayFailure, ListRepository, PeriodOutcome, PeriodRequest, ReconcileStrategy};
pub use session::Session;
pub use tickets::{TicketPage, TicketQuery, TicketSearch};
pub use transcription::TranscriptionWriter;
pub use users::{NewUser, UserPatch, UserRepository};

use callscribe_core::Config;

/// Authenticated clients for both services
#[derive(Debug, Clone)]
pub struct Connection {
    /// Audio list backend, without credentials attached
    pub backend: Backend,
    /// External ticketing API
    pub tickets: Backend,
    /// The authenticated session
    pub session: Session,
}

impl Connection {
    /// Repository over the audio lists
    #[must_use]
    pub fn lists(&self) -> ListRepository {
        ListRepository::new(&self.backend, &self.session)
    }

    /// Search client for the external ticketing service
    #[must_use]
    pub fn ticket_search(&self) -> TicketSearch {
        TicketSearch::new(self.tickets.clone())
    }

    /// Audio collection for one list
    #[must_use]
    pub fn audios(&self, list_id: i64) -> AudioCollection {
        AudioCollection::new(&self.backend, &self.session, list_id)
    }

    /// User administration repository
    #[must_use]
    pub fn users(&self) -> UserRepository {
        UserRepository::new(&self.backend, &self.session)
    }
}

/// Log in and wire up clients for both services
///
/// # Errors
///
/// Returns [`ClientError`] if:
/// - Either HTTP client cannot be built from the configuration
/// - The backend rejects the credentials
pub async fn connect(config: &Config, email: &str, password: &str) -> ClientResult<Connection> {
    let backend = Backend::from_backend_config(&config.backend)?;
    let tickets = Backend::from_ticket_config(&config.tickets)?;
    let session = Session::login(&backend, email, password).await?;

    Ok(Connection {
        backend,
        tickets,
        session,
    })
}
