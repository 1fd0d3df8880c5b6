//! User administration against the backend
//!
//! Listing is supersedable like the other collection reads. Mutations
//! always reload the full list afterwards; the server owns ordering and
//! any search filtering.

use crate::error::ClientResult;
use crate::flight::{FlightGuard, supersedable};
use crate::http::Backend;
use crate::session::Session;
use callscribe_core::types::{Role, User};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, instrument};

const USERS_KEY: &str = "users.list";

/// Payload for creating a user
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Login email, unique on the backend
    pub email: String,
    /// Initial password
    pub password: String,
    /// Role, defaulted by the server when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Partial update for a user
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    /// Replacement display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement login email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Replacement role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Cached repository of backend users
#[derive(Debug)]
pub struct UserRepository {
    backend: Backend,
    cache: RwLock<Vec<User>>,
    flights: FlightGuard,
}

impl UserRepository {
    /// Create a repository bound to the session's credentials
    #[must_use]
    pub fn new(backend: &Backend, session: &Session) -> Self {
        Self {
            backend: session.authorize(backend),
            cache: RwLock::new(Vec::new()),
            flights: FlightGuard::new(),
        }
    }

    /// Snapshot of the cached users
    #[must_use]
    pub fn cached(&self) -> Vec<User> {
        self.cache.read().clone()
    }

    /// Fetch users, superseding any listing in flight
    ///
    /// An empty or whitespace search term lists everyone. Returns
    /// `Ok(None)` when a newer call superseded this one.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails. The cache keeps its
    /// previous contents in that case.
    #[instrument(skip(self))]
    pub async fn list(&self, search: Option<&str>) -> ClientResult<Option<Vec<User>>> {
        let term = search.map(str::trim).filter(|term| !term.is_empty());

        let token = self.flights.begin(USERS_KEY);
        let request = async {
            match term {
                Some(term) => {
                    self.backend
                        .get_with_query("/users", &[("search", term)])
                        .await
                }
                None => self.backend.get("/users").await,
            }
        };
        let Some(result) = supersedable(&token, request).await else {
            debug!("User listing superseded");
            return Ok(None);
        };

        let users: Vec<User> = result?;
        *self.cache.write() = users.clone();
        Ok(Some(users))
    }

    /// Create a user and reload the list
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: &NewUser) -> ClientResult<User> {
        let user: User = self.backend.post("/users", input).await?;
        info!(user_id = user.id, "Created user");
        self.reload().await?;
        Ok(user)
    }

    /// Update a user and reload the list
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: &UserPatch) -> ClientResult<User> {
        let user: User = self.backend.put(&format!("/users/{id}"), patch).await?;
        info!(user_id = id, "Updated user");
        self.reload().await?;
        Ok(user)
    }

    /// Delete a user and reload the list
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.backend.delete(&format!("/users/{id}")).await?;
        info!(user_id = id, "Deleted user");
        self.reload().await
    }

    // Mutations always refetch the whole list; the server may filter or
    // reorder in ways a local patch could not reproduce.
    async fn reload(&self) -> ClientResult<()> {
        let users: Vec<User> = self.backend.get("/users").await?;
        *self.cache.write() = users;
        Ok(())
    }
}
