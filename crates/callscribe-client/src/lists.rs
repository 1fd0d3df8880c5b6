//! Audio list CRUD against the backend, with a local cache
//!
//! Reads are supersedable: a fresh `list_all` cancels the previous one
//! and a superseded call resolves to `Ok(None)` without touching the
//! cache. Mutations always run to completion and then reconcile the
//! cache according to the repository's [`ReconcileStrategy`].

use crate::error::ClientResult;
use crate::flight::{FlightGuard, supersedable};
use crate::http::Backend;
use crate::session::Session;
use callscribe_core::period::{PeriodType, expand_period};
use callscribe_core::types::{AudioItem, AudioList, CreateListRequest, UpdateList};
use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

const LIST_ALL_KEY: &str = "lists.all";

/// How mutations bring the cache back in line with the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileStrategy {
    /// Refetch the full collection after every mutation
    #[default]
    FullReload,
    /// Patch the mutated entry into the cache without a refetch
    PatchInPlace,
}

/// Parameters for creating one list per day of a period
#[derive(Debug, Clone)]
pub struct PeriodRequest {
    /// Shape of the period to expand
    pub period: PeriodType,
    /// Day the period is anchored on
    pub anchor: NaiveDate,
    /// Custom window start, `HH:MM` or `HH:MM:SS`
    pub start_time: Option<String>,
    /// Custom window end
    pub end_time: Option<String>,
    /// Account the recordings belong to
    pub accountcode: String,
    /// Optional site scoping within the account
    pub condominium_id: Option<String>,
    /// Notes copied onto every created list
    pub notes: Option<String>,
    /// Account creating the lists
    pub created_by: Option<i64>,
}

/// One day that could not be created during a period expansion
#[derive(Debug, Clone)]
pub struct DayFailure {
    /// Day whose creation failed
    pub date: NaiveDate,
    /// Normalized error message for that day
    pub message: String,
}

/// Result of a best-effort period creation
#[derive(Debug, Default)]
pub struct PeriodOutcome {
    /// Lists created, in ascending date order
    pub created: Vec<AudioList>,
    /// Days that failed, in ascending date order
    pub failed: Vec<DayFailure>,
}

impl PeriodOutcome {
    /// Whether every day of the period was created
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Cached repository of audio lists
#[derive(Debug)]
pub struct ListRepository {
    backend: Backend,
    cache: RwLock<Vec<AudioList>>,
    flights: FlightGuard,
    strategy: ReconcileStrategy,
}

impl ListRepository {
    /// Create a repository bound to the session's credentials
    #[must_use]
    pub fn new(backend: &Backend, session: &Session) -> Self {
        Self {
            backend: session.authorize(backend),
            cache: RwLock::new(Vec::new()),
            flights: FlightGuard::new(),
            strategy: ReconcileStrategy::default(),
        }
    }

    /// Switch the cache reconciliation strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ReconcileStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Snapshot of the cached lists
    #[must_use]
    pub fn cached(&self) -> Vec<AudioList> {
        self.cache.read().clone()
    }

    /// Fetch every list, superseding any fetch already in flight
    ///
    /// Returns `Ok(None)` when a newer call superseded this one; the
    /// cache is only replaced by the call that ran to completion.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails. The cache keeps its
    /// previous contents in that case.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ClientResult<Option<Vec<AudioList>>> {
        let token = self.flights.begin(LIST_ALL_KEY);
        let Some(result) = supersedable(&token, self.backend.get("/audio-lists")).await else {
            debug!("List fetch superseded");
            return Ok(None);
        };

        let lists: Vec<AudioList> = result?;
        *self.cache.write() = lists.clone();
        Ok(Some(lists))
    }

    /// Fetch one list with its audios, merging it into the cache
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ClientResult<AudioList> {
        let list: AudioList = self.backend.get(&format!("/audio-lists/{id}")).await?;

        let mut cache = self.cache.write();
        if let Some(entry) = cache.iter_mut().find(|entry| entry.id == list.id) {
            *entry = list.clone();
        } else {
            cache.push(list.clone());
        }
        drop(cache);

        Ok(list)
    }

    /// Create a list and reconcile the cache
    ///
    /// # Errors
    ///
    /// Returns a validation error before any network traffic when the
    /// request is malformed, or an API error when the backend rejects it.
    #[instrument(skip(self, request), fields(accountcode = %request.accountcode))]
    pub async fn create(&self, request: &CreateListRequest) -> ClientResult<AudioList> {
        let list = self.create_inner(request).await?;
        if self.strategy == ReconcileStrategy::FullReload {
            self.reload().await?;
        }
        info!(list_id = list.id, "Created audio list");
        Ok(list)
    }

    /// Create one list per day of the period, best effort
    ///
    /// The period itself is validated up front and a bad period fails the
    /// whole call. Per-day creation failures do not stop the remaining
    /// days; they are reported in the outcome instead.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid period, or when the final cache
    /// reload fails after the per-day calls.
    #[instrument(skip(self, request), fields(period = %request.period, anchor = %request.anchor))]
    pub async fn create_for_period(&self, request: &PeriodRequest) -> ClientResult<PeriodOutcome> {
        let windows = expand_period(
            request.period,
            request.anchor,
            request.start_time.as_deref(),
            request.end_time.as_deref(),
        )?;

        let mut outcome = PeriodOutcome::default();
        for window in windows {
            let create = CreateListRequest {
                accountcode: request.accountcode.clone(),
                condominium_id: request.condominium_id.clone(),
                start_date: window.start_datetime(),
                end_date: window.end_datetime(),
                notes: request.notes.clone(),
                created_by: request.created_by,
            };

            match self.create_inner(&create).await {
                Ok(list) => outcome.created.push(list),
                Err(error) => {
                    warn!(date = %window.date, %error, "Day creation failed");
                    outcome.failed.push(DayFailure {
                        date: window.date,
                        message: error.to_string(),
                    });
                }
            }
        }

        if self.strategy == ReconcileStrategy::FullReload {
            self.reload().await?;
        }
        info!(
            created = outcome.created.len(),
            failed = outcome.failed.len(),
            "Period creation finished"
        );
        Ok(outcome)
    }

    /// Update a list and reconcile the cache
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: &UpdateList) -> ClientResult<AudioList> {
        let list: AudioList = self
            .backend
            .patch(&format!("/audio-lists/{id}"), patch)
            .await?;

        match self.strategy {
            ReconcileStrategy::FullReload => self.reload().await?,
            ReconcileStrategy::PatchInPlace => {
                let mut cache = self.cache.write();
                if let Some(entry) = cache.iter_mut().find(|entry| entry.id == id) {
                    *entry = list.clone();
                }
            }
        }

        Ok(list)
    }

    /// Delete a list, rolling the cache back if the backend refuses
    ///
    /// The entry disappears from the cache before the request goes out.
    /// On failure the previous cache contents are restored wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        let snapshot = {
            let mut cache = self.cache.write();
            let snapshot = cache.clone();
            cache.retain(|entry| entry.id != id);
            snapshot
        };

        match self.backend.delete(&format!("/audio-lists/{id}")).await {
            Ok(()) => {
                if self.strategy == ReconcileStrategy::FullReload {
                    self.reload().await?;
                }
                info!(list_id = id, "Deleted audio list");
                Ok(())
            }
            Err(error) => {
                warn!(list_id = id, %error, "Delete failed, restoring cache");
                *self.cache.write() = snapshot;
                Err(error)
            }
        }
    }

    /// Fetch every transcribed audio across all lists
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self))]
    pub async fn transcribed(&self) -> ClientResult<Vec<AudioItem>> {
        self.backend.get("/audio-lists/transcribed").await
    }

    async fn create_inner(&self, request: &CreateListRequest) -> ClientResult<AudioList> {
        request.validate_fields()?;
        let list: AudioList = self.backend.post("/audio-lists", request).await?;

        if self.strategy == ReconcileStrategy::PatchInPlace {
            self.cache.write().insert(0, list.clone());
        }
        Ok(list)
    }

    // Mutations refresh through here rather than list_all so a reload
    // can never be superseded out from under the mutation that needs it.
    async fn reload(&self) -> ClientResult<()> {
        let lists: Vec<AudioList> = self.backend.get("/audio-lists").await?;
        *self.cache.write() = lists;
        Ok(())
    }
}
