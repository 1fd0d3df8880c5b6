//! Audio items within one list, including the bulk import path
//!
//! The collection mirrors the server: reads replace the cache wholesale
//! and the bulk save never appends locally. The server decides what was
//! created versus skipped; the client only reports those counters.

use crate::error::ClientResult;
use crate::http::Backend;
use crate::session::Session;
use crate::transcription::TranscriptionWriter;
use callscribe_core::Error;
use callscribe_core::types::{AudioItem, AudioList, TicketRecord};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Counters returned by a bulk save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BulkOutcome {
    /// Items the server inserted
    pub created: u32,
    /// Items the server already had and left alone
    pub skipped: u32,
}

#[derive(Debug, Serialize)]
struct BulkItem {
    title: String,
    url: String,
    external_id: String,
    linkedid: String,
    duration: i64,
}

#[derive(Debug, Serialize)]
struct BulkRequest {
    items: Vec<BulkItem>,
}

/// The audio items of one list, cached locally
#[derive(Debug)]
pub struct AudioCollection {
    backend: Backend,
    list_id: i64,
    transcriber_id: i64,
    cache: RwLock<Vec<AudioItem>>,
}

impl AudioCollection {
    /// Create a collection for `list_id` under the session's credentials
    #[must_use]
    pub fn new(backend: &Backend, session: &Session, list_id: i64) -> Self {
        Self {
            backend: session.authorize(backend),
            list_id,
            transcriber_id: session.user.id,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// The list this collection belongs to
    #[must_use]
    pub const fn list_id(&self) -> i64 {
        self.list_id
    }

    /// Snapshot of the cached audio items
    #[must_use]
    pub fn cached(&self) -> Vec<AudioItem> {
        self.cache.read().clone()
    }

    /// Refetch the list and replace the cached items with its audios
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    #[instrument(skip(self), fields(list_id = self.list_id))]
    pub async fn load(&self) -> ClientResult<Vec<AudioItem>> {
        let list: AudioList = self
            .backend
            .get(&format!("/audio-lists/{}", self.list_id))
            .await?;

        *self.cache.write() = list.audios.clone();
        Ok(list.audios)
    }

    /// Import the selected tickets into the list with one request
    ///
    /// Every selected ticket must carry a secure recording URL; any that
    /// does not fails the whole save before the request goes out. On
    /// success the collection is reloaded from the server rather than
    /// patched locally.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or audio-less selection,
    /// or an API error when the backend rejects the save. There is no
    /// partial success.
    #[instrument(skip(self, selection), fields(list_id = self.list_id, selected = selection.len()))]
    pub async fn save_bulk(&self, selection: &[TicketRecord]) -> ClientResult<BulkOutcome> {
        if selection.is_empty() {
            return Err(Error::validation("items", "select at least one ticket").into());
        }

        let mut items = Vec::with_capacity(selection.len());
        for ticket in selection {
            let Some(url) = ticket.audiorecord.as_ref().filter(|_| ticket.has_audio) else {
                return Err(Error::validation(
                    "items",
                    format!("ticket {} has no recording to import", ticket.id),
                )
                .into());
            };

            items.push(BulkItem {
                title: ticket.linkedid.clone(),
                url: url.clone(),
                external_id: ticket.id.clone(),
                linkedid: ticket.linkedid.clone(),
                duration: ticket.duration,
            });
        }

        let outcome: BulkOutcome = self
            .backend
            .post(
                &format!("/audio-lists/{}/audios/bulk", self.list_id),
                &BulkRequest { items },
            )
            .await?;

        info!(
            created = outcome.created,
            skipped = outcome.skipped,
            "Bulk import finished"
        );
        self.load().await?;
        Ok(outcome)
    }

    /// Remove one audio from the list and the cache
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails; the cache keeps the item
    /// in that case.
    #[instrument(skip(self), fields(list_id = self.list_id))]
    pub async fn delete_audio(&self, audio_id: i64) -> ClientResult<()> {
        self.backend
            .delete(&format!(
                "/audio-lists/{}/audios/{audio_id}",
                self.list_id
            ))
            .await?;

        self.cache
            .write()
            .retain(|audio| audio.id != Some(audio_id));
        info!(audio_id, "Deleted audio");
        Ok(())
    }

    /// Writer for attaching transcripts to this collection's audios
    #[must_use]
    pub const fn transcription(&self) -> TranscriptionWriter<'_> {
        TranscriptionWriter::new(self)
    }

    pub(crate) const fn backend(&self) -> &Backend {
        &self.backend
    }

    pub(crate) const fn transcriber_id(&self) -> i64 {
        self.transcriber_id
    }

    /// Tags already on the given audio, per the cache
    pub(crate) fn existing_tags(&self, audio_id: i64) -> Vec<String> {
        self.cache
            .read()
            .iter()
            .find(|audio| audio.id == Some(audio_id))
            .map(|audio| audio.tags.clone())
            .unwrap_or_default()
    }
}
