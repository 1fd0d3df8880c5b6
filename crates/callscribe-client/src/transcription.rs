//! Attaching human and AI transcripts to audio items

use crate::audios::AudioCollection;
use crate::error::ClientResult;
use callscribe_core::Error;
use callscribe_core::tags::sanitize_tags;
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct HumanPayload {
    transcript_human: String,
    transcriber_id: i64,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AiPayload {
    transcript_ai: String,
}

/// Writes transcripts for one collection's audios
///
/// Obtained from [`AudioCollection::transcription`]; saves go through
/// the collection's backend and trigger a collection reload so the
/// cached items pick up the new text.
#[derive(Debug)]
pub struct TranscriptionWriter<'a> {
    collection: &'a AudioCollection,
}

impl<'a> TranscriptionWriter<'a> {
    pub(crate) const fn new(collection: &'a AudioCollection) -> Self {
        Self { collection }
    }

    /// Save a manually written transcript with optional tags
    ///
    /// The text must not trim to empty. Tags are normalized and
    /// deduplicated against the audio's existing tags; candidates that do
    /// not survive sanitization are dropped silently rather than failing
    /// the save.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text, or an API error when
    /// the backend rejects the save.
    #[instrument(skip(self, text, tags))]
    pub async fn save_human(
        &self,
        audio_id: i64,
        text: &str,
        tags: &[String],
    ) -> ClientResult<()> {
        let transcript = text.trim();
        if transcript.is_empty() {
            return Err(Error::validation("transcript_human", "cannot be empty").into());
        }

        let existing = self.collection.existing_tags(audio_id);
        let tags = sanitize_tags(tags, &existing);
        let payload = HumanPayload {
            transcript_human: transcript.to_string(),
            transcriber_id: self.collection.transcriber_id(),
            tags,
        };

        self.collection
            .backend()
            .post_discard(
                &format!("/audio-lists/{audio_id}/transcription/human"),
                &payload,
            )
            .await?;

        info!(audio_id, tags = payload.tags.len(), "Saved human transcript");
        self.collection.load().await?;
        Ok(())
    }

    /// Save a transcript produced by an external transcription tool
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty text, or an API error when
    /// the backend rejects the save.
    #[instrument(skip(self, text))]
    pub async fn save_ai(&self, audio_id: i64, text: &str) -> ClientResult<()> {
        let transcript = text.trim();
        if transcript.is_empty() {
            return Err(Error::validation("transcript_ai", "cannot be empty").into());
        }

        self.collection
            .backend()
            .post_discard(
                &format!("/audio-lists/{audio_id}/transcription/ai"),
                &AiPayload {
                    transcript_ai: transcript.to_string(),
                },
            )
            .await?;

        info!(audio_id, "Saved AI transcript");
        self.collection.load().await?;
        Ok(())
    }
}
