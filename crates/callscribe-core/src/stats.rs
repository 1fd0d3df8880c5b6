//! Aggregate figures for dashboard cards

use crate::types::AudioItem;
use serde::Serialize;

/// Totals for one audio list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListTotals {
    /// Number of audio items
    pub total_audios: usize,
    /// Items with any transcription text
    pub transcribed: usize,
    /// Sum of known durations in seconds
    pub total_duration_seconds: i64,
}

/// Transcription coverage split by source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TranscriptionBreakdown {
    /// Items with an operator transcription
    pub human: usize,
    /// Items with a machine transcription
    pub ai: usize,
    /// Items with both
    pub both: usize,
    /// Items with neither
    pub untranscribed: usize,
}

/// Compute list totals from its audio items
#[must_use]
pub fn list_totals(audios: &[AudioItem]) -> ListTotals {
    ListTotals {
        total_audios: audios.len(),
        transcribed: audios.iter().filter(|a| a.is_transcribed()).count(),
        total_duration_seconds: audios.iter().filter_map(|a| a.duration).sum(),
    }
}

/// Split transcription coverage by source
#[must_use]
pub fn transcription_breakdown(audios: &[AudioItem]) -> TranscriptionBreakdown {
    let mut breakdown = TranscriptionBreakdown {
        human: 0,
        ai: 0,
        both: 0,
        untranscribed: 0,
    };

    for audio in audios {
        let human = audio.has_human_transcript();
        let ai = audio.has_ai_transcript();
        if human {
            breakdown.human += 1;
        }
        if ai {
            breakdown.ai += 1;
        }
        if human && ai {
            breakdown.both += 1;
        }
        if !human && !ai {
            breakdown.untranscribed += 1;
        }
    }

    breakdown
}

/// Format a duration in seconds the way the dashboard cards display it
///
/// `4530` becomes `1h 15min`, `750` becomes `12min`, `45` becomes `45s`.
/// Negative inputs clamp to zero.
#[must_use]
pub fn format_duration(seconds: i64) -> String {
    let total = seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}min")
    } else if minutes > 0 {
        format!("{minutes}min")
    } else {
        format!("{secs}s")
    }
}
