//! Timing-based speech metrics derived from a word-level transcript.
//!
//! Everything in this module is pure: the same words and duration always
//! produce the same [`TechnicalMetrics`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum silence between two consecutive words that counts as a pause.
pub const DEFAULT_PAUSE_THRESHOLD_SECS: f64 = 0.5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A transcript token with its position in the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    pub word: String,
    /// Offset in seconds from the start of the recording.
    pub start: f64,
    pub end: f64,
    /// Provider confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Silence between two consecutive words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pause {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// Aggregate of all pauses in one recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PauseStatistics {
    pub total_pause_time: f64,
    pub pause_count: usize,
}

/// The fixed set of speech statistics stored with every session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalMetrics {
    /// Reported by the speech provider, never recomputed.
    pub duration_seconds: f64,
    pub word_count: u32,
    /// Words per minute, one decimal place.
    pub wpm: f64,
    /// Share of the recording spent in pauses, one decimal place.
    pub pause_percentage: f64,
    /// Provider aggregate confidence, two decimal places.
    pub average_confidence: f64,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Find every gap between consecutive words longer than `threshold_secs`.
pub fn detect_pauses(words: &[TimedWord], threshold_secs: f64) -> Vec<Pause> {
    words
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1].start - pair[0].end;
            (gap > threshold_secs).then(|| Pause {
                start: pair[0].end,
                end: pair[1].start,
                duration: gap,
            })
        })
        .collect()
}

/// Sum pause durations and count pauses.
pub fn pause_statistics(pauses: &[Pause]) -> PauseStatistics {
    PauseStatistics {
        total_pause_time: pauses.iter().map(|p| p.duration).sum(),
        pause_count: pauses.len(),
    }
}

/// Derive [`TechnicalMetrics`] from a word sequence and the reported duration.
///
/// Rates are zero when the duration is zero. A negative or non-finite
/// duration is a caller error and is rejected before anything is computed.
pub fn derive_metrics(
    words: &[TimedWord],
    duration_seconds: f64,
    average_confidence: f64,
    pause_threshold_secs: f64,
) -> Result<TechnicalMetrics, CoreError> {
    if !duration_seconds.is_finite() || duration_seconds < 0.0 {
        return Err(CoreError::Validation(format!(
            "Recording duration must be a non-negative number of seconds, got {duration_seconds}"
        )));
    }

    let word_count = words.len() as u32;
    let stats = pause_statistics(&detect_pauses(words, pause_threshold_secs));

    let (wpm, pause_percentage) = if duration_seconds > 0.0 {
        (
            round_to(f64::from(word_count) / (duration_seconds / 60.0), 1),
            round_to(stats.total_pause_time / duration_seconds * 100.0, 1),
        )
    } else {
        (0.0, 0.0)
    };

    Ok(TechnicalMetrics {
        duration_seconds,
        word_count,
        wpm,
        pause_percentage,
        average_confidence: round_to(average_confidence, 2),
    })
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
