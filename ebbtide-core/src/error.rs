//! Engine error taxonomy.
//!
//! Every variant is local to one evaluation cycle; none is fatal to the
//! process. The outer loop decides retry cadence.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Fewer candles than the indicator warm-up requirement. Signals are
    /// suppressed, not guessed.
    #[error("insufficient data: have {have} candles, need {need}")]
    InsufficientData { have: usize, need: usize },

    /// Candle timestamps must be strictly increasing; the engine does not
    /// reorder or deduplicate.
    #[error("candle feed not monotonic: {prev_ms} ms followed by {next_ms} ms")]
    NonMonotonicFeed { prev_ms: i64, next_ms: i64 },

    /// Missing candles between consecutive timestamps. Flagged rather than
    /// silently computed over.
    #[error("gap in candle feed: {prev_ms} ms to {next_ms} ms exceeds interval {interval_ms} ms")]
    FeedGap {
        prev_ms: i64,
        next_ms: i64,
        interval_ms: i64,
    },

    /// The execution adapter reported the intent could not be filled. The
    /// state machine stays in its pre-attempt phase.
    #[error("order rejected: {reason}")]
    OrderRejected { reason: String },
}

impl EngineError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        EngineError::OrderRejected {
            reason: reason.into(),
        }
    }
}
