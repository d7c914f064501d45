//! Error-handling strategy applied once retries are exhausted.

/// Final disposition of a request that failed after the retry policy gave up.
///
/// Cancellation is special-cased: a cancelled request only rejects when
/// `reject_cancelled` is set, regardless of the active strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStrategy {
    /// Reject the returned future with the error (default).
    #[default]
    Reject,
    /// Resolve with the configured `default_response` and discard the error
    /// from the visible result.
    DefaultResponse,
    /// Return a future that never settles. Fire-and-forget call sites only;
    /// never await this unconditionally.
    Silent,
    /// Resolve with both `data` (fallback/partial) and `error` populated so
    /// the caller can branch without a rejection path.
    SoftFail,
}

impl ErrorStrategy {
    /// Whether this strategy resolves rather than rejects on failure.
    #[must_use]
    pub fn resolves_errors(self) -> bool {
        !matches!(self, ErrorStrategy::Reject)
    }
}
