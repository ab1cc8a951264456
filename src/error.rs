use std::sync::Arc;

/// Boxed error type produced by loader implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for load operations.
///
/// Errors are `Clone` because the outcome of one in-flight load is fanned out
/// to every caller that joined it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    /// A single attempt exceeded its per-attempt deadline.
    #[error("load attempt timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The loader itself failed. The loader's error payload is preserved.
    #[error("loader failed: {error}")]
    Loader { error: Arc<BoxError> },

    /// Every attempt failed; wraps the error from the last attempt.
    #[error("load for key '{key}' gave up after {attempts} attempts: {last}")]
    Exhausted {
        key: String,
        attempts: u32,
        last: Box<LoadError>,
    },
}

impl LoadError {
    /// Wrap a loader's error payload.
    pub(crate) fn loader(error: BoxError) -> Self {
        LoadError::Loader {
            error: Arc::new(error),
        }
    }

    /// Whether this failure is attributable to an attempt timeout.
    ///
    /// For `Exhausted` this inspects the last underlying attempt.
    pub fn is_timeout(&self) -> bool {
        match self {
            LoadError::Timeout { .. } => true,
            LoadError::Loader { .. } => false,
            LoadError::Exhausted { last, .. } => last.is_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_reports_timeout_of_last_attempt() {
        let err = LoadError::Exhausted {
            key: "bundle".to_string(),
            attempts: 4,
            last: Box::new(LoadError::Timeout { timeout_ms: 50 }),
        };
        assert!(err.is_timeout());

        let err = LoadError::Exhausted {
            key: "bundle".to_string(),
            attempts: 4,
            last: Box::new(LoadError::loader("connection reset".into())),
        };
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_display_includes_key_and_attempts() {
        let err = LoadError::Exhausted {
            key: "wasm:ffmpeg".to_string(),
            attempts: 2,
            last: Box::new(LoadError::Timeout { timeout_ms: 100 }),
        };
        let msg = err.to_string();
        assert!(msg.contains("wasm:ffmpeg"));
        assert!(msg.contains("2 attempts"));
    }
}
