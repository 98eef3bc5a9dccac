/*! Error types for store operations. */

use super::ValueKind;

/// Errors surfaced by conversions and by the internal serial contexts.
///
/// The public store facade never returns these for ordinary reads and writes;
/// absence of a value is `None`, not an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The worker behind a serial context has stopped.
  #[error("Serial context '{0}' is closed")]
  ContextClosed(String),

  /// A blocking call was issued from a job already running on the same context.
  #[error("Blocking call on serial context '{0}' from its own thread")]
  Reentrant(String),

  /// A job run through a blocking call panicked. The context keeps running.
  #[error("Job on serial context '{label}' panicked: {message}")]
  JobPanicked { label: String, message: String },

  /// The worker thread for a serial context could not be started.
  #[error("Failed to spawn serial context '{label}': {source}")]
  Spawn {
    label: String,
    #[source]
    source: std::io::Error,
  },

  /// The delivery thread pool could not be built.
  #[error("Failed to build delivery pool: {0}")]
  Pool(#[from] rayon::ThreadPoolBuildError),

  #[error("Type mismatch: expected {expected}, got {got}")]
  TypeMismatch { expected: ValueKind, got: ValueKind },

  #[error("Unknown parameter: {0}")]
  UnknownParameter(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
