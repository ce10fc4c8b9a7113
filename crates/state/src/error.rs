//! Error types for state persistence.

use thiserror::Error;

/// Errors that can occur when reading or writing a persisted snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
	/// The stored value is not valid JSON or does not match the schema.
	#[error("persisted snapshot is malformed: {0}")]
	Json(#[from] serde_json::Error),

	/// The stored value is JSON but not an object.
	#[error("persisted snapshot must be a JSON object")]
	NotAnObject,

	/// The snapshot was written by a newer schema.
	#[error("persisted snapshot version {found} is newer than supported version {supported}")]
	UnsupportedVersion { found: u64, supported: u32 },
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;
