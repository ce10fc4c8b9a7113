//! Error types for session token decoding.

use thiserror::Error;

/// Errors that can occur when decoding a session token.
#[derive(Debug, Error)]
pub enum ParseError {
	/// The token is not JSON at all.
	#[error("session token is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// The token is JSON but not a non-empty array of slots.
	#[error("session token must be a non-empty array of slots")]
	NotSlotArray,

	/// A reference inside a container slot is not a decimal slot index.
	#[error("invalid slot reference {0:?}")]
	InvalidReference(String),

	/// A reference points past the last slot.
	#[error("slot reference {0} points past the end of the token")]
	DanglingReference(usize),

	/// A container slot holds a nested container instead of a reference.
	#[error("slot {0} holds an inline container")]
	InlineContainer(usize),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, ParseError>;
