//! Error types for configuration and mounting.

use thiserror::Error;

/// Errors raised while resolving a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or types.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// An option that must hold an absolute URL does not.
	#[error("invalid URL for {field}: {source}")]
	InvalidUrl {
		/// Option name as written by the host page.
		field: &'static str,
		/// The underlying parse error.
		source: url::ParseError,
	},
}

/// Errors rejecting a [`crate::Workspace::mount`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
	/// The container mapping is empty or names an unknown unit.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
}

/// Result type for configuration operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
