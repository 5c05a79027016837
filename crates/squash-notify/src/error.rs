// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the notifier.

use thiserror::Error;

/// Result type alias for notifier operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors that can occur while configuring the notifier or sending a report.
#[derive(Debug, Error)]
pub enum NotifyError {
	/// A required configuration field was not set.
	#[error("missing required notifier configuration: {0}")]
	MissingConfig(&'static str),

	/// An ignored-message pattern failed to compile.
	#[error("invalid ignored message pattern for {class_name}: {source}")]
	InvalidPattern {
		class_name: String,
		#[source]
		source: regex::Error,
	},

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error.
	#[error("server error (status {status}): {message}")]
	ServerError {
		/// HTTP status code.
		status: u16,
		/// Error message from server.
		message: String,
	},

	/// Failed to serialize the report.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),
}
