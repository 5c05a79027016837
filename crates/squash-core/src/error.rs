// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for core Squash types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
	#[error("invalid frame type: {0}")]
	InvalidFrameType(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
