// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map decoding and parsing.

use thiserror::Error;

/// Errors raised while decoding a Base64 VLQ token or a mappings segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	#[error("invalid byte {0:#04x} in base-64 VLQ string")]
	InvalidChar(u8),

	#[error("base-64 VLQ string unexpectedly terminated: {0:?}")]
	Unterminated(String),

	#[error("empty base-64 VLQ string")]
	Empty,

	#[error("base-64 VLQ value overflows 64 bits: {0:?}")]
	Overflow(String),

	#[error("segment {segment:?} on line {line} has {count} fields, expected 1, 4 or 5")]
	SegmentArity {
		line: usize,
		segment: String,
		count: usize,
	},
}

/// Errors that can occur while building a source map index.
#[derive(Debug, Error)]
pub enum SourceMapError {
	#[error(transparent)]
	Decode(#[from] DecodeError),

	#[error("only version 3 source maps are supported, got {0}")]
	UnsupportedVersion(u64),

	#[error("must specify a project root in the source map or options")]
	MissingRoot,

	#[error("invalid source map JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("source map document is not a JSON object")]
	NotAnObject,

	#[error("invalid source index {index} on line {line}")]
	InvalidSourceIndex { line: usize, index: i64 },

	#[error("invalid name index {index} on line {line}")]
	InvalidNameIndex { line: usize, index: i64 },

	#[error("negative {field} ({value}) on line {line}")]
	InvalidPosition {
		line: usize,
		field: &'static str,
		value: i64,
	},
}

impl SourceMapError {
	/// True when the document itself was readable but its mappings were not.
	pub fn is_decode_error(&self) -> bool {
		matches!(self, Self::Decode(_))
	}
}

pub type Result<T> = std::result::Result<T, SourceMapError>;
