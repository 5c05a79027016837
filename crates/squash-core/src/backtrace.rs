// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace wire types.
//!
//! Frame lines are 1-indexed (as printed in stack traces), columns are
//! 0-indexed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// A single stack frame.
///
/// Frames captured at runtime point into the compiled artifact and are
/// `Minified`. The symbolicator rewrites them into `Original` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
	Minified {
		/// Route of the compiled artifact (URL or logical path).
		url: String,
		line: u32,
		column: u32,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		symbol: Option<String>,
	},
	Original {
		/// Project-relative source file.
		file: String,
		line: u32,
		column: u32,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		symbol: Option<String>,
	},
}

impl Frame {
	pub fn minified(url: impl Into<String>, line: u32, column: u32) -> Self {
		Self::Minified {
			url: url.into(),
			line,
			column,
			symbol: None,
		}
	}

	pub fn frame_type(&self) -> FrameType {
		match self {
			Self::Minified { .. } => FrameType::Minified,
			Self::Original { .. } => FrameType::Original,
		}
	}

	pub fn symbol(&self) -> Option<&str> {
		match self {
			Self::Minified { symbol, .. } | Self::Original { symbol, .. } => symbol.as_deref(),
		}
	}
}

/// Discriminant of a [`Frame`], as carried in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
	Minified,
	Original,
}

impl fmt::Display for FrameType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Minified => write!(f, "minified"),
			Self::Original => write!(f, "original"),
		}
	}
}

impl FromStr for FrameType {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"minified" => Ok(Self::Minified),
			"original" => Ok(Self::Original),
			_ => Err(CoreError::InvalidFrameType(s.to_string())),
		}
	}
}

/// The stack of one thread of execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backtrace {
	pub name: String,
	/// Whether this thread raised the reported error.
	pub faulted: bool,
	pub backtrace: Vec<Frame>,
}

impl Backtrace {
	/// A faulted backtrace for the single thread a browser-style runtime has.
	pub fn active_thread(frames: Vec<Frame>) -> Self {
		Self {
			name: "Active Thread".to_string(),
			faulted: true,
			backtrace: frames,
		}
	}
}
