// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map configuration section.

use serde::{Deserialize, Serialize};

/// Default URL prefix compiled assets are served under.
const DEFAULT_ASSET_PREFIX: &str = "/assets";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceMapConfigLayer {
	pub root: Option<String>,
	pub asset_prefix: Option<String>,
}

impl SourceMapConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.root.is_some() {
			self.root = other.root;
		}
		if other.asset_prefix.is_some() {
			self.asset_prefix = other.asset_prefix;
		}
	}

	pub fn finalize(self) -> SourceMapConfig {
		SourceMapConfig {
			root: self.root,
			asset_prefix: self
				.asset_prefix
				.unwrap_or_else(|| DEFAULT_ASSET_PREFIX.to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceMapConfig {
	/// Project root override; when unset each map's `sourceRoot` is used.
	pub root: Option<String>,
	pub asset_prefix: String,
}

impl Default for SourceMapConfig {
	fn default() -> Self {
		SourceMapConfigLayer::default().finalize()
	}
}
