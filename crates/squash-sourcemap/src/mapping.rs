// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A single correspondence between a compiled position and a source position.

use serde::{Deserialize, Serialize};

/// One entry of a source map index.
///
/// All positions are 0-indexed. Serializes as the compact array
/// `[route, compiled_line, compiled_column, source_file, source_line,
/// source_column, symbol]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "MappingRecord", into = "MappingRecord")]
pub struct Mapping {
	/// URL or logical path the compiled artifact is served from.
	pub route: String,
	pub compiled_line: u32,
	pub compiled_column: u32,
	/// Project-relative path of the original source file.
	pub source_file: String,
	pub source_line: u32,
	pub source_column: u32,
	/// Original identifier name at this position, if the map recorded one.
	pub symbol: Option<String>,
}

impl Mapping {
	pub fn new(
		route: impl Into<String>,
		compiled_line: u32,
		compiled_column: u32,
		source_file: impl Into<String>,
		source_line: u32,
		source_column: u32,
		symbol: Option<String>,
	) -> Self {
		Self {
			route: route.into(),
			compiled_line,
			compiled_column,
			source_file: source_file.into(),
			source_line,
			source_column,
			symbol,
		}
	}

	/// Position of this mapping within its route.
	pub fn compiled_position(&self) -> (u32, u32) {
		(self.compiled_line, self.compiled_column)
	}
}

#[derive(Serialize, Deserialize)]
struct MappingRecord(String, u32, u32, String, u32, u32, Option<String>);

impl From<MappingRecord> for Mapping {
	fn from(r: MappingRecord) -> Self {
		Self::new(r.0, r.1, r.2, r.3, r.4, r.5, r.6)
	}
}

impl From<Mapping> for MappingRecord {
	fn from(m: Mapping) -> Self {
		Self(
			m.route,
			m.compiled_line,
			m.compiled_column,
			m.source_file,
			m.source_line,
			m.source_column,
			m.symbol,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_serializes_as_array() {
		let mapping = Mapping::new(
			"/example/file.js",
			0,
			0,
			"vendor/assets/foo.js",
			16,
			1,
			Some("src".to_string()),
		);
		let json = serde_json::to_string(&mapping).unwrap();
		assert_eq!(json, r#"["/example/file.js",0,0,"vendor/assets/foo.js",16,1,"src"]"#);
	}

	#[test]
	fn test_missing_symbol_is_null() {
		let json = r#"["/a.js",1,2,"a.coffee",3,4,null]"#;
		let mapping: Mapping = serde_json::from_str(json).unwrap();
		assert_eq!(mapping.symbol, None);
		assert_eq!(mapping.compiled_position(), (1, 2));
		assert_eq!(mapping.source_file, "a.coffee");
	}
}
