// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map v3 parsing.
//!
//! Turns a v3 JSON document into [`Mapping`]s for one compiled route. Source
//! paths are made project-relative by stripping the project root, taken from
//! the caller's override or the document's `sourceRoot`.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{DecodeError, Result, SourceMapError};
use crate::index::SourceMapIndex;
use crate::mapping::Mapping;
use crate::vlq::decode_segment;

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u64,
	#[serde(default)]
	source_root: Option<String>,
	#[serde(default)]
	sources: Vec<String>,
	#[serde(default)]
	names: Vec<String>,
	#[serde(default)]
	mappings: String,
}

/// Options for [`parse`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
	/// Overrides the document's `sourceRoot` as the project root.
	pub root: Option<String>,
}

impl ParseOptions {
	pub fn with_root(root: impl Into<String>) -> Self {
		Self {
			root: Some(root.into()),
		}
	}
}

/// Running totals carried across the whole mappings string.
#[derive(Debug, Default)]
struct Counters {
	source_file: i64,
	source_line: i64,
	source_column: i64,
	name: i64,
}

/// Parse a v3 source map document into a new index.
pub fn parse(json: &str, route: &str, options: &ParseOptions) -> Result<SourceMapIndex> {
	parse_slice(json.as_bytes(), route, options)
}

/// Parse a v3 source map document from raw bytes into a new index.
#[instrument(skip(data, options), fields(bytes = data.len()))]
pub fn parse_slice(data: &[u8], route: &str, options: &ParseOptions) -> Result<SourceMapIndex> {
	let raw: RawSourceMap = serde_json::from_slice(data)?;
	let mappings = decode_document(raw, route, options)?;
	debug!(route, count = mappings.len(), "parsed source map");
	Ok(mappings.into_iter().collect())
}

/// Parse a v3 source map document into an existing index.
pub fn parse_into(
	index: &mut SourceMapIndex,
	json: &str,
	route: &str,
	options: &ParseOptions,
) -> Result<()> {
	let raw: RawSourceMap = serde_json::from_str(json)?;
	index.extend(decode_document(raw, route, options)?);
	Ok(())
}

/// Normalize a project root so it ends with exactly one separator.
pub fn normalize_root(root: &str) -> String {
	if root.ends_with('/') {
		root.to_string()
	} else {
		format!("{root}/")
	}
}

fn decode_document(raw: RawSourceMap, route: &str, options: &ParseOptions) -> Result<Vec<Mapping>> {
	if raw.version != 3 {
		return Err(SourceMapError::UnsupportedVersion(raw.version));
	}

	let root = options
		.root
		.as_deref()
		.or(raw.source_root.as_deref())
		.map(normalize_root)
		.ok_or(SourceMapError::MissingRoot)?;

	let sources: Vec<String> = raw
		.sources
		.iter()
		.map(|source| source.strip_prefix(root.as_str()).unwrap_or(source).to_string())
		.collect();

	decode_mappings(&raw.mappings, route, &sources, &raw.names)
}

fn decode_mappings(
	mappings: &str,
	route: &str,
	sources: &[String],
	names: &[String],
) -> Result<Vec<Mapping>> {
	let mut entries = Vec::new();
	let mut counters = Counters::default();

	for (line, group) in mappings.split(';').enumerate() {
		let mut compiled_column = 0i64;

		for segment in group.split(',').filter(|s| !s.is_empty()) {
			let values = decode_segment(segment)?;
			if !matches!(values.len(), 1 | 4 | 5) {
				return Err(DecodeError::SegmentArity {
					line,
					segment: segment.to_string(),
					count: values.len(),
				}
				.into());
			}

			compiled_column += values[0];
			if values.len() >= 4 {
				counters.source_file += values[1];
				counters.source_line += values[2];
				counters.source_column += values[3];
			}
			let symbol = match values.get(4) {
				Some(delta) => {
					counters.name += delta;
					Some(lookup(names, counters.name).ok_or(SourceMapError::InvalidNameIndex {
						line,
						index: counters.name,
					})?)
				}
				None => None,
			};

			let source_file =
				lookup(sources, counters.source_file).ok_or(SourceMapError::InvalidSourceIndex {
					line,
					index: counters.source_file,
				})?;

			entries.push(Mapping {
				route: route.to_string(),
				compiled_line: to_position(line as i64, line, "compiled line")?,
				compiled_column: to_position(compiled_column, line, "compiled column")?,
				source_file,
				source_line: to_position(counters.source_line, line, "source line")?,
				source_column: to_position(counters.source_column, line, "source column")?,
				symbol,
			});
		}
	}

	Ok(entries)
}

fn lookup(table: &[String], index: i64) -> Option<String> {
	usize::try_from(index)
		.ok()
		.and_then(|i| table.get(i))
		.cloned()
}

fn to_position(value: i64, line: usize, field: &'static str) -> Result<u32> {
	u32::try_from(value).map_err(|_| SourceMapError::InvalidPosition { line, field, value })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn document(source_root: Option<&str>, sources: &[&str], names: &[&str], mappings: &str) -> String {
		serde_json::json!({
			"version": 3,
			"sourceRoot": source_root,
			"sources": sources,
			"names": names,
			"mappings": mappings,
		})
		.to_string()
	}

	#[test]
	fn test_strips_source_root() {
		let json = document(Some("/project/"), &["/project/foo.js"], &[], "AAAA");
		let index = parse(&json, "/foo.js", &ParseOptions::default()).unwrap();

		let mapping = index.resolve("/foo.js", 0, 0).unwrap();
		assert_eq!(mapping.source_file, "foo.js");
		assert_eq!(mapping.symbol, None);
	}

	#[test]
	fn test_root_without_trailing_separator() {
		let json = document(Some("/project"), &["/project/lib/foo.js"], &[], "AAAA");
		let index = parse(&json, "/foo.js", &ParseOptions::default()).unwrap();

		assert_eq!(index.resolve("/foo.js", 0, 0).unwrap().source_file, "lib/foo.js");
	}

	#[test]
	fn test_override_root_wins() {
		let json = document(
			Some("/project/"),
			&["/elsewhere/app/foo.js", "/project/bar.js"],
			&[],
			"AAAA,ECAA",
		);
		let index = parse(&json, "/foo.js", &ParseOptions::with_root("/elsewhere")).unwrap();

		assert_eq!(index.resolve("/foo.js", 0, 0).unwrap().source_file, "app/foo.js");
		// not under the override root, so left untouched
		assert_eq!(index.resolve("/foo.js", 0, 2).unwrap().source_file, "/project/bar.js");
	}

	#[test]
	fn test_override_root_without_source_root() {
		let json = document(None, &["/srv/app/a.js"], &[], "AAAA");
		let index = parse(&json, "/a.js", &ParseOptions::with_root("/srv/app")).unwrap();
		assert_eq!(index.len(), 1);
	}

	#[test]
	fn test_missing_root() {
		let json = document(None, &["foo.js"], &[], "AAAA");
		let result = parse(&json, "/foo.js", &ParseOptions::default());
		assert!(matches!(result, Err(SourceMapError::MissingRoot)));
	}

	#[test]
	fn test_unsupported_version() {
		let json = r#"{"version": 2, "sourceRoot": "/", "sources": [], "names": [], "mappings": ""}"#;
		let result = parse(json, "/foo.js", &ParseOptions::default());
		assert!(matches!(result, Err(SourceMapError::UnsupportedVersion(2))));
	}

	#[test]
	fn test_invalid_json() {
		let result = parse("{not json", "/foo.js", &ParseOptions::default());
		assert!(matches!(result, Err(SourceMapError::InvalidJson(_))));
	}

	#[test]
	fn test_column_resets_per_line_but_source_counters_persist() {
		// line 0: col 0 -> line 0; col 4 -> line 1
		// line 1: col 2 -> line 1 + 1 = 2
		let json = document(Some("/"), &["/a.coffee"], &[], "AAAA,IACA;EACA");
		let index = parse(&json, "/a.js", &ParseOptions::default()).unwrap();

		let mappings: Vec<_> = index
			.mappings()
			.map(|m| (m.compiled_line, m.compiled_column, m.source_line))
			.collect();
		assert_eq!(mappings, vec![(0, 0, 0), (0, 4, 1), (1, 2, 2)]);
	}

	#[test]
	fn test_empty_groups_advance_lines() {
		let json = document(Some("/"), &["/a.coffee"], &[], ";;AAAA");
		let index = parse(&json, "/a.js", &ParseOptions::default()).unwrap();

		assert_eq!(index.len(), 1);
		assert!(index.resolve("/a.js", 2, 0).is_some());
	}

	#[test]
	fn test_symbol_only_when_segment_has_name() {
		// second segment carries no name delta, so it has no symbol even
		// though the name counter still points at "src"
		let json = document(Some("/"), &["/a.js"], &["src"], "AAAAA,CAAC");
		let index = parse(&json, "/out.js", &ParseOptions::default()).unwrap();

		assert_eq!(index.resolve("/out.js", 0, 0).unwrap().symbol.as_deref(), Some("src"));
		assert_eq!(index.resolve("/out.js", 0, 1).unwrap().symbol, None);
	}

	#[test]
	fn test_single_field_segment_uses_running_source() {
		let json = document(Some("/"), &["/a.js"], &[], "AAEA,G");
		let index = parse(&json, "/out.js", &ParseOptions::default()).unwrap();

		let mapping = index.resolve("/out.js", 0, 3).unwrap();
		assert_eq!(mapping.compiled_column, 3);
		assert_eq!(mapping.source_line, 2);
	}

	#[test]
	fn test_unterminated_segment_is_decode_error() {
		let json = document(Some("/"), &["/a.js"], &[], "AAg");
		let err = parse(&json, "/out.js", &ParseOptions::default()).unwrap_err();
		assert!(err.is_decode_error());
	}

	#[test]
	fn test_bad_segment_arity() {
		let json = document(Some("/"), &["/a.js"], &[], "AA");
		let err = parse(&json, "/out.js", &ParseOptions::default()).unwrap_err();
		assert!(matches!(
			err,
			SourceMapError::Decode(DecodeError::SegmentArity { count: 2, .. })
		));
	}

	#[test]
	fn test_source_index_out_of_range() {
		let json = document(Some("/"), &["/a.js"], &[], "ACAA");
		let err = parse(&json, "/out.js", &ParseOptions::default()).unwrap_err();
		assert!(matches!(err, SourceMapError::InvalidSourceIndex { index: 1, .. }));
	}

	#[test]
	fn test_negative_source_line() {
		let json = document(Some("/"), &["/a.js"], &[], "AADA");
		let err = parse(&json, "/out.js", &ParseOptions::default()).unwrap_err();
		assert!(matches!(err, SourceMapError::InvalidPosition { value: -1, .. }));
	}

	#[test]
	fn test_parse_into_appends() {
		let mut index = SourceMapIndex::new();
		let first = document(Some("/"), &["/a.coffee"], &[], "AAAA");
		let second = document(Some("/"), &["/b.coffee"], &[], "AAAA");

		parse_into(&mut index, &first, "/a.js", &ParseOptions::default()).unwrap();
		parse_into(&mut index, &second, "/b.js", &ParseOptions::default()).unwrap();

		assert_eq!(index.len(), 2);
		assert_eq!(index.resolve("/b.js", 0, 0).unwrap().source_file, "b.coffee");
	}
}
