// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace symbolication against a source map index.

use std::sync::Arc;

use squash_core::{Backtrace, Frame};
use tracing::{debug, instrument};

use crate::index::SourceMapIndex;

/// Rewrites minified stack frames into original-source frames.
///
/// Frame lines are 1-indexed while index lines are 0-indexed; the
/// symbolicator converts in both directions.
#[derive(Debug, Clone)]
pub struct Symbolicator {
	index: Arc<SourceMapIndex>,
}

impl Symbolicator {
	pub fn new(index: Arc<SourceMapIndex>) -> Self {
		Self { index }
	}

	pub fn index(&self) -> &SourceMapIndex {
		&self.index
	}

	/// Symbolicate every backtrace of an error report.
	#[instrument(skip(self, backtraces), fields(threads = backtraces.len()))]
	pub fn symbolicate(&self, backtraces: &[Backtrace]) -> Vec<Backtrace> {
		backtraces
			.iter()
			.map(|bt| Backtrace {
				name: bt.name.clone(),
				faulted: bt.faulted,
				backtrace: bt.backtrace.iter().map(|f| self.symbolicate_frame(f)).collect(),
			})
			.collect()
	}

	/// Symbolicate a single frame. Frames that are already original, or that
	/// have no mapping, come back unchanged.
	pub fn symbolicate_frame(&self, frame: &Frame) -> Frame {
		let Frame::Minified {
			url,
			line,
			column,
			symbol,
		} = frame
		else {
			return frame.clone();
		};

		let Some(compiled_line) = line.checked_sub(1) else {
			return frame.clone();
		};

		match self.index.resolve(url, compiled_line, *column) {
			Some(mapping) => {
				debug!(
					url = %url,
					line,
					column,
					source_file = %mapping.source_file,
					source_line = mapping.source_line,
					"symbolicated frame"
				);
				Frame::Original {
					file: mapping.source_file.clone(),
					line: mapping.source_line + 1,
					column: mapping.source_column,
					symbol: mapping.symbol.clone().or_else(|| symbol.clone()),
				}
			}
			None => {
				debug!(url = %url, line, column, "no mapping for frame");
				frame.clone()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mapping::Mapping;

	fn symbolicator() -> Symbolicator {
		let index: SourceMapIndex = vec![
			Mapping::new("/assets/app.js", 0, 0, "app/a.coffee", 9, 2, Some("init".to_string())),
			Mapping::new("/assets/app.js", 0, 40, "app/b.coffee", 4, 0, None),
		]
		.into_iter()
		.collect();
		Symbolicator::new(Arc::new(index))
	}

	#[test]
	fn test_minified_frame_becomes_original() {
		let frame = symbolicator().symbolicate_frame(&Frame::minified("/assets/app.js", 1, 12));
		assert_eq!(
			frame,
			Frame::Original {
				file: "app/a.coffee".to_string(),
				line: 10,
				column: 2,
				symbol: Some("init".to_string()),
			}
		);
	}

	#[test]
	fn test_frame_symbol_kept_when_mapping_has_none() {
		let frame = Frame::Minified {
			url: "/assets/app.js".to_string(),
			line: 1,
			column: 41,
			symbol: Some("t".to_string()),
		};
		let symbolicated = symbolicator().symbolicate_frame(&frame);
		assert_eq!(symbolicated.symbol(), Some("t"));
	}

	#[test]
	fn test_unmapped_frames_unchanged() {
		let s = symbolicator();
		let unknown = Frame::minified("/assets/other.js", 1, 0);
		let line_zero = Frame::minified("/assets/app.js", 0, 0);
		assert_eq!(s.symbolicate_frame(&unknown), unknown);
		assert_eq!(s.symbolicate_frame(&line_zero), line_zero);
	}

	#[test]
	fn test_symbolicate_backtraces() {
		let backtraces = vec![Backtrace::active_thread(vec![
			Frame::minified("/assets/app.js", 1, 45),
			Frame::minified("/assets/vendor.js", 3, 3),
		])];
		let result = symbolicator().symbolicate(&backtraces);

		assert_eq!(result.len(), 1);
		assert!(result[0].faulted);
		assert!(matches!(
			&result[0].backtrace[0],
			Frame::Original { file, line: 5, .. } if file == "app/b.coffee"
		));
		assert_eq!(result[0].backtrace[1], backtraces[0].backtrace[1]);
	}
}
