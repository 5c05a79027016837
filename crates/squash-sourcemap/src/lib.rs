// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map engine for Squash error reporting.
//!
//! This crate provides functionality for:
//! - Decoding Base64 VLQ mapping segments
//! - Parsing version 3 source maps into a queryable index
//! - Combining the maps of bundled assets
//! - Resolving a compiled `(route, line, column)` to its original source
//! - Symbolicating minified backtraces
//!
//! # Example
//!
//! ```
//! use squash_sourcemap::{parse, ParseOptions};
//!
//! let json = r#"{
//!     "version": 3,
//!     "sourceRoot": "/project/",
//!     "sources": ["/project/app/foo.coffee"],
//!     "names": ["init"],
//!     "mappings": "AAAAA"
//! }"#;
//!
//! let index = parse(json, "/assets/foo.js", &ParseOptions::default()).unwrap();
//! let mapping = index.resolve("/assets/foo.js", 0, 12).unwrap();
//! assert_eq!(mapping.source_file, "app/foo.coffee");
//! assert_eq!(mapping.symbol.as_deref(), Some("init"));
//! ```

pub mod error;
pub mod index;
pub mod mapping;
pub mod pipeline;
pub mod processor;
pub mod sourcemap;
pub mod vlq;

pub use error::{DecodeError, Result, SourceMapError};
pub use index::SourceMapIndex;
pub use mapping::Mapping;
pub use pipeline::{build_source_map, combine, Asset, InMemorySourceMaps, PipelineOptions, SourceMapResolver};
pub use processor::Symbolicator;
pub use sourcemap::{parse, parse_into, parse_slice, ParseOptions};
pub use vlq::{decode_char, decode_segment};
