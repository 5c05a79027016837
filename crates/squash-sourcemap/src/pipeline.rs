// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asset pipeline adapter.
//!
//! Builds the source map for a compiled asset: plain assets get an identity
//! map (every compiled line maps to the same line of the file it came from),
//! bundles combine the maps of the assets they include, in inclusion order.
//! Also rewrites the `file`/`sources` fields of maps emitted by external
//! compilers and minifiers so they point at project paths, and names the
//! cache files those maps are written to.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use crate::error::{Result, SourceMapError};
use crate::index::SourceMapIndex;
use crate::mapping::Mapping;

/// Default URL prefix compiled assets are served under.
pub const DEFAULT_ASSET_PREFIX: &str = "/assets";

/// Lookup of already-built source maps by logical path.
///
/// Implementations typically sit on top of the pipeline's asset cache.
pub trait SourceMapResolver: Send + Sync {
	/// Return the map for an included asset, or `None` if it has none.
	fn resolve_map(&self, logical_path: &str) -> Result<Option<SourceMapIndex>>;
}

/// In-memory resolver for testing and simple use cases.
#[derive(Debug, Default)]
pub struct InMemorySourceMaps {
	maps: HashMap<String, SourceMapIndex>,
}

impl InMemorySourceMaps {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, logical_path: &str, map: SourceMapIndex) {
		self.maps.insert(logical_path.to_string(), map);
	}
}

impl SourceMapResolver for InMemorySourceMaps {
	fn resolve_map(&self, logical_path: &str) -> Result<Option<SourceMapIndex>> {
		Ok(self.maps.get(logical_path).cloned())
	}
}

/// Where assets live and how they are served.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
	/// Project root; asset pathnames under it are made relative.
	pub project_root: PathBuf,
	/// URL prefix compiled assets are served under.
	pub asset_prefix: String,
}

impl PipelineOptions {
	pub fn new(project_root: impl Into<PathBuf>) -> Self {
		Self {
			project_root: project_root.into(),
			asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
		}
	}

	pub fn asset_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.asset_prefix = prefix.into();
		self
	}
}

/// A compiled asset handed over by the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Asset<'a> {
	/// Compiled text.
	pub text: &'a str,
	/// Path the asset is requested by, e.g. `application.js`.
	pub logical_path: &'a str,
	/// File the asset was read from.
	pub pathname: &'a Path,
}

/// Build the source map for a compiled asset.
///
/// With `included_paths` empty the asset is treated as a plain asset and
/// mapped line-for-line onto its own source file. Otherwise the maps of the
/// included assets are combined in order; includes the resolver has no map
/// for are skipped.
#[instrument(skip(asset, resolver, options), fields(logical_path = asset.logical_path, includes = included_paths.len()))]
pub fn build_source_map(
	asset: Asset<'_>,
	included_paths: &[String],
	resolver: &dyn SourceMapResolver,
	options: &PipelineOptions,
) -> Result<SourceMapIndex> {
	if included_paths.is_empty() {
		let route = resource_route(&options.asset_prefix, asset.logical_path);
		let source_file = relative_asset_path(asset.pathname, &options.project_root);
		debug!(route = %route, source_file = %source_file, "building identity map");
		return Ok(identity_map(asset.text, &route, &source_file));
	}

	let mut maps = Vec::with_capacity(included_paths.len());
	for path in included_paths {
		match resolver.resolve_map(path)? {
			Some(map) => maps.push(map),
			None => warn!(included = %path, "no source map for included asset"),
		}
	}
	Ok(combine(maps))
}

/// Combine maps in the given order.
pub fn combine(maps: impl IntoIterator<Item = SourceMapIndex>) -> SourceMapIndex {
	SourceMapIndex::combine_all(maps)
}

/// Map every line of `text` to the same line of `source_file`.
pub fn identity_map(text: &str, route: &str, source_file: &str) -> SourceMapIndex {
	text.lines()
		.enumerate()
		.map(|(line, _)| {
			let line = line as u32;
			Mapping::new(route, line, 0, source_file, line, 0, None)
		})
		.collect()
}

/// Route a compiled asset is served from: `{prefix}/{logical_path}`.
pub fn resource_route(asset_prefix: &str, logical_path: &str) -> String {
	format!(
		"{}/{}",
		asset_prefix.trim_end_matches('/'),
		logical_path.trim_start_matches('/')
	)
}

/// Project-relative path of an asset's source file.
///
/// Pathnames outside the project root are kept as given. Any extensions after
/// `.js` are dropped, since those preprocessors have already run by the time
/// the compiled text exists (`app.js.coffee.erb` becomes `app.js`).
pub fn relative_asset_path(pathname: &Path, project_root: &Path) -> String {
	let relative = pathname.strip_prefix(project_root).unwrap_or(pathname);
	let relative = relative.to_string_lossy();
	match relative.find(".js.") {
		Some(at) => relative[..at + ".js".len()].to_string(),
		None => relative.into_owned(),
	}
}

/// Point a compiler-emitted map at the source it was compiled from.
///
/// `file` becomes the path without its `.coffee` extension and `sources`
/// becomes the single relative path.
pub fn relocate_compiled_map(map: &mut Value, relative_path: &str) -> Result<()> {
	let object = as_object(map)?;
	let file = relative_path
		.strip_suffix(".coffee")
		.unwrap_or(relative_path);
	object.insert("file".to_string(), Value::from(file));
	object.insert("sources".to_string(), Value::from(vec![relative_path]));
	Ok(())
}

/// Point a minifier-emitted map at the digested and concatenated assets.
///
/// `file` becomes `{prefix}/{logical_path}-{digest}.js` and `sources` becomes
/// the concatenated `{prefix}/{logical_path}.js`.
pub fn relocate_minified_map(
	map: &mut Value,
	asset_prefix: &str,
	logical_path: &str,
	digest: &str,
) -> Result<()> {
	let object = as_object(map)?;
	let minified = resource_route(asset_prefix, &format!("{logical_path}-{digest}.js"));
	let concatenated = resource_route(asset_prefix, &format!("{logical_path}.js"));
	object.insert("file".to_string(), Value::from(minified));
	object.insert("sources".to_string(), Value::from(vec![concatenated]));
	Ok(())
}

/// Cache location of the map emitted when compiling `relative_path`.
pub fn compiled_map_path(project_root: &Path, relative_path: &str) -> PathBuf {
	let digest = hex::encode(Sha256::digest(relative_path.as_bytes()));
	sourcemap_dir(project_root)
		.join("compiled")
		.join(format!("{digest}.json"))
}

/// Cache location of the map emitted when minifying to content `digest`.
pub fn minified_map_path(project_root: &Path, digest: &str) -> PathBuf {
	sourcemap_dir(project_root)
		.join("minified")
		.join(format!("{digest}.json"))
}

fn sourcemap_dir(project_root: &Path) -> PathBuf {
	project_root.join("tmp").join("sourcemaps")
}

fn as_object(map: &mut Value) -> Result<&mut serde_json::Map<String, Value>> {
	map.as_object_mut().ok_or(SourceMapError::NotAnObject)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn options() -> PipelineOptions {
		PipelineOptions::new("/project")
	}

	#[test]
	fn test_identity_map_for_plain_asset() {
		let asset = Asset {
			text: "var a = 1;\nvar b = 2;\nvar c = 3;\n",
			logical_path: "example/file.js",
			pathname: Path::new("/project/app/assets/javascripts/example/file.js.coffee"),
		};
		let map = build_source_map(asset, &[], &InMemorySourceMaps::new(), &options()).unwrap();

		assert_eq!(map.len(), 3);
		let mapping = map.resolve("/assets/example/file.js", 2, 7).unwrap();
		assert_eq!(mapping.source_file, "app/assets/javascripts/example/file.js");
		assert_eq!(mapping.source_line, 2);
		assert_eq!(mapping.source_column, 0);
	}

	#[test]
	fn test_bundle_combines_includes_in_order() {
		let mut resolver = InMemorySourceMaps::new();
		resolver.add(
			"a.js",
			identity_map("a1\na2\n", "/assets/application.js", "app/a.js"),
		);
		resolver.add(
			"b.js",
			identity_map("b1\n", "/assets/application.js", "app/b.js"),
		);

		let asset = Asset {
			text: "a1\na2\nb1\n",
			logical_path: "application.js",
			pathname: Path::new("/project/app/application.js"),
		};
		let includes = vec!["a.js".to_string(), "missing.js".to_string(), "b.js".to_string()];
		let map = build_source_map(asset, &includes, &resolver, &options()).unwrap();

		assert_eq!(map.len(), 3);
		// both includes claim line 0; the earlier include sorts first, so the
		// later one is the final candidate
		let files: Vec<_> = map
			.route_mappings("/assets/application.js")
			.iter()
			.filter(|m| m.compiled_line == 0)
			.map(|m| m.source_file.as_str())
			.collect();
		assert_eq!(files, vec!["app/a.js", "app/b.js"]);
	}

	#[test]
	fn test_relative_asset_path() {
		let root = Path::new("/project");
		assert_eq!(
			relative_asset_path(Path::new("/project/app/foo.js.coffee.erb"), root),
			"app/foo.js"
		);
		assert_eq!(relative_asset_path(Path::new("/project/app/foo.js"), root), "app/foo.js");
		assert_eq!(
			relative_asset_path(Path::new("/gems/vendor/jquery.js"), root),
			"/gems/vendor/jquery.js"
		);
	}

	#[test]
	fn test_resource_route() {
		assert_eq!(resource_route("/assets", "app.js"), "/assets/app.js");
		assert_eq!(resource_route("/assets/", "/app.js"), "/assets/app.js");
	}

	#[test]
	fn test_relocate_compiled_map() {
		let mut map = json!({"version": 3, "file": "", "sources": ["input.coffee"], "mappings": ""});
		relocate_compiled_map(&mut map, "app/assets/javascripts/foo.coffee").unwrap();

		assert_eq!(map["file"], "app/assets/javascripts/foo");
		assert_eq!(map["sources"], json!(["app/assets/javascripts/foo.coffee"]));
		assert_eq!(map["version"], 3);
	}

	#[test]
	fn test_relocate_minified_map() {
		let mut map = json!({"version": 3, "sources": ["stdin"], "mappings": ""});
		relocate_minified_map(&mut map, "/assets", "application", "abc123").unwrap();

		assert_eq!(map["file"], "/assets/application-abc123.js");
		assert_eq!(map["sources"], json!(["/assets/application.js"]));
	}

	#[test]
	fn test_relocate_rejects_non_object() {
		let mut map = json!([1, 2, 3]);
		assert!(relocate_compiled_map(&mut map, "a.coffee").is_err());
	}

	#[test]
	fn test_map_cache_paths() {
		let root = Path::new("/project");
		let compiled = compiled_map_path(root, "app/foo.coffee");
		assert!(compiled.starts_with("/project/tmp/sourcemaps/compiled"));
		let name = compiled.file_name().unwrap().to_string_lossy().into_owned();
		assert_eq!(name.len(), 64 + ".json".len());
		assert_eq!(compiled, compiled_map_path(root, "app/foo.coffee"));

		assert_eq!(
			minified_map_path(root, "deadbeef"),
			PathBuf::from("/project/tmp/sourcemaps/minified/deadbeef.json")
		);
	}
}
