// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subcommand implementations. Each returns the text to print on stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use squash_config::SquashConfig;
use squash_core::Backtrace;
use squash_notify::{Exception, Notifier, NotifyOutcome};
use squash_sourcemap::{
	build_source_map, parse_into, parse_slice, Asset, InMemorySourceMaps, ParseOptions,
	PipelineOptions, SourceMapIndex, Symbolicator,
};
use tracing::info;

fn parse_options(config: &SquashConfig) -> ParseOptions {
	ParseOptions {
		root: config.sourcemap.root.clone(),
	}
}

fn load_map(path: &Path, route: &str, options: &ParseOptions) -> Result<SourceMapIndex> {
	let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
	parse_slice(&data, route, options)
		.with_context(|| format!("failed to parse source map {}", path.display()))
}

/// Resolve one compiled position to its original source.
pub fn resolve(
	config: &SquashConfig,
	map: &Path,
	route: &str,
	line: u32,
	column: u32,
) -> Result<String> {
	let index = load_map(map, route, &parse_options(config))?;
	let Some(mapping) = index.resolve(route, line, column) else {
		bail!("no mapping for {route} line {line} column {column}");
	};
	Ok(serde_json::to_string_pretty(mapping)?)
}

/// Print every mapping of a source map.
pub fn dump(config: &SquashConfig, map: &Path, route: &str) -> Result<String> {
	let index = load_map(map, route, &parse_options(config))?;
	info!(route, mappings = index.len(), "loaded source map");
	Ok(serde_json::to_string(&index)?)
}

/// Split a `ROUTE=PATH` argument.
pub fn parse_route_map(arg: &str) -> Result<(String, PathBuf)> {
	match arg.split_once('=') {
		Some((route, path)) if !route.is_empty() && !path.is_empty() => {
			Ok((route.to_string(), PathBuf::from(path)))
		}
		_ => bail!("expected ROUTE=PATH, got '{arg}'"),
	}
}

/// Rewrite minified backtraces using the given maps.
pub fn symbolicate(
	config: &SquashConfig,
	maps: &[(String, PathBuf)],
	backtraces: &Path,
) -> Result<String> {
	let options = parse_options(config);
	let mut index = SourceMapIndex::new();
	for (route, path) in maps {
		let json = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read {}", path.display()))?;
		parse_into(&mut index, &json, route, &options)
			.with_context(|| format!("failed to parse source map {}", path.display()))?;
	}

	let backtraces: Vec<Backtrace> = read_json(backtraces)?;
	let symbolicator = Symbolicator::new(Arc::new(index));
	Ok(serde_json::to_string_pretty(&symbolicator.symbolicate(&backtraces))?)
}

/// Build the line-for-line map of a plain asset.
pub fn identity(config: &SquashConfig, asset: &Path, logical_path: &str) -> Result<String> {
	let text = std::fs::read_to_string(asset)
		.with_context(|| format!("failed to read {}", asset.display()))?;
	let project_root = match &config.sourcemap.root {
		Some(root) => PathBuf::from(root),
		None => std::env::current_dir().context("failed to determine current directory")?,
	};
	let pathname = std::path::absolute(asset)
		.with_context(|| format!("failed to resolve {}", asset.display()))?;

	let options =
		PipelineOptions::new(project_root).asset_prefix(config.sourcemap.asset_prefix.clone());
	let index = build_source_map(
		Asset {
			text: &text,
			logical_path,
			pathname: &pathname,
		},
		&[],
		&InMemorySourceMaps::new(),
		&options,
	)?;
	Ok(serde_json::to_string(&index)?)
}

/// Split a `KEY=VALUE` argument; values that parse as JSON keep their type.
pub fn parse_user_data(arg: &str) -> Result<(String, Value)> {
	let Some((key, value)) = arg.split_once('=') else {
		bail!("expected KEY=VALUE, got '{arg}'");
	};
	if key.is_empty() {
		bail!("empty key in '{arg}'");
	}
	let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
	Ok((key.to_string(), value))
}

/// Build the exception a `notify` invocation reports.
pub fn exception(
	class_name: &str,
	message: &str,
	backtraces: Option<&Path>,
	user_data: Vec<(String, Value)>,
) -> Result<Exception> {
	let mut exception = Exception::new(class_name, message);
	if let Some(path) = backtraces {
		exception = exception.with_backtraces(read_json(path)?);
	}
	exception.user_data = user_data.into_iter().collect::<Map<_, _>>();
	Ok(exception)
}

/// Report an exception to the configured server.
pub async fn notify(config: &SquashConfig, exception: &Exception) -> Result<String> {
	let notifier_config = config
		.notifier
		.builder()
		.build()
		.context("notifier is not configured")?;
	let notifier = Notifier::new(notifier_config).context("failed to create notifier")?;

	let outcome = notifier
		.notify(exception)
		.await
		.context("failed to send report")?;
	Ok(match outcome {
		NotifyOutcome::Sent => "sent",
		NotifyOutcome::Ignored => "ignored",
		NotifyOutcome::Disabled => "disabled",
	}
	.to_string())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
	let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
	serde_json::from_slice(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}
