// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for Squash.
//!
//! This crate provides:
//! - Layered configuration from defaults, TOML files, environment and CLI flags
//! - XDG compliant config file resolution
//! - Consistent environment variable naming (`SQUASH_*`)
//!
//! # Usage
//!
//! ```ignore
//! use squash_config::{load_config, CliOverrides};
//!
//! let config = load_config(CliOverrides::default())?;
//! println!("assets served under {}", config.sourcemap.asset_prefix);
//! ```

pub mod error;
pub mod layer;
pub mod paths;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::SquashConfigLayer;
pub use paths::{resolve_paths, ConfigPaths};
pub use sections::*;
pub use sources::{
	CliOverrides, CliSource, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquashConfig {
	pub logging: LoggingConfig,
	pub sourcemap: SourceMapConfig,
	pub notifier: NotifierSettings,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Command-line flags
/// 2. Environment variables (`SQUASH_*`)
/// 3. User config file (`$XDG_CONFIG_HOME/squash/config.toml`)
/// 4. System config file (`/etc/squash/config.toml`)
/// 5. Built-in defaults
pub fn load_config(cli: CliOverrides) -> Result<SquashConfig, ConfigError> {
	let paths = resolve_paths()?;
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(TomlSource::user(&paths)),
		Box::new(EnvSource),
		Box::new(CliSource::new(cli)),
	])
}

/// Load configuration with an explicit config file in place of the user and
/// system files.
pub fn load_config_with_file(
	config_path: impl Into<PathBuf>,
	cli: CliOverrides,
) -> Result<SquashConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
		Box::new(CliSource::new(cli)),
	])
}

/// Merge the given sources in precedence order and finalize.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<SquashConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SquashConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: SquashConfigLayer) -> Result<SquashConfig, ConfigError> {
	let logging = layer.logging.unwrap_or_default().finalize();
	let sourcemap = layer.sourcemap.unwrap_or_default().finalize();
	let notifier = layer.notifier.unwrap_or_default().finalize();

	validate_config(&sourcemap)?;

	info!(
		log_level = %logging.level,
		json_logs = logging.json,
		asset_prefix = %sourcemap.asset_prefix,
		root_override = sourcemap.root.is_some(),
		notifier_configured = notifier.is_configured(),
		notifier_disabled = notifier.disabled,
		"Configuration loaded"
	);

	Ok(SquashConfig {
		logging,
		sourcemap,
		notifier,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(sourcemap: &SourceMapConfig) -> Result<(), ConfigError> {
	if !sourcemap.asset_prefix.starts_with('/') {
		return Err(ConfigError::Validation(format!(
			"sourcemap.asset_prefix must start with '/', got '{}'",
			sourcemap.asset_prefix
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedSource(Precedence, SquashConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<SquashConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn logging(level: &str) -> SquashConfigLayer {
		SquashConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some(level.to_string()),
				json: None,
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, SquashConfig::default());
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource(Precedence::Cli, logging("trace"))),
			Box::new(FixedSource(Precedence::UserFile, logging("warn"))),
			Box::new(DefaultsSource),
		])
		.unwrap();
		assert_eq!(config.logging.level, "trace");
	}

	#[test]
	fn test_invalid_asset_prefix() {
		let layer = SquashConfigLayer {
			sourcemap: Some(SourceMapConfigLayer {
				root: None,
				asset_prefix: Some("assets".to_string()),
			}),
			..Default::default()
		};
		let result = load_from_sources(vec![Box::new(FixedSource(Precedence::UserFile, layer))]);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}
}
