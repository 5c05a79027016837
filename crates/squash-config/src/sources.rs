// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files, environment and CLI flags.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SquashConfigLayer;
use crate::paths::{ConfigPaths, SYSTEM_CONFIG_FILE};
use crate::sections::{LoggingConfigLayer, NotifierConfigLayer, SourceMapConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	SystemFile = 20,
	UserFile = 30,
	Environment = 50,
	Cli = 100,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SquashConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SquashConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SquashConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
	precedence: Precedence,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			precedence: Precedence::UserFile,
		}
	}

	pub fn system() -> Self {
		Self {
			path: PathBuf::from(SYSTEM_CONFIG_FILE),
			precedence: Precedence::SystemFile,
		}
	}

	pub fn user(paths: &ConfigPaths) -> Self {
		Self::new(&paths.user_config_file)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		match self.precedence {
			Precedence::SystemFile => "system-config",
			_ => "user-config",
		}
	}

	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<SquashConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SquashConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SquashConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: SQUASH_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SquashConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(SquashConfigLayer {
			logging: Some(load_logging_from_env()?),
			sourcemap: Some(load_sourcemap_from_env()),
			notifier: Some(load_notifier_from_env()?),
		})
	}
}

/// Overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub log_level: Option<String>,
	pub json_logs: Option<bool>,
	pub root: Option<String>,
}

/// Command-line flag source; always wins.
pub struct CliSource {
	overrides: CliOverrides,
}

impl CliSource {
	pub fn new(overrides: CliOverrides) -> Self {
		Self { overrides }
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<SquashConfigLayer, ConfigError> {
		Ok(SquashConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: self.overrides.log_level.clone(),
				json: self.overrides.json_logs,
			}),
			sourcemap: Some(SourceMapConfigLayer {
				root: self.overrides.root.clone(),
				asset_prefix: None,
			}),
			notifier: None,
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>, ConfigError> {
	match env_var(name) {
		Some(v) => match v.to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" => Ok(Some(true)),
			"0" | "false" | "no" => Ok(Some(false)),
			_ => Err(ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid boolean value '{v}'"),
			}),
		},
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|v| {
		v.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(String::from)
			.collect()
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("SQUASH_LOG_LEVEL"),
		json: env_bool("SQUASH_LOG_JSON")?,
	})
}

fn load_sourcemap_from_env() -> SourceMapConfigLayer {
	SourceMapConfigLayer {
		root: env_var("SQUASH_SOURCEMAP_ROOT"),
		asset_prefix: env_var("SQUASH_SOURCEMAP_ASSET_PREFIX"),
	}
}

fn load_notifier_from_env() -> Result<NotifierConfigLayer, ConfigError> {
	Ok(NotifierConfigLayer {
		api_key: env_var("SQUASH_NOTIFIER_API_KEY"),
		api_host: env_var("SQUASH_NOTIFIER_API_HOST"),
		environment: env_var("SQUASH_NOTIFIER_ENVIRONMENT"),
		revision: env_var("SQUASH_NOTIFIER_REVISION"),
		disabled: env_bool("SQUASH_NOTIFIER_DISABLED")?,
		notify_path: env_var("SQUASH_NOTIFIER_NOTIFY_PATH"),
		transmit_timeout_ms: env_u64("SQUASH_NOTIFIER_TRANSMIT_TIMEOUT_MS")?,
		ignored_exception_classes: env_list("SQUASH_NOTIFIER_IGNORED_EXCEPTION_CLASSES"),
		ignored_exception_messages: None,
	})
}
