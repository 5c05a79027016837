// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG Base Directory compliant path resolution.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Location of the system-wide config file.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/squash/config.toml";

/// Resolved config file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
	/// User config file: ~/.config/squash/config.toml
	pub user_config_file: PathBuf,
	/// System config file: /etc/squash/config.toml
	pub system_config_file: PathBuf,
}

/// Resolve config paths, honoring `XDG_CONFIG_HOME` when set.
pub fn resolve_paths() -> Result<ConfigPaths, ConfigError> {
	let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
		Some(dir) if !dir.is_empty() => PathBuf::from(dir),
		_ => dirs::home_dir()
			.ok_or(ConfigError::HomeDirNotFound)?
			.join(".config"),
	};

	tracing::debug!(config_home = %config_home.display(), "resolved config home");

	Ok(ConfigPaths {
		user_config_file: config_home.join("squash/config.toml"),
		system_config_file: PathBuf::from(SYSTEM_CONFIG_FILE),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve_paths() {
		let paths = resolve_paths().unwrap();
		assert!(paths.user_config_file.ends_with("squash/config.toml"));
		assert_eq!(paths.system_config_file, PathBuf::from("/etc/squash/config.toml"));
	}
}
