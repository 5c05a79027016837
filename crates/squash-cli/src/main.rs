// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Squash command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use squash_config::{load_config, load_config_with_file, CliOverrides, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod version;

/// Squash - source map resolution and error reporting.
#[derive(Parser, Debug)]
#[command(name = "squash", version, about, long_about = None)]
struct Args {
	/// Config file to use instead of the user and system config files
	#[arg(long, global = true, env = "SQUASH_CONFIG")]
	config: Option<PathBuf>,

	/// Default log filter when RUST_LOG is unset (e.g. "debug")
	#[arg(long, global = true)]
	log_level: Option<String>,

	/// Emit logs as JSON
	#[arg(long, global = true)]
	json_logs: bool,

	/// Project root stripped from source paths; overrides each map's sourceRoot
	#[arg(long, global = true)]
	root: Option<String>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Resolve a compiled position to its original source
	Resolve {
		/// Source map file
		#[arg(long)]
		map: PathBuf,
		/// Route the compiled file is served from
		#[arg(long)]
		route: String,
		/// Compiled line (0-based)
		#[arg(long)]
		line: u32,
		/// Compiled column (0-based)
		#[arg(long)]
		column: u32,
	},

	/// Print every mapping of a source map as JSON
	Dump {
		#[arg(long)]
		map: PathBuf,
		#[arg(long)]
		route: String,
	},

	/// Rewrite minified backtraces into original-source frames
	Symbolicate {
		/// Source map for a route, repeatable
		#[arg(long = "map", value_name = "ROUTE=PATH", required = true, value_parser = commands::parse_route_map)]
		maps: Vec<(String, PathBuf)>,
		/// JSON file holding a list of backtraces
		#[arg(long)]
		backtraces: PathBuf,
	},

	/// Build the line-for-line map of a plain asset
	Identity {
		/// Asset source file
		#[arg(long)]
		asset: PathBuf,
		/// Path the asset is requested by, e.g. application.js
		#[arg(long)]
		logical_path: String,
	},

	/// Report an exception to the configured Squash server
	Notify {
		#[arg(long)]
		class_name: String,
		#[arg(long)]
		message: String,
		/// JSON file holding a list of backtraces
		#[arg(long)]
		backtraces: Option<PathBuf>,
		/// Extra report field, repeatable
		#[arg(long = "user-data", value_name = "KEY=VALUE", value_parser = commands::parse_user_data)]
		user_data: Vec<(String, serde_json::Value)>,
	},

	/// Show version and build information
	Version,
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		Self {
			log_level: args.log_level.clone(),
			json_logs: args.json_logs.then_some(true),
			root: args.root.clone(),
		}
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

	if logging.json {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init();
	} else {
		tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().with_writer(std::io::stderr))
			.init();
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	let overrides = CliOverrides::from(&args);
	let config = match &args.config {
		Some(path) => load_config_with_file(path, overrides),
		None => load_config(overrides),
	}
	.context("failed to load configuration")?;

	init_tracing(&config.logging);

	let output = match args.command {
		Command::Resolve {
			map,
			route,
			line,
			column,
		} => commands::resolve(&config, &map, &route, line, column)?,
		Command::Dump { map, route } => commands::dump(&config, &map, &route)?,
		Command::Symbolicate { maps, backtraces } => {
			commands::symbolicate(&config, &maps, &backtraces)?
		}
		Command::Identity {
			asset,
			logical_path,
		} => commands::identity(&config, &asset, &logical_path)?,
		Command::Notify {
			class_name,
			message,
			backtraces,
			user_data,
		} => {
			let exception =
				commands::exception(&class_name, &message, backtraces.as_deref(), user_data)?;
			commands::notify(&config, &exception).await?
		}
		Command::Version => version::format_version_info(),
	};

	println!("{output}");
	Ok(())
}
