// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, and environment
//! variables.

use std::path::PathBuf;

use beacon_common_config::load_secret_env;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	CorsConfigLayer, HttpConfigLayer, LogFormat, LoggingConfigLayer, PathsConfigLayer,
	UpstreamConfigLayer,
};

/// Source precedence levels (higher overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// A TOML file. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/beacon/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variables.
///
/// Convention: `BEACON_SERVER_<FIELD>` for listener, CORS, logging and paths;
/// `BEACON_UPSTREAM_<FIELD>` for the upstream store. `PORT` is honoured when
/// `BEACON_SERVER_PORT` is unset.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			upstream: Some(load_upstream_from_env()?),
			cors: Some(CorsConfigLayer {
				allowed_origin: env_var("BEACON_SERVER_ALLOWED_ORIGIN"),
			}),
			logging: Some(load_logging_from_env()?),
			paths: Some(PathsConfigLayer {
				public_dir: env_var("BEACON_SERVER_PUBLIC_DIR"),
			}),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	let port = match env_parse::<u16>("BEACON_SERVER_PORT", "u16")? {
		Some(port) => Some(port),
		None => env_parse::<u16>("PORT", "u16")?,
	};
	Ok(HttpConfigLayer {
		host: env_var("BEACON_SERVER_HOST"),
		port,
	})
}

fn load_upstream_from_env() -> Result<UpstreamConfigLayer, ConfigError> {
	let api_key = load_secret_env("BEACON_UPSTREAM_API_KEY")
		.map_err(|e| ConfigError::Secret(e.to_string()))?
		.filter(|k| !k.is_blank());

	Ok(UpstreamConfigLayer {
		base_url: env_var("BEACON_UPSTREAM_BASE_URL"),
		revision: env_var("BEACON_UPSTREAM_REVISION"),
		timeout_secs: env_parse("BEACON_UPSTREAM_TIMEOUT_SECS", "u64")?,
		api_key,
		public_key: env_var("BEACON_UPSTREAM_PUBLIC_KEY"),
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("BEACON_SERVER_LOG_FORMAT") {
		Some(v) => Some(v.parse::<LogFormat>().map_err(|message| ConfigError::InvalidValue {
			key: "BEACON_SERVER_LOG_FORMAT".to_string(),
			message,
		})?),
		None => None,
	};
	Ok(LoggingConfigLayer {
		level: env_var("BEACON_SERVER_LOG_LEVEL"),
		format,
	})
}
