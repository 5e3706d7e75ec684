// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for beacon-server.
//!
//! Values are layered from built-in defaults, an optional TOML file
//! (`/etc/beacon/server.toml` unless overridden) and environment variables,
//! in increasing order of precedence.
//!
//! ```ignore
//! let config = beacon_server_config::load_config()?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub upstream: UpstreamConfig,
	pub cors: CorsConfig,
	pub logging: LoggingConfig,
	pub paths: PathsConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load from defaults, `/etc/beacon/server.toml`, and the environment.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Like [`load_config`] with an explicit config file.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		upstream: layer.upstream.unwrap_or_default().finalize(),
		cors: layer.cors.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		paths: layer.paths.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		upstream = %config.upstream.base_url,
		revision = %config.upstream.revision,
		allowed_origin = %config.cors.allowed_origin,
		"Server configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.upstream.api_key.is_none() {
		return Err(ConfigError::Validation(
			"upstream API key is required: set BEACON_UPSTREAM_API_KEY or BEACON_UPSTREAM_API_KEY_FILE"
				.to_string(),
		));
	}

	let base_url = &config.upstream.base_url;
	if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
		return Err(ConfigError::InvalidValue {
			key: "upstream.base_url".to_string(),
			message: format!("'{base_url}' is not an http(s) URL"),
		});
	}

	if config.upstream.timeout_secs == 0 {
		return Err(ConfigError::InvalidValue {
			key: "upstream.timeout_secs".to_string(),
			message: "must be greater than zero".to_string(),
		});
	}

	if config.cors.allowed_origin.trim().is_empty() {
		return Err(ConfigError::InvalidValue {
			key: "cors.allowed_origin".to_string(),
			message: "must be an origin or '*'".to_string(),
		});
	}

	Ok(())
}
