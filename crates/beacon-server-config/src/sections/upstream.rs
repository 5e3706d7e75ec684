// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upstream profile/event store configuration.

use std::time::Duration;

use beacon_common_config::SecretString;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com/api";
pub const DEFAULT_REVISION: &str = "2024-10-15";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
	pub base_url: String,
	pub revision: String,
	pub timeout_secs: u64,
	/// Private key for server-to-upstream calls.
	pub api_key: Option<SecretString>,
	/// Public site key. Safe to hand to browsers.
	pub public_key: Option<String>,
}

impl UpstreamConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl Default for UpstreamConfig {
	fn default() -> Self {
		UpstreamConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamConfigLayer {
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub revision: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub api_key: Option<SecretString>,
	#[serde(default)]
	pub public_key: Option<String>,
}

impl UpstreamConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.revision.is_some() {
			self.revision = other.revision;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
		if other.public_key.is_some() {
			self.public_key = other.public_key;
		}
	}

	pub fn finalize(self) -> UpstreamConfig {
		UpstreamConfig {
			base_url: self
				.base_url
				.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
			revision: self
				.revision
				.unwrap_or_else(|| DEFAULT_REVISION.to_string()),
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
			api_key: self.api_key,
			public_key: self.public_key,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = UpstreamConfig::default();
		assert_eq!(config.base_url, "https://a.klaviyo.com/api");
		assert_eq!(config.revision, "2024-10-15");
		assert_eq!(config.timeout(), Duration::from_secs(10));
		assert!(config.api_key.is_none());
	}

	#[test]
	fn api_key_from_toml_is_redacted_in_debug() {
		let layer: UpstreamConfigLayer = toml::from_str(r#"api_key = "pk_toml""#).unwrap();
		let config = layer.finalize();
		assert_eq!(config.api_key.as_ref().unwrap().expose(), "pk_toml");
		assert!(!format!("{config:?}").contains("pk_toml"));
	}
}
