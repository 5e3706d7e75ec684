// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

fn default_public_dir() -> String {
	"public".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
	/// Directory served for any path not handled by the API.
	pub public_dir: String,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			public_dir: default_public_dir(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfigLayer {
	#[serde(default)]
	pub public_dir: Option<String>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.public_dir.is_some() {
			self.public_dir = other.public_dir;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			public_dir: self.public_dir.unwrap_or_else(default_public_dir),
		}
	}
}
