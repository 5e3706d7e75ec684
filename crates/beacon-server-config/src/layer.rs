// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{
	CorsConfigLayer, HttpConfigLayer, LoggingConfigLayer, PathsConfigLayer, UpstreamConfigLayer,
};

/// Partial server configuration from one source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub upstream: Option<UpstreamConfigLayer>,
	#[serde(default)]
	pub cors: Option<CorsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub paths: Option<PathsConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge `other` into this layer; values set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(&mut self.upstream, other.upstream, UpstreamConfigLayer::merge);
		merge_option(&mut self.cors, other.cors, CorsConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(&mut self.paths, other.paths, PathsConfigLayer::merge);
	}
}

fn merge_option<T>(target: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	let Some(incoming) = other else {
		return;
	};
	match target {
		Some(current) => merge(current, incoming),
		None => *target = Some(incoming),
	}
}
