// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::Path;
use std::sync::Arc;

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::warn;

use beacon_relay::{EventRelay, IdentifyReconciler, UpstreamApi};
use beacon_server_api::{HEALTH_PATH, IDENTIFY_PATH, TRACK_PATH};
use beacon_server_config::CorsConfig;

use crate::routes;

/// Shared handler state. Cloned per request; holds no mutable state.
#[derive(Clone)]
pub struct AppState {
	pub relay: EventRelay,
	pub reconciler: IdentifyReconciler,
	pub public_key: Option<String>,
}

impl AppState {
	pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
		Self {
			relay: EventRelay::new(upstream.clone()),
			reconciler: IdentifyReconciler::new(upstream),
			public_key: None,
		}
	}

	pub fn with_public_key(mut self, public_key: Option<String>) -> Self {
		self.public_key = public_key;
		self
	}
}

/// API routes, with unmatched paths served from `public_dir`.
pub fn create_router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
	Router::new()
		.route("/", get(routes::root::service_info))
		.route(HEALTH_PATH, get(routes::health::health_check))
		.route(TRACK_PATH, post(routes::track::track))
		.route(IDENTIFY_PATH, post(routes::identify::identify))
		.fallback_service(ServeDir::new(public_dir.as_ref()))
		.with_state(state)
}

/// CORS for browser trackers: one origin (or any), `GET`/`POST`, JSON bodies.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
	let layer = CorsLayer::new()
		.allow_methods([Method::GET, Method::POST])
		.allow_headers([CONTENT_TYPE]);

	if config.allows_any_origin() {
		return layer.allow_origin(Any);
	}

	match HeaderValue::from_str(&config.allowed_origin) {
		Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
		Err(e) => {
			warn!(
				error = %e,
				origin = %config.allowed_origin,
				"allowed origin is not a valid header value, allowing any origin"
			);
			layer.allow_origin(Any)
		}
	}
}
