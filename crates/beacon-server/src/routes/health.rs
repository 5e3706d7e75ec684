// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::Json;
use chrono::Utc;

use beacon_server_api::HealthResponse;

/// GET /health - liveness only; upstream reachability is not probed.
pub async fn health_check() -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok".to_string(),
		message: "Beacon relay is running".to_string(),
		timestamp: Utc::now(),
		version: env!("CARGO_PKG_VERSION").to_string(),
	})
}
