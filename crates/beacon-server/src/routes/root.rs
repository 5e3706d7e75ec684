// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::Json;

use beacon_server_api::{Endpoints, ServiceInfoResponse};

use crate::api::AppState;

/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
	Json(ServiceInfoResponse {
		name: env!("CARGO_PKG_NAME").to_string(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		endpoints: Endpoints::default(),
		public_key: state.public_key,
	})
}
