// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping of relay failures onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use beacon_relay_core::{ErrorKind, RelayError};
use beacon_server_api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error(transparent)]
	Relay(#[from] RelayError),

	#[error("Invalid request body: {0}")]
	InvalidBody(String),
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		ServerError::InvalidBody(rejection.body_text())
	}
}

impl ServerError {
	fn status_and_code(&self) -> (StatusCode, &'static str) {
		match self {
			ServerError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "invalid_body"),
			ServerError::Relay(e) => match e.kind() {
				ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation_error"),
				ErrorKind::Upstream => (StatusCode::BAD_GATEWAY, "upstream_error"),
				ErrorKind::Transport => (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable"),
			},
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error) = self.status_and_code();
		let upstream_status = match &self {
			ServerError::Relay(e) => e.upstream_status(),
			ServerError::InvalidBody(_) => None,
		};

		if status.is_server_error() {
			match &self {
				ServerError::Relay(e) => tracing::error!(
					error = %e,
					upstream_status = ?upstream_status,
					upstream_body = ?e.upstream_body(),
					"request failed upstream"
				),
				ServerError::InvalidBody(_) => {}
			}
		}

		let body = ErrorResponse {
			error: error.to_string(),
			message: self.to_string(),
			upstream_status,
		};
		(status, Json(body)).into_response()
	}
}
