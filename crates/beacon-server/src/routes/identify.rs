// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::instrument;

use beacon_relay_core::{IdentifyRequest, Properties};
use beacon_server_api::{IdentifyUserRequest, IdentifyUserResponse};

use crate::api::AppState;
use crate::error::ServerError;

/// POST /identify
#[instrument(skip(state, payload))]
pub async fn identify(
	State(state): State<AppState>,
	payload: Result<Json<IdentifyUserRequest>, JsonRejection>,
) -> Result<Json<IdentifyUserResponse>, ServerError> {
	let Json(body) = payload?;

	let mut request = IdentifyRequest::new(body.email.unwrap_or_default())
		.with_properties(body.properties.map(Properties::from).unwrap_or_default());
	if let Some(anonymous_id) = body.anonymous_id {
		request = request.with_anonymous_id(anonymous_id);
	}

	let outcome = state.reconciler.reconcile(&request).await?;

	Ok(Json(IdentifyUserResponse {
		success: true,
		message: "User identified successfully".to_string(),
		profile_id: outcome.profile_id,
		updated: outcome.updated,
	}))
}
