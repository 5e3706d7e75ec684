// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::instrument;

use beacon_relay_core::{Properties, TrackEvent};
use beacon_server_api::{TrackEventRequest, TrackEventResponse};

use crate::api::AppState;
use crate::client_info::ClientInfo;
use crate::error::ServerError;

/// POST /track
///
/// Timestamps the event at receipt and attaches the caller's user agent and
/// IP before relaying it.
#[instrument(skip(state, client, payload))]
pub async fn track(
	State(state): State<AppState>,
	client: ClientInfo,
	payload: Result<Json<TrackEventRequest>, JsonRejection>,
) -> Result<Json<TrackEventResponse>, ServerError> {
	let Json(body) = payload?;

	let event = TrackEvent::new(
		body.event.unwrap_or_default(),
		body.anonymous_id.unwrap_or_default(),
	)
	.with_properties(body.properties.map(Properties::from).unwrap_or_default())
	.with_context(client.into_event_context());

	let receipt = state.relay.relay(&event).await?;

	Ok(Json(TrackEventResponse {
		success: true,
		message: "Event tracked successfully".to_string(),
		event_id: receipt.event_id,
	}))
}
