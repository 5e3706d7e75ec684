// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types of the beacon HTTP API, shared by the server and the tracker
//! SDK. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TRACK_PATH: &str = "/track";
pub const IDENTIFY_PATH: &str = "/identify";
pub const HEALTH_PATH: &str = "/health";

// ============================================================================
// Error Response
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	/// Status returned by the upstream store, for upstream failures.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub upstream_status: Option<u16>,
}

// ============================================================================
// Track
// ============================================================================

/// Fields are optional here so that absence is reported as a validation
/// error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventRequest {
	#[serde(default)]
	pub event: Option<String>,
	#[serde(default)]
	pub properties: Option<Map<String, Value>>,
	#[serde(default)]
	pub anonymous_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventResponse {
	pub success: bool,
	pub message: String,
	pub event_id: String,
}

// ============================================================================
// Identify
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyUserRequest {
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub anonymous_id: Option<String>,
	#[serde(default)]
	pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyUserResponse {
	pub success: bool,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profile_id: Option<String>,
	pub updated: bool,
}

// ============================================================================
// Service
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	pub message: String,
	pub timestamp: DateTime<Utc>,
	pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
	pub name: String,
	pub version: String,
	pub endpoints: Endpoints,
	/// Public site key for browser-side integrations.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
	pub track: String,
	pub identify: String,
	pub health: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			track: format!("POST {TRACK_PATH}"),
			identify: format!("POST {IDENTIFY_PATH}"),
			health: format!("GET {HEALTH_PATH}"),
		}
	}
}
