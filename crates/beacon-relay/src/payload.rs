// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upstream wire documents.
//!
//! Upstream speaks JSON:API: every request body is `{"data": {"type", "id"?,
//! "attributes"}}`, and event subjects and metrics are nested documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use beacon_relay_core::{Properties, ProfileAttributes, TrackEvent};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<A> {
	pub data: Resource<A>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource<A> {
	#[serde(rename = "type")]
	pub kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub attributes: A,
}

impl<A> Document<A> {
	fn new(kind: &'static str, id: Option<String>, attributes: A) -> Self {
		Self {
			data: Resource {
				kind,
				id,
				attributes,
			},
		}
	}
}

/// Event subject; keyed by anonymous id only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAttributes {
	pub anonymous_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAttributes {
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAttributes {
	pub profile: Document<SubjectAttributes>,
	pub metric: Document<MetricAttributes>,
	pub properties: Properties,
	pub time: DateTime<Utc>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
	pub unique_id: String,
}

pub type EventDocument = Document<EventAttributes>;
pub type ProfileDocument = Document<ProfileAttributes>;

/// Best-effort dedup key: `{anonymous_id}_{unix nanos}`.
pub fn dedup_key(anonymous_id: &str, at: DateTime<Utc>) -> String {
	format!(
		"{anonymous_id}_{}{:09}",
		at.timestamp(),
		at.timestamp_subsec_nanos()
	)
}

pub fn event_document(event: &TrackEvent, unique_id: String) -> EventDocument {
	Document::new(
		"event",
		None,
		EventAttributes {
			profile: Document::new(
				"profile",
				None,
				SubjectAttributes {
					anonymous_id: event.anonymous_id().to_string(),
				},
			),
			metric: Document::new(
				"metric",
				None,
				MetricAttributes {
					name: event.name().to_string(),
				},
			),
			properties: event.merged_properties(),
			time: event.timestamp(),
			value: event.monetary_value(),
			unique_id,
		},
	)
}

pub fn profile_create_document(attributes: ProfileAttributes) -> ProfileDocument {
	Document::new("profile", None, attributes)
}

pub fn profile_update_document(profile_id: &str, attributes: ProfileAttributes) -> ProfileDocument {
	Document::new("profile", Some(profile_id.to_string()), attributes)
}

#[derive(Deserialize)]
struct DataEnvelope {
	data: Option<DataRef>,
}

#[derive(Deserialize)]
struct DataRef {
	id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
	#[serde(default)]
	errors: Vec<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
	meta: Option<ErrorMeta>,
}

#[derive(Deserialize)]
struct ErrorMeta {
	duplicate_profile_id: Option<String>,
}

/// `data.id` of a success body. Empty or unparseable bodies yield `None`.
pub fn response_data_id(body: &str) -> Option<String> {
	serde_json::from_str::<DataEnvelope>(body)
		.ok()?
		.data?
		.id
		.filter(|id| !id.is_empty())
}

/// First `errors[].meta.duplicate_profile_id` of a conflict body.
pub fn duplicate_profile_id(body: &str) -> Option<String> {
	serde_json::from_str::<ErrorEnvelope>(body)
		.ok()?
		.errors
		.into_iter()
		.filter_map(|e| e.meta?.duplicate_profile_id)
		.find(|id| !id.is_empty())
}
