// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracked events.

use chrono::{DateTime, Utc};

use crate::properties::{MergeSource, Properties, PropertyMerge};
use crate::validation::{require_field, ValidationError};

/// Reserved property key for the submitting client's user agent.
pub const USER_AGENT_KEY: &str = "$user_agent";
/// Reserved property key for the submitting client's IP address.
pub const CLIENT_IP_KEY: &str = "$ip";
/// Property surfaced as the event's monetary value when numeric.
pub const VALUE_KEY: &str = "value";

/// Request metadata captured at the transport boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
	pub user_agent: Option<String>,
	pub client_ip: Option<String>,
}

impl EventContext {
	fn into_properties(self) -> Properties {
		let mut props = Properties::new();
		if let Some(user_agent) = self.user_agent {
			props.set(USER_AGENT_KEY, user_agent);
		}
		if let Some(client_ip) = self.client_ip {
			props.set(CLIENT_IP_KEY, client_ip);
		}
		props
	}
}

/// One behavioral event attributed to an anonymous visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
	name: String,
	anonymous_id: String,
	properties: Properties,
	timestamp: DateTime<Utc>,
	context: EventContext,
}

impl TrackEvent {
	/// Timestamped now; use [`TrackEvent::with_timestamp`] to override.
	pub fn new(name: impl Into<String>, anonymous_id: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			anonymous_id: anonymous_id.into(),
			properties: Properties::new(),
			timestamp: Utc::now(),
			context: EventContext::default(),
		}
	}

	pub fn with_properties(mut self, properties: Properties) -> Self {
		self.properties = properties;
		self
	}

	pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = timestamp;
		self
	}

	pub fn with_context(mut self, context: EventContext) -> Self {
		self.context = context;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn anonymous_id(&self) -> &str {
		&self.anonymous_id
	}

	pub fn properties(&self) -> &Properties {
		&self.properties
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.timestamp
	}

	pub fn context(&self) -> &EventContext {
		&self.context
	}

	pub fn validate(&self) -> Result<(), ValidationError> {
		require_field(&self.name, "event")?;
		require_field(&self.anonymous_id, "anonymousId")
	}

	/// Caller properties overlaid with request context.
	///
	/// Context is applied last, so a caller-supplied `$user_agent` or `$ip` is
	/// replaced whenever the server captured that value.
	pub fn merged_properties(&self) -> Properties {
		PropertyMerge::new()
			.layer(MergeSource::Caller, self.properties.clone())
			.layer(MergeSource::Context, self.context.clone().into_properties())
			.resolve()
	}

	/// The numeric `value` property, if any.
	pub fn monetary_value(&self) -> Option<f64> {
		self.properties.get(VALUE_KEY).and_then(|v| v.as_f64())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn missing_name_or_anonymous_id_is_rejected() {
		assert_eq!(
			TrackEvent::new("", "anon-1").validate(),
			Err(ValidationError::MissingField("event"))
		);
		assert_eq!(
			TrackEvent::new("Viewed Page", "").validate(),
			Err(ValidationError::MissingField("anonymousId"))
		);
		assert!(TrackEvent::new("Viewed Page", "anon-1").validate().is_ok());
	}

	#[test]
	fn context_is_injected_under_reserved_keys() {
		let event = TrackEvent::new("Added to Cart", "anon-1")
			.with_properties(Properties::new().insert("sku", "A-1"))
			.with_context(EventContext {
				user_agent: Some("Mozilla/5.0".to_string()),
				client_ip: Some("203.0.113.9".to_string()),
			});

		let merged = event.merged_properties();
		assert_eq!(merged.get("sku"), Some(&json!("A-1")));
		assert_eq!(merged.get(USER_AGENT_KEY), Some(&json!("Mozilla/5.0")));
		assert_eq!(merged.get(CLIENT_IP_KEY), Some(&json!("203.0.113.9")));
	}

	#[test]
	fn captured_context_overwrites_caller_reserved_key() {
		let event = TrackEvent::new("x", "anon-1")
			.with_properties(Properties::new().insert(CLIENT_IP_KEY, "spoofed"))
			.with_context(EventContext {
				user_agent: None,
				client_ip: Some("198.51.100.4".to_string()),
			});
		assert_eq!(
			event.merged_properties().get(CLIENT_IP_KEY),
			Some(&json!("198.51.100.4"))
		);
	}

	#[test]
	fn caller_reserved_key_survives_when_context_absent() {
		let event = TrackEvent::new("x", "anon-1")
			.with_properties(Properties::new().insert(USER_AGENT_KEY, "custom-agent"));
		assert_eq!(
			event.merged_properties().get(USER_AGENT_KEY),
			Some(&json!("custom-agent"))
		);
	}

	#[test]
	fn only_numeric_value_is_monetary() {
		let priced = TrackEvent::new("Placed Order", "a")
			.with_properties(Properties::new().insert("value", 19.99));
		assert_eq!(priced.monetary_value(), Some(19.99));

		let integer = TrackEvent::new("Placed Order", "a")
			.with_properties(Properties::new().insert("value", 20));
		assert_eq!(integer.monetary_value(), Some(20.0));

		let text = TrackEvent::new("Placed Order", "a")
			.with_properties(Properties::new().insert("value", "19.99"));
		assert_eq!(text.monetary_value(), None);
	}
}
