// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identify requests and the profile attributes derived from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::properties::Properties;
use crate::validation::{is_valid_email, ValidationError};

/// Property keys lifted out of the bag into first-class profile fields,
/// paired with the attribute each one becomes.
const PROMOTED_FIELDS: [(&str, &str); 3] = [
	("firstName", "first_name"),
	("lastName", "last_name"),
	("phone", "phone_number"),
];

/// Binds an email address, and optionally an anonymous id, to a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyRequest {
	email: String,
	anonymous_id: Option<String>,
	properties: Properties,
}

impl IdentifyRequest {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			anonymous_id: None,
			properties: Properties::new(),
		}
	}

	/// Empty ids are treated as absent.
	pub fn with_anonymous_id(mut self, anonymous_id: impl Into<String>) -> Self {
		let anonymous_id = anonymous_id.into();
		self.anonymous_id = (!anonymous_id.trim().is_empty()).then_some(anonymous_id);
		self
	}

	pub fn with_properties(mut self, properties: Properties) -> Self {
		self.properties = properties;
		self
	}

	pub fn email(&self) -> &str {
		&self.email
	}

	pub fn anonymous_id(&self) -> Option<&str> {
		self.anonymous_id.as_deref()
	}

	pub fn properties(&self) -> &Properties {
		&self.properties
	}

	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.email.is_empty() {
			return Err(ValidationError::MissingField("email"));
		}
		if !is_valid_email(&self.email) {
			return Err(ValidationError::InvalidEmail);
		}
		Ok(())
	}

	/// Split the request into upstream profile attributes.
	///
	/// `firstName`, `lastName` and `phone` are promoted only when they hold a
	/// non-empty string; any other value stays in the property bag.
	pub fn profile_attributes(&self) -> ProfileAttributes {
		let mut properties = self.properties.clone();
		let mut promoted: [Option<String>; 3] = Default::default();

		for (slot, (key, _)) in promoted.iter_mut().zip(PROMOTED_FIELDS) {
			if let Some(Value::String(s)) = properties.get(key) {
				if !s.is_empty() {
					*slot = Some(s.clone());
					properties.remove(key);
				}
			}
		}

		let [first_name, last_name, phone_number] = promoted;
		ProfileAttributes {
			email: self.email.clone(),
			anonymous_id: self.anonymous_id.clone(),
			properties,
			first_name,
			last_name,
			phone_number,
		}
	}
}

/// Upstream profile attributes, shared by the create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttributes {
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub anonymous_id: Option<String>,
	#[serde(default)]
	pub properties: Properties,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
}
