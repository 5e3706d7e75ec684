// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque per-visitor token.
///
/// Freshly minted values are hyphenated lowercase UUID v4 strings. Values read
/// back from a store are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymousId(String);

impl AnonymousId {
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl fmt::Display for AnonymousId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for AnonymousId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl AsRef<str> for AnonymousId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn assert_v4_layout(id: &AnonymousId) {
		let s = id.as_str();
		assert_eq!(s.len(), 36);
		let bytes = s.as_bytes();
		for (i, b) in bytes.iter().enumerate() {
			if [8, 13, 18, 23].contains(&i) {
				assert_eq!(*b, b'-');
			} else {
				assert!(b.is_ascii_hexdigit() && !b.is_ascii_uppercase());
			}
		}
		assert_eq!(bytes[14], b'4', "version nibble in {s}");
		assert!(
			matches!(bytes[19], b'8' | b'9' | b'a' | b'b'),
			"variant nibble in {s}"
		);
	}

	#[test]
	fn generated_ids_are_v4() {
		assert_v4_layout(&AnonymousId::generate());
	}

	#[test]
	fn serializes_as_bare_string() {
		let id = AnonymousId::from("abc".to_string());
		assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
	}

	proptest! {
		#[test]
		fn every_generated_id_keeps_v4_layout(_seed in 0u32..1000) {
			let a = AnonymousId::generate();
			let b = AnonymousId::generate();
			assert_v4_layout(&a);
			prop_assert_ne!(a, b);
		}
	}
}
