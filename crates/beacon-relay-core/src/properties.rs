// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Property bags and how they are combined.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object of event or profile properties.
///
/// ```
/// use beacon_relay_core::Properties;
///
/// let props = Properties::new()
///     .insert("plan", "pro")
///     .insert("value", 19.99);
/// assert_eq!(props.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
	inner: Map<String, Value>,
}

impl Properties {
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.set(key, value);
		self
	}

	pub fn set<K, V>(&mut self, key: K, value: V)
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.inner.remove(key)
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.contains_key(key)
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.inner.iter()
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.inner)
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.inner
	}
}

impl From<Properties> for Value {
	fn from(props: Properties) -> Self {
		props.into_value()
	}
}

impl From<Map<String, Value>> for Properties {
	fn from(map: Map<String, Value>) -> Self {
		Self { inner: map }
	}
}

/// Non-object values become an empty bag.
impl From<Value> for Properties {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(map) => Self { inner: map },
			_ => Self::new(),
		}
	}
}

/// Origin of a layer in a [`PropertyMerge`].
///
/// Variants are declared in precedence order: a later variant overwrites keys
/// written by an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MergeSource {
	/// Properties supplied by the caller of `track`.
	Caller,
	/// Request context captured by the server (user agent, client IP).
	Context,
}

/// Ordered merge of property layers.
///
/// Layers are applied by [`MergeSource`] precedence regardless of the order
/// they were added in; two layers from the same source apply in insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct PropertyMerge {
	layers: Vec<(MergeSource, Properties)>,
}

impl PropertyMerge {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn layer(mut self, source: MergeSource, properties: Properties) -> Self {
		self.layers.push((source, properties));
		self
	}

	pub fn resolve(mut self) -> Properties {
		self.layers.sort_by_key(|(source, _)| *source);
		let mut merged = Properties::new();
		for (_, layer) in self.layers {
			for (key, value) in layer.inner {
				merged.inner.insert(key, value);
			}
		}
		merged
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	#[test]
	fn from_non_object_is_empty() {
		assert!(Properties::from(json!([1, 2])).is_empty());
		assert!(Properties::from(Value::Null).is_empty());
	}

	#[test]
	fn serializes_as_plain_object() {
		let props = Properties::new().insert("plan", "pro");
		assert_eq!(serde_json::to_value(&props).unwrap(), json!({"plan": "pro"}));
	}

	#[test]
	fn context_overwrites_caller_regardless_of_insertion_order() {
		let caller = Properties::new().insert("$ip", "10.0.0.1").insert("plan", "pro");
		let context = Properties::new().insert("$ip", "203.0.113.9");

		let merged = PropertyMerge::new()
			.layer(MergeSource::Context, context)
			.layer(MergeSource::Caller, caller)
			.resolve();

		assert_eq!(merged.get("$ip"), Some(&json!("203.0.113.9")));
		assert_eq!(merged.get("plan"), Some(&json!("pro")));
	}

	#[test]
	fn same_source_layers_apply_in_insertion_order() {
		let merged = PropertyMerge::new()
			.layer(MergeSource::Caller, Properties::new().insert("k", 1))
			.layer(MergeSource::Caller, Properties::new().insert("k", 2))
			.resolve();
		assert_eq!(merged.get("k"), Some(&json!(2)));
	}

	proptest! {
		#[test]
		fn merge_keeps_every_key(
			caller in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8),
			context in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8),
		) {
			let mut c = Properties::new();
			for (k, v) in &caller {
				c.set(k.clone(), *v);
			}
			let mut x = Properties::new();
			for (k, v) in &context {
				x.set(k.clone(), *v);
			}

			let merged = PropertyMerge::new()
				.layer(MergeSource::Caller, c)
				.layer(MergeSource::Context, x)
				.resolve();

			for (k, v) in &context {
				prop_assert_eq!(merged.get(k), Some(&json!(v)));
			}
			for (k, v) in &caller {
				if !context.contains_key(k) {
					prop_assert_eq!(merged.get(k), Some(&json!(v)));
				}
			}
		}
	}
}
