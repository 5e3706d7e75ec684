// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistence backends for the anonymous identity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::IdentityStoreError;
use crate::id::AnonymousId;

/// Longest expiry horizon; keeps `expires_at` inside four-digit years so the
/// jar always parses back.
pub const MAX_EXPIRE_DAYS: i64 = 100 * 365;

/// A named identity value with an expiry horizon, like a long-lived cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIdentity {
	pub name: String,
	pub value: AnonymousId,
	pub expires_at: DateTime<Utc>,
}

impl StoredIdentity {
	/// `expire_days` is clamped to `±MAX_EXPIRE_DAYS`.
	pub fn new(name: impl Into<String>, value: AnonymousId, expire_days: i64) -> Self {
		let days = expire_days.clamp(-MAX_EXPIRE_DAYS, MAX_EXPIRE_DAYS);
		Self {
			name: name.into(),
			value,
			expires_at: Utc::now() + TimeDelta::days(days),
		}
	}

	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.expires_at <= now
	}
}

/// Storage for identity records, keyed by record name.
///
/// Expiry is not enforced here; callers compare `expires_at` themselves.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug {
	async fn load(&self, name: &str) -> Result<Option<StoredIdentity>, IdentityStoreError>;

	/// Insert or overwrite the record named `record.name`.
	async fn save(&self, record: &StoredIdentity) -> Result<(), IdentityStoreError>;
}

type IdentityJar = HashMap<String, StoredIdentity>;

/// JSON file holding every identity record, written via temp file + rename.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
	path: PathBuf,
}

impl FileIdentityStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// `<data dir>/beacon/identity.json`
	pub fn default_location() -> Result<Self, IdentityStoreError> {
		let dir = dirs::data_dir().ok_or(IdentityStoreError::NoDataDir)?;
		Ok(Self::new(dir.join("beacon").join("identity.json")))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn read_jar(&self) -> Result<IdentityJar, IdentityStoreError> {
		let contents = match fs::read_to_string(&self.path).await {
			Ok(contents) => contents,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
			Err(e) => return Err(e.into()),
		};
		Ok(serde_json::from_str(&contents)?)
	}

	async fn write_jar(&self, jar: &IdentityJar) -> Result<(), IdentityStoreError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).await?;
		}

		let contents = serde_json::to_string_pretty(jar)?;
		let temp_path = self.path.with_extension("tmp");
		let mut file = fs::File::create(&temp_path).await?;
		file.write_all(contents.as_bytes()).await?;
		file.sync_all().await?;
		drop(file);

		fs::rename(&temp_path, &self.path).await?;
		debug!(path = ?self.path, records = jar.len(), "identity jar written");
		Ok(())
	}
}

#[async_trait]
impl IdentityStore for FileIdentityStore {
	async fn load(&self, name: &str) -> Result<Option<StoredIdentity>, IdentityStoreError> {
		Ok(self.read_jar().await?.remove(name))
	}

	/// An unreadable jar is replaced rather than blocking the write.
	async fn save(&self, record: &StoredIdentity) -> Result<(), IdentityStoreError> {
		let mut jar = match self.read_jar().await {
			Ok(jar) => jar,
			Err(IdentityStoreError::Serde(e)) => {
				warn!(error = %e, path = ?self.path, "identity jar is corrupt, overwriting");
				IdentityJar::new()
			}
			Err(e) => return Err(e),
		};
		jar.insert(record.name.clone(), record.clone());
		self.write_jar(&jar).await
	}
}

/// Process-local store, used in tests and for ephemeral clients.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
	records: Mutex<IdentityJar>,
}

impl MemoryIdentityStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
	async fn load(&self, name: &str) -> Result<Option<StoredIdentity>, IdentityStoreError> {
		Ok(self.records.lock().await.get(name).cloned())
	}

	async fn save(&self, record: &StoredIdentity) -> Result<(), IdentityStoreError> {
		self.records
			.lock()
			.await
			.insert(record.name.clone(), record.clone());
		Ok(())
	}
}
