// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::id::AnonymousId;
use crate::store::{IdentityStore, StoredIdentity};

pub const DEFAULT_IDENTITY_NAME: &str = "_beacon_anon_id";
pub const DEFAULT_EXPIRE_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct IdentityConfig {
	/// Key the token is stored under.
	pub name: String,
	pub expire_days: i64,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			name: DEFAULT_IDENTITY_NAME.to_string(),
			expire_days: DEFAULT_EXPIRE_DAYS,
		}
	}
}

/// Hands out the visitor's anonymous identity.
///
/// The first successful lookup or mint is cached for the lifetime of the
/// provider. Store failures never surface to callers: they are logged and
/// the cached token keeps serving.
#[derive(Debug)]
pub struct AnonymousIdentityProvider {
	store: Arc<dyn IdentityStore>,
	config: IdentityConfig,
	current: Mutex<Option<AnonymousId>>,
}

impl AnonymousIdentityProvider {
	pub fn new(store: Arc<dyn IdentityStore>, config: IdentityConfig) -> Self {
		Self {
			store,
			config,
			current: Mutex::new(None),
		}
	}

	pub fn config(&self) -> &IdentityConfig {
		&self.config
	}

	/// Return the persisted token, minting and persisting one if none exists.
	pub async fn get_or_create(&self) -> AnonymousId {
		let mut current = self.current.lock().await;
		if let Some(id) = current.as_ref() {
			return id.clone();
		}

		let id = match self.store.load(&self.config.name).await {
			Ok(Some(record)) if !record.is_expired_at(Utc::now()) => {
				debug!(name = %self.config.name, "reusing persisted anonymous identity");
				record.value
			}
			Ok(Some(_)) => {
				debug!(name = %self.config.name, "persisted anonymous identity expired");
				self.mint_and_persist(None).await
			}
			Ok(None) => self.mint_and_persist(None).await,
			Err(e) => {
				warn!(
					error = %e,
					name = %self.config.name,
					"failed to read anonymous identity, continuing with an in-memory token"
				);
				self.mint_and_persist(None).await
			}
		};

		*current = Some(id.clone());
		id
	}

	/// Replace the current token with a new one and persist it.
	///
	/// The returned token always differs from the one it replaces.
	pub async fn reset(&self) -> AnonymousId {
		let mut current = self.current.lock().await;
		let previous = current.take();
		let id = self.mint_and_persist(previous.as_ref()).await;
		info!(name = %self.config.name, "anonymous identity reset");
		*current = Some(id.clone());
		id
	}

	async fn mint_and_persist(&self, previous: Option<&AnonymousId>) -> AnonymousId {
		let mut id = AnonymousId::generate();
		while Some(&id) == previous {
			id = AnonymousId::generate();
		}

		let record = StoredIdentity::new(&self.config.name, id.clone(), self.config.expire_days);
		if let Err(e) = self.store.save(&record).await {
			warn!(
				error = %e,
				name = %self.config.name,
				"failed to persist anonymous identity, keeping it in memory only"
			);
		}
		id
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::IdentityStoreError;
	use crate::store::{FileIdentityStore, MemoryIdentityStore};
	use async_trait::async_trait;
	use chrono::Duration;
	use std::path::PathBuf;

	#[derive(Debug)]
	struct BrokenStore;

	#[async_trait]
	impl IdentityStore for BrokenStore {
		async fn load(&self, _name: &str) -> Result<Option<StoredIdentity>, IdentityStoreError> {
			Err(unavailable())
		}

		async fn save(&self, _record: &StoredIdentity) -> Result<(), IdentityStoreError> {
			Err(unavailable())
		}
	}

	fn unavailable() -> IdentityStoreError {
		IdentityStoreError::Unavailable {
			path: PathBuf::from("/nowhere"),
			reason: "storage disabled".to_string(),
		}
	}

	fn memory_provider() -> (Arc<MemoryIdentityStore>, AnonymousIdentityProvider) {
		let store = Arc::new(MemoryIdentityStore::new());
		let provider = AnonymousIdentityProvider::new(store.clone(), IdentityConfig::default());
		(store, provider)
	}

	#[tokio::test]
	async fn get_or_create_is_stable() {
		let (_, provider) = memory_provider();
		let first = provider.get_or_create().await;
		let second = provider.get_or_create().await;
		assert_eq!(first, second);
	}

	#[tokio::test]
	async fn minted_token_is_persisted_with_expiry() {
		let (store, provider) = memory_provider();
		let id = provider.get_or_create().await;

		let record = store.load(DEFAULT_IDENTITY_NAME).await.unwrap().unwrap();
		assert_eq!(record.value, id);
		let horizon = record.expires_at - Utc::now();
		assert!(horizon > Duration::days(364) && horizon <= Duration::days(365));
	}

	#[tokio::test]
	async fn existing_token_is_reused_by_a_new_provider() {
		let (store, provider) = memory_provider();
		let id = provider.get_or_create().await;

		let again = AnonymousIdentityProvider::new(store, IdentityConfig::default());
		assert_eq!(again.get_or_create().await, id);
	}

	#[tokio::test]
	async fn expired_token_is_replaced() {
		let (store, provider) = memory_provider();
		let stale = StoredIdentity::new(DEFAULT_IDENTITY_NAME, AnonymousId::generate(), -1);
		store.save(&stale).await.unwrap();

		let id = provider.get_or_create().await;
		assert_ne!(id, stale.value);
	}

	#[tokio::test]
	async fn reset_returns_a_new_persisted_token() {
		let (store, provider) = memory_provider();
		let before = provider.get_or_create().await;

		let after = provider.reset().await;
		assert_ne!(before, after);
		assert_eq!(provider.get_or_create().await, after);

		let record = store.load(DEFAULT_IDENTITY_NAME).await.unwrap().unwrap();
		assert_eq!(record.value, after);
	}

	#[tokio::test]
	async fn reset_without_prior_token_still_persists() {
		let (store, provider) = memory_provider();
		let id = provider.reset().await;
		assert_eq!(store.load(DEFAULT_IDENTITY_NAME).await.unwrap().unwrap().value, id);
	}

	#[tokio::test]
	async fn broken_store_degrades_to_memory() {
		let provider = AnonymousIdentityProvider::new(Arc::new(BrokenStore), IdentityConfig::default());

		let first = provider.get_or_create().await;
		assert_eq!(provider.get_or_create().await, first);

		let reset = provider.reset().await;
		assert_ne!(reset, first);
		assert_eq!(provider.get_or_create().await, reset);
	}

	#[tokio::test]
	async fn custom_name_and_file_store() {
		let dir = tempfile::tempdir().unwrap();
		let store = Arc::new(FileIdentityStore::new(dir.path().join("jar.json")));
		let config = IdentityConfig {
			name: "_site_visitor".to_string(),
			expire_days: 7,
		};
		let provider = AnonymousIdentityProvider::new(store.clone(), config);

		let id = provider.get_or_create().await;
		assert_eq!(store.load("_site_visitor").await.unwrap().unwrap().value, id);
		assert!(store.load(DEFAULT_IDENTITY_NAME).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn corrupt_jar_yields_one_token_across_sessions() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("identity.json");
		std::fs::write(&path, "garbage").unwrap();

		let session = || {
			AnonymousIdentityProvider::new(
				Arc::new(FileIdentityStore::new(&path)),
				IdentityConfig::default(),
			)
		};
		let first = session().get_or_create().await;
		let second = session().get_or_create().await;
		assert_eq!(first, second);
	}

	#[tokio::test]
	async fn huge_expiry_does_not_panic() {
		let config = IdentityConfig {
			expire_days: 1_000_000_000_000,
			..IdentityConfig::default()
		};
		let provider = AnonymousIdentityProvider::new(Arc::new(MemoryIdentityStore::new()), config);

		let id = provider.get_or_create().await;
		assert_eq!(provider.get_or_create().await, id);
	}
}
