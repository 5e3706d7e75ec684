// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Anonymous visitor identity.
//!
//! A visitor gets one UUID v4 token the first time it is needed. The token is
//! persisted under a named key with an expiry horizon and reused until it is
//! explicitly reset. When the persistence medium is unavailable the provider
//! keeps the token in memory for the rest of the session instead of failing.
//!
//! ```ignore
//! let provider = AnonymousIdentityProvider::new(
//!     Arc::new(FileIdentityStore::default_location()?),
//!     IdentityConfig::default(),
//! );
//! let id = provider.get_or_create().await;
//! ```

pub mod error;
pub mod id;
pub mod provider;
pub mod store;

pub use error::IdentityStoreError;
pub use id::AnonymousId;
pub use provider::{AnonymousIdentityProvider, IdentityConfig, DEFAULT_EXPIRE_DAYS, DEFAULT_IDENTITY_NAME};
pub use store::{FileIdentityStore, IdentityStore, MemoryIdentityStore, StoredIdentity, MAX_EXPIRE_DAYS};
