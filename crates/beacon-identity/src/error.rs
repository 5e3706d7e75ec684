// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IdentityStoreError {
	#[error("identity store I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("identity store is corrupt: {0}")]
	Serde(#[from] serde_json::Error),

	#[error("no data directory available for identity store")]
	NoDataDir,

	#[error("identity store at {path} is unavailable: {reason}")]
	Unavailable { path: PathBuf, reason: String },
}
