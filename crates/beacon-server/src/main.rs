// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Beacon relay server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beacon_relay::HttpUpstream;
use beacon_server::{cors_layer, create_router, AppState};
use beacon_server_config::{LogFormat, ServerConfig};

/// Beacon server - relays tracking events and identify calls upstream.
#[derive(Parser, Debug)]
#[command(name = "beacon-server", about = "Beacon tracking relay server", version)]
struct Args {
	/// Path to a TOML config file (overrides the system config location)
	#[arg(long, env = "BEACON_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn version_info() -> String {
	format!(
		"beacon-server {} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

fn init_tracing(config: &ServerConfig) {
	let json = config.logging.format == LogFormat::Json;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json).then(tracing_subscriber::fmt::layer))
		.init();
}

fn build_upstream(config: &ServerConfig) -> anyhow::Result<HttpUpstream> {
	let mut builder = HttpUpstream::builder()
		.base_url(&config.upstream.base_url)
		.revision(&config.upstream.revision)
		.timeout(config.upstream.timeout());
	if let Some(key) = config.upstream.api_key.clone() {
		builder = builder.api_key(key);
	}
	builder.build().context("failed to configure upstream client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match args.config {
		Some(path) => beacon_server_config::load_config_with_file(path)?,
		None => beacon_server_config::load_config()?,
	};

	init_tracing(&config);

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		upstream = %config.upstream.base_url,
		allowed_origin = %config.cors.allowed_origin,
		public_dir = %config.paths.public_dir,
		"starting beacon-server"
	);

	let upstream = build_upstream(&config)?;
	let state = AppState::new(Arc::new(upstream)).with_public_key(config.upstream.public_key.clone());

	let app = create_router(state, &config.paths.public_dir)
		.layer(TraceLayer::new_for_http())
		.layer(cors_layer(&config.cors));

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.with_context(|| format!("failed to bind {addr}"))?;

	tokio::select! {
		result = axum::serve(
			listener,
			app.into_make_service_with_connect_info::<SocketAddr>(),
		) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
