/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use anyhow::Context;
use ::log::{info, warn};
use tokio::sync::broadcast;

pub mod bridge;
pub mod config;
pub mod error;
pub mod log;
pub mod opts;
pub mod serve;
pub mod session;

mod build;

use bridge::Http4FtpHandler;
use config::GatewayConfig;
use serve::Http4FtpServer;

pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let handler = Http4FtpHandler::with_client_config(
        Arc::clone(&config.endpoint),
        &config.server.ftp_client,
    );
    let server = Http4FtpServer::new(Arc::clone(&config.server), Arc::new(handler));

    let listener = server
        .bind()
        .await
        .context(format!("failed to listen on {}", config.server.listen))?;
    let local_addr = listener
        .local_addr()
        .context("failed to get local address of listener")?;
    info!(
        "listening on {local_addr}, files served from ftp server {}",
        config.endpoint.addr
    );

    let (quit_sender, quit_receiver) = broadcast::channel(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to wait for ctrl-c signal: {e}");
            std::future::pending::<()>().await;
        }
        info!("ctrl-c received, quit now");
        let _ = quit_sender.send(());
    });

    server.run(listener, quit_receiver).await;
    Ok(())
}
