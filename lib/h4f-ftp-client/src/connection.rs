/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::error::Error;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// Where the passive data channel should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpDataAddr {
    /// The same host as the control connection, as returned by EPSV.
    ControlPeer(u16),
    /// The address returned by PASV.
    Explicit(SocketAddr),
}

#[async_trait]
pub trait FtpConnectionProvider<T: AsyncRead + AsyncWrite, E: Error> {
    async fn new_control_connection(&mut self, server: &str) -> Result<T, E>;
    async fn new_data_connection(&mut self, addr: FtpDataAddr) -> Result<T, E>;
}
