/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::net::TcpStream;

use h4f_ftp_client::{
    FtpClient, FtpClientConfig, FtpConnectError, FtpConnectionProvider, FtpDataAddr,
};

use crate::config::EndpointConfig;
use crate::error::BridgeError;

pub type FtpSession = FtpClient<LocalConnectionProvider, TcpStream, io::Error>;

/// Dial plain TCP connections from the local host.
#[derive(Default)]
pub struct LocalConnectionProvider {
    control_peer: Option<SocketAddr>,
}

impl LocalConnectionProvider {
    /// The resolved address of the control connection.
    pub fn control_peer(&self) -> Option<SocketAddr> {
        self.control_peer
    }
}

#[async_trait]
impl FtpConnectionProvider<TcpStream, io::Error> for LocalConnectionProvider {
    async fn new_control_connection(&mut self, server: &str) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(server).await?;
        self.control_peer = Some(stream.peer_addr()?);
        Ok(stream)
    }

    async fn new_data_connection(&mut self, addr: FtpDataAddr) -> io::Result<TcpStream> {
        let addr = match addr {
            FtpDataAddr::ControlPeer(port) => {
                let Some(peer) = self.control_peer else {
                    return Err(io::Error::new(
                        io::ErrorKind::NotConnected,
                        "no control connection",
                    ));
                };
                SocketAddr::new(peer.ip(), port)
            }
            FtpDataAddr::Explicit(addr) => addr,
        };
        TcpStream::connect(addr).await
    }
}

/// Open a new session to the endpoint, logging in if a user is set.
///
/// The control connection is closed before returning any error.
pub async fn establish(
    endpoint: &EndpointConfig,
    client_config: &Arc<FtpClientConfig>,
) -> Result<FtpSession, BridgeError> {
    let mut session = FtpClient::connect_to(
        &endpoint.addr,
        LocalConnectionProvider::default(),
        client_config,
    )
    .await
    .map_err(BridgeError::ConnectError)?;

    if !endpoint.user.is_empty()
        && let Err(e) = session
            .new_user_session(&endpoint.user, &endpoint.pass)
            .await
    {
        if let Err(e) = session.quit_and_close().await {
            debug!("failed to quit after login error: {e}");
        }
        return Err(BridgeError::AuthError(e));
    }

    if let Err(e) = session.negotiate_features().await {
        if let Err(e) = session.quit_and_close().await {
            debug!("failed to quit after negotiation error: {e}");
        }
        return Err(BridgeError::ConnectError(
            FtpConnectError::NegotiationFailed(e),
        ));
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn data_connection_to_control_peer() {
        let control = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let control_addr = control.local_addr().unwrap();
        let data = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let data_port = data.local_addr().unwrap().port();

        let mut provider = LocalConnectionProvider::default();
        let err = provider
            .new_data_connection(FtpDataAddr::ControlPeer(data_port))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);

        let _stream = provider
            .new_control_connection(&control_addr.to_string())
            .await
            .unwrap();
        assert_eq!(provider.control_peer(), Some(control_addr));

        let stream = provider
            .new_data_connection(FtpDataAddr::ControlPeer(data_port))
            .await
            .unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), data_port);

        let explicit = data.local_addr().unwrap();
        let stream = provider
            .new_data_connection(FtpDataAddr::Explicit(explicit))
            .await
            .unwrap();
        assert_eq!(stream.peer_addr().unwrap(), explicit);
    }
}
