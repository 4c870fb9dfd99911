/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::error::Error;
use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::control::FtpControlChannel;
use crate::error::{
    FtpAuthStatus, FtpCommandError, FtpConnectError, FtpFileRetrieveError,
    FtpFileRetrieveStartError, FtpSessionOpenError, FtpTransferSetupError,
};
use crate::{
    FtpClientConfig, FtpConnectionProvider, FtpDataAddr, FtpRetrieveStream, FtpServerFeature,
    FtpTransferType,
};

pub struct FtpClient<CP, S, E>
where
    CP: FtpConnectionProvider<S, E>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: Error,
{
    conn_provider: CP,
    control: FtpControlChannel<S>,
    config: Arc<FtpClientConfig>,
    server_feature: FtpServerFeature,
    epsv_failed: bool,
    transfer_in_progress: bool,
    _phantom: PhantomData<fn() -> E>,
}

impl<CP, S, E> FtpClient<CP, S, E>
where
    CP: FtpConnectionProvider<S, E>,
    S: AsyncRead + AsyncWrite + Unpin,
    E: Error,
{
    /// Open the control connection and wait for the server greeting.
    pub async fn connect_to(
        server: &str,
        mut conn_provider: CP,
        config: &Arc<FtpClientConfig>,
    ) -> Result<Self, FtpConnectError<E>> {
        let stream = match tokio::time::timeout(
            config.connect_timeout,
            conn_provider.new_control_connection(server),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(FtpConnectError::ConnectIoError(e)),
            Err(_) => return Err(FtpConnectError::ConnectTimedOut),
        };

        let mut control = FtpControlChannel::new(stream, config.control.clone());
        match tokio::time::timeout(config.greeting_timeout, control.wait_greetings()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                control.shutdown().await;
                return Err(e.into());
            }
            Err(_) => {
                control.shutdown().await;
                return Err(FtpConnectError::GreetingTimedOut);
            }
        }

        Ok(FtpClient {
            conn_provider,
            control,
            config: Arc::clone(config),
            server_feature: FtpServerFeature::default(),
            epsv_failed: false,
            transfer_in_progress: false,
            _phantom: PhantomData,
        })
    }

    pub async fn new_user_session(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<(), FtpSessionOpenError> {
        match self.control.send_username(username).await? {
            FtpAuthStatus::LoggedIn => return Ok(()),
            FtpAuthStatus::NotLoggedIn => return Err(FtpSessionOpenError::NotLoggedIn),
            FtpAuthStatus::NeedAccount => return Err(FtpSessionOpenError::AccountIsNeeded),
            FtpAuthStatus::NeedPassword => {}
        }

        match self.control.send_password(password).await? {
            FtpAuthStatus::LoggedIn => Ok(()),
            FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
            FtpAuthStatus::NotLoggedIn | FtpAuthStatus::NeedPassword => {
                Err(FtpSessionOpenError::NotLoggedIn)
            }
        }
    }

    /// Query server features and switch to UTF-8 paths if possible.
    pub async fn negotiate_features(&mut self) -> Result<(), FtpCommandError> {
        self.server_feature = self.control.check_server_feature().await?;

        if !self.config.disable_utf8
            && self.server_feature.support_utf8_path()
            && !self.control.set_use_utf8().await?
        {
            debug!("server advertised UTF8 but rejected OPTS UTF8 ON");
        }
        Ok(())
    }

    #[inline]
    pub fn connection_provider(&self) -> &CP {
        &self.conn_provider
    }

    #[inline]
    pub fn server_feature(&self) -> &FtpServerFeature {
        &self.server_feature
    }

    pub fn mlsd_enabled(&self) -> bool {
        !self.config.disable_mlsd && self.server_feature.support_mlst()
    }

    async fn request_passive_addr(&mut self) -> Result<FtpDataAddr, FtpTransferSetupError<E>> {
        if !self.config.disable_epsv && !self.epsv_failed {
            match self.control.request_epsv_port().await {
                Ok(port) => return Ok(FtpDataAddr::ControlPeer(port)),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    debug!("EPSV failed, fall back to PASV: {e}");
                    self.epsv_failed = true;
                }
            }
        }

        let addr = self.control.request_pasv_port().await?;
        if addr.ip().is_unspecified() {
            Ok(FtpDataAddr::ControlPeer(addr.port()))
        } else {
            Ok(FtpDataAddr::Explicit(addr))
        }
    }

    async fn new_data_transfer(&mut self) -> Result<S, FtpTransferSetupError<E>> {
        let addr = self.request_passive_addr().await?;

        match tokio::time::timeout(
            self.config.connect_timeout,
            self.conn_provider.new_data_connection(addr),
        )
        .await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(FtpTransferSetupError::ConnectIoError(e)),
            Err(_) => Err(FtpTransferSetupError::ConnectTimedOut),
        }
    }

    /// Start a binary RETR transfer of `path`.
    ///
    /// The path bytes are sent as is, so names in a legacy server encoding
    /// can be used when UTF-8 is off.
    ///
    /// Read the returned stream to EOF and then call
    /// [`retrieve_file_finish`](Self::retrieve_file_finish) to check the end reply.
    pub async fn retrieve_file_start<P>(
        &mut self,
        path: &P,
    ) -> Result<FtpRetrieveStream<S>, FtpFileRetrieveStartError<E>>
    where
        P: AsRef<[u8]> + ?Sized,
    {
        if self.transfer_in_progress {
            return Err(FtpFileRetrieveStartError::TransferInProgress);
        }

        self.control
            .request_transfer_type(FtpTransferType::Image)
            .await?;

        let data_stream = self.new_data_transfer().await?;
        self.control.start_retrieve(path.as_ref()).await?;
        self.transfer_in_progress = true;

        Ok(FtpRetrieveStream::new(data_stream))
    }

    pub async fn retrieve_file_finish(&mut self) -> Result<(), FtpFileRetrieveError> {
        if !self.transfer_in_progress {
            return Err(FtpFileRetrieveError::NoTransferInProgress);
        }
        self.transfer_in_progress = false;

        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_retrieve(),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(FtpFileRetrieveError::TimeoutToWaitEndReply),
        }
    }

    /// Send QUIT and close the control connection.
    ///
    /// The connection is closed even if QUIT failed.
    pub async fn quit_and_close(mut self) -> Result<(), FtpCommandError> {
        let r = self.control.send_quit().await;
        self.control.shutdown().await;
        r
    }
}
