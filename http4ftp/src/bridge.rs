/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderValue, StatusCode, header};
use log::{debug, trace};
use percent_encoding::percent_decode_str;
use tokio::io::AsyncReadExt;

use h4f_ftp_client::FtpClientConfig;
use h4f_http::{HttpRequestHandler, HttpResponseSink, HttpServerRequest};

use crate::config::EndpointConfig;
use crate::error::BridgeError;
use crate::session::{self, FtpSession};

const COPY_BUFFER_SIZE: usize = 16 * 1024;
const NOT_FOUND_BODY: &[u8] = b"Not Found";

/// Map each GET path to a file on the configured FTP server.
pub struct Http4FtpHandler {
    endpoint: Arc<EndpointConfig>,
    client_config: Arc<FtpClientConfig>,
}

impl Http4FtpHandler {
    pub fn new(endpoint: Arc<EndpointConfig>) -> Self {
        Self::with_client_config(endpoint, &FtpClientConfig::default())
    }

    pub fn with_client_config(endpoint: Arc<EndpointConfig>, base: &FtpClientConfig) -> Self {
        let client_config = Arc::new(endpoint.ftp_client_config(base));
        Http4FtpHandler {
            endpoint,
            client_config,
        }
    }

    pub async fn retrieve(
        &self,
        path: &str,
        rsp: &mut dyn HttpResponseSink,
    ) -> Result<(), BridgeError> {
        // the decoded bytes are used as is, they may not be UTF-8
        let raw_path = Cow::<[u8]>::from(percent_decode_str(path));
        let mut session = session::establish(&self.endpoint, &self.client_config).await?;

        let mut stream = match session.retrieve_file_start(&*raw_path).await {
            Ok(stream) => stream,
            Err(e) => {
                debug!("failed to retrieve ftp file {path}: {e}");
                rsp.set_status(StatusCode::NOT_FOUND);
                if let Err(e) = rsp.write(NOT_FOUND_BODY).await {
                    debug!("failed to send not found response for {path}: {e}");
                }
                close_session(session).await;
                return Ok(());
            }
        };

        rsp.set_status(StatusCode::OK);
        rsp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        // commit now, so a failure on the data channel is seen after 200
        rsp.write(&[]).await.map_err(BridgeError::TransferError)?;

        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        loop {
            let nr = stream
                .read(&mut buf)
                .await
                .map_err(BridgeError::TransferError)?;
            if nr == 0 {
                break;
            }
            rsp.write(&buf[..nr])
                .await
                .map_err(BridgeError::TransferError)?;
        }
        trace!("retrieved {} bytes of ftp file {path}", stream.transferred());
        drop(stream);

        if let Err(e) = session.retrieve_file_finish().await {
            debug!("ftp transfer of {path} ended with error: {e}");
        }
        close_session(session).await;
        Ok(())
    }
}

async fn close_session(session: FtpSession) {
    if let Err(e) = session.quit_and_close().await {
        debug!("failed to close ftp session: {e}");
    }
}

#[async_trait]
impl HttpRequestHandler for Http4FtpHandler {
    async fn serve_http(
        &self,
        req: &HttpServerRequest,
        rsp: &mut dyn HttpResponseSink,
        _next: &dyn HttpRequestHandler,
    ) -> anyhow::Result<()> {
        self.retrieve(req.uri.path(), rsp)
            .await
            .map_err(anyhow::Error::new)
    }
}
