/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::sync::Arc;

use http::{HeaderValue, Method, StatusCode, Version, header};
use log::{debug, info, warn};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use h4f_http::{
    EmptyHandler, HttpRequestHandler, HttpResponseSink, HttpResponseWriter, HttpServerRequest,
};

use crate::config::ServerConfig;

pub(super) struct HttpConnTask {
    config: Arc<ServerConfig>,
    handler: Arc<dyn HttpRequestHandler>,
    peer_addr: SocketAddr,
}

impl HttpConnTask {
    pub(super) fn new(
        config: Arc<ServerConfig>,
        handler: Arc<dyn HttpRequestHandler>,
        peer_addr: SocketAddr,
    ) -> Self {
        HttpConnTask {
            config,
            handler,
            peer_addr,
        }
    }

    pub(super) async fn run(self, stream: TcpStream, mut quit: broadcast::Receiver<()>) {
        tokio::select! {
            biased;

            _ = quit.recv() => {
                debug!("{} connection closed as server quit", self.peer_addr);
            }
            _ = self.serve(stream) => {}
        }
    }

    async fn serve(&self, stream: TcpStream) {
        let (r, mut w) = stream.into_split();
        let mut reader = BufReader::new(r);

        loop {
            let mut req =
                match HttpServerRequest::parse(&mut reader, self.config.max_header_size).await {
                    Ok(req) => req,
                    Err(e) => {
                        if let Some(status) = e.status_code() {
                            debug!("{} invalid request: {e}", self.peer_addr);
                            let mut rsp = HttpResponseWriter::new(&mut w, Version::HTTP_11, false);
                            rsp.set_status(status);
                            let _ = rsp.finish().await;
                        }
                        break;
                    }
                };
            if req.has_body() {
                // the body is never read, so the stream can't be reused
                req.disable_keep_alive();
            }

            let mut rsp = HttpResponseWriter::new(&mut w, req.version, req.keep_alive());
            if req.method != Method::GET {
                rsp.set_status(StatusCode::METHOD_NOT_ALLOWED);
                rsp.headers_mut()
                    .insert(header::ALLOW, HeaderValue::from_static("GET"));
            } else if let Err(e) = self.handler.serve_http(&req, &mut rsp, &EmptyHandler).await {
                if rsp.header_committed() {
                    warn!(
                        "{} GET {}: transfer failed after {} bytes: {e:?}",
                        self.peer_addr,
                        req.uri.path(),
                        rsp.body_size()
                    );
                    break;
                }
                info!("{} GET {}: {e:?}", self.peer_addr, req.uri.path());
                rsp.headers_mut().clear();
                rsp.set_status(StatusCode::BAD_GATEWAY);
            }

            if let Err(e) = rsp.finish().await {
                debug!("{} failed to send response: {e:?}", self.peer_addr);
                break;
            }
            debug!(
                "{} {} {} -> {}",
                self.peer_addr,
                req.method,
                req.uri.path(),
                rsp.status()
            );
            if !rsp.keep_alive() {
                break;
            }
        }

        let _ = w.shutdown().await;
    }
}
