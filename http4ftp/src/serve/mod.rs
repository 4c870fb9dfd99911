/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use h4f_http::HttpRequestHandler;

use crate::config::ServerConfig;

mod task;
use task::HttpConnTask;

pub struct Http4FtpServer {
    config: Arc<ServerConfig>,
    handler: Arc<dyn HttpRequestHandler>,
}

impl Http4FtpServer {
    pub fn new(config: Arc<ServerConfig>, handler: Arc<dyn HttpRequestHandler>) -> Self {
        Http4FtpServer { config, handler }
    }

    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind(self.config.listen).await
    }

    /// Accept connections until a message or close is seen on `quit`.
    ///
    /// Running connections are stopped when quit.
    pub async fn run(&self, listener: TcpListener, mut quit: broadcast::Receiver<()>) {
        use broadcast::error::RecvError;

        loop {
            tokio::select! {
                biased;

                ev = quit.recv() => {
                    match ev {
                        Ok(_) | Err(RecvError::Closed) => {
                            info!("server quit, stop accepting new connections");
                            break;
                        }
                        Err(RecvError::Lagged(n)) => {
                            debug!("server quit channel lagged {n} messages");
                        }
                    }
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => self.run_task(stream, peer_addr, &quit),
                        Err(e) => warn!("accept: {e:?}"),
                    }
                }
            }
        }
    }

    fn run_task(
        &self,
        stream: TcpStream,
        peer_addr: SocketAddr,
        quit: &broadcast::Receiver<()>,
    ) {
        let task = HttpConnTask::new(
            Arc::clone(&self.config),
            Arc::clone(&self.handler),
            peer_addr,
        );
        let quit = quit.resubscribe();
        tokio::spawn(async move {
            task.run(stream, quit).await;
        });
    }
}
