/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;

use crate::{HttpResponseSink, HttpServerRequest};

/// A request handler in a handler chain.
///
/// `next` is the handler after this one. A terminal handler may ignore it.
#[async_trait]
pub trait HttpRequestHandler: Send + Sync {
    async fn serve_http(
        &self,
        req: &HttpServerRequest,
        rsp: &mut dyn HttpResponseSink,
        next: &dyn HttpRequestHandler,
    ) -> anyhow::Result<()>;
}

/// The end of a handler chain, it writes nothing.
pub struct EmptyHandler;

#[async_trait]
impl HttpRequestHandler for EmptyHandler {
    async fn serve_http(
        &self,
        _req: &HttpServerRequest,
        _rsp: &mut dyn HttpResponseSink,
        _next: &dyn HttpRequestHandler,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
