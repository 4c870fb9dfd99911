/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};

mod writer;
pub use writer::HttpResponseWriter;

/// Where a handler writes its response.
///
/// Status and headers are committed by the first body write or by
/// [`finish`](Self::finish), whichever comes first. Changes to them after
/// the commit have no effect on the wire.
#[async_trait]
pub trait HttpResponseSink: Send {
    fn set_status(&mut self, status: StatusCode);
    fn headers_mut(&mut self) -> &mut HeaderMap;
    fn header_committed(&self) -> bool;

    async fn write(&mut self, buf: &[u8]) -> io::Result<()>;
    async fn finish(&mut self) -> io::Result<()>;
}
