/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod parse;
pub use parse::{HttpHeaderLine, HttpLineParseError, HttpMethodLine};

mod server;
pub use server::{HttpRequestParseError, HttpServerRequest};

mod response;
pub use response::{HttpResponseSink, HttpResponseWriter};

mod handler;
pub use handler::{EmptyHandler, HttpRequestHandler};
