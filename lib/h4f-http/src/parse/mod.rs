/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpLineParseError;

mod header_line;
pub use header_line::HttpHeaderLine;

mod method_line;
pub use method_line::HttpMethodLine;
