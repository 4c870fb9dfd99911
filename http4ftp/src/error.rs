/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use h4f_ftp_client::{FtpConnectError, FtpSessionOpenError};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("dial ftp server error: {0}")]
    ConnectError(FtpConnectError<io::Error>),
    #[error("ftp login error: {0}")]
    AuthError(FtpSessionOpenError),
    #[error("ftp transfer error: {0}")]
    TransferError(io::Error),
}

impl BridgeError {
    /// If the error happened after the response header was sent.
    pub fn is_transfer(&self) -> bool {
        matches!(self, BridgeError::TransferError(_))
    }
}
