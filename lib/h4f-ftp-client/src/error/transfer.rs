/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use super::{FtpCommandError, FtpRawResponseError};

#[derive(Debug, Error)]
pub enum FtpTransferSetupError<E: std::error::Error> {
    #[error("command error: {0}")]
    CommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("data connect failed: {0:?}")]
    ConnectIoError(E),
    #[error("timed out to connect data channel")]
    ConnectTimedOut,
}

impl<E: std::error::Error> From<FtpCommandError> for FtpTransferSetupError<E> {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpTransferSetupError::ServiceNotAvailable,
            _ => FtpTransferSetupError::CommandError(e),
        }
    }
}

/// Errors reported by the server in the end reply of a transfer.
#[derive(Debug, Error)]
pub enum FtpTransferServerError {
    #[error("unable to recv reply: {0}")]
    RecvFailed(#[from] FtpRawResponseError),
    #[error("restart needed")]
    RestartNeeded,
    #[error("data transfer not established")]
    DataTransferNotEstablished,
    #[error("data transfer lost")]
    DataTransferLost,
    #[error("server failed")]
    ServerFailed,
    #[error("unexpected end reply code {0}")]
    UnexpectedEndReplyCode(u16),
}
