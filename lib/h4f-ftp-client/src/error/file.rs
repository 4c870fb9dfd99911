/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use super::{FtpCommandError, FtpRawResponseError, FtpTransferServerError, FtpTransferSetupError};

#[derive(Debug, Error)]
pub enum FtpFileRetrieveStartError<E: std::error::Error> {
    #[error("data transfer setup error: {0}")]
    TransferSetupFailed(FtpTransferSetupError<E>),
    #[error("command error: {0}")]
    CommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("file unavailable")]
    FileUnavailable,
    #[error("a previous transfer is still in progress")]
    TransferInProgress,
}

impl<E: std::error::Error> From<FtpCommandError> for FtpFileRetrieveStartError<E> {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpFileRetrieveStartError::ServiceNotAvailable,
            _ => FtpFileRetrieveStartError::CommandError(e),
        }
    }
}

impl<E: std::error::Error> From<FtpTransferSetupError<E>> for FtpFileRetrieveStartError<E> {
    fn from(e: FtpTransferSetupError<E>) -> Self {
        match e {
            FtpTransferSetupError::ServiceNotAvailable => {
                FtpFileRetrieveStartError::ServiceNotAvailable
            }
            _ => FtpFileRetrieveStartError::TransferSetupFailed(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum FtpFileRetrieveError {
    #[error("server reported error: {0}")]
    ServerReportedError(FtpTransferServerError),
    #[error("timeout to wait end reply")]
    TimeoutToWaitEndReply,
    #[error("control read error: {0}")]
    ControlReadError(#[from] FtpRawResponseError),
    #[error("no transfer in progress")]
    NoTransferInProgress,
}

impl From<FtpTransferServerError> for FtpFileRetrieveError {
    fn from(e: FtpTransferServerError) -> Self {
        if let FtpTransferServerError::RecvFailed(e) = e {
            FtpFileRetrieveError::ControlReadError(e)
        } else {
            FtpFileRetrieveError::ServerReportedError(e)
        }
    }
}
