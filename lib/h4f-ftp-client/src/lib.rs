/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_DEBUG_LOG_TARGET};

mod config;
pub use config::{FtpClientConfig, FtpControlConfig, FtpTransferConfig};

mod connection;
pub use connection::{FtpConnectionProvider, FtpDataAddr};

mod control;
pub use control::FtpCommand;

mod error;
pub use error::{
    FtpCommandError, FtpConnectError, FtpFileRetrieveError, FtpFileRetrieveStartError,
    FtpRawResponseError, FtpSessionOpenError, FtpTransferServerError, FtpTransferSetupError,
};

mod feature;
pub use feature::FtpServerFeature;

mod transfer;
pub use transfer::{FtpRetrieveStream, FtpTransferType};

mod client;
pub use client::FtpClient;
