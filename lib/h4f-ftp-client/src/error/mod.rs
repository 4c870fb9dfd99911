/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod response;
pub use response::FtpRawResponseError;

mod command;
pub use command::FtpCommandError;

mod connect;
pub use connect::FtpConnectError;

mod session;
pub(crate) use session::FtpAuthStatus;
pub use session::FtpSessionOpenError;

mod transfer;
pub use transfer::{FtpTransferServerError, FtpTransferSetupError};

mod file;
pub use file::{FtpFileRetrieveError, FtpFileRetrieveStartError};
