/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

#[cfg(feature = "yaml")]
mod yaml;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpControlConfig {
    pub max_line_len: usize,
    pub max_multi_lines: usize,
    /// Applied to every control reply read. `None` waits forever.
    pub command_timeout: Option<Duration>,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_line_len: 2048,
            max_multi_lines: 128,
            command_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpTransferConfig {
    /// Max time to wait for the end reply after the data channel is drained.
    pub end_wait_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            end_wait_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    /// Bounds each TCP connect, for both the control and the data channel.
    pub connect_timeout: Duration,
    pub greeting_timeout: Duration,
    pub disable_epsv: bool,
    pub disable_mlsd: bool,
    pub disable_utf8: bool,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_timeout: Duration::from_secs(5),
            greeting_timeout: Duration::from_secs(5),
            disable_epsv: false,
            disable_mlsd: false,
            disable_utf8: false,
        }
    }
}
