/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::io;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::FtpControlChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtpCommand(&'static str);

impl FtpCommand {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FtpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

macro_rules! ftp_commands {
    (
        $(
            $(#[$docs:meta])*
            ($konst:ident, $phrase:expr);
        )+
    ) => {
        impl FtpCommand {
        $(
            $(#[$docs])*
            pub const $konst: FtpCommand = FtpCommand($phrase);
        )+
        }
    };
}

ftp_commands! {
    /// a fake command for greeting
    (GREETING, "-");
    (FEAT, "FEAT");
    (OPTS_UTF8_ON, "OPTS UTF8 ON");
    (USER, "USER");
    (PASS, "PASS");
    (QUIT, "QUIT");
    (TYPE_A, "TYPE A");
    (TYPE_I, "TYPE I");
    (PASV, "PASV");
    (EPSV, "EPSV");
    (RETR, "RETR");
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn send_line(&mut self, buf: &[u8]) -> io::Result<()> {
        #[cfg(feature = "log-raw-io")]
        crate::debug::log_cmd(String::from_utf8_lossy(buf).trim_end());

        self.stream.write_all(buf).await?;
        self.stream.flush().await
    }

    pub(super) async fn send_cmd(&mut self, cmd: FtpCommand) -> io::Result<()> {
        let mut buf: Vec<u8> = Vec::with_capacity(cmd.0.len() + 2);
        buf.extend_from_slice(cmd.0.as_bytes());
        buf.extend_from_slice(b"\r\n");

        self.send_line(&buf).await
    }

    /// The parameter is sent as raw bytes, but it must not break the command line.
    pub(super) async fn send_cmd1(&mut self, cmd: FtpCommand, param1: &[u8]) -> io::Result<()> {
        if memchr::memchr2(b'\r', b'\n', param1).is_some() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("line break found in parameter of command {cmd}"),
            ));
        }

        let mut buf: Vec<u8> = Vec::with_capacity(cmd.0.len() + 1 + param1.len() + 2);
        buf.extend_from_slice(cmd.0.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(param1);
        buf.extend_from_slice(b"\r\n");

        self.send_line(&buf).await
    }
}
