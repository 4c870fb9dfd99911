/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};

use crate::FtpControlConfig;
use crate::error::{
    FtpAuthStatus, FtpCommandError, FtpFileRetrieveStartError, FtpTransferServerError,
};
use crate::feature::FtpServerFeature;
use crate::transfer::FtpTransferType;

mod response;

mod command;
pub use command::FtpCommand;

pub(crate) struct FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite,
{
    config: FtpControlConfig,
    stream: BufStream<T>,
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: T, config: FtpControlConfig) -> Self {
        FtpControlChannel {
            config,
            stream: BufStream::new(stream),
        }
    }

    pub(crate) async fn wait_greetings(&mut self) -> Result<(), FtpCommandError> {
        loop {
            let reply = self.read_raw_response().await?;
            return match reply.code() {
                120 => continue,
                220 => Ok(()),
                421 => Err(FtpCommandError::ServiceNotAvailable),
                n => Err(FtpCommandError::UnexpectedReplyCode(
                    FtpCommand::GREETING,
                    n,
                )),
            };
        }
    }

    pub(crate) async fn check_server_feature(
        &mut self,
    ) -> Result<FtpServerFeature, FtpCommandError> {
        let mut feature = FtpServerFeature::default();

        let cmd = FtpCommand::FEAT;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("check server feature").await?;
        match reply.code() {
            500 | 501 | 502 | 530 => {}
            211 => {
                if reply.is_multi_line() {
                    let lines = reply.lines();
                    for line in &lines[1..lines.len() - 1] {
                        if !line.starts_with(' ') {
                            break;
                        }
                        feature.parse_and_set(line.trim());
                    }
                }
            }
            421 => return Err(FtpCommandError::ServiceNotAvailable),
            n => return Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }

        Ok(feature)
    }

    pub(crate) async fn set_use_utf8(&mut self) -> Result<bool, FtpCommandError> {
        let cmd = FtpCommand::OPTS_UTF8_ON;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("set use utf8").await?;
        match reply.code() {
            500 | 501 | 502 | 504 => Ok(false),
            200 | 202 => Ok(true),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_username(
        &mut self,
        name: &str,
    ) -> Result<FtpAuthStatus, FtpCommandError> {
        let cmd = FtpCommand::USER;
        self.send_cmd1(cmd, name.as_bytes())
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("send username").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            530 => Ok(FtpAuthStatus::NotLoggedIn),
            230 => Ok(FtpAuthStatus::LoggedIn),
            331 => Ok(FtpAuthStatus::NeedPassword),
            332 => Ok(FtpAuthStatus::NeedAccount),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_password(
        &mut self,
        pass: &str,
    ) -> Result<FtpAuthStatus, FtpCommandError> {
        let cmd = FtpCommand::PASS;
        self.send_cmd1(cmd, pass.as_bytes())
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("send password").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            503 => Err(FtpCommandError::BadCommandSequence(cmd)),
            530 => Ok(FtpAuthStatus::NotLoggedIn),
            202 | 230 => Ok(FtpAuthStatus::LoggedIn),
            332 => Ok(FtpAuthStatus::NeedAccount),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_quit(&mut self) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::QUIT;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("send quit").await?;
        match reply.code() {
            500 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            221 => Ok(()),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_transfer_type(
        &mut self,
        transfer_type: FtpTransferType,
    ) -> Result<(), FtpCommandError> {
        let cmd = match transfer_type {
            FtpTransferType::Ascii => FtpCommand::TYPE_A,
            FtpTransferType::Image => FtpCommand::TYPE_I,
        };
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("request transfer type").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            504 => Err(FtpCommandError::ParameterNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            200 => Ok(()),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_pasv_port(&mut self) -> Result<SocketAddr, FtpCommandError> {
        let cmd = FtpCommand::PASV;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("request pasv port").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            227 => match reply.parse_pasv_227() {
                Some(addr) => Ok(addr),
                None => Err(FtpCommandError::InvalidReplySyntax(cmd, 227)),
            },
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_epsv_port(&mut self) -> Result<u16, FtpCommandError> {
        let cmd = FtpCommand::EPSV;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("request epsv port").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            502 | 522 => Err(FtpCommandError::CommandNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            229 => match reply.parse_epsv_229() {
                Some(port) => Ok(port),
                None => Err(FtpCommandError::InvalidReplySyntax(cmd, 229)),
            },
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn start_retrieve<E: std::error::Error>(
        &mut self,
        path: &[u8],
    ) -> Result<(), FtpFileRetrieveStartError<E>> {
        let cmd = FtpCommand::RETR;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("start retrieve")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            550 => Err(FtpFileRetrieveStartError::FileUnavailable),
            125 | 150 => Ok(()),
            421 => Err(FtpFileRetrieveStartError::ServiceNotAvailable),
            450 => Err(FtpFileRetrieveStartError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    /// Read the end reply of a retrieve transfer.
    pub(crate) async fn wait_retrieve(&mut self) -> Result<(), FtpTransferServerError> {
        let reply = self.read_raw_response().await?;
        match reply.code() {
            110 => Err(FtpTransferServerError::RestartNeeded),
            226 | 250 => Ok(()),
            425 => Err(FtpTransferServerError::DataTransferNotEstablished),
            426 => Err(FtpTransferServerError::DataTransferLost),
            451 => Err(FtpTransferServerError::ServerFailed),
            n => Err(FtpTransferServerError::UnexpectedEndReplyCode(n)),
        }
    }

    pub(crate) async fn shutdown(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn channel(stream: tokio_test::io::Mock) -> FtpControlChannel<tokio_test::io::Mock> {
        FtpControlChannel::new(stream, FtpControlConfig::default())
    }

    #[tokio::test]
    async fn greetings() {
        let stream = Builder::new()
            .read(b"120 wait a moment\r\n")
            .read(b"220 ready\r\n")
            .build();
        channel(stream).wait_greetings().await.unwrap();

        let stream = Builder::new().read(b"421 too many users\r\n").build();
        assert!(matches!(
            channel(stream).wait_greetings().await,
            Err(FtpCommandError::ServiceNotAvailable)
        ));
    }

    #[tokio::test]
    async fn feature() {
        let stream = Builder::new()
            .write(b"FEAT\r\n")
            .read(b"211-Extensions supported:\r\n UTF8\r\n EPSV\r\n MLST size*;\r\n211 END\r\n")
            .build();
        let feature = channel(stream).check_server_feature().await.unwrap();
        assert!(feature.support_utf8_path());
        assert!(feature.support_epsv());
        assert!(feature.support_mlst());

        let stream = Builder::new()
            .write(b"FEAT\r\n")
            .read(b"502 not implemented\r\n")
            .build();
        let feature = channel(stream).check_server_feature().await.unwrap();
        assert_eq!(feature, FtpServerFeature::default());
    }

    #[tokio::test]
    async fn login() {
        let stream = Builder::new()
            .write(b"USER alice\r\n")
            .read(b"331 need password\r\n")
            .write(b"PASS secret\r\n")
            .read(b"230 logged in\r\n")
            .build();
        let mut channel = channel(stream);
        assert!(matches!(
            channel.send_username("alice").await,
            Ok(FtpAuthStatus::NeedPassword)
        ));
        assert!(matches!(
            channel.send_password("secret").await,
            Ok(FtpAuthStatus::LoggedIn)
        ));
    }

    #[tokio::test]
    async fn username_with_line_break() {
        let stream = Builder::new().build();
        assert!(matches!(
            channel(stream).send_username("alice\r\nDELE x").await,
            Err(FtpCommandError::SendFailed(_))
        ));
    }

    #[tokio::test]
    async fn passive_ports() {
        let stream = Builder::new()
            .write(b"EPSV\r\n")
            .read(b"229 Entering Extended Passive Mode (|||40000|)\r\n")
            .write(b"EPSV\r\n")
            .read(b"522 use PASV\r\n")
            .write(b"PASV\r\n")
            .read(b"227 Entering Passive Mode (127,0,0,1,156,64)\r\n")
            .build();
        let mut channel = channel(stream);
        assert_eq!(channel.request_epsv_port().await.unwrap(), 40000);
        assert!(matches!(
            channel.request_epsv_port().await,
            Err(FtpCommandError::CommandNotImplemented(FtpCommand::EPSV))
        ));
        assert_eq!(
            channel.request_pasv_port().await.unwrap(),
            "127.0.0.1:40000".parse().unwrap()
        );
    }

    #[tokio::test]
    async fn retrieve() {
        let stream = Builder::new()
            .write(b"RETR /a.txt\r\n")
            .read(b"150 opening data connection\r\n")
            .read(b"226 transfer complete\r\n")
            .write(b"RETR /missing\r\n")
            .read(b"550 no such file\r\n")
            .build();
        let mut channel = channel(stream);
        channel
            .start_retrieve::<std::io::Error>(b"/a.txt")
            .await
            .unwrap();
        channel.wait_retrieve().await.unwrap();
        assert!(matches!(
            channel.start_retrieve::<std::io::Error>(b"/missing").await,
            Err(FtpFileRetrieveStartError::FileUnavailable)
        ));
    }

    #[tokio::test]
    async fn retrieve_raw_path() {
        let stream = Builder::new()
            .write(b"RETR /caf\xE9.txt\r\n")
            .read(b"150 opening data connection\r\n")
            .build();
        let mut channel = channel(stream);
        channel
            .start_retrieve::<std::io::Error>(b"/caf\xE9.txt")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn retrieve_line_break_in_path() {
        let stream = Builder::new().build();
        let mut channel = channel(stream);
        assert!(matches!(
            channel
                .start_retrieve::<std::io::Error>(b"/a\r\nDELE /b")
                .await,
            Err(FtpFileRetrieveStartError::CommandError(
                FtpCommandError::SendFailed(_)
            ))
        ));
    }

    #[tokio::test]
    async fn retrieve_lost() {
        let stream = Builder::new()
            .read(b"426 connection closed; transfer aborted\r\n")
            .build();
        assert!(matches!(
            channel(stream).wait_retrieve().await,
            Err(FtpTransferServerError::DataTransferLost)
        ));
    }
}
