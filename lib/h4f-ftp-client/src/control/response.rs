/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncWrite};

use h4f_io_ext::LimitedBufReadExt;

use super::FtpControlChannel;
use crate::error::FtpRawResponseError;

/// A complete reply, single or multi line.
///
/// `lines[0]` is the text after the reply code of the first line. For
/// multi line replies, the last element is the text after the reply code
/// of the end line, and the ones in between are kept verbatim.
#[derive(Debug)]
pub(crate) struct FtpReply {
    code: u16,
    lines: Vec<String>,
}

fn parse_reply_code(line: &[u8]) -> Result<u16, FtpRawResponseError> {
    let mut code: u16 = 0;
    for c in &line[0..3] {
        if !c.is_ascii_digit() {
            return Err(FtpRawResponseError::InvalidLineFormat);
        }
        code = code * 10 + (*c - b'0') as u16;
    }
    if !(100..600).contains(&code) {
        return Err(FtpRawResponseError::InvalidReplyCode(code));
    }
    Ok(code)
}

fn line_text(line: &[u8]) -> Result<String, FtpRawResponseError> {
    let s = std::str::from_utf8(line).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
    Ok(s.trim_end().to_string())
}

impl FtpReply {
    pub(crate) fn code(&self) -> u16 {
        self.code
    }

    /// The text of a single line reply.
    pub(crate) fn single_line(&self) -> Option<&str> {
        if self.lines.len() == 1 {
            Some(self.lines[0].as_str())
        } else {
            None
        }
    }

    pub(crate) fn is_multi_line(&self) -> bool {
        self.lines.len() > 1
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Parse `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)`.
    ///
    /// Some servers omit the parentheses, so the first run of digits and
    /// commas in the text is used.
    pub(crate) fn parse_pasv_227(&self) -> Option<SocketAddr> {
        let text = self.single_line()?;
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let end = text[start..]
            .find(|c: char| !c.is_ascii_digit() && c != ',')
            .map(|p| p + start)
            .unwrap_or(text.len());

        let mut numbers = [0u8; 6];
        let mut count = 0;
        for part in text[start..end].split(',') {
            if count >= 6 {
                return None;
            }
            numbers[count] = u8::from_str(part).ok()?;
            count += 1;
        }
        if count != 6 {
            return None;
        }

        let ip = Ipv4Addr::new(numbers[0], numbers[1], numbers[2], numbers[3]);
        let port = u16::from_be_bytes([numbers[4], numbers[5]]);
        Some(SocketAddr::new(IpAddr::V4(ip), port))
    }

    /// Parse `229 Entering Extended Passive Mode (|||port|)`.
    ///
    /// The delimiter is the first char inside the parentheses and is not
    /// required to be '|'.
    pub(crate) fn parse_epsv_229(&self) -> Option<u16> {
        let text = self.single_line()?;
        let p_start = memchr::memchr(b'(', text.as_bytes())?;
        let p_end = memchr::memchr(b')', &text.as_bytes()[p_start..])? + p_start;
        let inner = &text[p_start + 1..p_end];

        let d = inner.chars().next()?;
        if !d.is_ascii() || d.is_ascii_alphanumeric() {
            return None;
        }
        let mut parts = inner.split(d);
        // "" "" "" port ""
        for _ in 0..3 {
            if !parts.next()?.is_empty() {
                return None;
            }
        }
        let port = u16::from_str(parts.next()?).ok()?;
        if !parts.next()?.is_empty() || parts.next().is_some() {
            return None;
        }
        if port == 0 {
            return None;
        }
        Some(port)
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Read one line into `buf`, which will be cleared first.
    async fn read_line(
        &mut self,
        buf: &mut Vec<u8>,
        min_len: usize,
    ) -> Result<(), FtpRawResponseError> {
        buf.clear();

        let (found, len) = self
            .stream
            .limited_read_until(b'\n', self.config.max_line_len, buf)
            .await
            .map_err(FtpRawResponseError::ReadFailed)?;

        #[cfg(feature = "log-raw-io")]
        crate::debug::log_rsp(String::from_utf8_lossy(buf).trim_end());

        if len == 0 {
            return Err(FtpRawResponseError::ConnectionClosed);
        }
        if !found {
            return if len >= self.config.max_line_len {
                Err(FtpRawResponseError::LineTooLong)
            } else {
                Err(FtpRawResponseError::ConnectionClosed)
            };
        }
        if len < min_len {
            return Err(FtpRawResponseError::InvalidLineFormat);
        }
        Ok(())
    }

    pub(crate) async fn read_raw_response(&mut self) -> Result<FtpReply, FtpRawResponseError> {
        let mut buf = Vec::<u8>::with_capacity(256);
        // <code><sp or -><lf> at least
        self.read_line(&mut buf, 5).await?;

        let code = parse_reply_code(&buf)?;
        let first = line_text(&buf[4..])?;
        match buf[3] {
            b' ' => Ok(FtpReply {
                code,
                lines: vec![first],
            }),
            b'-' => {
                let end_prefix = [buf[0], buf[1], buf[2], b' '];
                let mut lines = vec![first];
                for _ in 0..self.config.max_multi_lines {
                    self.read_line(&mut buf, 1).await?;
                    if buf.starts_with(&end_prefix) {
                        lines.push(line_text(&buf[4..])?);
                        return Ok(FtpReply { code, lines });
                    }
                    // keep the leading space, it's meaningful for FEAT
                    lines.push(line_text(&buf)?);
                }
                Err(FtpRawResponseError::TooManyLines)
            }
            _ => Err(FtpRawResponseError::InvalidLineFormat),
        }
    }

    pub(crate) async fn timed_read_raw_response(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpReply, FtpRawResponseError> {
        let Some(timeout) = self.config.command_timeout else {
            return self.read_raw_response().await;
        };
        match tokio::time::timeout(timeout, self.read_raw_response()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut(stage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FtpControlConfig;
    use tokio_test::io::Builder;

    fn reply(code: u16, text: &str) -> FtpReply {
        FtpReply {
            code,
            lines: vec![text.to_string()],
        }
    }

    #[test]
    fn pasv() {
        let r = reply(227, "Entering Passive Mode (192,168,1,2,19,137)");
        assert_eq!(
            r.parse_pasv_227(),
            Some(SocketAddr::from_str("192.168.1.2:5001").unwrap())
        );

        let r = reply(227, "Entering Passive Mode 10,0,0,1,0,21");
        assert_eq!(
            r.parse_pasv_227(),
            Some(SocketAddr::from_str("10.0.0.1:21").unwrap())
        );

        let r = reply(227, "Entering Passive Mode (192,168,1,2,19)");
        assert!(r.parse_pasv_227().is_none());

        let r = reply(227, "Entering Passive Mode (192,168,1,256,19,137)");
        assert!(r.parse_pasv_227().is_none());

        let r = reply(227, "Entering Passive Mode (1,2,3,4,5,6,7)");
        assert!(r.parse_pasv_227().is_none());

        let r = reply(227, "Entering Passive Mode");
        assert!(r.parse_pasv_227().is_none());
    }

    #[test]
    fn epsv() {
        let r = reply(229, "Entering Extended Passive Mode (|||6446|)");
        assert_eq!(r.parse_epsv_229(), Some(6446));

        let r = reply(229, "Entering Extended Passive Mode (!!!6446!)");
        assert_eq!(r.parse_epsv_229(), Some(6446));

        let r = reply(229, "Entering Extended Passive Mode (||6446|)");
        assert!(r.parse_epsv_229().is_none());

        let r = reply(229, "Entering Extended Passive Mode (|||6446)");
        assert!(r.parse_epsv_229().is_none());

        let r = reply(229, "Entering Extended Passive Mode (|||0|)");
        assert!(r.parse_epsv_229().is_none());

        let r = reply(229, "Entering Extended Passive Mode |||6446|");
        assert!(r.parse_epsv_229().is_none());
    }

    #[tokio::test]
    async fn read_single_line() {
        let stream = Builder::new().read(b"220 Service ready\r\n").build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        let reply = channel.read_raw_response().await.unwrap();
        assert_eq!(reply.code(), 220);
        assert_eq!(reply.single_line(), Some("Service ready"));
        assert!(!reply.is_multi_line());
    }

    #[tokio::test]
    async fn read_multi_line() {
        let stream = Builder::new()
            .read(b"211-Features:\r\n UTF8\r\n")
            .read(b" EPSV\r\n211 End\r\n")
            .build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        let reply = channel.read_raw_response().await.unwrap();
        assert_eq!(reply.code(), 211);
        assert!(reply.is_multi_line());
        assert_eq!(reply.lines(), &["Features:", " UTF8", " EPSV", "End"]);
    }

    #[tokio::test]
    async fn read_too_many_lines() {
        let stream = Builder::new()
            .read(b"211-Features:\r\n UTF8\r\n EPSV\r\n")
            .build();
        let config = FtpControlConfig {
            max_multi_lines: 2,
            ..Default::default()
        };
        let mut channel = FtpControlChannel::new(stream, config);
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::TooManyLines)
        ));
    }

    #[tokio::test]
    async fn read_invalid() {
        let stream = Builder::new().read(b"abc hello\r\n").build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::InvalidLineFormat)
        ));

        let stream = Builder::new().read(b"999 hello\r\n").build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::InvalidReplyCode(999))
        ));

        let stream = Builder::new().read(b"220\r\n").build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::InvalidLineFormat)
        ));
    }

    #[tokio::test]
    async fn read_closed() {
        let stream = Builder::new().build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::ConnectionClosed)
        ));

        let stream = Builder::new().read(b"220 no line end").build();
        let mut channel = FtpControlChannel::new(stream, FtpControlConfig::default());
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn read_too_long() {
        let stream = Builder::new().read(b"220 0123456789abcdef\r\n").build();
        let config = FtpControlConfig {
            max_line_len: 8,
            ..Default::default()
        };
        let mut channel = FtpControlChannel::new(stream, config);
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::LineTooLong)
        ));
    }
}
