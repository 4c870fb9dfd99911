/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};

use async_trait::async_trait;
use bytes::BufMut;
use http::{HeaderMap, StatusCode, Version};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::HttpResponseSink;

/// Write a response to a HTTP/1.x client connection.
///
/// The body is sent with chunked encoding to HTTP/1.1 clients, and is
/// delimited by connection close for HTTP/1.0 clients. A response finished
/// without any body bytes is sent with `Content-Length: 0`.
pub struct HttpResponseWriter<'a, W> {
    writer: &'a mut W,
    version: Version,
    status: StatusCode,
    headers: HeaderMap,
    keep_alive: bool,
    committed: bool,
    chunked: bool,
    finished: bool,
    body_size: u64,
}

impl<'a, W> HttpResponseWriter<'a, W>
where
    W: AsyncWrite + Send + Unpin,
{
    pub fn new(writer: &'a mut W, version: Version, keep_alive: bool) -> Self {
        HttpResponseWriter {
            writer,
            version,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            keep_alive,
            committed: false,
            chunked: false,
            finished: false,
            body_size: 0,
        }
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// If the connection can be used for the next request.
    #[inline]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive && self.finished
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Body bytes sent, not including the chunk encoding.
    #[inline]
    pub fn body_size(&self) -> u64 {
        self.body_size
    }

    fn serialize_header(&mut self, has_body: bool) -> Vec<u8> {
        let mut buf = Vec::<u8>::with_capacity(256);
        let _ = write!(
            buf,
            "{:?} {} {}\r\n",
            self.version,
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        );
        for (name, value) in self.headers.iter() {
            buf.put_slice(name.as_ref());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }

        if !has_body {
            buf.put_slice(b"Content-Length: 0\r\n");
        } else if self.version == Version::HTTP_11 {
            self.chunked = true;
            buf.put_slice(b"Transfer-Encoding: chunked\r\n");
        } else {
            self.keep_alive = false;
        }

        if self.keep_alive {
            buf.put_slice(b"Connection: keep-alive\r\n");
        } else {
            buf.put_slice(b"Connection: close\r\n");
        }
        buf.put_slice(b"\r\n");
        self.committed = true;
        buf
    }

    async fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf).await?;
        self.writer.flush().await
    }
}

#[async_trait]
impl<'a, W> HttpResponseSink for HttpResponseWriter<'a, W>
where
    W: AsyncWrite + Send + Unpin,
{
    fn set_status(&mut self, status: StatusCode) {
        if !self.committed {
            self.status = status;
        }
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[inline]
    fn header_committed(&self) -> bool {
        self.committed
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        if self.finished {
            return Err(io::Error::other("response already finished"));
        }

        let mut buf = if self.committed {
            Vec::with_capacity(data.len() + 16)
        } else {
            self.serialize_header(true)
        };
        if data.is_empty() {
            return if buf.is_empty() { Ok(()) } else { self.send(&buf).await };
        }

        if self.chunked {
            let _ = write!(buf, "{:x}\r\n", data.len());
            buf.put_slice(data);
            buf.put_slice(b"\r\n");
        } else {
            buf.put_slice(data);
        }
        self.send(&buf).await?;
        self.body_size += data.len() as u64;
        Ok(())
    }

    async fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }

        if !self.committed {
            let buf = self.serialize_header(false);
            self.send(&buf).await?;
        } else if self.chunked {
            self.send(b"0\r\n\r\n").await?;
        } else {
            self.writer.flush().await?;
        }
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use http::header;

    #[tokio::test]
    async fn chunked_body() {
        let mut output = Vec::new();
        let mut rsp = HttpResponseWriter::new(&mut output, Version::HTTP_11, true);
        rsp.set_status(StatusCode::OK);
        rsp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        assert!(!rsp.header_committed());
        rsp.write(b"hello").await.unwrap();
        assert!(rsp.header_committed());
        rsp.set_status(StatusCode::NOT_FOUND);
        rsp.write(b"").await.unwrap();
        rsp.write(b" world").await.unwrap();
        rsp.finish().await.unwrap();
        assert!(rsp.keep_alive());
        assert_eq!(rsp.body_size(), 11);
        assert_eq!(rsp.status(), StatusCode::OK);

        assert_eq!(
            output.as_slice(),
            b"HTTP/1.1 200 OK\r\n\
              content-type: application/octet-stream\r\n\
              Transfer-Encoding: chunked\r\n\
              Connection: keep-alive\r\n\r\n\
              5\r\nhello\r\n\
              6\r\n world\r\n\
              0\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn close_delimited_body() {
        let mut output = Vec::new();
        let mut rsp = HttpResponseWriter::new(&mut output, Version::HTTP_10, true);
        rsp.set_status(StatusCode::NOT_FOUND);
        rsp.write(b"Not Found").await.unwrap();
        rsp.finish().await.unwrap();
        assert!(!rsp.keep_alive());

        assert_eq!(
            output.as_slice(),
            b"HTTP/1.0 404 Not Found\r\n\
              Connection: close\r\n\r\n\
              Not Found"
        );
    }

    #[tokio::test]
    async fn empty_body() {
        let mut output = Vec::new();
        let mut rsp = HttpResponseWriter::new(&mut output, Version::HTTP_11, false);
        rsp.set_status(StatusCode::BAD_GATEWAY);
        rsp.finish().await.unwrap();
        rsp.finish().await.unwrap();
        assert!(rsp.finished());
        assert!(rsp.write(b"late").await.is_err());

        assert_eq!(
            output.as_slice(),
            b"HTTP/1.1 502 Bad Gateway\r\n\
              Content-Length: 0\r\n\
              Connection: close\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn unfinished() {
        let mut output = Vec::new();
        let mut rsp = HttpResponseWriter::new(&mut output, Version::HTTP_11, true);
        rsp.write(b"partial").await.unwrap();
        assert!(!rsp.keep_alive());
        assert_eq!(
            output.as_slice(),
            b"HTTP/1.1 200 OK\r\n\
              Transfer-Encoding: chunked\r\n\
              Connection: keep-alive\r\n\r\n\
              7\r\npartial\r\n"
        );
    }
}
