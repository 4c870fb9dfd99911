/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use tokio::io::AsyncBufRead;

use h4f_io_ext::LimitedBufReadExt;

use super::HttpRequestParseError;
use crate::{HttpHeaderLine, HttpLineParseError, HttpMethodLine};

pub struct HttpServerRequest {
    pub version: Version,
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    origin_header_size: usize,
    keep_alive: bool,
    content_length: u64,
    chunked_transfer: bool,
    has_transfer_encoding: bool,
    has_content_length: bool,
}

impl HttpServerRequest {
    fn new(method: Method, uri: Uri, version: Version) -> Self {
        HttpServerRequest {
            version,
            method,
            uri,
            headers: HeaderMap::new(),
            origin_header_size: 0,
            keep_alive: false,
            content_length: 0,
            chunked_transfer: false,
            has_transfer_encoding: false,
            has_content_length: false,
        }
    }

    #[inline]
    pub fn origin_header_size(&self) -> usize {
        self.origin_header_size
    }

    #[inline]
    pub fn disable_keep_alive(&mut self) {
        self.keep_alive = false;
    }

    #[inline]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// If the request carries a body, which will not be read by the server.
    pub fn has_body(&self) -> bool {
        self.chunked_transfer || self.content_length > 0
    }

    pub async fn parse<R>(
        reader: &mut R,
        max_header_size: usize,
    ) -> Result<Self, HttpRequestParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line_buf = Vec::<u8>::with_capacity(1024);
        let mut header_size: usize = 0;

        let (found, nr) = reader
            .limited_read_until(b'\n', max_header_size, &mut line_buf)
            .await?;
        if nr == 0 {
            return Err(HttpRequestParseError::ClientClosed);
        }
        if !found {
            return if nr < max_header_size {
                Err(HttpRequestParseError::ClientClosed)
            } else {
                Err(HttpRequestParseError::TooLargeHeader(max_header_size))
            };
        }
        header_size += nr;

        let mut req = HttpServerRequest::build_from_method_line(line_buf.as_ref())?;
        req.keep_alive = req.version == Version::HTTP_11;

        loop {
            if header_size >= max_header_size {
                return Err(HttpRequestParseError::TooLargeHeader(max_header_size));
            }
            line_buf.clear();
            let max_len = max_header_size - header_size;
            let (found, nr) = reader
                .limited_read_until(b'\n', max_len, &mut line_buf)
                .await?;
            if nr == 0 {
                return Err(HttpRequestParseError::ClientClosed);
            }
            if !found {
                return if nr < max_len {
                    Err(HttpRequestParseError::ClientClosed)
                } else {
                    Err(HttpRequestParseError::TooLargeHeader(max_header_size))
                };
            }
            header_size += nr;
            if line_buf.as_slice() == b"\n" || line_buf.as_slice() == b"\r\n" {
                // header end line
                break;
            }

            let header = HttpHeaderLine::parse(line_buf.as_ref())
                .map_err(HttpRequestParseError::InvalidHeaderLine)?;
            req.handle_header(header)?;
        }
        req.origin_header_size = header_size;

        Ok(req)
    }

    fn build_from_method_line(line_buf: &[u8]) -> Result<Self, HttpRequestParseError> {
        let req = HttpMethodLine::parse(line_buf).map_err(|e| match e {
            HttpLineParseError::InvalidVersion => {
                HttpRequestParseError::UnsupportedVersion(Version::HTTP_2)
            }
            _ => HttpRequestParseError::InvalidMethodLine(e),
        })?;

        let version = match req.version {
            0 => Version::HTTP_10,
            _ => Version::HTTP_11,
        };

        let method = Method::from_str(req.method)
            .map_err(|_| HttpRequestParseError::UnsupportedMethod(req.method.to_string()))?;
        let uri =
            Uri::from_str(req.uri).map_err(|_| HttpRequestParseError::InvalidRequestTarget)?;
        Ok(HttpServerRequest::new(method, uri, version))
    }

    fn parse_header_connection(&mut self, value: &str) {
        for v in value.split(',') {
            let v = v.trim();
            if v.eq_ignore_ascii_case("keep-alive") {
                self.keep_alive = true;
            } else if v.eq_ignore_ascii_case("close") {
                self.keep_alive = false;
            }
        }
    }

    fn handle_header(&mut self, header: HttpHeaderLine) -> Result<(), HttpRequestParseError> {
        let name = HeaderName::from_str(header.name).map_err(|_| {
            HttpRequestParseError::InvalidHeaderLine(HttpLineParseError::InvalidHeaderName)
        })?;

        match name.as_str() {
            "connection" => self.parse_header_connection(header.value),
            "upgrade" => return Err(HttpRequestParseError::UpgradeIsNotSupported),
            "transfer-encoding" => {
                self.has_transfer_encoding = true;
                if self.has_content_length {
                    self.content_length = 0;
                    self.keep_alive = false; // according to rfc9112 Section 6.1
                }

                let v = header.value.to_lowercase();
                if v.ends_with("chunked") {
                    self.chunked_transfer = true;
                } else {
                    return Err(HttpRequestParseError::InvalidChunkedTransferEncoding);
                }
            }
            "content-length" => {
                if self.has_transfer_encoding {
                    self.keep_alive = false; // according to rfc9112 Section 6.1
                } else {
                    let content_length = u64::from_str(header.value)
                        .map_err(|_| HttpRequestParseError::InvalidContentLength)?;

                    if self.has_content_length && self.content_length != content_length {
                        return Err(HttpRequestParseError::InvalidContentLength);
                    }
                    self.has_content_length = true;
                    self.content_length = content_length;
                }
            }
            _ => {}
        }

        let value = HeaderValue::from_str(header.value).map_err(|_| {
            HttpRequestParseError::InvalidHeaderLine(HttpLineParseError::InvalidHeaderValue)
        })?;
        self.headers.append(name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::io::{BufReader, Result};
    use tokio_util::io::StreamReader;

    async fn parse_one(
        content: &'static [u8],
        max_header_size: usize,
    ) -> std::result::Result<HttpServerRequest, HttpRequestParseError> {
        let stream = tokio_stream::iter(vec![Result::Ok(Bytes::from_static(content))]);
        let stream = StreamReader::new(stream);
        let mut buf_stream = BufReader::new(stream);
        HttpServerRequest::parse(&mut buf_stream, max_header_size).await
    }

    #[tokio::test]
    async fn read_get() {
        let content = b"GET /pub/readme.txt HTTP/1.1\r\n\
            Host: example.net\r\n\
            Accept: */*\r\n\
            User-Agent: curl/8.5.0\r\n\r\n\
            GET /pub/other.txt HTTP/1.1\r\n\r\n";
        let stream = tokio_stream::iter(vec![Result::Ok(Bytes::from_static(content))]);
        let stream = StreamReader::new(stream);
        let mut buf_stream = BufReader::new(stream);

        let request = HttpServerRequest::parse(&mut buf_stream, 4096).await.unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/pub/readme.txt");
        assert_eq!(request.version, Version::HTTP_11);
        assert!(request.keep_alive());
        assert!(!request.has_body());
        assert_eq!(request.headers.get("host").unwrap(), "example.net");

        let request = HttpServerRequest::parse(&mut buf_stream, 4096).await.unwrap();
        assert_eq!(request.uri.path(), "/pub/other.txt");

        let result = HttpServerRequest::parse(&mut buf_stream, 4096).await;
        assert!(matches!(result, Err(HttpRequestParseError::ClientClosed)));
    }

    #[tokio::test]
    async fn connection_close() {
        let content = b"GET /a HTTP/1.1\r\n\
            Host: example.net\r\n\
            Connection: close\r\n\r\n";
        let request = parse_one(content, 4096).await.unwrap();
        assert!(!request.keep_alive());
    }

    #[tokio::test]
    async fn http10_keep_alive() {
        let request = parse_one(b"GET /a HTTP/1.0\r\n\r\n", 4096).await.unwrap();
        assert_eq!(request.version, Version::HTTP_10);
        assert!(!request.keep_alive());

        let content = b"GET /a HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n";
        let request = parse_one(content, 4096).await.unwrap();
        assert!(request.keep_alive());
    }

    #[tokio::test]
    async fn with_body() {
        let content = b"POST /upload HTTP/1.1\r\n\
            Content-Length: 5\r\n\r\n\
            hello";
        let request = parse_one(content, 4096).await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert!(request.has_body());

        let content = b"POST /upload HTTP/1.1\r\n\
            Transfer-Encoding: chunked\r\n\r\n";
        let request = parse_one(content, 4096).await.unwrap();
        assert!(request.has_body());
    }

    #[tokio::test]
    async fn invalid() {
        let content = b"GET /a HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        assert!(matches!(
            parse_one(content, 4096).await,
            Err(HttpRequestParseError::InvalidContentLength)
        ));

        let content = b"GET /a HTTP/1.1\r\nUpgrade: websocket\r\n\r\n";
        assert!(matches!(
            parse_one(content, 4096).await,
            Err(HttpRequestParseError::UpgradeIsNotSupported)
        ));

        let content = b"GET /a HTTP/2.0\r\n\r\n";
        let e = parse_one(content, 4096).await.err().unwrap();
        assert_eq!(e.status_code(), Some(http::StatusCode::HTTP_VERSION_NOT_SUPPORTED));
    }

    #[tokio::test]
    async fn too_large_header() {
        let content = b"GET /a HTTP/1.1\r\n\
            User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0\r\n\r\n";
        let e = parse_one(content, 64).await.err().unwrap();
        assert!(matches!(e, HttpRequestParseError::TooLargeHeader(64)));
        assert_eq!(
            e.status_code(),
            Some(http::StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
        );
    }

    #[tokio::test]
    async fn truncated() {
        let content = b"GET /a HTTP/1.1\r\nHost: exam";
        assert!(matches!(
            parse_one(content, 4096).await,
            Err(HttpRequestParseError::ClientClosed)
        ));
    }
}
