/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use super::HttpLineParseError;

pub struct HttpHeaderLine<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> HttpHeaderLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpHeaderLine<'a>, HttpLineParseError> {
        let line = std::str::from_utf8(buf)?;
        let Some(p) = memchr::memchr(b':', line.as_bytes()) else {
            return Err(HttpLineParseError::NoDelimiterFound(':'));
        };

        let name = line[0..p].trim();
        if name.is_empty() {
            return Err(HttpLineParseError::InvalidHeaderName);
        }
        let value = line[p + 1..].trim();

        Ok(HttpHeaderLine { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        let h = HttpHeaderLine::parse(b"Host: example.net:8080\r\n").unwrap();
        assert_eq!(h.name, "Host");
        assert_eq!(h.value, "example.net:8080");
    }

    #[test]
    fn empty_value() {
        let h = HttpHeaderLine::parse(b"Accept:\r\n").unwrap();
        assert_eq!(h.name, "Accept");
        assert_eq!(h.value, "");
    }

    #[test]
    fn invalid() {
        assert!(HttpHeaderLine::parse(b"Accept\r\n").is_err());
        assert!(HttpHeaderLine::parse(b": value\r\n").is_err());
    }
}
