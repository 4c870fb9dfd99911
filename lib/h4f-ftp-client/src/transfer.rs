/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpTransferType {
    Ascii,
    Image,
}

/// The data channel of a RETR transfer.
///
/// EOF on this stream means the server has sent the whole file, the end
/// reply should then be checked on the control channel.
pub struct FtpRetrieveStream<T> {
    inner: T,
    transferred: u64,
}

impl<T> FtpRetrieveStream<T> {
    pub(crate) fn new(inner: T) -> Self {
        FtpRetrieveStream {
            inner,
            transferred: 0,
        }
    }

    /// Bytes read from the data channel so far.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsyncRead for FtpRetrieveStream<T>
where
    T: AsyncRead + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let me = self.get_mut();
        let before = buf.filled().len();
        let r = Pin::new(&mut me.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = r {
            me.transferred += (buf.filled().len() - before) as u64;
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn count_transferred() {
        let data = Builder::new().read(b"hello ").read(b"world").build();
        let mut stream = FtpRetrieveStream::new(data);

        let mut content = Vec::new();
        stream.read_to_end(&mut content).await.unwrap();
        assert_eq!(content.as_slice(), b"hello world");
        assert_eq!(stream.transferred(), 11);
    }
}
