// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Plugs [`CloudWatchWriter`] into `std::io` and `tracing-subscriber`.
//!
//! ```rust,ignore
//! let writer = CloudWatchWriter::new(client, "my-group", "my-stream").await?;
//! tracing_subscriber::fmt()
//!     .json()
//!     .with_writer(writer.clone())
//!     .init();
//! ```
//!
//! Each formatted event reaches [`CloudWatchWriter::write`] as a single call,
//! so it becomes a single log event. Events emitted by this crate are
//! discarded, otherwise every flush would queue a log line describing itself.

use std::io;
use tracing::Metadata;
use tracing_subscriber::fmt::writer::{EitherWriter, OptionalWriter};
use tracing_subscriber::fmt::MakeWriter;

use crate::errors::WriteError;
use crate::writer::CloudWatchWriter;

impl From<WriteError> for io::Error {
    fn from(err: WriteError) -> Self {
        let kind = match err {
            WriteError::Closed => io::ErrorKind::BrokenPipe,
            WriteError::Delivery(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

// Unlike most writers, an error does not mean `buf` was discarded: it is
// queued, and the error belongs to an earlier batch.
impl io::Write for &CloudWatchWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(CloudWatchWriter::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for CloudWatchWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(CloudWatchWriter::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn is_own_diagnostic(meta: &Metadata<'_>) -> bool {
    meta.target().starts_with(env!("CARGO_CRATE_NAME"))
}

impl<'a> MakeWriter<'a> for CloudWatchWriter {
    type Writer = OptionalWriter<&'a CloudWatchWriter>;

    fn make_writer(&'a self) -> Self::Writer {
        EitherWriter::A(self)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if is_own_diagnostic(meta) {
            return EitherWriter::none();
        }
        EitherWriter::A(self)
    }
}
