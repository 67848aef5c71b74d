// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching log writer for CloudWatch Logs.
//!
//! Producers call [`CloudWatchWriter::write`], which queues the line and
//! returns immediately. A single background task batches queued events and
//! puts them to one log stream, honoring the `PutLogEvents` limits in
//! [`constants`] and the stream's upload sequence token.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

#[cfg(feature = "aws-sdk")]
pub mod aws;
mod bootstrap;
pub mod client;
pub mod config;
pub mod constants;
mod dispatcher;
pub mod errors;
mod event;
pub mod make_writer;
mod queue;
mod sender;
mod state;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use client::{InputLogEvent, LogStream, LogsClient, PutLogEventsOutput};
pub use config::WriterConfig;
pub use errors::{BootstrapError, ClientError, ConfigError, DeliveryError, WriteError, WriterError};
pub use writer::CloudWatchWriter;
