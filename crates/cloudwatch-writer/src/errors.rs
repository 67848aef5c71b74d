// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Failure reported by a [`crate::client::LogsClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The log group (or stream) named in the request does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The sequence token sent with `PutLogEvents` is stale. `expected` is the
    /// token the service wanted, absent when the stream has never been written.
    #[error("invalid sequence token, expected {expected:?}")]
    InvalidSequenceToken { expected: Option<String> },

    #[error("{0}")]
    Other(String),
}

/// Invalid caller supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("supplied batch interval {interval:?} is less than the minimum {minimum:?}")]
    BatchIntervalTooShort {
        interval: Duration,
        minimum: Duration,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Resolving or creating the log group and stream failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation}: {source}")]
pub struct BootstrapError {
    pub operation: &'static str,
    #[source]
    pub source: ClientError,
}

/// A batch was rejected for a reason other than a stale sequence token. The
/// batch is dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to put {dropped_events} log events: {source}")]
pub struct DeliveryError {
    pub dropped_events: usize,
    #[source]
    pub source: ClientError,
}

/// Returned by [`crate::writer::CloudWatchWriter::write`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// An earlier batch failed to ship. Reported once, then cleared.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The writer has shut down and the event was dropped.
    #[error("writer is closed")]
    Closed,
}

/// Errors returned while building a writer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriterError {
    #[error("set batch interval: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}
