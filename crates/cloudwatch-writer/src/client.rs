// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The subset of the CloudWatch Logs API the writer talks to.
//!
//! Implementations own region and credential handling; the writer only ever
//! hands them group names, stream names, events and sequence tokens.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// One log event as sent in a `PutLogEvents` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLogEvent {
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// A log stream as returned by `DescribeLogStreams`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStream {
    pub log_stream_name: Option<String>,
    /// Token required by the next `PutLogEvents` call, absent until the first
    /// events are put.
    pub upload_sequence_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutLogEventsOutput {
    pub next_sequence_token: Option<String>,
}

#[async_trait]
pub trait LogsClient: Send + Sync {
    /// Lists the streams of `log_group_name` whose name starts with
    /// `log_stream_name_prefix`. Fails with [`ClientError::ResourceNotFound`]
    /// if the group does not exist.
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        log_stream_name_prefix: &str,
    ) -> Result<Vec<LogStream>, ClientError>;

    async fn create_log_group(&self, log_group_name: &str) -> Result<(), ClientError>;

    async fn create_log_stream(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<(), ClientError>;

    /// Appends `events` to the stream. Fails with
    /// [`ClientError::InvalidSequenceToken`] when `sequence_token` is stale.
    async fn put_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        events: &[InputLogEvent],
        sequence_token: Option<&str>,
    ) -> Result<PutLogEventsOutput, ClientError>;
}
