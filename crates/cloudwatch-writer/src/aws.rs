// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! [`LogsClient`] backed by the AWS SDK, enabled with the `aws-sdk` feature.
//!
//! Region and credentials come from the caller's [`SdkConfig`]:
//!
//! ```rust,ignore
//! let sdk_config = aws_config::load_from_env().await;
//! let writer = CloudWatchWriter::from_sdk_config(&sdk_config, "my-group", "my-stream").await?;
//! ```

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::operation::create_log_group::CreateLogGroupError;
use aws_sdk_cloudwatchlogs::operation::create_log_stream::CreateLogStreamError;
use aws_sdk_cloudwatchlogs::operation::describe_log_streams::DescribeLogStreamsError;
use aws_sdk_cloudwatchlogs::operation::put_log_events::PutLogEventsError;
use aws_sdk_cloudwatchlogs::types as sdk;
use aws_sdk_cloudwatchlogs::Client;
use aws_types::SdkConfig;
use std::sync::Arc;

use crate::client::{InputLogEvent, LogStream, LogsClient, PutLogEventsOutput};
use crate::errors::{ClientError, WriterError};
use crate::writer::CloudWatchWriter;

impl CloudWatchWriter {
    /// Creates a writer on a CloudWatch Logs client built from `sdk_config`,
    /// flushing every [`crate::constants::DEFAULT_BATCH_INTERVAL`].
    pub async fn from_sdk_config(
        sdk_config: &SdkConfig,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<Self, WriterError> {
        Self::new(
            Arc::new(Client::new(sdk_config)),
            log_group_name,
            log_stream_name,
        )
        .await
    }
}

fn other<E: std::error::Error>(err: &E) -> ClientError {
    ClientError::Other(DisplayErrorContext(err).to_string())
}

fn describe_log_streams_error(err: DescribeLogStreamsError) -> ClientError {
    match err {
        DescribeLogStreamsError::ResourceNotFoundException(e) => {
            ClientError::ResourceNotFound(e.to_string())
        }
        err => other(&err),
    }
}

fn create_log_group_error(err: CreateLogGroupError) -> ClientError {
    other(&err)
}

fn create_log_stream_error(err: CreateLogStreamError) -> ClientError {
    match err {
        CreateLogStreamError::ResourceNotFoundException(e) => {
            ClientError::ResourceNotFound(e.to_string())
        }
        err => other(&err),
    }
}

fn put_log_events_error(err: PutLogEventsError) -> ClientError {
    match err {
        PutLogEventsError::InvalidSequenceTokenException(e) => ClientError::InvalidSequenceToken {
            expected: e.expected_sequence_token().map(str::to_string),
        },
        PutLogEventsError::ResourceNotFoundException(e) => {
            ClientError::ResourceNotFound(e.to_string())
        }
        err => other(&err),
    }
}

fn to_sdk_events(events: &[InputLogEvent]) -> Result<Vec<sdk::InputLogEvent>, ClientError> {
    events
        .iter()
        .map(|event| {
            sdk::InputLogEvent::builder()
                .message(&event.message)
                .timestamp(event.timestamp)
                .build()
                .map_err(|e| other(&e))
        })
        .collect()
}

#[async_trait]
impl LogsClient for Client {
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        log_stream_name_prefix: &str,
    ) -> Result<Vec<LogStream>, ClientError> {
        let output = self
            .describe_log_streams()
            .log_group_name(log_group_name)
            .log_stream_name_prefix(log_stream_name_prefix)
            .send()
            .await
            .map_err(|e| describe_log_streams_error(e.into_service_error()))?;

        Ok(output
            .log_streams()
            .iter()
            .map(|stream| LogStream {
                log_stream_name: stream.log_stream_name().map(str::to_string),
                upload_sequence_token: stream.upload_sequence_token().map(str::to_string),
            })
            .collect())
    }

    async fn create_log_group(&self, log_group_name: &str) -> Result<(), ClientError> {
        self.create_log_group()
            .log_group_name(log_group_name)
            .send()
            .await
            .map_err(|e| create_log_group_error(e.into_service_error()))?;
        Ok(())
    }

    async fn create_log_stream(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<(), ClientError> {
        self.create_log_stream()
            .log_group_name(log_group_name)
            .log_stream_name(log_stream_name)
            .send()
            .await
            .map_err(|e| create_log_stream_error(e.into_service_error()))?;
        Ok(())
    }

    async fn put_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        events: &[InputLogEvent],
        sequence_token: Option<&str>,
    ) -> Result<PutLogEventsOutput, ClientError> {
        let output = self
            .put_log_events()
            .log_group_name(log_group_name)
            .log_stream_name(log_stream_name)
            .set_log_events(Some(to_sdk_events(events)?))
            .set_sequence_token(sequence_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| put_log_events_error(e.into_service_error()))?;

        Ok(PutLogEventsOutput {
            next_sequence_token: output.next_sequence_token().map(str::to_string),
        })
    }
}
