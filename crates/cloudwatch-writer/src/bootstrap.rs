// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Resolves the log stream the writer appends to, creating the log group and
//! the stream when they are missing.

use tracing::{debug, info};

use crate::client::{LogStream, LogsClient};
use crate::errors::{BootstrapError, ClientError};

/// Finds `log_stream_name` in `log_group_name` and returns it, so the caller
/// can pick up its upload sequence token. A freshly created stream comes back
/// with no token.
pub async fn get_or_create_log_stream(
    client: &dyn LogsClient,
    log_group_name: &str,
    log_stream_name: &str,
) -> Result<LogStream, BootstrapError> {
    let mut created_group = false;
    let streams = loop {
        match client
            .describe_log_streams(log_group_name, log_stream_name)
            .await
        {
            Ok(streams) => break streams,
            // A group we just created cannot be missing, so this runs once
            Err(ClientError::ResourceNotFound(_)) if !created_group => {
                info!("Log group {log_group_name} does not exist, creating it");
                client
                    .create_log_group(log_group_name)
                    .await
                    .map_err(|source| BootstrapError {
                        operation: "create_log_group",
                        source,
                    })?;
                created_group = true;
            }
            Err(source) => {
                return Err(BootstrapError {
                    operation: "describe_log_streams",
                    source,
                });
            }
        }
    };

    // The lookup is by prefix, so other streams sharing it may come back too
    if let Some(stream) = streams
        .into_iter()
        .find(|s| s.log_stream_name.as_deref() == Some(log_stream_name))
    {
        debug!(
            "Found log stream {log_group_name}/{log_stream_name}, sequence token {:?}",
            stream.upload_sequence_token
        );
        return Ok(stream);
    }

    info!("Log stream {log_group_name}/{log_stream_name} does not exist, creating it");
    client
        .create_log_stream(log_group_name, log_stream_name)
        .await
        .map_err(|source| BootstrapError {
            operation: "create_log_stream",
            source,
        })?;

    Ok(LogStream {
        log_stream_name: Some(log_stream_name.to_string()),
        upload_sequence_token: None,
    })
}
