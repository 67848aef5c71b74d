// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::client::LogsClient;
use crate::constants::MAX_SEQUENCE_TOKEN_RETRIES;
use crate::errors::{ClientError, DeliveryError};
use crate::event::Batch;
use crate::state::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SendOutcome {
    /// Nothing to send.
    Skipped,
    Delivered,
    /// The service kept rejecting the sequence token; the batch was dropped.
    TokenRetriesExhausted,
    /// The batch was dropped and the error stored for the next write.
    Failed,
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Skipped => write!(f, "skipped"),
            SendOutcome::Delivered => write!(f, "delivered"),
            SendOutcome::TokenRetriesExhausted => write!(f, "dropped after sequence token conflicts"),
            SendOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Puts batches to the log stream, tracking the upload sequence token.
///
/// Only the dispatcher task holds a sender, so sends are sequential and the
/// token is never updated concurrently.
pub struct BatchSender {
    client: Arc<dyn LogsClient>,
    log_group_name: String,
    log_stream_name: String,
    state: Arc<SharedState>,
}

impl BatchSender {
    pub fn new(
        client: Arc<dyn LogsClient>,
        log_group_name: String,
        log_stream_name: String,
        state: Arc<SharedState>,
    ) -> Self {
        Self {
            client,
            log_group_name,
            log_stream_name,
            state,
        }
    }

    /// Sends `batch` with the current sequence token. A stale token is
    /// replaced by the one the service expected and the batch is sent again,
    /// at most [`MAX_SEQUENCE_TOKEN_RETRIES`] times. Any other failure drops
    /// the batch.
    pub async fn send(&self, batch: Batch) -> SendOutcome {
        if batch.is_empty() {
            return SendOutcome::Skipped;
        }

        for attempt in 0..=MAX_SEQUENCE_TOKEN_RETRIES {
            let token = self.state.next_sequence_token();
            let result = self
                .client
                .put_log_events(
                    &self.log_group_name,
                    &self.log_stream_name,
                    batch.events(),
                    token.as_deref(),
                )
                .await;

            match result {
                Ok(output) => {
                    debug!(
                        "Put {} log events ({} bytes) to {}/{}",
                        batch.len(),
                        batch.size_bytes(),
                        self.log_group_name,
                        self.log_stream_name
                    );
                    self.state
                        .set_next_sequence_token(output.next_sequence_token);
                    return SendOutcome::Delivered;
                }
                Err(ClientError::InvalidSequenceToken { expected }) => {
                    warn!(
                        "Invalid sequence token {token:?} on attempt {}, service expected {expected:?}",
                        attempt + 1
                    );
                    self.state.set_next_sequence_token(expected);
                }
                Err(source) => {
                    error!(
                        "Failed to put {} log events, dropping batch: {source}",
                        batch.len()
                    );
                    self.state.set_last_error(DeliveryError {
                        dropped_events: batch.len(),
                        source,
                    });
                    return SendOutcome::Failed;
                }
            }
        }

        error!(
            "Sequence token still rejected after {MAX_SEQUENCE_TOKEN_RETRIES} retry, dropping {} log events",
            batch.len()
        );
        SendOutcome::TokenRetriesExhausted
    }
}
