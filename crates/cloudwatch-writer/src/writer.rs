// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bootstrap::get_or_create_log_stream;
use crate::client::{InputLogEvent, LogsClient};
use crate::config::WriterConfig;
use crate::constants::{DEFAULT_BATCH_INTERVAL, MIN_BATCH_INTERVAL};
use crate::dispatcher::Dispatcher;
use crate::errors::{ConfigError, WriteError, WriterError};
use crate::queue::{event_queue, EventSender};
use crate::sender::BatchSender;
use crate::state::SharedState;

/// Ships log lines to a CloudWatch Logs stream in batches.
///
/// Writing never blocks: events are queued and a background task puts them
/// to the stream. When a batch fails to ship the error is reported by the
/// next call to [`CloudWatchWriter::write`]. Call [`CloudWatchWriter::close`]
/// before exiting, otherwise queued events are lost.
///
/// Handles are cheap to clone and can be shared between threads.
#[derive(Clone)]
pub struct CloudWatchWriter {
    queue: EventSender,
    state: Arc<SharedState>,
    closing: CancellationToken,
    done: watch::Receiver<bool>,
}

impl CloudWatchWriter {
    /// Creates a writer flushing every [`DEFAULT_BATCH_INTERVAL`].
    pub async fn new(
        client: Arc<dyn LogsClient>,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<Self, WriterError> {
        Self::with_batch_interval(
            client,
            DEFAULT_BATCH_INTERVAL,
            log_group_name,
            log_stream_name,
        )
        .await
    }

    pub async fn with_config(
        client: Arc<dyn LogsClient>,
        config: &WriterConfig,
    ) -> Result<Self, WriterError> {
        Self::with_batch_interval(
            client,
            config.batch_interval,
            &config.log_group_name,
            &config.log_stream_name,
        )
        .await
    }

    /// Resolves (or creates) the log stream and starts the dispatcher task.
    /// Must be called from within a tokio runtime.
    pub async fn with_batch_interval(
        client: Arc<dyn LogsClient>,
        batch_interval: Duration,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<Self, WriterError> {
        validate_batch_interval(batch_interval)?;

        let log_stream =
            get_or_create_log_stream(client.as_ref(), log_group_name, log_stream_name).await?;

        let state = Arc::new(SharedState::new(
            batch_interval,
            log_stream.upload_sequence_token,
        ));
        let (queue, rx) = event_queue();
        let closing = CancellationToken::new();
        let (done_tx, done) = watch::channel(false);

        let sender = BatchSender::new(
            client,
            log_group_name.to_string(),
            log_stream_name.to_string(),
            Arc::clone(&state),
        );
        let dispatcher = Dispatcher::new(rx, sender, Arc::clone(&state), closing.clone(), done_tx);
        tokio::spawn(dispatcher.run());

        debug!("CloudWatch writer started for {log_group_name}/{log_stream_name}");

        Ok(Self {
            queue,
            state,
            closing,
            done,
        })
    }

    /// Sets the maximum time between batches. Takes effect from the next
    /// flush.
    pub fn set_batch_interval(&self, interval: Duration) -> Result<(), ConfigError> {
        validate_batch_interval(interval)?;
        self.state.set_batch_interval(interval);
        Ok(())
    }

    /// Queues `log` as one log event and returns its length.
    ///
    /// The event is queued even when an error is returned: a
    /// [`WriteError::Delivery`] describes an earlier batch that was dropped.
    pub fn write(&self, log: &[u8]) -> Result<usize, WriteError> {
        let event = InputLogEvent::now(String::from_utf8_lossy(log).into_owned());
        if self.queue.enqueue(event).is_err() {
            return Err(WriteError::Closed);
        }

        match self.state.take_last_error() {
            Some(err) => Err(WriteError::Delivery(err)),
            None => Ok(log.len()),
        }
    }

    /// Stops accepting events and waits until everything queued so far has
    /// been sent. Send errors during the final flush are not reported.
    pub async fn close(self) {
        self.closing.cancel();

        let mut done = self.done;
        // An error means the dispatcher is already gone
        let _ = done.wait_for(|done| *done).await;
        debug!("CloudWatch writer closed");
    }

    /// Whether any handle of this writer has been closed.
    pub fn is_closing(&self) -> bool {
        self.closing.is_cancelled()
    }
}

fn validate_batch_interval(interval: Duration) -> Result<(), ConfigError> {
    if interval < MIN_BATCH_INTERVAL {
        return Err(ConfigError::BatchIntervalTooShort {
            interval,
            minimum: MIN_BATCH_INTERVAL,
        });
    }
    Ok(())
}
