// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The background task that turns queued events into batches.
//!
//! A batch is flushed when the first of these happens:
//! - the batch interval elapses,
//! - the next event would push the batch over [`MAX_BATCH_SIZE_BYTES`],
//! - the batch reaches [`MAX_BATCH_EVENTS`] events,
//! - the writer is closed and the queue has been drained.
//!
//! [`MAX_BATCH_SIZE_BYTES`]: crate::constants::MAX_BATCH_SIZE_BYTES
//! [`MAX_BATCH_EVENTS`]: crate::constants::MAX_BATCH_EVENTS

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant, Sleep};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::InputLogEvent;
use crate::event::Batch;
use crate::queue::EventReceiver;
use crate::sender::{BatchSender, SendOutcome};
use crate::state::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushReason {
    Interval,
    Size,
    Count,
    Shutdown,
}

impl fmt::Display for FlushReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushReason::Interval => write!(f, "interval"),
            FlushReason::Size => write!(f, "size limit"),
            FlushReason::Count => write!(f, "event limit"),
            FlushReason::Shutdown => write!(f, "shutdown"),
        }
    }
}

pub struct Dispatcher {
    queue: EventReceiver,
    sender: BatchSender,
    state: Arc<SharedState>,
    closing: CancellationToken,
    done: watch::Sender<bool>,
    batch: Batch,
    // Armed for the next interval flush; reset by every flush
    next_flush: Pin<Box<Sleep>>,
}

impl Dispatcher {
    pub fn new(
        queue: EventReceiver,
        sender: BatchSender,
        state: Arc<SharedState>,
        closing: CancellationToken,
        done: watch::Sender<bool>,
    ) -> Self {
        let next_flush = Box::pin(sleep_until(Instant::now() + state.batch_interval()));
        Self {
            queue,
            sender,
            state,
            closing,
            done,
            batch: Batch::default(),
            next_flush,
        }
    }

    pub async fn run(mut self) {
        debug!("Log dispatcher started");

        loop {
            tokio::select! {
                biased;

                () = &mut self.next_flush => {
                    self.flush(FlushReason::Interval).await;
                }
                () = self.closing.cancelled() => {
                    debug!("Log dispatcher closing, draining queue");
                    break;
                }
                event = self.queue.recv() => match event {
                    Some(event) => self.accept(event).await,
                    None => {
                        debug!("All writers dropped, draining queue");
                        break;
                    }
                },
            }
        }

        self.drain().await;
        self.flush(FlushReason::Shutdown).await;
        // closers may already be gone
        let _ = self.done.send(true);
        debug!("Log dispatcher stopped");
    }

    async fn accept(&mut self, event: InputLogEvent) {
        if self.batch.would_overflow(&event) {
            self.flush(FlushReason::Size).await;
        }
        self.batch.push(event);
        if self.batch.is_full() {
            self.flush(FlushReason::Count).await;
        }
    }

    async fn drain(&mut self) {
        self.queue.close();
        while let Some(event) = self.queue.dequeue() {
            self.accept(event).await;
        }
    }

    /// Sends whatever has accumulated and restarts the interval.
    async fn flush(&mut self, reason: FlushReason) {
        let batch = self.batch.take();
        let (events, bytes) = (batch.len(), batch.size_bytes());
        let outcome = self.sender.send(batch).await;
        if outcome != SendOutcome::Skipped {
            debug!("Flushed {events} log events ({bytes} bytes), trigger: {reason}, outcome: {outcome}");
        }
        let deadline = Instant::now() + self.state.batch_interval();
        self.next_flush.as_mut().reset(deadline);
    }
}
