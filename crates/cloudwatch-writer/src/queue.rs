// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Unbounded FIFO between the writer handles (many producers) and the
//! dispatcher (single consumer).

use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::client::InputLogEvent;

pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<InputLogEvent>,
}

impl EventSender {
    /// Never blocks. Hands the event back if the dispatcher has shut down.
    pub fn enqueue(&self, event: InputLogEvent) -> Result<(), InputLogEvent> {
        self.tx.send(event).map_err(|e| e.0)
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<InputLogEvent>,
}

impl EventReceiver {
    /// Waits for the next event. Returns `None` once the queue is closed and
    /// drained, or every sender is gone.
    pub async fn recv(&mut self) -> Option<InputLogEvent> {
        self.rx.recv().await
    }

    /// Removes the oldest event, or `None` if nothing is queued right now.
    pub fn dequeue(&mut self) -> Option<InputLogEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Refuses further events. Events already queued can still be dequeued.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
