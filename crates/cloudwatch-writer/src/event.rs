// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use crate::client::InputLogEvent;
use crate::constants::{MAX_BATCH_EVENTS, MAX_BATCH_SIZE_BYTES, PER_EVENT_OVERHEAD_BYTES};

/// Longest message that still fits in an otherwise empty batch.
const MAX_MESSAGE_BYTES: usize = MAX_BATCH_SIZE_BYTES - PER_EVENT_OVERHEAD_BYTES;

impl InputLogEvent {
    /// Creates an event stamped with the current time. Messages too large to
    /// ever fit in a batch are truncated.
    pub fn now(message: String) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default();
        Self {
            message: truncate_message(message),
            timestamp,
        }
    }

    /// Size the event counts for against [`MAX_BATCH_SIZE_BYTES`].
    pub fn size(&self) -> usize {
        self.message.len() + PER_EVENT_OVERHEAD_BYTES
    }
}

fn truncate_message(mut message: String) -> String {
    if message.len() <= MAX_MESSAGE_BYTES {
        return message;
    }
    let mut end = MAX_MESSAGE_BYTES;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    warn!(
        "Log message of {} bytes exceeds the batch limit, truncating to {end} bytes",
        message.len()
    );
    message.truncate(end);
    message
}

/// Events accumulated by the dispatcher between two flushes.
#[derive(Debug, Default)]
pub struct Batch {
    events: Vec<InputLogEvent>,
    size_bytes: usize,
}

impl Batch {
    /// Whether adding `event` would push the batch over the byte limit.
    pub fn would_overflow(&self, event: &InputLogEvent) -> bool {
        self.size_bytes + event.size() > MAX_BATCH_SIZE_BYTES
    }

    pub fn push(&mut self, event: InputLogEvent) {
        self.size_bytes += event.size();
        self.events.push(event);
    }

    pub fn is_full(&self) -> bool {
        self.events.len() >= MAX_BATCH_EVENTS
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn events(&self) -> &[InputLogEvent] {
        &self.events
    }

    /// Hands out the accumulated events, leaving an empty batch behind.
    pub fn take(&mut self) -> Batch {
        std::mem::take(self)
    }
}
