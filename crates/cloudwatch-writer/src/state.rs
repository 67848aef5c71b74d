// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! State shared between the writer handles and the dispatcher task.
//!
//! Every field lives behind one `RwLock`. The dispatcher is the only writer of
//! the sequence token; the writer handles are the only readers of the last
//! delivery error. Closing is signalled separately, through the writer's
//! `CancellationToken`, which can never be reset.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::errors::DeliveryError;

#[derive(Debug)]
struct WriterState {
    batch_interval: Duration,
    next_sequence_token: Option<String>,
    last_error: Option<DeliveryError>,
}

#[derive(Debug)]
pub struct SharedState {
    inner: RwLock<WriterState>,
}

impl SharedState {
    pub fn new(batch_interval: Duration, next_sequence_token: Option<String>) -> Self {
        Self {
            inner: RwLock::new(WriterState {
                batch_interval,
                next_sequence_token,
                last_error: None,
            }),
        }
    }

    // The guarded values are always left consistent, so a panic while holding
    // the lock does not invalidate them.
    fn read(&self) -> RwLockReadGuard<'_, WriterState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WriterState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn batch_interval(&self) -> Duration {
        self.read().batch_interval
    }

    pub fn set_batch_interval(&self, interval: Duration) {
        self.write().batch_interval = interval;
    }

    pub fn next_sequence_token(&self) -> Option<String> {
        self.read().next_sequence_token.clone()
    }

    pub fn set_next_sequence_token(&self, token: Option<String>) {
        self.write().next_sequence_token = token;
    }

    pub fn set_last_error(&self, error: DeliveryError) {
        self.write().last_error = Some(error);
    }

    /// Returns the last delivery error and clears it, so each failure is
    /// observed at most once.
    pub fn take_last_error(&self) -> Option<DeliveryError> {
        if self.read().last_error.is_none() {
            return None;
        }
        self.write().last_error.take()
    }
}
