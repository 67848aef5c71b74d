// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Limits imposed by the CloudWatch Logs `PutLogEvents` API.
//!
//! See <https://docs.aws.amazon.com/AmazonCloudWatchLogs/latest/APIReference/API_PutLogEvents.html>.

use std::time::Duration;

/// Smallest accepted batch interval. `PutLogEvents` is limited to 5 requests
/// per second per log stream.
pub const MIN_BATCH_INTERVAL: Duration = Duration::from_millis(200);

/// Batch interval used when the caller does not pick one.
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum size of one batch in bytes, counted as the sum of every message
/// length plus [`PER_EVENT_OVERHEAD_BYTES`].
pub const MAX_BATCH_SIZE_BYTES: usize = 1_048_576;

/// Maximum number of log events in one batch.
pub const MAX_BATCH_EVENTS: usize = 10_000;

/// Bytes the service adds to every event on top of the message length.
pub const PER_EVENT_OVERHEAD_BYTES: usize = 26;

/// How many times a batch is resent after an invalid sequence token.
pub const MAX_SEQUENCE_TOKEN_RETRIES: usize = 1;
