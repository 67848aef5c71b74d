// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_BATCH_INTERVAL, MIN_BATCH_INTERVAL};
use crate::errors::ConfigError;

/// Where the writer sends logs and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Log group, created on startup if missing
    pub log_group_name: String,
    /// Log stream within the group, created on startup if missing
    pub log_stream_name: String,
    /// Maximum time between two batches
    pub batch_interval: Duration,
}

impl WriterConfig {
    pub fn new(log_group_name: impl Into<String>, log_stream_name: impl Into<String>) -> Self {
        Self {
            log_group_name: log_group_name.into(),
            log_stream_name: log_stream_name.into(),
            batch_interval: DEFAULT_BATCH_INTERVAL,
        }
    }

    /// Reads `CLOUDWATCH_LOG_GROUP`, `CLOUDWATCH_LOG_STREAM` and the optional
    /// `CLOUDWATCH_BATCH_INTERVAL_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_group_name = env::var("CLOUDWATCH_LOG_GROUP").unwrap_or_default();
        let log_stream_name = env::var("CLOUDWATCH_LOG_STREAM").unwrap_or_default();
        let batch_interval = match env::var("CLOUDWATCH_BATCH_INTERVAL_MS") {
            Ok(val) => val
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| {
                    ConfigError::Invalid(format!(
                        "CLOUDWATCH_BATCH_INTERVAL_MS '{val}' is not a number of milliseconds: {e}"
                    ))
                })?,
            Err(_) => DEFAULT_BATCH_INTERVAL,
        };

        let config = Self {
            log_group_name,
            log_stream_name,
            batch_interval,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_group_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "log group name cannot be empty".to_string(),
            ));
        }

        if self.log_stream_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "log stream name cannot be empty".to_string(),
            ));
        }

        if self.batch_interval < MIN_BATCH_INTERVAL {
            return Err(ConfigError::BatchIntervalTooShort {
                interval: self.batch_interval,
                minimum: MIN_BATCH_INTERVAL,
            });
        }

        Ok(())
    }
}
