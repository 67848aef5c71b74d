// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::client::{InputLogEvent, LogStream, LogsClient, PutLogEventsOutput};
use crate::errors::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DescribeLogStreams {
        log_group_name: String,
        log_stream_name_prefix: String,
    },
    CreateLogGroup {
        log_group_name: String,
    },
    CreateLogStream {
        log_group_name: String,
        log_stream_name: String,
    },
    PutLogEvents {
        events: Vec<InputLogEvent>,
        sequence_token: Option<String>,
    },
}

/// Client that records every call and answers from scripted responses.
///
/// With nothing scripted, `describe_log_streams` finds no stream, creation
/// succeeds and `put_log_events` hands out tokens `"token-1"`, `"token-2"`...
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    describe_responses: Mutex<VecDeque<Result<Vec<LogStream>, ClientError>>>,
    create_group_responses: Mutex<VecDeque<Result<(), ClientError>>>,
    create_stream_responses: Mutex<VecDeque<Result<(), ClientError>>>,
    put_responses: Mutex<VecDeque<Result<PutLogEventsOutput, ClientError>>>,
}

impl RecordingClient {
    pub fn with_describe(self, response: Result<Vec<LogStream>, ClientError>) -> Self {
        self.describe_responses
            .lock()
            .expect("lock poisoned")
            .push_back(response);
        self
    }

    pub fn with_create_group(self, response: Result<(), ClientError>) -> Self {
        self.create_group_responses
            .lock()
            .expect("lock poisoned")
            .push_back(response);
        self
    }

    pub fn with_create_stream(self, response: Result<(), ClientError>) -> Self {
        self.create_stream_responses
            .lock()
            .expect("lock poisoned")
            .push_back(response);
        self
    }

    pub fn with_put(self, response: Result<PutLogEventsOutput, ClientError>) -> Self {
        self.push_put(response);
        self
    }

    pub fn push_put(&self, response: Result<PutLogEventsOutput, ClientError>) {
        self.put_responses
            .lock()
            .expect("lock poisoned")
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// `(events, sequence_token)` of every `put_log_events` call, in order.
    pub fn puts(&self) -> Vec<(Vec<InputLogEvent>, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PutLogEvents {
                    events,
                    sequence_token,
                } => Some((events, sequence_token)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().expect("lock poisoned");
        calls.push(call);
        calls
            .iter()
            .filter(|c| matches!(c, Call::PutLogEvents { .. }))
            .count()
    }
}

#[async_trait]
impl LogsClient for RecordingClient {
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        log_stream_name_prefix: &str,
    ) -> Result<Vec<LogStream>, ClientError> {
        self.record(Call::DescribeLogStreams {
            log_group_name: log_group_name.to_string(),
            log_stream_name_prefix: log_stream_name_prefix.to_string(),
        });
        self.describe_responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn create_log_group(&self, log_group_name: &str) -> Result<(), ClientError> {
        self.record(Call::CreateLogGroup {
            log_group_name: log_group_name.to_string(),
        });
        self.create_group_responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn create_log_stream(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<(), ClientError> {
        self.record(Call::CreateLogStream {
            log_group_name: log_group_name.to_string(),
            log_stream_name: log_stream_name.to_string(),
        });
        self.create_stream_responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn put_log_events(
        &self,
        _log_group_name: &str,
        _log_stream_name: &str,
        events: &[InputLogEvent],
        sequence_token: Option<&str>,
    ) -> Result<PutLogEventsOutput, ClientError> {
        let n = self.record(Call::PutLogEvents {
            events: events.to_vec(),
            sequence_token: sequence_token.map(str::to_string),
        });
        self.put_responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(PutLogEventsOutput {
                    next_sequence_token: Some(format!("token-{n}")),
                })
            })
    }
}

pub fn stream(name: &str, token: Option<&str>) -> LogStream {
    LogStream {
        log_stream_name: Some(name.to_string()),
        upload_sequence_token: token.map(str::to_string),
    }
}

pub fn event(message: &str) -> InputLogEvent {
    InputLogEvent {
        message: message.to_string(),
        timestamp: 0,
    }
}
