// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-in for the CloudWatch Logs service.

use async_trait::async_trait;
use cloudwatch_writer::{ClientError, InputLogEvent, LogStream, LogsClient, PutLogEventsOutput};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    DescribeLogStreams,
    CreateLogGroup(String),
    CreateLogStream(String, String),
    PutLogEvents(usize),
}

#[derive(Default)]
struct Stream {
    events: Vec<InputLogEvent>,
    batches: Vec<usize>,
    puts: u64,
}

impl Stream {
    fn token(&self) -> Option<String> {
        (self.puts > 0).then(|| format!("seq-{}", self.puts))
    }
}

/// Enforces upload sequence tokens the way the real service does: every put
/// must carry the token returned by the previous one.
#[derive(Default)]
pub struct MockCloudWatch {
    groups: Mutex<HashMap<String, HashMap<String, Stream>>>,
    requests: Mutex<Vec<Request>>,
    fail_puts: Mutex<Vec<ClientError>>,
}

#[allow(dead_code)]
impl MockCloudWatch {
    pub fn with_stream(self, group: &str, stream: &str) -> Self {
        self.groups
            .lock()
            .expect("lock poisoned")
            .entry(group.to_string())
            .or_default()
            .insert(stream.to_string(), Stream::default());
        self
    }

    pub fn with_group(self, group: &str) -> Self {
        self.groups
            .lock()
            .expect("lock poisoned")
            .entry(group.to_string())
            .or_default();
        self
    }

    /// The next put fails with `error` without touching the stream.
    pub fn fail_next_put(&self, error: ClientError) {
        self.fail_puts.lock().expect("lock poisoned").push(error);
    }

    /// Simulates another writer appending to the stream, invalidating the
    /// token this writer holds.
    pub fn advance_token(&self, group: &str, stream: &str) {
        let mut groups = self.groups.lock().expect("lock poisoned");
        if let Some(stream) = groups.get_mut(group).and_then(|g| g.get_mut(stream)) {
            stream.puts += 1;
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    pub fn messages(&self, group: &str, stream: &str) -> Vec<String> {
        let groups = self.groups.lock().expect("lock poisoned");
        groups
            .get(group)
            .and_then(|g| g.get(stream))
            .map(|s| s.events.iter().map(|e| e.message.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of events in each accepted put, in order.
    pub fn batches(&self, group: &str, stream: &str) -> Vec<usize> {
        let groups = self.groups.lock().expect("lock poisoned");
        groups
            .get(group)
            .and_then(|g| g.get(stream))
            .map(|s| s.batches.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: Request) {
        self.requests.lock().expect("lock poisoned").push(request);
    }
}

#[async_trait]
impl LogsClient for MockCloudWatch {
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        log_stream_name_prefix: &str,
    ) -> Result<Vec<LogStream>, ClientError> {
        self.record(Request::DescribeLogStreams);
        let groups = self.groups.lock().expect("lock poisoned");
        let group = groups
            .get(log_group_name)
            .ok_or_else(|| ClientError::ResourceNotFound(log_group_name.to_string()))?;
        Ok(group
            .iter()
            .filter(|(name, _)| name.starts_with(log_stream_name_prefix))
            .map(|(name, stream)| LogStream {
                log_stream_name: Some(name.clone()),
                upload_sequence_token: stream.token(),
            })
            .collect())
    }

    async fn create_log_group(&self, log_group_name: &str) -> Result<(), ClientError> {
        self.record(Request::CreateLogGroup(log_group_name.to_string()));
        let mut groups = self.groups.lock().expect("lock poisoned");
        if groups.contains_key(log_group_name) {
            return Err(ClientError::Other("ResourceAlreadyExistsException".to_string()));
        }
        groups.insert(log_group_name.to_string(), HashMap::new());
        Ok(())
    }

    async fn create_log_stream(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
    ) -> Result<(), ClientError> {
        self.record(Request::CreateLogStream(
            log_group_name.to_string(),
            log_stream_name.to_string(),
        ));
        let mut groups = self.groups.lock().expect("lock poisoned");
        let group = groups
            .get_mut(log_group_name)
            .ok_or_else(|| ClientError::ResourceNotFound(log_group_name.to_string()))?;
        group.insert(log_stream_name.to_string(), Stream::default());
        Ok(())
    }

    async fn put_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        events: &[InputLogEvent],
        sequence_token: Option<&str>,
    ) -> Result<PutLogEventsOutput, ClientError> {
        self.record(Request::PutLogEvents(events.len()));
        if let Some(error) = self.fail_puts.lock().expect("lock poisoned").pop() {
            return Err(error);
        }

        let mut groups = self.groups.lock().expect("lock poisoned");
        let stream = groups
            .get_mut(log_group_name)
            .and_then(|g| g.get_mut(log_stream_name))
            .ok_or_else(|| ClientError::ResourceNotFound(log_stream_name.to_string()))?;

        let expected = stream.token();
        if sequence_token.map(str::to_string) != expected {
            return Err(ClientError::InvalidSequenceToken { expected });
        }

        stream.events.extend_from_slice(events);
        stream.batches.push(events.len());
        stream.puts += 1;
        Ok(PutLogEventsOutput {
            next_sequence_token: stream.token(),
        })
    }
}
