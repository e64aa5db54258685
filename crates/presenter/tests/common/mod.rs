#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use falbot_presenter::{ChoiceHandle, ChoicePrompt, Message, ProgressSink, SinkError};
use falbot_queue::{JobHandle, JobQueue, JobStatus, QueueError};

pub const IMAGE_URL: &str = "https://cdn.example/out.png";

/// A queue replaying scripted status results. Once the script runs out
/// every job reports completion.
pub struct ScriptedQueue {
    submit_error: Mutex<Option<QueueError>>,
    statuses: Mutex<VecDeque<Result<JobStatus, QueueError>>>,
    pub submitted: Mutex<Vec<serde_json::Value>>,
    pub status_calls: Mutex<u32>,
}

impl ScriptedQueue {
    pub fn new(statuses: Vec<Result<JobStatus, QueueError>>) -> Self {
        Self {
            submit_error: Mutex::new(None),
            statuses: Mutex::new(statuses.into()),
            submitted: Mutex::new(Vec::new()),
            status_calls: Mutex::new(0),
        }
    }

    /// A queue that rejects the first submission with `error`.
    pub fn rejecting(error: QueueError) -> Self {
        let queue = Self::new(Vec::new());
        *queue.submit_error.lock().unwrap() = Some(error);
        queue
    }

    pub fn submitted(&self) -> Vec<serde_json::Value> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn calls(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }
}

#[async_trait]
impl JobQueue for ScriptedQueue {
    async fn submit(&self, payload: &serde_json::Value) -> Result<JobHandle, QueueError> {
        if let Some(error) = self.submit_error.lock().unwrap().take() {
            return Err(error);
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(payload.clone());
        Ok(JobHandle::new(format!("req-{}", submitted.len())))
    }

    async fn status(&self, _handle: &JobHandle) -> Result<JobStatus, QueueError> {
        *self.status_calls.lock().unwrap() += 1;
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(JobStatus::Completed))
    }

    async fn result(&self, _handle: &JobHandle) -> Result<serde_json::Value, QueueError> {
        Ok(serde_json::json!({ "images": [{ "url": IMAGE_URL }] }))
    }
}

/// A sink recording every call made on it.
#[derive(Default)]
pub struct RecordingSink {
    pub updates: Mutex<Vec<Message>>,
    pub prompts: Mutex<Vec<ChoicePrompt>>,
    pub handles: Mutex<Vec<ChoiceHandle>>,
    pub detaches: Mutex<u32>,
    pub attached: Notify,
    pub fail_updates: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A sink whose message has been deleted.
    pub fn gone() -> Arc<Self> {
        Arc::new(Self {
            fail_updates: true,
            ..Self::default()
        })
    }

    pub fn updates(&self) -> Vec<Message> {
        self.updates.lock().unwrap().clone()
    }

    /// Text content of every update, with card renders as `None`.
    pub fn texts(&self) -> Vec<Option<String>> {
        self.updates().into_iter().map(|m| m.content).collect()
    }

    pub fn last_handle(&self) -> Option<ChoiceHandle> {
        self.handles.lock().unwrap().last().cloned()
    }

    pub fn detaches(&self) -> u32 {
        *self.detaches.lock().unwrap()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn update(&self, message: &Message) -> Result<(), SinkError> {
        if self.fail_updates {
            return Err(SinkError::Gone);
        }
        self.updates.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn attach_choice(&self, prompt: &ChoicePrompt, handle: ChoiceHandle) -> Result<(), SinkError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.handles.lock().unwrap().push(handle);
        self.attached.notify_one();
        Ok(())
    }

    async fn detach_choice(&self) -> Result<(), SinkError> {
        *self.detaches.lock().unwrap() += 1;
        Ok(())
    }
}
