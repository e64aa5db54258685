//! Client for the fal.ai job queue and the status poller built on it.
//!
//! [`client::QueueClient`] speaks the queue's REST protocol (submit,
//! status, response). [`poller::poll_until_ready`] turns repeated
//! status calls into a stream of non-terminal observations that ends
//! when the job completes.

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod status;

pub use client::{JobQueue, QueueClient};
pub use error::{QueueError, TransportError};
pub use status::{ErrorDetail, JobHandle, JobStatus, Progress};
