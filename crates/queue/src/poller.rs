//! Status polling loop.
//!
//! [`poll_until_ready`] calls [`JobQueue::status`] every
//! [`POLL_INTERVAL`] and yields each non-terminal observation, in fetch
//! order, as a [`Progress`]. The stream ends cleanly once the job is
//! completed (the caller then fetches the result) and ends with
//! [`QueueError::JobExpired`] if the job disappears.

use std::time::Duration;

use futures::stream::{self, Stream};
use tokio_util::sync::CancellationToken;

use crate::client::JobQueue;
use crate::error::QueueError;
use crate::status::{JobHandle, JobStatus, Progress};

/// Delay between consecutive status calls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

struct PollState<'a, Q: ?Sized> {
    queue: &'a Q,
    handle: &'a JobHandle,
    interval: Duration,
    cancel: CancellationToken,
    polls: u64,
}

/// Poll `handle` at the fixed [`POLL_INTERVAL`] until it is terminal.
pub fn poll_until_ready<'a, Q>(
    queue: &'a Q,
    handle: &'a JobHandle,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Progress, QueueError>> + Send + 'a
where
    Q: JobQueue + ?Sized,
{
    poll_with_interval(queue, handle, POLL_INTERVAL, cancel)
}

/// Poll `handle` every `interval` until it is terminal.
///
/// `cancel` is only observed while sleeping between calls: a status call
/// that has started always runs to completion. Once cancelled the stream
/// yields [`QueueError::Cancelled`] and ends.
pub fn poll_with_interval<'a, Q>(
    queue: &'a Q,
    handle: &'a JobHandle,
    interval: Duration,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<Progress, QueueError>> + Send + 'a
where
    Q: JobQueue + ?Sized,
{
    let state = PollState {
        queue,
        handle,
        interval,
        cancel,
        polls: 0,
    };

    stream::try_unfold(state, |mut state| async move {
        if state.polls > 0 {
            tokio::select! {
                _ = state.cancel.cancelled() => {
                    tracing::info!(
                        request_id = %state.handle.request_id,
                        polls = state.polls,
                        "Polling cancelled",
                    );
                    return Err(QueueError::Cancelled);
                }
                _ = tokio::time::sleep(state.interval) => {}
            }
        }
        state.polls += 1;

        match state.queue.status(state.handle).await? {
            JobStatus::Completed => {
                tracing::debug!(
                    request_id = %state.handle.request_id,
                    polls = state.polls,
                    "Job completed",
                );
                Ok(None)
            }
            JobStatus::Failed { cause } => {
                tracing::warn!(
                    request_id = %state.handle.request_id,
                    detail = %cause,
                    "Job expired while polling",
                );
                Err(QueueError::JobExpired {
                    request_id: state.handle.request_id.clone(),
                    detail: cause,
                })
            }
            JobStatus::Queued { position } => {
                tracing::debug!(request_id = %state.handle.request_id, position, "Job queued");
                Ok(Some((Progress::Queued { position }, state)))
            }
            JobStatus::InProgress { logs } => {
                tracing::debug!(
                    request_id = %state.handle.request_id,
                    log_lines = logs.len(),
                    "Job in progress",
                );
                Ok(Some((Progress::InProgress { logs }, state)))
            }
        }
    })
}
