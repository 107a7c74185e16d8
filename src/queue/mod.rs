//! Asynchronous job channel for STASH.
//!
//! An explicit producer/consumer pair over an in-process channel. The
//! producer side is fire-and-forget: callers never await or observe
//! delivery. The consumer side is a loop that dispatches one job at a time
//! and contains every job failure - a failing job is logged, never allowed
//! to stop the loop.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::Result;

/// A unit of background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Generate thumbnail derivatives for an uploaded image.
    Thumbnail { file_id: i64, owner_id: i64 },
    /// Greet a freshly registered user.
    Welcome { user_id: i64 },
}

impl Job {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Job::Thumbnail { .. } => "thumbnail",
            Job::Welcome { .. } => "welcome",
        }
    }
}

/// Create a connected producer/consumer pair.
pub fn channel() -> (JobProducer, JobConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (JobProducer { tx }, JobConsumer { rx })
}

/// Producer handle; cheap to clone into request handlers.
#[derive(Clone)]
pub struct JobProducer {
    tx: mpsc::UnboundedSender<Job>,
}

impl JobProducer {
    /// Enqueue a job, fire-and-forget.
    ///
    /// An enqueue failure (consumer gone) is logged and swallowed: the work
    /// that produced the job is already durable and must not be failed for
    /// the sake of a best-effort enhancement.
    pub fn enqueue(&self, job: Job) {
        let label = job.label();
        if self.tx.send(job).is_err() {
            warn!(job = label, "job queue closed, dropping job");
        } else {
            debug!(job = label, "job enqueued");
        }
    }
}

/// Consumer handle; owned by the worker task.
pub struct JobConsumer {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl JobConsumer {
    /// Receive the next job, or `None` once all producers are gone.
    pub async fn next(&mut self) -> Option<Job> {
        self.rx.recv().await
    }

    /// Run the consumer loop, dispatching each job to `handler`.
    ///
    /// Handler errors are logged per job; the loop only ends when every
    /// producer has been dropped.
    pub async fn run<H, Fut>(mut self, handler: H)
    where
        H: Fn(Job) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        while let Some(job) = self.next().await {
            let label = job.label();
            if let Err(e) = handler(job).await {
                warn!(job = label, error = %e, "job failed");
            }
        }
        debug!("job queue drained, consumer stopping");
    }
}
