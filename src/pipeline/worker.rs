//! Runs a classification off the calling task.
//!
//! The worker accepts one image at a time. The pipeline runs on tokio's
//! blocking pool and its result arrives through a oneshot channel. There is
//! no cancellation: once submitted, a run completes (or fails) on its own.
use crate::error::CrackError;
use crate::logging::clear_correlation_id;
use crate::pipeline::{ClassificationResult, CrackPipeline};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

pub type RunReceiver = oneshot::Receiver<crate::Result<ClassificationResult>>;

pub struct ClassificationWorker {
    pipeline: Arc<CrackPipeline>,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the run ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ClassificationWorker {
    pub fn new(pipeline: CrackPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start classifying `path` on the current tokio runtime's blocking pool.
    ///
    /// Fails with [`CrackError::NoRuntime`] outside a runtime and with
    /// [`CrackError::WorkerBusy`] while a previous run is in flight.
    pub fn submit(&self, path: impl Into<PathBuf>) -> Result<RunReceiver, CrackError> {
        let runtime = Handle::try_current().map_err(|_| CrackError::NoRuntime)?;
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CrackError::WorkerBusy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let path = path.into();
        let pipeline = Arc::clone(&self.pipeline);
        let (tx, rx) = oneshot::channel();

        runtime.spawn_blocking(move || {
            let result = pipeline.run(&path);
            clear_correlation_id();
            // release before signalling so the receiver can resubmit at once
            drop(guard);
            if tx.send(result).is_err() {
                tracing::warn!(source = %path.display(), "Result receiver dropped before completion");
            }
        });

        Ok(rx)
    }

    /// Submit `path` and wait for its result.
    pub async fn classify(&self, path: impl Into<PathBuf>) -> crate::Result<ClassificationResult> {
        let rx = self.submit(path)?;
        rx.await
            .map_err(|_| anyhow::anyhow!("classification worker stopped without a result"))?
    }
}
