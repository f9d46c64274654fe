//! Background codec worker
//!
//! Encoding a whole font is the one slow operation in the editor. The
//! worker owns a codec on a tokio task and runs each job on the blocking
//! pool. Jobs arrive over an `mpsc` channel and answers go back through a
//! `oneshot` per job. There is no shared mutable state across the boundary
//! and at most one job is in flight; submitting while busy is refused.

use super::codec::{CodecError, FontAsset, FontCodec, FontSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type JobResult = Result<FontAsset, CodecError>;

struct Job {
    snapshot: FontSnapshot,
    reply: oneshot::Sender<JobResult>,
}

/// Handle to a submitted job
#[derive(Debug)]
pub struct PendingJob {
    reply: oneshot::Receiver<JobResult>,
}

impl PendingJob {
    pub async fn wait(self) -> JobResult {
        self.reply.await.map_err(|_| CodecError::WorkerGone)?
    }
}

pub struct CodecWorker {
    jobs: mpsc::Sender<Job>,
    busy: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl CodecWorker {
    /// Start a worker for `codec`. Must be called inside a tokio runtime.
    pub fn spawn<C>(codec: C) -> Self
    where
        C: FontCodec + 'static,
    {
        let (jobs, mut queue) = mpsc::channel::<Job>(1);
        let busy = Arc::new(AtomicBool::new(false));
        let codec = Arc::new(codec);
        let worker_busy = Arc::clone(&busy);

        let task = tokio::spawn(async move {
            info!("Codec worker started ({})", codec.name());
            while let Some(Job { snapshot, reply }) = queue.recv().await {
                let job_codec = Arc::clone(&codec);
                let result = tokio::task::spawn_blocking(move || job_codec.encode(&snapshot))
                    .await
                    .unwrap_or_else(|e| Err(CodecError::Job(e.to_string())));
                if let Err(e) = &result {
                    warn!("Codec job failed: {}", e);
                }
                worker_busy.store(false, Ordering::Release);
                if reply.send(result).is_err() {
                    debug!("Codec job finished after its requester went away");
                }
            }
            debug!("Codec worker stopped");
        });

        Self { jobs, busy, task }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Hand a snapshot to the worker. Fails with [`CodecError::Busy`] while
    /// another job is in flight.
    pub fn submit(&self, snapshot: FontSnapshot) -> Result<PendingJob, CodecError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CodecError::Busy);
        }
        let (reply, receiver) = oneshot::channel();
        if let Err(e) = self.jobs.try_send(Job { snapshot, reply }) {
            self.busy.store(false, Ordering::Release);
            return Err(match e {
                mpsc::error::TrySendError::Full(_) => CodecError::Busy,
                mpsc::error::TrySendError::Closed(_) => CodecError::WorkerGone,
            });
        }
        debug!("Codec job submitted");
        Ok(PendingJob { reply: receiver })
    }

    /// Submit and wait for the result
    pub async fn encode(&self, snapshot: FontSnapshot) -> JobResult {
        self.submit(snapshot)?.wait().await
    }

    /// Stop accepting jobs and wait for the worker to drain
    pub async fn shutdown(self) {
        let Self { jobs, task, .. } = self;
        drop(jobs);
        if let Err(e) = task.await {
            warn!("Codec worker ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Command, CommandTable};
    use crate::data::conversions::{FontData, GlyphData};
    use crate::io::codec::{AssetPayload, JsonCodec, UfoCodec};
    use std::time::Duration;

    fn snapshot() -> FontSnapshot {
        let mut data = FontData::default();
        data.glyphs.insert(
            "o".to_string(),
            GlyphData {
                name: "o".to_string(),
                advance_width: 600.0,
                commands: CommandTable::normalize(vec![
                    Command::move_to("m", 0.0, 0.0),
                    Command::line_to("l", 10.0, 10.0),
                ]),
                ..Default::default()
            },
        );
        FontSnapshot {
            data,
            ..Default::default()
        }
    }

    /// Holds each job long enough to observe the busy state
    struct SlowCodec;

    impl FontCodec for SlowCodec {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn encode(&self, snapshot: &FontSnapshot) -> Result<FontAsset, CodecError> {
            std::thread::sleep(Duration::from_millis(200));
            JsonCodec.encode(snapshot)
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_worker() {
        let worker = CodecWorker::spawn(JsonCodec);
        let asset = worker.encode(snapshot()).await.unwrap();
        assert_eq!(asset.glyph_count, 1);
        assert!(matches!(asset.payload, AssetPayload::Bytes(ref bytes) if !bytes.is_empty()));
        assert!(!worker.is_busy());
        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_one_job_in_flight() {
        let worker = CodecWorker::spawn(SlowCodec);
        let first = worker.submit(snapshot()).unwrap();
        assert!(worker.is_busy());
        assert!(matches!(worker.submit(snapshot()), Err(CodecError::Busy)));

        first.wait().await.unwrap();
        assert!(!worker.is_busy());
        assert!(worker.submit(snapshot()).is_ok());
    }

    #[tokio::test]
    async fn test_errors_come_back_to_the_caller() {
        let dir = tempfile::tempdir().unwrap();
        let worker = CodecWorker::spawn(UfoCodec::new(dir.path().join("empty.ufo")));
        let result = worker.encode(FontSnapshot::default()).await;
        assert!(matches!(result, Err(CodecError::EmptySnapshot)));

        let asset = worker.encode(snapshot()).await.unwrap();
        assert_eq!(asset.payload, AssetPayload::Directory(dir.path().join("empty.ufo")));
    }
}
