//! One-shot timers for [`DeferredCue`]s.
//!
//! Each scheduled cue gets its own task that sleeps for the cue's delay and
//! then posts it to the scheduler's channel. Cues are never cancelled; a
//! consumer that no longer cares simply ignores them.

use super_core::DeferredCue;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug)]
pub struct CueScheduler {
    tx: mpsc::UnboundedSender<DeferredCue>,
    rx: mpsc::UnboundedReceiver<DeferredCue>,
}

impl CueScheduler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Delivers `cue` through [`next`](Self::next) once its delay elapses.
    pub fn schedule(
        &self,
        cue: DeferredCue,
    ) -> JoinHandle<()> {
        let tx = self.tx.clone();
        trace!(?cue, delay = ?cue.delay(), "cue scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(cue.delay()).await;
            // The receiver lives as long as the scheduler.
            let _ = tx.send(cue);
        })
    }

    /// Waits for the next due cue. Pending forever if none is scheduled.
    pub async fn next(&mut self) -> Option<DeferredCue> {
        self.rx.recv().await
    }
}

impl Default for CueScheduler {
    fn default() -> Self {
        Self::new()
    }
}
