//! Tokio host for counter sessions
//!
//! Runs one [`CounterSession`] as a task: visibility ratios and motion
//! preference arrive over watch channels, the session's deadline becomes a
//! `sleep_until`, and frames leave over an unbounded mpsc channel.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::config::CounterConfig;
use crate::counter::{CounterSession, DeadlineScheduler, Frame, SessionState, StatTarget};
use crate::motion::WatchMotion;

/// Frame sender that can be cut off from outside the task
///
/// Sending and disposing take the same lock, so once `close` returns no
/// frame can slip through.
#[derive(Clone)]
struct FrameSink {
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<Frame>>>>,
}

impl FrameSink {
    fn new(tx: mpsc::UnboundedSender<Frame>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Returns `false` once the sink is closed or the receiver is gone
    fn send(&self, frame: Frame) -> bool {
        let guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(tx) => tx.send(frame).is_ok(),
            None => false,
        }
    }

    fn close(&self) -> bool {
        let mut guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        guard.take().is_some()
    }
}

/// Owner of a running counter task
///
/// Dropping the handle disposes the counter.
pub struct CounterHandle {
    task: Option<JoinHandle<()>>,
    sink: FrameSink,
}

impl CounterHandle {
    /// Cancel the counter; no frame is delivered after this returns
    ///
    /// Safe to call repeatedly and after the counter finished.
    pub fn dispose(&mut self) {
        if self.sink.close() {
            debug!("Counter task disposed");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the counter to complete on its own
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "Counter task failed");
                }
            }
        }
    }
}

impl Drop for CounterHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Start a counter session on the current tokio runtime
///
/// `visibility` carries the element's visible fraction; closing it before
/// the counter fires means the element is gone. `motion` carries the
/// reduced-motion preference. The frame channel closes after the completed
/// frame, on disposal, or when the counter can no longer start.
pub fn spawn_counter(
    targets: Vec<StatTarget>,
    config: CounterConfig,
    visibility: watch::Receiver<f64>,
    motion: watch::Receiver<bool>,
    frames: mpsc::UnboundedSender<Frame>,
) -> CounterHandle {
    let sink = FrameSink::new(frames);
    let session = CounterSession::new(
        targets,
        config,
        DeadlineScheduler::new(),
        WatchMotion::new(motion.clone()),
    );
    let task = tokio::spawn(run_session(session, visibility, motion, sink.clone()));
    CounterHandle {
        task: Some(task),
        sink,
    }
}

async fn run_session(
    mut session: CounterSession<DeadlineScheduler, WatchMotion>,
    mut visibility: watch::Receiver<f64>,
    mut motion: watch::Receiver<bool>,
    sink: FrameSink,
) {
    let origin = Instant::now();
    let now = || origin.elapsed();

    motion.borrow_and_update();
    let ratio = *visibility.borrow_and_update();
    session.on_visibility(ratio, now());

    let mut visibility_open = true;
    let mut motion_open = true;

    loop {
        if session.state() == SessionState::Completed && !session.needs_update() {
            break;
        }

        let deadline = session.next_deadline();
        let wake_at = origin + deadline.unwrap_or(Duration::ZERO);

        tokio::select! {
            changed = visibility.changed(), if visibility_open => {
                if changed.is_ok() {
                    let ratio = *visibility.borrow_and_update();
                    session.on_visibility(ratio, now());
                } else {
                    visibility_open = false;
                    if !session.has_fired() {
                        debug!("Counter element went away before becoming visible");
                        session.dispose();
                        break;
                    }
                }
            }
            changed = motion.changed(), if motion_open => {
                if changed.is_ok() {
                    motion.borrow_and_update();
                    session.motion_changed(now());
                } else {
                    motion_open = false;
                }
            }
            _ = sleep_until(wake_at), if deadline.is_some() => {
                if let Some(frame) = session.poll(now()) {
                    if !sink.send(frame) {
                        debug!("Frame receiver gone, stopping counter");
                        session.dispose();
                        break;
                    }
                }
            }
            else => break,
        }
    }

    sink.close();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_stats() -> Vec<StatTarget> {
        vec![
            StatTarget::new(120, Some("+".into()), "Projects"),
            StatTarget::new(150_000, Some("m²".into()), "Area"),
            StatTarget::new(10, Some("+".into()), "Clients"),
        ]
    }

    async fn collect(rx: &mut mpsc::UnboundedReceiver<Frame>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Some(frame) = rx.recv().await {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_exact_targets_on_time() {
        let (vis_tx, vis_rx) = watch::channel(0.0);
        let (_motion_tx, motion_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = spawn_counter(site_stats(), CounterConfig::default(), vis_rx, motion_rx, tx);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        let started = Instant::now();
        vis_tx.send(1.0).unwrap();
        let frames = collect(&mut rx).await;
        let elapsed = started.elapsed();

        let last = frames.last().unwrap();
        assert!(last.complete);
        assert_eq!(last.values, vec![120, 150_000, 10]);
        assert!(elapsed >= Duration::from_millis(3000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3100), "{elapsed:?}");

        let targets = [120u64, 150_000, 10];
        let mut prev = vec![0u64; 3];
        for frame in &frames {
            for i in 0..3 {
                assert!(frame.values[i] >= prev[i]);
                assert!(frame.values[i] <= targets[i]);
            }
            prev = frame.values.clone();
        }

        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reduced_motion_emits_only_final() {
        let (_vis_tx, vis_rx) = watch::channel(1.0);
        let (_motion_tx, motion_rx) = watch::channel(true);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = spawn_counter(
            vec![StatTarget::new(120, Some("+".into()), "P")],
            CounterConfig::default(),
            vis_rx,
            motion_rx,
            tx,
        );

        let frames = collect(&mut rx).await;
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].values, vec![120]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_mid_run_stops_frames() {
        let (_vis_tx, vis_rx) = watch::channel(1.0);
        let (_motion_tx, motion_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut handle =
            spawn_counter(site_stats(), CounterConfig::default(), vis_rx, motion_rx, tx);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        handle.dispose();
        handle.dispose();

        let frames = collect(&mut rx).await;
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|f| !f.complete));

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_before_visible_and_after_completion() {
        let (_vis_tx, vis_rx) = watch::channel(0.0);
        let (_motion_tx, motion_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_counter(site_stats(), CounterConfig::default(), vis_rx, motion_rx, tx);
        drop(handle);
        assert!(collect(&mut rx).await.is_empty());

        let (_vis_tx, vis_rx) = watch::channel(1.0);
        let (_motion_tx, motion_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handle = spawn_counter(
            site_stats(),
            CounterConfig {
                duration_ms: 0,
                ..Default::default()
            },
            vis_rx,
            motion_rx,
            tx,
        );
        let frames = collect(&mut rx).await;
        assert_eq!(frames.len(), 1);
        assert!(frames[0].complete);
        handle.dispose();
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_element_gone_before_visible() {
        let (vis_tx, vis_rx) = watch::channel(0.0);
        let (_motion_tx, motion_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_counter(site_stats(), CounterConfig::default(), vis_rx, motion_rx, tx);

        drop(vis_tx);
        assert!(collect(&mut rx).await.is_empty());
        handle.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_motion_change_snaps() {
        let (_vis_tx, vis_rx) = watch::channel(1.0);
        let (motion_tx, motion_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = spawn_counter(site_stats(), CounterConfig::default(), vis_rx, motion_rx, tx);

        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(400)).await;
        motion_tx.send(true).unwrap();

        let frames = collect(&mut rx).await;
        let last = frames.last().unwrap();
        assert!(last.complete);
        assert_eq!(last.values, vec![120, 150_000, 10]);
        assert!(started.elapsed() < Duration::from_millis(1000));
    }
}
