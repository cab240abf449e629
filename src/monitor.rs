//! Background clipboard monitor.
//!
//! A single worker thread polls the text source once per second, runs the
//! pipeline on any new text, and installs the resulting fragment on the
//! sink. Shutdown is cooperative: [`MonitorHandle::stop`] signals the worker
//! and waits a bounded time for it to acknowledge, so a stop request issued
//! mid-render returns promptly even if the render is slow; the worker then
//! exits on its own once the render finishes.
//!
//! The poll tick doubles as the stop check: the worker blocks on the stop
//! channel with a one-second timeout instead of sleeping, so a stop signal
//! interrupts the wait immediately rather than after the tick elapses.

use crate::clipboard::{FragmentSink, TextSource};
use crate::config::RenderConfig;
use crate::convert::process_text;
use crate::error::TexClipError;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay between successive source polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long [`MonitorHandle::stop`] waits for the worker to acknowledge.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle to a running monitor worker.
pub struct MonitorHandle {
    stop_tx: Sender<()>,
    done_rx: Receiver<()>,
    thread: Option<JoinHandle<()>>,
}

/// Start monitoring `source`, writing composed fragments to `sink`.
pub fn spawn<S, K>(
    source: S,
    sink: K,
    config: RenderConfig,
) -> Result<MonitorHandle, TexClipError>
where
    S: TextSource + Send + 'static,
    K: FragmentSink + Send + 'static,
{
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let (done_tx, done_rx) = bounded::<()>(1);

    let thread = std::thread::Builder::new()
        .name("texclip-monitor".into())
        .spawn(move || {
            run_loop(source, sink, config, stop_rx);
            let _ = done_tx.send(());
        })
        .map_err(|e| TexClipError::Internal(format!("spawn monitor thread: {e}")))?;

    info!("clipboard monitor started");
    Ok(MonitorHandle {
        stop_tx,
        done_rx,
        thread: Some(thread),
    })
}

impl MonitorHandle {
    /// Signal the worker to stop and wait up to two seconds for it to
    /// acknowledge. Returns `true` when the worker exited in time; `false`
    /// means it was abandoned mid-operation and will exit on its own.
    pub fn stop(mut self) -> bool {
        let _ = self.stop_tx.try_send(());
        match self.done_rx.recv_timeout(STOP_TIMEOUT) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                info!("clipboard monitor stopped");
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("clipboard monitor did not stop in time, abandoning worker");
                false
            }
        }
    }
}

fn run_loop<S, K>(mut source: S, mut sink: K, config: RenderConfig, stop_rx: Receiver<()>)
where
    S: TextSource,
    K: FragmentSink,
{
    let mut last_text: Option<String> = None;
    loop {
        match stop_rx.recv_timeout(POLL_INTERVAL) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let Some(text) = source.read_text() else {
            continue;
        };
        if last_text.as_deref() == Some(text.as_str()) {
            continue;
        }
        last_text = Some(text.clone());

        match process_text(&text, &config) {
            Ok(output) => match sink.write_html(&output.html) {
                Ok(()) => info!(
                    equations = output.stats.rendered,
                    "converted clipboard text"
                ),
                Err(e) => warn!(error = %e, "failed to install fragment"),
            },
            // Ordinary non-math clipboard content; stay quiet.
            Err(TexClipError::NoEquationsFound) => {
                debug!("clipboard text has no equations")
            }
            Err(TexClipError::EmptyInput) => {}
            Err(e) => warn!(error = %e, "pipeline failed for clipboard text"),
        }
    }
}
