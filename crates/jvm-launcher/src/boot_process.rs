//! Tracks a launched local JVM through to completion.
//!
//! A background thread drains the process output through the output
//! monitor and waits for the process to exit. Completion is signalled
//! across a channel so that callers can poll without blocking.

use std::sync::Arc;
use std::thread;

use async_channel::{bounded, Receiver, TryRecvError};
use futures_lite::future::block_on;
use futures_lite::StreamExt;
use process_executor::{EventStream, ProcessHandle};
use tracing::{debug, warn};

use crate::monitor::JvmOutputMonitor;
use crate::sleeper::TimedSleeper;

/// A local JVM which has been launched and is being waited on.
pub struct LocalBootProcess {
    monitor: Arc<JvmOutputMonitor>,
    completion_rx: Receiver<()>,
}

impl LocalBootProcess {
    /// Start tracking a freshly-spawned JVM.
    ///
    /// The returned value reports completion and exposes whatever the
    /// output monitor has scraped so far. The sleeper is interrupted
    /// when the process finishes, so polls waiting out an interval wake
    /// up promptly.
    pub fn start(
        mut events: EventStream,
        mut handle: Box<dyn ProcessHandle>,
        sleeper: Arc<TimedSleeper>,
    ) -> Self {
        let monitor = Arc::new(JvmOutputMonitor::new());
        let (completion_tx, completion_rx) = bounded(1);

        let waiter_monitor = monitor.clone();
        thread::spawn(move || {
            block_on(async move {
                while let Some(event) = events.next().await {
                    waiter_monitor.process_event(&event);
                }
                match handle.wait().await {
                    Ok(status) => {
                        debug!(code = status.code, "local jvm finished");
                        if !status.success() {
                            warn!(code = status.code, "local jvm finished with failures");
                        }
                    }
                    Err(error) => {
                        warn!(%error, "failed waiting for the local jvm to finish");
                    }
                }
                let _ = completion_tx.send(()).await;
                sleeper.interrupt();
                // completion_tx drops here, closing the channel.
            });
        });

        Self {
            monitor,
            completion_rx,
        }
    }

    /// Whether the JVM has finished. Never blocks.
    pub fn is_completed(&self) -> bool {
        match self.completion_rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Closed) => true,
            Err(TryRecvError::Empty) => false,
        }
    }

    /// The run name allocated by the framework, once its output shows one.
    pub fn run_id(&self) -> Option<String> {
        self.monitor.run_id()
    }

    /// The result archive store folder URL, once its output shows one.
    pub fn ras_folder_url(&self) -> Option<String> {
        self.monitor.ras_folder_url()
    }
}
