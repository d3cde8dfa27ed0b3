//! Watches the output of a launched JVM for the details the launcher
//! needs to report back: the run name the framework allocated, and the
//! location of the result archive store it wrote to.

use std::sync::Mutex;

use process_executor::{ProcessEvent, ProcessEventType};
use tracing::debug;

/// The framework logs this when it allocates a run name. The next
/// whitespace-delimited word is the name.
const RUN_NAME_MARKER: &str = "Allocated Run Name ";

/// The framework logs this followed by a bracketed list of RAS
/// locations. Only the first entry matters for a local run.
const RAS_FOLDER_MARKER: &str = "Result Archive Stores are ";

#[derive(Default)]
struct Detected {
    run_id: Option<String>,
    ras_folder_url: Option<String>,
}

/// Scrapes run details from the line-by-line output of a local JVM.
///
/// Thread-safe: the waiter thread feeds events in while callers poll
/// the getters from elsewhere.
#[derive(Default)]
pub struct JvmOutputMonitor {
    detected: Mutex<Detected>,
}

impl JvmOutputMonitor {
    /// Create a monitor which has seen no output yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one process event through the monitor.
    pub fn process_event(&self, event: &ProcessEvent) {
        match &event.event_type {
            ProcessEventType::Stdout | ProcessEventType::Stderr => {
                if let Some(line) = &event.data {
                    self.process_line(line);
                }
            }
            ProcessEventType::Started { .. } => {}
        }
    }

    fn process_line(&self, line: &str) {
        if let Some(run_id) = extract_run_id(line) {
            debug!(run_id, "jvm allocated a run name");
            self.detected.lock().unwrap().run_id = Some(run_id);
        }
        if let Some(url) = extract_ras_folder_url(line) {
            debug!(url, "jvm reported its result archive store");
            self.detected.lock().unwrap().ras_folder_url = Some(url);
        }
    }

    /// The run name the framework allocated, if it has been seen yet.
    pub fn run_id(&self) -> Option<String> {
        self.detected.lock().unwrap().run_id.clone()
    }

    /// The result archive store folder URL, if it has been seen yet.
    pub fn ras_folder_url(&self) -> Option<String> {
        self.detected.lock().unwrap().ras_folder_url.clone()
    }
}

fn extract_run_id(line: &str) -> Option<String> {
    let after_marker = &line[line.find(RUN_NAME_MARKER)? + RUN_NAME_MARKER.len()..];
    let run_id = after_marker.split_whitespace().next()?;
    if run_id.is_empty() {
        None
    } else {
        Some(run_id.to_string())
    }
}

fn extract_ras_folder_url(line: &str) -> Option<String> {
    let after_marker = &line[line.find(RAS_FOLDER_MARKER)? + RAS_FOLDER_MARKER.len()..];
    let inside_brackets = after_marker
        .trim_start()
        .strip_prefix('[')
        .map(|rest| rest.split(']').next().unwrap_or(rest))
        .unwrap_or(after_marker);
    let first_entry = inside_brackets.split(',').next()?.trim();
    if first_entry.is_empty() {
        None
    } else {
        Some(first_entry.to_string())
    }
}
