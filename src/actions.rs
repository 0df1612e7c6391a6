use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Remote actions the payroll screens can trigger on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Generate,
    Submit,
    Download,
    Confirm,
    MarkPaid,
}

impl ActionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Submit => "submit",
            Self::Download => "download",
            Self::Confirm => "confirm",
            Self::MarkPaid => "mark as paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub route: String,
    pub payload: BTreeMap<String, String>,
}

impl ActionRequest {
    pub fn new(kind: ActionKind, route: &str) -> Self {
        Self {
            kind,
            route: route.to_string(),
            payload: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }
}

/// Where requests go. The server behind it is someone else's concern.
pub trait ActionSink {
    fn send(&mut self, request: &ActionRequest) -> Result<()>;
}

/// Appends each request as one JSON line to `outbox.jsonl`.
pub struct OutboxSink {
    path: PathBuf,
}

impl OutboxSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[derive(Serialize)]
struct OutboxLine<'a> {
    queued_at: String,
    #[serde(flatten)]
    request: &'a ActionRequest,
}

impl ActionSink for OutboxSink {
    fn send(&mut self, request: &ActionRequest) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let line = serde_json::to_string(&OutboxLine {
            queued_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            request,
        })?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Idle,
    Succeeded,
    Failed(String),
}

/// Loading flag, outcome banner and last request for each action kind.
/// Nothing is retried unless the user asks.
#[derive(Debug, Default)]
pub struct ActionTracker {
    loading: BTreeMap<ActionKind, bool>,
    status: BTreeMap<ActionKind, ActionStatus>,
    last: BTreeMap<ActionKind, ActionRequest>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self, kind: ActionKind) -> bool {
        self.loading.get(&kind).copied().unwrap_or(false)
    }

    pub fn status(&self, kind: ActionKind) -> ActionStatus {
        self.status.get(&kind).cloned().unwrap_or(ActionStatus::Idle)
    }

    /// The failure banner for `kind`, if its last attempt failed.
    pub fn banner(&self, kind: ActionKind) -> Option<String> {
        match self.status(kind) {
            ActionStatus::Failed(_) => Some(format!("Failed to {}. Please try again.", kind.verb())),
            _ => None,
        }
    }

    /// Mark `request` as in flight. Refused while the same kind of action
    /// is still loading.
    pub fn begin(&mut self, request: &ActionRequest) -> bool {
        if self.is_loading(request.kind) {
            warn!(action = request.kind.verb(), "action already in flight, ignoring");
            return false;
        }
        self.loading.insert(request.kind, true);
        self.last.insert(request.kind, request.clone());
        true
    }

    /// Clear the loading flag and record the outcome. All failures are
    /// treated alike.
    pub fn finish(&mut self, kind: ActionKind, outcome: Result<()>) -> bool {
        self.loading.insert(kind, false);
        match outcome {
            Ok(()) => {
                info!(action = kind.verb(), "action sent");
                self.status.insert(kind, ActionStatus::Succeeded);
                true
            }
            Err(e) => {
                warn!(action = kind.verb(), error = %e, "action failed");
                self.status.insert(kind, ActionStatus::Failed(e.to_string()));
                false
            }
        }
    }

    /// Send `request` through `sink`. Returns whether it went out.
    pub fn dispatch(&mut self, sink: &mut dyn ActionSink, request: ActionRequest) -> bool {
        if !self.begin(&request) {
            return false;
        }
        let outcome = sink.send(&request);
        self.finish(request.kind, outcome)
    }

    /// Re-issue the last request of `kind`. `None` if nothing was sent yet.
    pub fn retry(&mut self, sink: &mut dyn ActionSink, kind: ActionKind) -> Option<bool> {
        let request = self.last.get(&kind)?.clone();
        Some(self.dispatch(sink, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaylensError;

    struct FlakySink {
        failures_left: usize,
        sent: Vec<ActionRequest>,
    }

    impl ActionSink for FlakySink {
        fn send(&mut self, request: &ActionRequest) -> Result<()> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(PaylensError::Other("connection reset".to_string()));
            }
            self.sent.push(request.clone());
            Ok(())
        }
    }

    fn generate() -> ActionRequest {
        ActionRequest::new(ActionKind::Generate, "/reports/alphalist").with("year", "2024")
    }

    #[test]
    fn test_success_clears_loading() {
        let mut sink = FlakySink { failures_left: 0, sent: vec![] };
        let mut tracker = ActionTracker::new();
        assert!(tracker.dispatch(&mut sink, generate()));
        assert!(!tracker.is_loading(ActionKind::Generate));
        assert_eq!(tracker.status(ActionKind::Generate), ActionStatus::Succeeded);
        assert!(tracker.banner(ActionKind::Generate).is_none());
        assert_eq!(sink.sent.len(), 1);
    }

    #[test]
    fn test_failure_shows_generic_banner_and_manual_retry() {
        let mut sink = FlakySink { failures_left: 1, sent: vec![] };
        let mut tracker = ActionTracker::new();
        assert!(!tracker.dispatch(&mut sink, generate()));
        assert!(!tracker.is_loading(ActionKind::Generate));
        assert_eq!(
            tracker.banner(ActionKind::Generate).as_deref(),
            Some("Failed to generate. Please try again.")
        );
        // Nothing went out on its own.
        assert!(sink.sent.is_empty());

        assert_eq!(tracker.retry(&mut sink, ActionKind::Generate), Some(true));
        assert_eq!(sink.sent, vec![generate()]);
        assert!(tracker.banner(ActionKind::Generate).is_none());
    }

    #[test]
    fn test_second_begin_refused_while_loading() {
        let mut tracker = ActionTracker::new();
        let request = generate();
        assert!(tracker.begin(&request));
        assert!(tracker.is_loading(ActionKind::Generate));
        assert!(!tracker.begin(&request));
        // Other kinds are independent.
        assert!(tracker.begin(&ActionRequest::new(ActionKind::Download, "/reports/r3.dat")));
        assert!(!tracker.finish(ActionKind::Generate, Err(PaylensError::Other("500".to_string()))));
        assert!(!tracker.is_loading(ActionKind::Generate));
        assert!(tracker.begin(&request));
    }

    #[test]
    fn test_retry_without_history() {
        let mut sink = FlakySink { failures_left: 0, sent: vec![] };
        let mut tracker = ActionTracker::new();
        assert_eq!(tracker.retry(&mut sink, ActionKind::MarkPaid), None);
        assert_eq!(tracker.status(ActionKind::MarkPaid), ActionStatus::Idle);
    }

    #[test]
    fn test_outbox_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outbox.jsonl");
        let mut sink = OutboxSink::new(path.clone());
        sink.send(&generate()).unwrap();
        sink.send(&ActionRequest::new(ActionKind::MarkPaid, "/remittances/R1/paid")).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["kind"], "generate");
        assert_eq!(first["payload"]["year"], "2024");
        assert!(first["queued_at"].is_string());
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["kind"], "mark_paid");
    }
}
