use serde::{Deserialize, Serialize};
use tracing::trace;

/// Trace records a child reports on stdout, one JSON object per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    AssemblyBind(BindEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindEvent {
    pub assembly: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl BindEvent {
    pub fn new(assembly: impl Into<String>) -> Self {
        Self {
            assembly: assembly.into(),
            success: true,
        }
    }

    /// Serialize as a single trace line
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&TraceEvent::AssemblyBind(self.clone()))
    }
}

/// Bind events collected from one child's output
#[derive(Debug, Clone, Default)]
pub struct BindEventLog {
    events: Vec<BindEvent>,
}

impl BindEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `line` if it is a bind event; anything else is ignored
    pub fn record_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if !line.starts_with('{') {
            return false;
        }
        match serde_json::from_str::<TraceEvent>(line) {
            Ok(TraceEvent::AssemblyBind(event)) => {
                trace!(assembly = %event.assembly, success = event.success, "Recorded bind event");
                self.events.push(event);
                true
            }
            Err(e) => {
                trace!(error = %e, "Ignoring non-bind output line");
                false
            }
        }
    }

    /// Number of bind events for `assembly`, compared trimmed and ASCII case-insensitively
    pub fn count_for(&self, assembly: &str) -> usize {
        let assembly = assembly.trim();
        self.events
            .iter()
            .filter(|event| event.assembly.trim().eq_ignore_ascii_case(assembly))
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[BindEvent] {
        &self.events
    }
}
