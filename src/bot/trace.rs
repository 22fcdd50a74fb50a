//! Per-invocation diagnostic trace.
//!
//! An append-only list of step descriptions owned by a single dispatch call.
//! It only leaves the dispatcher inside an error response.

use std::fmt;

/// Dispatch states, in the order a successful invocation passes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    EnvelopeValidated,
    BodyDecoded,
    JsonParsed,
    UpdateBuilt,
    Routed,
    Completed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::EnvelopeValidated => "envelope-validated",
            Stage::BodyDecoded => "body-decoded",
            Stage::JsonParsed => "json-parsed",
            Stage::UpdateBuilt => "update-built",
            Stage::Routed => "routed",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagnosticTrace {
    steps: Vec<(Stage, String)>,
}

impl DiagnosticTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, detail: impl Into<String>) {
        self.steps.push((stage, detail.into()));
    }

    /// Stage of the last recorded step.
    pub fn stage(&self) -> Stage {
        self.steps.last().map(|(stage, _)| *stage).unwrap_or(Stage::Start)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for DiagnosticTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (stage, detail)) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "Step {} [{}]: {}", i + 1, stage, detail)?;
        }
        Ok(())
    }
}

/// Shorten a payload for inclusion in the trace.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}... ({} chars total)", head, text.chars().count())
    } else {
        head
    }
}
