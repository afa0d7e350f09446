//! Event system for UI decoupling.
//!
//! Front ends subscribe to resolution, cursor and download events
//! through [`PathObserver`] without depending on the core logic.

use std::fmt;

use crate::step::HackingStep;

/// Events emitted while resolving and walking a hacking path.
#[derive(Debug, Clone)]
pub enum PathEvent {
    /// A firmware matched a range.
    Resolved {
        firmware: String,
        steps: Vec<HackingStep>,
    },
    /// A firmware matched no range.
    Unresolved { firmware: String },
    /// The cursor moved. `to` is `None` once the path is exhausted.
    StepChanged {
        from: Option<HackingStep>,
        to: Option<HackingStep>,
    },
    /// Resources required by the whole path were collected.
    ResourcesPlanned { count: usize },
    /// Download progress for a tagged worker.
    Progress {
        tag: String,
        current: u64,
        total: u64,
    },
    /// A tagged worker finished.
    Finished { tag: String },
    /// A tagged worker failed.
    Failed { tag: String, message: String },
}

fn step_name(step: &Option<HackingStep>) -> String {
    match step {
        Some(s) => s.to_string(),
        None => "end".to_string(),
    }
}

impl fmt::Display for PathEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathEvent::Resolved { firmware, steps } => {
                write!(f, "{} resolved to {} step(s)", firmware, steps.len())
            }
            PathEvent::Unresolved { firmware } => write!(f, "{} is not in any range", firmware),
            PathEvent::StepChanged { from, to } => {
                write!(f, "{} -> {}", step_name(from), step_name(to))
            }
            PathEvent::ResourcesPlanned { count } => write!(f, "{} resource(s) planned", count),
            PathEvent::Progress {
                tag,
                current,
                total,
            } => write!(f, "{}: {}/{}", tag, current, total),
            PathEvent::Finished { tag } => write!(f, "{}: done", tag),
            PathEvent::Failed { tag, message } => write!(f, "{}: {}", tag, message),
        }
    }
}

/// Observer trait for receiving path events.
///
/// Download workers report back through the same trait.
pub trait PathObserver: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: &PathEvent);
}

/// No-op observer that discards all events.
#[derive(Debug, Default)]
pub struct NullObserver;

impl PathObserver for NullObserver {
    fn on_event(&self, _event: &PathEvent) {}
}

/// Observer that logs events using tracing.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PathObserver for TracingObserver {
    fn on_event(&self, event: &PathEvent) {
        match event {
            PathEvent::Resolved { firmware, steps } => {
                tracing::info!(firmware = %firmware, steps = steps.len(), "Path resolved");
            }
            PathEvent::Unresolved { firmware } => {
                tracing::warn!(firmware = %firmware, "No range matches firmware");
            }
            PathEvent::StepChanged { from, to } => {
                tracing::info!(from = %step_name(from), to = %step_name(to), "Step changed");
            }
            PathEvent::ResourcesPlanned { count } => {
                tracing::info!(count = count, "Resources planned");
            }
            PathEvent::Progress {
                tag,
                current,
                total,
            } => {
                let pct = if *total > 0 {
                    (*current * 100) / *total
                } else {
                    0
                };
                tracing::debug!(tag = %tag, progress = %format!("{}%", pct), "Progress");
            }
            PathEvent::Finished { tag } => {
                tracing::info!(tag = %tag, "Download finished");
            }
            PathEvent::Failed { tag, message } => {
                tracing::error!(tag = %tag, "Download failed: {}", message);
            }
        }
    }
}
