//! Event system for the step pipeline.
//!
//! The runner reports its progress as [`WalkEvent`]s; handlers decide whether
//! they end up in the log, on the console, or somewhere else.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::protocol::boundary::CryptoBoundary;
use crate::protocol::steps::StepKind;

const RULE_WIDTH: usize = 76;

#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub target: Url,
    pub username: String,
    pub email: String,
    pub total_steps: usize,
    pub timestamp: DateTime<Utc>,
}

/// Progress of a single step.
#[derive(Debug, Clone)]
pub struct StepEvent {
    pub step: StepKind,
    pub elapsed: Duration,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StepFailedEvent {
    pub step: StepKind,
    pub elapsed: Duration,
    pub error: String,
    /// Set when the halt is the expected stop before the encrypted
    /// verification.
    pub boundary: Option<&'static CryptoBoundary>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RunFinishedEvent {
    pub completed: usize,
    pub total: usize,
    pub halted_at: Option<StepKind>,
    pub elapsed: Duration,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum WalkEvent {
    RunStarted(RunStartedEvent),
    StepStarted(StepEvent),
    StepCompleted(StepEvent),
    StepFailed(StepFailedEvent),
    RunFinished(RunFinishedEvent),
}

/// Trait implemented by event handlers.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &WalkEvent);
}

/// Dispatcher that broadcasts events to registered handlers.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn dispatch(&self, event: WalkEvent) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

/// Logs events using the `log` crate.
#[derive(Debug)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn handle(&self, event: &WalkEvent) {
        match event {
            WalkEvent::RunStarted(start) => {
                log::info!("walk started against {} ({} steps)", start.target, start.total_steps);
            }
            WalkEvent::StepStarted(step) => {
                log::debug!("{} {} started", step.step.label(), step.step);
            }
            WalkEvent::StepCompleted(step) => {
                log::info!("{} {} ok: {}", step.step.label(), step.step, step.message);
            }
            WalkEvent::StepFailed(failed) if failed.boundary.is_some() => {
                log::warn!("{} {} halted: {}", failed.step.label(), failed.step, failed.error);
            }
            WalkEvent::StepFailed(failed) => {
                log::error!("{} {} failed: {}", failed.step.label(), failed.step, failed.error);
            }
            WalkEvent::RunFinished(done) => {
                log::info!(
                    "walk finished: {}/{} steps in {:.2}s",
                    done.completed,
                    done.total,
                    done.elapsed.as_secs_f64()
                );
            }
        }
    }
}

/// Prints human-readable progress lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleHandler;

impl ConsoleHandler {
    /// Text printed for an event, if any.
    pub fn render(event: &WalkEvent) -> Option<String> {
        match event {
            WalkEvent::RunStarted(start) => {
                let rule = "=".repeat(RULE_WIDTH);
                Some(format!(
                    "{rule}\n  SECURE REGISTRATION PORTAL - PROTOCOL WALK\n{rule}\n  Target: {}\n  User:   {} <{}>\n{rule}\n",
                    start.target.as_str().trim_end_matches('/'),
                    start.username,
                    start.email
                ))
            }
            WalkEvent::StepStarted(step) => Some(progress_line(
                "[+]",
                step.elapsed,
                step.step,
                step.step.announcement(),
            )),
            WalkEvent::StepCompleted(step) => {
                Some(progress_line("[✓]", step.elapsed, step.step, &step.message))
            }
            WalkEvent::StepFailed(failed) => match failed.boundary {
                Some(boundary) => {
                    let rule = "═".repeat(RULE_WIDTH);
                    Some(format!(
                        "{}\n\n{rule}\n  EXECUTION HALTED - CRYPTO BOUNDARY\n{rule}\n{}\n{rule}",
                        progress_line("[!]", failed.elapsed, failed.step, &failed.error),
                        boundary.render()
                    ))
                }
                None => Some(progress_line(
                    "[✗]",
                    failed.elapsed,
                    failed.step,
                    &failed.error,
                )),
            },
            WalkEvent::RunFinished(done) => {
                let halted_at = done.halted_at?;
                let rule = "─".repeat(RULE_WIDTH);
                Some(format!(
                    "\n{rule}\n  Flow stopped at: {halted_at}\n  Completed: {}/{} steps\n{rule}\n",
                    done.completed, done.total
                ))
            }
        }
    }
}

impl EventHandler for ConsoleHandler {
    fn handle(&self, event: &WalkEvent) {
        if let Some(text) = ConsoleHandler::render(event) {
            println!("{text}");
        }
    }
}

fn progress_line(marker: &str, elapsed: Duration, step: StepKind, message: &str) -> String {
    format!(
        "{marker} [{:>7}ms] {}: {message}",
        elapsed.as_millis(),
        step.label()
    )
}
