//! Step pipeline runner.
//!
//! Executes [`StepKind::ALL`] in order against one [`SessionContext`], stops at
//! the first failing step, and returns a [`RunReport`] describing how far the
//! walk got. Step errors never escape the runner.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::config::PortalConfig;
use crate::modules::events::{
    EventDispatcher, RunFinishedEvent, RunStartedEvent, StepEvent,
    StepFailedEvent, WalkEvent,
};
use crate::protocol::context::SessionContext;
use crate::protocol::core::PortalHttpClient;
use crate::protocol::steps::{self, StepEnv, StepKind};
use crate::report::{RunReport, StepFailure};

/// Coordinates step execution over a shared HTTP session.
pub struct StepPipeline {
    client: Arc<dyn PortalHttpClient>,
    config: PortalConfig,
    events: EventDispatcher,
}

impl StepPipeline {
    pub fn new(client: Arc<dyn PortalHttpClient>, config: PortalConfig) -> Self {
        Self {
            client,
            config,
            events: EventDispatcher::new(),
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Walk every step against `ctx`, halting on the first failure.
    pub async fn run(&self, ctx: &mut SessionContext) -> RunReport {
        let started = Instant::now();
        let total = StepKind::ALL.len();

        self.events.dispatch(WalkEvent::RunStarted(RunStartedEvent {
            target: self.config.base_url().clone(),
            username: self.config.account.username.clone(),
            email: self.config.account.email.clone(),
            total_steps: total,
            timestamp: Utc::now(),
        }));

        let env = StepEnv {
            client: self.client.as_ref(),
            config: &self.config,
        };

        let mut completed_steps = Vec::with_capacity(total);
        let mut halt = None;

        for step in StepKind::ALL {
            self.events.dispatch(WalkEvent::StepStarted(StepEvent {
                step,
                elapsed: started.elapsed(),
                message: step.announcement().to_string(),
                timestamp: Utc::now(),
            }));

            match steps::execute(step, env, ctx).await {
                Ok(outcome) => {
                    completed_steps.push(step);
                    self.events.dispatch(WalkEvent::StepCompleted(StepEvent {
                        step,
                        elapsed: started.elapsed(),
                        message: outcome.detail,
                        timestamp: Utc::now(),
                    }));
                }
                Err(error) => {
                    self.events.dispatch(WalkEvent::StepFailed(StepFailedEvent {
                        step,
                        elapsed: started.elapsed(),
                        error: error.to_string(),
                        boundary: error.crypto_boundary(),
                        timestamp: Utc::now(),
                    }));
                    halt = Some(StepFailure { step, error });
                    break;
                }
            }
        }

        let report = RunReport {
            total,
            halt,
            session_id: ctx.session_id().map(str::to_string),
            elapsed: started.elapsed(),
            completed_steps,
        };

        self.events.dispatch(WalkEvent::RunFinished(RunFinishedEvent {
            completed: report.completed(),
            total,
            halted_at: report.halted_at(),
            elapsed: report.elapsed,
            timestamp: Utc::now(),
        }));

        report
    }
}
