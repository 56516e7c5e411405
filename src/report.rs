//! Outcome of a walk and the summary printed at the end of a run.

use std::time::Duration;

use crate::config::PortalConfig;
use crate::protocol::endpoints::{Endpoint, Reachability};
use crate::protocol::steps::{StepError, StepKind};

/// Step that stopped the walk and why.
#[derive(Debug)]
pub struct StepFailure {
    pub step: StepKind,
    pub error: StepError,
}

#[derive(Debug)]
pub struct RunReport {
    pub completed_steps: Vec<StepKind>,
    pub total: usize,
    pub halt: Option<StepFailure>,
    pub session_id: Option<String>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.completed_steps.len()
    }

    pub fn halted_at(&self) -> Option<StepKind> {
        self.halt.as_ref().map(|failure| failure.step)
    }

    pub fn has_completed(&self, step: StepKind) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Every reachable step succeeded and the walk stopped at the boundary.
    pub fn reached_crypto_boundary(&self) -> bool {
        self.halt.as_ref().is_some_and(|failure| {
            failure.step == StepKind::CryptoBoundary && failure.error.is_crypto_boundary()
        })
    }
}

/// Render the closing summary block.
pub fn render_summary(report: &RunReport, config: &PortalConfig) -> String {
    let rule = "═".repeat(76);
    let mut lines = vec![
        rule.clone(),
        "  PROTOCOL WALK SUMMARY".to_string(),
        rule.clone(),
        format!("  Target:    {}", config.origin()),
        format!(
            "  Session:   {}",
            report.session_id.as_deref().unwrap_or("-")
        ),
        format!(
            "  Completed: {}/{} steps in {}ms",
            report.completed(),
            report.total,
            report.elapsed.as_millis()
        ),
        String::new(),
        "  COMPLETED STEPS:".to_string(),
    ];

    if report.completed_steps.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(
        report
            .completed_steps
            .iter()
            .map(|step| format!("  ✓ {} {}", step.label(), step)),
    );

    lines.push(String::new());
    lines.push("  API CALLS:".to_string());
    for endpoint in Endpoint::reachable() {
        let marker = match endpoint.step() {
            Some(step) if report.has_completed(step) => "✓",
            _ => "·",
        };
        lines.push(format!("  {marker} {endpoint}"));
    }

    lines.push(String::new());
    lines.push("  BLOCKED BY CRYPTO BOUNDARY:".to_string());
    for endpoint in Endpoint::blocked() {
        if let Reachability::Blocked(reason) = endpoint.reachability {
            lines.push(format!("  ⚠ {endpoint} ({reason})"));
        }
    }

    if let Some(failure) = &report.halt {
        lines.push(String::new());
        lines.push(format!(
            "  HALTED AT {} ({}):",
            failure.step.label(),
            failure.step
        ));
        lines.push(format!("  {}", failure.error));
    }
    lines.push(rule);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::boundary::SECURITY_VERIFY_BOUNDARY;

    fn report(completed: usize, halt: Option<StepFailure>) -> RunReport {
        RunReport {
            completed_steps: StepKind::ALL[..completed].to_vec(),
            total: StepKind::ALL.len(),
            halt,
            session_id: Some("abc123".into()),
            elapsed: Duration::from_millis(250),
        }
    }

    #[test]
    fn boundary_detection_requires_boundary_error() {
        let boundary = report(
            8,
            Some(StepFailure {
                step: StepKind::CryptoBoundary,
                error: StepError::CryptoBoundary(&SECURITY_VERIFY_BOUNDARY),
            }),
        );
        assert!(boundary.reached_crypto_boundary());
        assert_eq!(boundary.halted_at(), Some(StepKind::CryptoBoundary));

        let early = report(
            4,
            Some(StepFailure {
                step: StepKind::DeviceCheck,
                error: StepError::EmptyResponse("/api/v1/device_check"),
            }),
        );
        assert!(!early.reached_crypto_boundary());
        assert_eq!(early.completed(), 4);
    }

    #[test]
    fn summary_marks_verified_and_blocked_endpoints() {
        let config = PortalConfig::default();
        let text = render_summary(
            &report(
                2,
                Some(StepFailure {
                    step: StepKind::MathChallenge,
                    error: StepError::EmptyResponse("/api/v1/init"),
                }),
            ),
            &config,
        );

        assert!(text.contains("Completed: 2/9 steps in 250ms"));
        assert!(text.contains("✓ POST /api/v1/trace"));
        assert!(text.contains("✓ GET  /api/v1/init"));
        assert!(text.contains("· POST /api/v1/device_check"));
        assert!(text.contains("⚠ POST /api/v1/security_verify"));
        assert!(text.contains("HALTED AT STEP 3 (Math Challenge)"));
        assert!(text.contains("Session:   abc123"));
    }
}
