//! High level walk orchestration.
//!
//! Wires the configuration, HTTP session, event handlers and step pipeline
//! together behind a small builder.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, PortalConfig};
use crate::modules::events::{EventDispatcher, EventHandler, LoggingHandler};
use crate::protocol::context::SessionContext;
use crate::protocol::core::{PortalHttpClient, PortalHttpClientError, ReqwestPortalClient};
use crate::protocol::pipeline::StepPipeline;
use crate::report::RunReport;

/// Result alias used across the orchestration layer.
pub type PortalWalkerResult<T> = Result<T, PortalWalkerError>;

/// Construction-time failures. Failures during the walk end up in the
/// [`RunReport`] instead.
#[derive(Debug, Error)]
pub enum PortalWalkerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http session setup failed: {0}")]
    Client(#[from] PortalHttpClientError),
}

/// Context and report of a finished walk.
#[derive(Debug)]
pub struct Walk {
    pub context: SessionContext,
    pub report: RunReport,
}

/// Fluent builder for [`PortalWalker`].
pub struct PortalWalkerBuilder {
    config: PortalConfig,
    client: Option<Arc<dyn PortalHttpClient>>,
    handlers: Vec<Arc<dyn EventHandler>>,
    log_events: bool,
}

impl PortalWalkerBuilder {
    pub fn new() -> Self {
        Self {
            config: PortalConfig::default(),
            client: None,
            handlers: Vec::new(),
            log_events: true,
        }
    }

    pub fn with_config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the reqwest session, e.g. with a stub in tests.
    pub fn with_client(mut self, client: Arc<dyn PortalHttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn disable_logging(mut self) -> Self {
        self.log_events = false;
        self
    }

    pub fn build(self) -> PortalWalkerResult<PortalWalker> {
        let client: Arc<dyn PortalHttpClient> = match self.client {
            Some(client) => client,
            None => Arc::new(ReqwestPortalClient::new(self.config.session_headers()?)?),
        };

        let mut events = EventDispatcher::new();
        if self.log_events {
            events.register_handler(Arc::new(LoggingHandler));
        }
        for handler in self.handlers {
            events.register_handler(handler);
        }

        Ok(PortalWalker {
            pipeline: StepPipeline::new(client, self.config).with_events(events),
        })
    }
}

impl Default for PortalWalkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the portal walk with a fresh session context.
pub struct PortalWalker {
    pipeline: StepPipeline,
}

impl PortalWalker {
    /// Construct a walker with default configuration.
    pub fn new() -> PortalWalkerResult<Self> {
        PortalWalkerBuilder::new().build()
    }

    pub fn builder() -> PortalWalkerBuilder {
        PortalWalkerBuilder::new()
    }

    pub fn config(&self) -> &PortalConfig {
        self.pipeline.config()
    }

    /// Walk the protocol once. Always terminates with a report.
    pub async fn run(&self) -> Walk {
        let mut context = SessionContext::new();
        let report = self.pipeline.run(&mut context).await;
        Walk { context, report }
    }
}
