//! Cross-cutting services module
//!
//! Observability hooks around the step pipeline.

pub mod events;

pub use events::{
    ConsoleHandler, EventDispatcher, EventHandler, LoggingHandler, RunFinishedEvent,
    RunStartedEvent, StepEvent, StepFailedEvent, WalkEvent,
};
