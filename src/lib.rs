//! # portal-walker
//!
//! Sequential client for a secure registration portal's challenge-response
//! protocol.
//!
//! The walk runs a fixed list of steps against one HTTP session: telemetry
//! trace, session init, an arithmetic proof, device fingerprinting, the
//! device check, a heartbeat, a sequence proof, and an iterated SHA-256
//! chain. It halts at the portal's encrypted security verification, which
//! depends on a browser-side CryptoJS encoding this crate does not
//! reproduce.
//!
//! ## Example
//!
//! ```no_run
//! use portal_walker::{PortalConfig, PortalWalker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PortalConfig::builder()
//!         .with_base_url("http://127.0.0.1:8000")
//!         .build()?;
//!     let walker = PortalWalker::builder().with_config(config).build()?;
//!     let walk = walker.run().await;
//!     println!("completed {}/{}", walk.report.completed(), walk.report.total);
//!     Ok(())
//! }
//! ```

mod walker;

pub mod config;
pub mod modules;
pub mod protocol;
pub mod report;

pub use crate::walker::{
    PortalWalker,
    PortalWalkerBuilder,
    PortalWalkerError,
    PortalWalkerResult,
    Walk,
};

pub use crate::config::{ConfigError, DemoAccount, PortalConfig, PortalConfigBuilder};

pub use crate::protocol::boundary::{CryptoBoundary, SECURITY_VERIFY_BOUNDARY};

pub use crate::protocol::context::{ContextError, SessionContext};

pub use crate::protocol::core::{
    PortalHttpClient,
    PortalHttpClientError,
    PortalHttpResponse,
    ReqwestPortalClient,
};

pub use crate::protocol::endpoints::{Endpoint, EndpointMethod, Reachability};

pub use crate::protocol::identity::{ClientIdentity, DeviceFingerprint, DeviceProfile};

pub use crate::protocol::pipeline::StepPipeline;

pub use crate::protocol::puzzles::{
    DecodeError,
    PuzzleError,
    decode_b64_bigint,
    decode_b64_digits,
    hash_chain,
    math_proof,
    sequence_proof,
};

pub use crate::protocol::steps::{StepError, StepKind, StepOutcome};

pub use crate::modules::{ConsoleHandler, EventDispatcher, EventHandler, LoggingHandler, WalkEvent};

pub use crate::report::{RunReport, StepFailure, render_summary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
