//! The fixed catalogue of protocol steps.
//!
//! Each step reads what earlier steps left in the [`SessionContext`], performs
//! at most one request, and writes its product back only once it has fully
//! succeeded. A failed step leaves the context untouched.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::config::{ConfigError, PortalConfig};
use crate::protocol::boundary::{CryptoBoundary, SECURITY_VERIFY_BOUNDARY};
use crate::protocol::context::{ContextError, SessionContext};
use crate::protocol::core::{
    PortalHttpClient, PortalHttpClientError, PortalHttpResponse, ResponseBodyError,
};
use crate::protocol::endpoints::{Endpoint, EndpointMethod};
use crate::protocol::puzzles::{
    MATH_MODULUS, PuzzleError, hash_chain, solve_math_challenge, solve_sequence,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Trace,
    Init,
    MathChallenge,
    Fingerprints,
    DeviceCheck,
    Heartbeat,
    SequenceProof,
    HashChain,
    CryptoBoundary,
}

impl StepKind {
    /// Execution order.
    pub const ALL: [StepKind; 9] = [
        StepKind::Trace,
        StepKind::Init,
        StepKind::MathChallenge,
        StepKind::Fingerprints,
        StepKind::DeviceCheck,
        StepKind::Heartbeat,
        StepKind::SequenceProof,
        StepKind::HashChain,
        StepKind::CryptoBoundary,
    ];

    /// One-based position in [`StepKind::ALL`].
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Trace => "Trace",
            StepKind::Init => "Init",
            StepKind::MathChallenge => "Math Challenge",
            StepKind::Fingerprints => "Fingerprints",
            StepKind::DeviceCheck => "Device Check",
            StepKind::Heartbeat => "Heartbeat",
            StepKind::SequenceProof => "Sequence Proof",
            StepKind::HashChain => "Hash Chain",
            StepKind::CryptoBoundary => "Crypto Boundary",
        }
    }

    pub fn label(self) -> String {
        format!("STEP {}", self.number())
    }

    /// Progress line printed when the step starts.
    pub fn announcement(self) -> &'static str {
        match self {
            StepKind::Trace => "Sending telemetry trace",
            StepKind::Init => "Initializing session",
            StepKind::MathChallenge => "Solving math challenge",
            StepKind::Fingerprints => "Generating device fingerprints",
            StepKind::DeviceCheck => "Submitting device check",
            StepKind::Heartbeat => "Sending heartbeat (GET)",
            StepKind::SequenceProof => "Solving sequence proof",
            StepKind::HashChain => "Solving hash chain",
            StepKind::CryptoBoundary => "Checking cryptographic boundary",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful step result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub detail: String,
}

impl StepOutcome {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Transport(#[from] PortalHttpClientError),
    #[error("{method} {path} returned {status}: {detail}")]
    HttpStatus {
        method: EndpointMethod,
        path: &'static str,
        status: u16,
        detail: String,
    },
    #[error("{0} returned no data")]
    EmptyResponse(&'static str),
    #[error("{path}: {source}")]
    Body {
        path: &'static str,
        source: ResponseBodyError,
    },
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cryptographic boundary reached: {0}")]
    CryptoBoundary(&'static CryptoBoundary),
}

impl StepError {
    pub fn is_crypto_boundary(&self) -> bool {
        self.crypto_boundary().is_some()
    }

    /// Analysis attached to a boundary halt.
    pub fn crypto_boundary(&self) -> Option<&'static CryptoBoundary> {
        match self {
            StepError::CryptoBoundary(boundary) => Some(*boundary),
            _ => None,
        }
    }
}

/// Shared, read-only inputs of every step.
#[derive(Clone, Copy)]
pub struct StepEnv<'a> {
    pub client: &'a dyn PortalHttpClient,
    pub config: &'a PortalConfig,
}

/// Run a single step against the context.
pub async fn execute(
    step: StepKind,
    env: StepEnv<'_>,
    ctx: &mut SessionContext,
) -> Result<StepOutcome, StepError> {
    match step {
        StepKind::Trace => Ok(trace(env).await),
        StepKind::Init => init(env, ctx).await,
        StepKind::MathChallenge => solve_math(ctx),
        StepKind::Fingerprints => Ok(generate_fingerprints(env, ctx)),
        StepKind::DeviceCheck => device_check(env, ctx).await,
        StepKind::Heartbeat => heartbeat(env).await,
        StepKind::SequenceProof => solve_sequence_proof(ctx),
        StepKind::HashChain => solve_hash_chain(ctx),
        StepKind::CryptoBoundary => crypto_boundary(),
    }
}

/// Telemetry is best effort: every failure is logged and swallowed.
async fn trace(env: StepEnv<'_>) -> StepOutcome {
    let sent = async {
        let url = Endpoint::TRACE.url(env.config)?;
        let response = env
            .client
            .post_json(&url, &json!({}), env.config.probe_timeout)
            .await?;
        Ok::<_, StepError>(response.status)
    }
    .await;

    match sent {
        Ok(status) => StepOutcome::new(format!("trace sent (status {status})")),
        Err(err) => {
            log::warn!("telemetry trace failed, continuing: {err}");
            StepOutcome::new(format!("trace failed, ignored: {err}"))
        }
    }
}

async fn init(env: StepEnv<'_>, ctx: &mut SessionContext) -> Result<StepOutcome, StepError> {
    let url = Endpoint::INIT.url(env.config)?;
    let response = env.client.get(&url, env.config.request_timeout).await?;
    let fields = require_object(&Endpoint::INIT, &response)?;

    let session_id = match fields.get("session_id") {
        Some(Value::String(id)) => id.clone(),
        Some(_) => {
            return Err(ContextError::WrongType {
                key: "session_id".into(),
                expected: "a string",
            }
            .into());
        }
        None => return Err(ContextError::MissingKey("session_id".into()).into()),
    };

    log::debug!("init issued {} fields", fields.len());
    ctx.merge_issued(fields);
    Ok(StepOutcome::new(format!("session_id: {session_id}")))
}

fn solve_math(ctx: &mut SessionContext) -> Result<StepOutcome, StepError> {
    let solution = solve_math_challenge(
        ctx.require_str("c1")?,
        ctx.require_str("c2")?,
        ctx.require_str("c3")?,
    )?;

    ctx.set_math_proof(solution.proof);
    Ok(StepOutcome::new(format!(
        "({}*{})+{} % {} = {}",
        solution.c1, solution.c2, solution.c3, MATH_MODULUS, solution.proof
    )))
}

fn generate_fingerprints(env: StepEnv<'_>, ctx: &mut SessionContext) -> StepOutcome {
    let fingerprint = env.config.device.fingerprint();
    let detail = format!(
        "{} / {} / canvas {}",
        fingerprint.webgl_vendor,
        fingerprint.webgl_renderer,
        abbreviate(&fingerprint.canvas_fingerprint, 16)
    );
    ctx.set_fingerprint(fingerprint);
    StepOutcome::new(detail)
}

#[derive(Debug, Serialize)]
struct DeviceCheckRequest<'a> {
    webgl_vendor: &'a str,
    webgl_renderer: &'a str,
    request_token: &'a str,
    math_proof: u64,
    canvas_fingerprint: &'a str,
}

/// `v_token` is read leniently: absent or non-string values become an empty
/// token rather than a failure.
async fn device_check(
    env: StepEnv<'_>,
    ctx: &mut SessionContext,
) -> Result<StepOutcome, StepError> {
    let payload = {
        let fingerprint = ctx.require_fingerprint()?;
        serde_json::to_value(DeviceCheckRequest {
            webgl_vendor: &fingerprint.webgl_vendor,
            webgl_renderer: &fingerprint.webgl_renderer,
            request_token: ctx.require_str("request_token")?,
            math_proof: ctx.require_math_proof()?,
            canvas_fingerprint: &fingerprint.canvas_fingerprint,
        })?
    };

    let url = Endpoint::DEVICE_CHECK.url(env.config)?;
    let response = env
        .client
        .post_json(&url, &payload, env.config.request_timeout)
        .await?;
    let fields = require_object(&Endpoint::DEVICE_CHECK, &response)?;

    let v_token = fields
        .get("v_token")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if v_token.is_empty() {
        log::warn!("device check response carried no v_token");
    }

    let detail = format!("v_token: {v_token}");
    ctx.set_v_token(v_token);
    Ok(StepOutcome::new(detail))
}

async fn heartbeat(env: StepEnv<'_>) -> Result<StepOutcome, StepError> {
    let url = Endpoint::HEARTBEAT.url(env.config)?;
    let response = env.client.get(&url, env.config.probe_timeout).await?;

    if response.status == 200 {
        Ok(StepOutcome::new(format!("Status: {}", response.status)))
    } else {
        Err(status_error(&Endpoint::HEARTBEAT, &response))
    }
}

fn solve_sequence_proof(ctx: &mut SessionContext) -> Result<StepOutcome, StepError> {
    let solution = solve_sequence(&ctx.require_str_array("seq")?)?;

    let values: Vec<String> = solution.values.iter().map(ToString::to_string).collect();
    let detail = format!(
        "seq=[{}] -> {}+{} = {}",
        values.join(", "),
        solution.last,
        solution.second_last,
        solution.proof
    );
    ctx.set_seq_proof(solution.proof);
    Ok(StepOutcome::new(detail))
}

fn solve_hash_chain(ctx: &mut SessionContext) -> Result<StepOutcome, StepError> {
    let seed = ctx.require_str("hc_s")?;
    let iterations = ctx.require_u64("hc_i")?;

    let proof = hash_chain(seed, iterations);
    let detail = format!("iterations={iterations} -> {}", abbreviate(&proof, 32));
    ctx.set_hash_proof(proof);
    Ok(StepOutcome::new(detail))
}

fn crypto_boundary() -> Result<StepOutcome, StepError> {
    log::warn!("cryptographic boundary reached, halting before security_verify");
    Err(StepError::CryptoBoundary(&SECURITY_VERIFY_BOUNDARY))
}

/// Successful responses must carry a non-empty JSON object.
fn require_object(
    endpoint: &Endpoint,
    response: &PortalHttpResponse,
) -> Result<Map<String, Value>, StepError> {
    if !response.is_success() {
        return Err(status_error(endpoint, response));
    }

    match response.json_object() {
        Ok(Some(fields)) if !fields.is_empty() => Ok(fields),
        Ok(_) => Err(StepError::EmptyResponse(endpoint.path)),
        Err(source) => Err(StepError::Body {
            path: endpoint.path,
            source,
        }),
    }
}

fn status_error(endpoint: &Endpoint, response: &PortalHttpResponse) -> StepError {
    StepError::HttpStatus {
        method: endpoint.method,
        path: endpoint.path,
        status: response.status,
        detail: response.error_detail(),
    }
}

fn abbreviate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let head: String = value.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::protocol::puzzles::{DecodeError, sha256_hex};

    fn seeded(fields: Value) -> SessionContext {
        let mut ctx = SessionContext::new();
        if let Value::Object(map) = fields {
            ctx.merge_issued(map);
        }
        ctx
    }

    #[test]
    fn catalogue_order_is_fixed() {
        let numbers: Vec<_> = StepKind::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, (1..=9).collect::<Vec<_>>());
        assert_eq!(StepKind::DeviceCheck.label(), "STEP 5");
        assert_eq!(StepKind::CryptoBoundary.to_string(), "Crypto Boundary");
    }

    #[test]
    fn math_step_stores_proof() {
        // 17, 23, 5
        let mut ctx = seeded(json!({"c1": "MTc=", "c2": "MjM=", "c3": "NQ=="}));
        let outcome = solve_math(&mut ctx).unwrap();
        assert_eq!(ctx.math_proof(), Some(396));
        assert_eq!(outcome.detail, "(17*23)+5 % 1000 = 396");
    }

    #[test]
    fn math_step_rejects_bad_base64_without_touching_context() {
        let mut ctx = seeded(json!({"c1": "@@not-b64@@", "c2": "MjM=", "c3": "NQ=="}));
        let err = solve_math(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            StepError::Puzzle(PuzzleError::Decode(DecodeError::Base64 { .. }))
        ));
        assert_eq!(ctx.math_proof(), None);
    }

    #[test]
    fn math_step_requires_operands() {
        let mut ctx = seeded(json!({"c1": "MTc=", "c2": "MjM="}));
        let err = solve_math(&mut ctx).unwrap_err();
        assert!(matches!(err, StepError::Context(ContextError::MissingKey(key)) if key == "c3"));
    }

    #[test]
    fn sequence_step_guards_short_sequences() {
        let mut ctx = seeded(json!({"seq": ["NQ=="]}));
        let err = solve_sequence_proof(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            StepError::Puzzle(PuzzleError::InsufficientSequence { len: 1 })
        ));
        assert_eq!(ctx.seq_proof(), None);

        let mut ctx = seeded(json!({"seq": []}));
        assert!(solve_sequence_proof(&mut ctx).is_err());
    }

    #[test]
    fn sequence_step_sums_last_two() {
        // 1, 2, 3, 5
        let mut ctx = seeded(json!({"seq": ["MQ==", "Mg==", "Mw==", "NQ=="]}));
        let outcome = solve_sequence_proof(&mut ctx).unwrap();
        assert_eq!(ctx.seq_proof(), Some(&BigDecimal::from(8_i64)));
        assert_eq!(outcome.detail, "seq=[1, 2, 3, 5] -> 5+3 = 8");
    }

    #[test]
    fn hash_chain_step_zero_iterations_keeps_seed() {
        let mut ctx = seeded(json!({"hc_s": "start", "hc_i": 0}));
        solve_hash_chain(&mut ctx).unwrap();
        assert_eq!(ctx.hash_proof(), Some("start"));
    }

    #[test]
    fn hash_chain_step_iterates() {
        let mut ctx = seeded(json!({"hc_s": "start", "hc_i": 2}));
        solve_hash_chain(&mut ctx).unwrap();
        let expected = sha256_hex(&sha256_hex("start"));
        assert_eq!(ctx.hash_proof(), Some(expected.as_str()));
    }

    #[test]
    fn hash_chain_step_rejects_malformed_inputs() {
        let mut ctx = seeded(json!({"hc_s": 12, "hc_i": 2}));
        assert!(matches!(
            solve_hash_chain(&mut ctx),
            Err(StepError::Context(ContextError::WrongType { .. }))
        ));

        let mut ctx = seeded(json!({"hc_s": "start", "hc_i": "2"}));
        assert!(matches!(
            solve_hash_chain(&mut ctx),
            Err(StepError::Context(ContextError::WrongType { .. }))
        ));
        assert_eq!(ctx.hash_proof(), None);
    }

    #[test]
    fn crypto_boundary_always_fails() {
        let err = crypto_boundary().unwrap_err();
        assert!(err.is_crypto_boundary());
        assert_eq!(err.crypto_boundary(), Some(&SECURITY_VERIFY_BOUNDARY));
        assert!(err.to_string().contains("security_verify"));
    }

    #[test]
    fn abbreviate_keeps_short_values() {
        assert_eq!(abbreviate("abc", 32), "abc");
        assert_eq!(abbreviate("abcdef", 3), "abc...");
    }
}
