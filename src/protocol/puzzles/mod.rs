//! Pure solvers for the puzzles issued by the portal's init payload.
//!
//! None of these perform I/O; the step layer feeds them context values and
//! stores what they return.

pub mod encoding;
pub mod hash_chain;
pub mod math;
pub mod sequence;

use thiserror::Error;

pub use encoding::{DecodeError, decode_b64_bigint, decode_b64_digits};
pub use hash_chain::{hash_chain, sha256_hex};
pub use math::{MATH_MODULUS, MathSolution, math_proof, solve_math_challenge};
pub use sequence::{SequenceSolution, sequence_proof, solve_sequence};

/// Failures produced while solving a puzzle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("sequence needs at least two elements, got {len}")]
    InsufficientSequence { len: usize },
}
