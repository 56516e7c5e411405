//! Arithmetic challenge: `((c1 * c2) + c3) mod 1000`.
//!
//! Operands may exceed any machine word. Only their residues matter, so each
//! one is reduced from its decimal text before the formula is applied.

use super::{PuzzleError, decode_b64_digits};

pub const MATH_MODULUS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSolution {
    /// Decimal text of the decoded operands.
    pub c1: String,
    pub c2: String,
    pub c3: String,
    pub proof: u64,
}

/// Computes the proof with a 128-bit intermediate, so no input overflows.
pub fn math_proof(c1: u64, c2: u64, c3: u64) -> u64 {
    let product = u128::from(c1) * u128::from(c2);
    let sum = product + u128::from(c3);
    (sum % u128::from(MATH_MODULUS)) as u64
}

/// `digits mod 1000`, folded one decimal digit at a time.
fn residue(digits: &str) -> u64 {
    digits.bytes().fold(0, |acc, digit| {
        (acc * 10 + u64::from(digit - b'0')) % MATH_MODULUS
    })
}

/// Decode the three base64 operands and solve the challenge.
pub fn solve_math_challenge(c1: &str, c2: &str, c3: &str) -> Result<MathSolution, PuzzleError> {
    let c1 = decode_b64_digits(c1)?;
    let c2 = decode_b64_digits(c2)?;
    let c3 = decode_b64_digits(c3)?;

    let proof = math_proof(residue(&c1), residue(&c2), residue(&c3));
    Ok(MathSolution { c1, c2, c3, proof })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::puzzles::DecodeError;

    #[test]
    fn matches_reference_formula() {
        assert_eq!(math_proof(12, 34, 56), (12 * 34 + 56) % 1000);
        assert_eq!(math_proof(999, 999, 999), (999 * 999 + 999) % 1000);
    }

    #[test]
    fn zero_operand_reduces_to_c3() {
        assert_eq!(math_proof(0, 123_456, 1_234), 234);
    }

    #[test]
    fn large_operands_do_not_overflow() {
        let expected = (u128::from(u64::MAX) * u128::from(u64::MAX) + u128::from(u64::MAX)) % 1000;
        assert_eq!(u128::from(math_proof(u64::MAX, u64::MAX, u64::MAX)), expected);
    }

    #[test]
    fn residue_of_long_decimal_text() {
        assert_eq!(residue("0"), 0);
        assert_eq!(residue("18446744073709551615"), 615);
        assert_eq!(residue("1000000000000000000000000"), 0);
        assert_eq!(residue("000123"), 123);
    }

    #[test]
    fn solves_encoded_operands() {
        // 17, 23, 5
        let solution = solve_math_challenge("MTc=", "MjM=", "NQ==").unwrap();
        assert_eq!(
            (solution.c1.as_str(), solution.c2.as_str(), solution.c3.as_str()),
            ("17", "23", "5")
        );
        assert_eq!(solution.proof, 396);
    }

    #[test]
    fn operands_beyond_u64_are_solved() {
        // 2^64, 1, 0
        let solution = solve_math_challenge("MTg0NDY3NDQwNzM3MDk1NTE2MTY=", "MQ==", "MA==").unwrap();
        assert_eq!(solution.c1, "18446744073709551616");
        assert_eq!(solution.proof, 616);

        // 2^65 * 2^64 + 10^24
        let solution = solve_math_challenge(
            "MzY4OTM0ODgxNDc0MTkxMDMyMzI=",
            "MTg0NDY3NDQwNzM3MDk1NTE2MTY=",
            "MTAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMA==",
        )
        .unwrap();
        assert_eq!(solution.proof, (232 * 616) % 1000);
    }

    #[test]
    fn negative_operands_are_rejected() {
        // "-7"
        let err = solve_math_challenge("LTc=", "MQ==", "MA==").unwrap_err();
        assert!(matches!(err, PuzzleError::Decode(DecodeError::NotAnInteger { .. })));
    }

    #[test]
    fn bad_operand_is_a_decode_error() {
        let err = solve_math_challenge("%%%", "MjM=", "NQ==").unwrap_err();
        assert!(matches!(err, PuzzleError::Decode(DecodeError::Base64 { .. })));
    }
}
