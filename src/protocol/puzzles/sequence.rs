//! Sequence recurrence: the next term is the sum of the last two.

use bigdecimal::BigDecimal;

use super::{PuzzleError, decode_b64_bigint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSolution {
    pub values: Vec<BigDecimal>,
    pub last: BigDecimal,
    pub second_last: BigDecimal,
    pub proof: BigDecimal,
}

/// Sum of the final two elements.
pub fn sequence_proof(values: &[BigDecimal]) -> Result<BigDecimal, PuzzleError> {
    let (second_last, last) = last_two(values)?;
    Ok(second_last + last)
}

fn last_two(values: &[BigDecimal]) -> Result<(&BigDecimal, &BigDecimal), PuzzleError> {
    match values {
        [.., second_last, last] => Ok((second_last, last)),
        _ => Err(PuzzleError::InsufficientSequence { len: values.len() }),
    }
}

/// Decode every element, then compute the proof.
pub fn solve_sequence<S: AsRef<str>>(encoded: &[S]) -> Result<SequenceSolution, PuzzleError> {
    let values = encoded
        .iter()
        .map(|item| decode_b64_bigint(item.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let (second_last, last) = last_two(&values)?;
    let (second_last, last) = (second_last.clone(), last.clone());
    Ok(SequenceSolution {
        proof: &second_last + &last,
        values,
        last,
        second_last,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn big(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    fn ints(values: &[i64]) -> Vec<BigDecimal> {
        values.iter().copied().map(BigDecimal::from).collect()
    }

    #[test]
    fn sums_last_two_elements() {
        assert_eq!(sequence_proof(&ints(&[1, 1, 2, 3, 5, 8])).unwrap(), big("13"));
        assert_eq!(sequence_proof(&ints(&[4, 9])).unwrap(), big("13"));
        assert_eq!(sequence_proof(&ints(&[-3, 1])).unwrap(), big("-2"));
    }

    #[test]
    fn short_sequences_are_rejected() {
        assert_eq!(
            sequence_proof(&[]),
            Err(PuzzleError::InsufficientSequence { len: 0 })
        );
        assert_eq!(
            sequence_proof(&ints(&[7])),
            Err(PuzzleError::InsufficientSequence { len: 1 })
        );
    }

    #[test]
    fn extreme_values_do_not_overflow() {
        let proof = sequence_proof(&ints(&[i64::MAX, i64::MAX])).unwrap();
        assert_eq!(proof, big("18446744073709551614"));
    }

    #[test]
    fn decodes_before_summing() {
        // 2, 3, 5
        let solution = solve_sequence(&["Mg==", "Mw==", "NQ=="]).unwrap();
        assert_eq!(solution.values, ints(&[2, 3, 5]));
        assert_eq!((solution.second_last, solution.last), (big("3"), big("5")));
        assert_eq!(solution.proof, big("8"));
    }

    #[test]
    fn elements_beyond_i64_are_summed_exactly() {
        // 9223372036854775808 (i64::MAX + 1), 2^64
        let solution =
            solve_sequence(&["OTIyMzM3MjAzNjg1NDc3NTgwOA==", "MTg0NDY3NDQwNzM3MDk1NTE2MTY="])
                .unwrap();
        assert_eq!(solution.proof, big("27670116110564327424"));
    }

    #[test]
    fn decode_errors_win_over_length_checks() {
        let err = solve_sequence(&["???"]).unwrap_err();
        assert!(matches!(err, PuzzleError::Decode(_)));
    }
}
