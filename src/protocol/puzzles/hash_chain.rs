//! Iterated SHA-256 over hex digests.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Hash `seed` `iterations` times, feeding each hex digest into the next round.
///
/// Zero iterations return the seed unchanged.
pub fn hash_chain(seed: &str, iterations: u64) -> String {
    let mut current = seed.to_string();
    for _ in 0..iterations {
        current = sha256_hex(&current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn zero_iterations_return_seed() {
        assert_eq!(hash_chain("seed-value", 0), "seed-value");
    }

    #[test]
    fn single_iteration_is_one_digest() {
        assert_eq!(hash_chain("abc", 1), sha256_hex("abc"));
    }

    #[test]
    fn chaining_is_compositional() {
        for n in [0u64, 1, 2, 7, 25] {
            let extended = sha256_hex(&hash_chain("s33d", n));
            assert_eq!(extended, hash_chain("s33d", n + 1), "n = {n}");
        }
    }

    #[test]
    fn rounds_hash_hex_text_not_raw_bytes() {
        let twice = sha256_hex(&sha256_hex("abc"));
        assert_eq!(hash_chain("abc", 2), twice);
    }
}
