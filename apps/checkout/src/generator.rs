//! Random purchase strings for load and rejection testing.
//!
//! Letters are drawn uniformly from the first `alphabet_len` product codes.
//! With the default alphabet of six, `E` and `F` fall outside the sample
//! policy and exercise the rejection path.

use rand::Rng;

use crate::config::MAX_ALPHABET;

/// Generates a purchase of `len` letters drawn from `'A'` onward.
///
/// `alphabet_len` is clamped to `1..=26`.
pub fn generate_purchase<R: Rng + ?Sized>(rng: &mut R, alphabet_len: usize, len: usize) -> String {
    let alphabet = alphabet_len.clamp(1, MAX_ALPHABET) as u8;
    (0..len)
        .map(|_| char::from(b'A' + rng.gen_range(0..alphabet)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let purchase = generate_purchase(&mut rng, 6, 200);

        assert_eq!(purchase.len(), 200);
        assert!(purchase.chars().all(|c| ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_same_seed_same_purchase() {
        let first = generate_purchase(&mut StdRng::seed_from_u64(42), 4, 64);
        let second = generate_purchase(&mut StdRng::seed_from_u64(42), 4, 64);
        assert_eq!(first, second);
    }

    #[test]
    fn test_alphabet_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_purchase(&mut rng, 0, 20).chars().all(|c| c == 'A'));
        assert!(generate_purchase(&mut rng, 99, 500)
            .chars()
            .all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_empty_purchase() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(generate_purchase(&mut rng, 6, 0), "");
    }

    #[test]
    fn test_generated_purchase_parses() {
        let mut rng = rand::thread_rng();
        let purchase = generate_purchase(&mut rng, 26, 100);
        assert!(tally_core::validation::parse_purchase(&purchase).is_ok());
    }
}
