//! Park-Miller minimal standard generator.
//!
//! Every randomized step in training draws from this generator, so a seed
//! reproduces a forest bit-for-bit across implementations that share the
//! recurrence below.

const MODULUS: i64 = 2_147_483_647;
const MULTIPLIER: i64 = 16_807;

/// Seeded Lehmer generator producing uniform draws in `[0, 1)`.
///
/// The state is private to one instance. Cloning forks the stream.
#[derive(Debug, Clone)]
pub struct ParkMiller {
    state: i64,
}

impl ParkMiller {
    /// Create a generator from a seed.
    ///
    /// The seed is reduced modulo 2147483647 (remainder keeps the seed's
    /// sign). A non-positive remainder is shifted up by 2147483646.
    #[must_use]
    pub fn new(seed: i64) -> Self {
        let mut state = seed % MODULUS;
        if state <= 0 {
            state += MODULUS - 1;
        }
        Self { state }
    }

    /// Advance the state and return a draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Draw an index uniformly from `0..len` using exactly one draw.
    ///
    /// `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index requires a non-empty range");
        (self.next_f64() * len as f64).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::ParkMiller;

    #[test]
    fn first_draw_seed_one() {
        // s1 = 16807
        let mut rng = ParkMiller::new(1);
        let expected = 16_806.0 / 2_147_483_646.0;
        assert_eq!(rng.next_f64(), expected);
    }

    #[test]
    fn ten_thousandth_state_matches_reference() {
        // Park & Miller's published check: seed 1, 10000 steps -> 1043618065.
        let mut rng = ParkMiller::new(1);
        let mut last = 0.0;
        for _ in 0..10_000 {
            last = rng.next_f64();
        }
        assert_eq!(last, (1_043_618_065.0 - 1.0) / 2_147_483_646.0);
    }

    #[test]
    fn zero_seed_is_normalized() {
        let mut zero = ParkMiller::new(0);
        let mut top = ParkMiller::new(2_147_483_646);
        for _ in 0..5 {
            assert_eq!(zero.next_f64(), top.next_f64());
        }
    }

    #[test]
    fn negative_seed_is_normalized() {
        // -5 % m = -5, shifted to 2147483641.
        let mut neg = ParkMiller::new(-5);
        let mut pos = ParkMiller::new(2_147_483_641);
        assert_eq!(neg.next_f64(), pos.next_f64());
    }

    #[test]
    fn seed_reduced_modulo() {
        let mut a = ParkMiller::new(42);
        let mut b = ParkMiller::new(42 + 2_147_483_647);
        for _ in 0..5 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn draws_in_unit_interval() {
        let mut rng = ParkMiller::new(42);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "draw {x} out of range");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ParkMiller::new(2024);
        let mut b = ParkMiller::new(2024);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn next_index_in_range() {
        let mut rng = ParkMiller::new(7);
        for _ in 0..1_000 {
            assert!(rng.next_index(18) < 18);
        }
    }
}
