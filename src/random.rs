use std::ops::Range;

///
/// Source of randomness for [`crate::ring::RingCtx::randtest()`].
///
/// Random elements are meant for testing, so the generator is a small,
/// seedable and reproducible one.
///
pub struct RandState {
    rng: oorandom::Rand64
}

impl RandState {

    pub fn new(seed: u128) -> Self {
        RandState { rng: oorandom::Rand64::new(seed) }
    }

    pub fn rand_u64(&mut self) -> u64 {
        self.rng.rand_u64()
    }

    pub fn rand_i64(&mut self) -> i64 {
        self.rng.rand_i64()
    }

    ///
    /// Returns a uniform value in `range`, which must be nonempty.
    ///
    pub fn rand_range(&mut self, range: Range<u64>) -> u64 {
        assert!(range.start < range.end);
        self.rng.rand_range(range)
    }

    pub fn rand_float(&mut self) -> f64 {
        self.rng.rand_float()
    }

    ///
    /// Returns `true` with probability `1/n`.
    ///
    pub fn one_in(&mut self, n: u64) -> bool {
        self.rand_range(0..n) == 0
    }

    ///
    /// Returns a random integer of at most `bits` bits, drawn such that small values
    /// and values close to the bound both appear frequently. This is usually more
    /// useful for finding edge cases than a uniform distribution.
    ///
    pub fn rand_test_i64(&mut self, bits: u32) -> i64 {
        assert!(bits > 0 && bits < 64);
        let bound = 1u64 << bits;
        let magnitude = match self.rand_range(0..4) {
            0 => self.rand_range(0..4),
            1 => bound - 1 - self.rand_range(0..4),
            _ => self.rand_range(0..bound)
        };
        if self.one_in(2) { -(magnitude as i64) } else { magnitude as i64 }
    }
}

impl Default for RandState {

    fn default() -> Self {
        RandState::new(1)
    }
}

#[test]
fn test_reproducible() {
    let mut a = RandState::new(7);
    let mut b = RandState::new(7);
    for _ in 0..10 {
        assert_eq!(a.rand_u64(), b.rand_u64());
    }
}

#[test]
fn test_rand_test_i64_bounds() {
    let mut state = RandState::new(3);
    for _ in 0..1000 {
        let x = state.rand_test_i64(10);
        assert!(x.abs() < 1024);
    }
}
