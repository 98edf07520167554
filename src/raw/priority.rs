/// Source of node priorities: Marsaglia's 32-bit xorshift.
///
/// Every map owns one of these, so the shape of a map depends only on its own seed and
/// insertion history.
#[derive(Clone, Debug)]
pub(crate) struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub(crate) const DEFAULT_SEED: u32 = 2_463_534_242;

    /// # Panics
    ///
    /// Panics if `seed` is zero; zero is a fixed point of the recurrence.
    pub(crate) const fn new(seed: u32) -> Self {
        assert!(seed != 0, "`XorShift32::new()` - `seed` must be nonzero!");
        Self { state: seed }
    }

    #[inline]
    pub(crate) fn next_priority(&mut self) -> u32 {
        let mut y = self.state;
        y ^= y << 13;
        y ^= y >> 17;
        y ^= y << 5;
        self.state = y;
        y
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}
