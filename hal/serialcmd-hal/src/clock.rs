//! Time abstractions

/// Millisecond clock
pub trait Clock {
    /// Milliseconds since the board started, wrapping at `u32::MAX`
    fn millis(&self) -> u32;

    /// Busy-wait for the given number of milliseconds
    ///
    /// The serve loop is single-threaded, so nothing else runs meanwhile.
    fn delay_ms(&mut self, ms: u32);

    /// Milliseconds elapsed since an earlier [`Clock::millis`] reading
    fn elapsed_since(&self, start: u32) -> u32 {
        self.millis().wrapping_sub(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Frozen(u32);

    impl Clock for Frozen {
        fn millis(&self) -> u32 {
            self.0
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0 = self.0.wrapping_add(ms);
        }
    }

    #[test]
    fn test_elapsed_wraps() {
        let mut clock = Frozen(u32::MAX - 4);
        let start = clock.millis();
        clock.delay_ms(10);
        assert_eq!(clock.elapsed_since(start), 10);
        assert_eq!(clock.millis(), 5);
    }
}
