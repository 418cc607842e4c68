//! Injected randomness (colour assignment and similar cosmetic choices).

use rand::Rng;

/// Picks an index in `0..bound`.
pub trait RandomSource {
    fn pick(&mut self, bound: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick(&mut self, bound: usize) -> usize {
        (**self).pick(bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick(&mut self, bound: usize) -> usize {
        (**self).pick(bound)
    }
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Deterministic round-robin source: 0, 1, 2, ... wrapped to `bound`.
#[derive(Debug, Default, Clone)]
pub struct CyclingRandom {
    next: usize,
}

impl CyclingRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: usize) -> Self {
        Self { next }
    }
}

impl RandomSource for CyclingRandom {
    fn pick(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        let value = self.next % bound;
        self.next = self.next.wrapping_add(1);
        value
    }
}
