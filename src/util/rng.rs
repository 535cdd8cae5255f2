// Copyright (c) 2024 Mike Tsao

//! Provides the random-number generator behind parameter jitter.

use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// A pseudorandom number generator (PRNG) for jittering parameter values. It
/// doesn't need to be cryptographically secure, but it does need to be
/// reproducible in tests, so it can be created from a fixed seed.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        match Self::generate_seed() {
            Ok(seed) => Self::new_with_seed(seed),
            Err(e) => {
                log::warn!("OS entropy unavailable ({e}); falling back to a fixed seed");
                Self::new_with_seed(0x5eed)
            }
        }
    }
}
#[allow(missing_docs)]
impl Rng {
    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing test failures.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Creates a seed from the operating system's entropy source.
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    /// Returns a value uniformly distributed between `low` and `high`. The
    /// bounds may be given in either order, and equal bounds return that
    /// bound.
    pub fn rand_between(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.rand_float()
    }

    delegate! {
        to self.0 {
            pub fn rand_u64(&mut self) -> u64;
            pub fn rand_float(&mut self) -> f64;
        }
    }
}
