//! Random source adapter.
//!
//! Wraps any [`rand::Rng`] behind [`RandomPort`].  Firmware uses the
//! thread-local generator (seeded from the ESP32 hardware RNG through
//! `getrandom`); tests use a seeded `StdRng`.

use rand::Rng;

use crate::app::ports::RandomPort;

pub struct RandAdapter<R> {
    rng: R,
}

impl<R: Rng> RandAdapter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandAdapter<rand::rngs::ThreadRng> {
    pub fn from_thread_rng() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> RandomPort for RandAdapter<R> {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
