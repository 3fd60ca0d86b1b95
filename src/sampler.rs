//! Sampling loop
//!
//! Trigger, wait for the result, hand it over, pause, repeat. The pause is a plain busy-wait:
//! nothing else runs on the core, so there is nothing to yield to.

use crate::adc::{Adc, Error};
use crate::register::RegisterAccess;

/// Number of `nop`s between two samples in the firmware loop
pub const DELAY_ITERATIONS: u32 = 100_000;

/// Wait between two samples
pub trait Pause {
    fn pause(&mut self);
}

/// Busy-wait of a fixed number of `nop` instructions
///
/// The wall clock duration depends on the core clock and on flash wait states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NopLoop {
    iterations: u32,
}

impl NopLoop {
    pub const fn new(iterations: u32) -> Self {
        NopLoop { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for NopLoop {
    fn default() -> Self {
        Self::new(DELAY_ITERATIONS)
    }
}

impl Pause for NopLoop {
    #[inline]
    fn pause(&mut self) {
        for _ in 0..self.iterations {
            cortex_m::asm::nop();
        }
    }
}

impl<F: FnMut()> Pause for F {
    fn pause(&mut self) {
        self()
    }
}

/// Polled sampling loop over an initialized [`Adc`]
pub struct Sampler<A: RegisterAccess, P: Pause> {
    adc: Adc<A>,
    pause: P,
}

impl<A: RegisterAccess, P: Pause> Sampler<A, P> {
    pub fn new(adc: Adc<A>, pause: P) -> Self {
        Sampler { adc, pause }
    }

    /// Runs one cycle: trigger, wait for the result, pause.
    ///
    /// The pause happens whether or not the conversion finished in time.
    pub fn step(&mut self) -> Result<u32, Error> {
        let result = self.adc.convert();
        #[cfg(feature = "defmt")]
        match &result {
            Ok(raw) => defmt::trace!("sample {=u32}", *raw),
            Err(e) => defmt::warn!("sample dropped: {}", e),
        }
        self.pause.pause();
        result
    }

    /// Samples forever, passing every completed conversion to `consumer`.
    ///
    /// Cycles that end in [`Error::ConversionTimeout`] are skipped.
    pub fn run<F>(mut self, mut consumer: F) -> !
    where
        F: FnMut(u32),
    {
        loop {
            if let Ok(raw) = self.step() {
                consumer(raw);
            }
        }
    }

    pub fn adc(&mut self) -> &mut Adc<A> {
        &mut self.adc
    }

    pub fn release(self) -> (Adc<A>, P) {
        (self.adc, self.pause)
    }
}
