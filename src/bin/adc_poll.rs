//! Samples PA1 on ADC1 forever.
//!
//! The latest reading is kept in `last` so it can be inspected with a debugger.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

use panic_halt as _;

use cortex_m_rt::entry;
use stm32f4_adc_poll::{
    adc::{Adc, Config},
    register::Mmio,
    sampler::{NopLoop, Sampler},
};

#[entry]
fn main() -> ! {
    let regs = Mmio::take().unwrap();

    let adc = Adc::new(regs, Config::default());

    let mut last: u32 = 0;
    Sampler::new(adc, NopLoop::default()).run(|raw| {
        last = raw;
        core::hint::black_box(&last);
    })
}
