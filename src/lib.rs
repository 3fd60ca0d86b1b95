//! # Polled ADC sampling for the STM32F4 family of microcontrollers
//!
//! Configures ADC1 to convert a single pin of port A and polls for the results, with no
//! interrupts, no DMA and no operating system.
//!
//! All register access goes through the [`RegisterAccess`](register::RegisterAccess) trait. On the
//! chip it is implemented by [`Mmio`](register::Mmio), which performs volatile accesses at the
//! reference manual addresses; on the host the `sim` feature provides
//! [`SimBus`](sim::SimBus), a simulated register file that also models the converter's
//! completion flag.
//!
//! # Usage
//!
//! ## Building the firmware
//!
//! Enable the "rt" Cargo feature and build for a Cortex-M4F target:
//!
//! ```text
//! cargo build --release --features rt --target thumbv7em-none-eabihf
//! ```
//!
//! ## Usage example
//!
//! ```rust,ignore
//! #![no_std]
//! #![no_main]
//!
//! use panic_halt as _;
//!
//! use cortex_m_rt::entry;
//! use stm32f4_adc_poll::{
//!     adc::{Adc, Config},
//!     register::Mmio,
//!     sampler::{NopLoop, Sampler},
//! };
//!
//! #[entry]
//! fn main() -> ! {
//!     let regs = Mmio::take().unwrap();
//!
//!     // Enables the port and ADC clocks, puts PA1 in analog mode and powers ADC1 up
//!     let adc = Adc::new(regs, Config::default());
//!
//!     Sampler::new(adc, NopLoop::default()).run(|raw| {
//!         // use the reading
//!     })
//! }
//! ```
//!
//! # Cargo features
//!
//! - `rt`: builds the `adc_poll` firmware binary
//! - `defmt`: `defmt::Format` for the public types, and log points in the drivers
//! - `sim`: the simulated register bus, for host-side tests of code built on this crate

#![cfg_attr(not(test), no_std)]

pub mod adc;
pub mod gpio;
pub mod pac;
pub mod prelude;
pub mod rcc;
pub mod register;
pub mod sampler;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

mod sealed {
    pub trait Sealed {}
}
pub(crate) use sealed::Sealed;
