//! # General Purpose I/Os
//!
//! Port A pins and the 2-bit `MODER` field that selects what each pin does. Pins are zero-sized
//! markers named after the pin, so the pin an ADC channel samples is visible in the type:
//!
//! ```rust,ignore
//! use stm32f4_adc_poll::gpio::PA1;
//! use stm32f4_adc_poll::sim::SimBus;
//!
//! let mut regs = SimBus::new();
//! let pa1 = PA1::new().into_analog(&mut regs);
//! ```
//!
//! The port's clock must be running (see [`Enable`](crate::rcc::Enable)) before a mode change has
//! any effect on real hardware.

use crate::pac::{gpio::moder_shift, gpio::MODER_FIELD_MASK, GPIOA};
use crate::register::RegisterAccess;

/// Pin modes, as encoded in `GPIOx_MODER`
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Input (reset state)
    Input = 0b00,
    /// General purpose output
    Output = 0b01,
    /// Alternate function
    Alternate = 0b10,
    /// Analog. The digital input and output stages are disconnected
    Analog = 0b11,
}

impl Mode {
    fn from_field(bits: u32) -> Self {
        match bits & MODER_FIELD_MASK {
            0b00 => Mode::Input,
            0b01 => Mode::Output,
            0b10 => Mode::Alternate,
            _ => Mode::Analog,
        }
    }
}

pub trait PinExt {
    /// Return pin number
    fn pin_id(&self) -> u8;
    /// Return port number
    fn port_id(&self) -> u8;
}

/// Pin `N` of port A
#[derive(Debug)]
pub struct PA<const N: u8> {
    _0: (),
}

pub type PA0 = PA<0>;
pub type PA1 = PA<1>;
pub type PA2 = PA<2>;
pub type PA3 = PA<3>;
pub type PA4 = PA<4>;
pub type PA5 = PA<5>;
pub type PA6 = PA<6>;
pub type PA7 = PA<7>;

impl<const N: u8> PA<N> {
    const CHECK: () = assert!(N < 16, "port A has 16 pins");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::CHECK;
        PA { _0: () }
    }

    /// Configures the pin to operate as an analog input pin
    pub fn into_analog<A: RegisterAccess>(self, regs: &mut A) -> Self {
        set_mode(regs, N, Mode::Analog);
        self
    }

    /// Current mode of the pin
    pub fn mode<A: RegisterAccess>(&self, regs: &mut A) -> Mode {
        mode(regs, N)
    }
}

impl<const N: u8> PinExt for PA<N> {
    #[inline(always)]
    fn pin_id(&self) -> u8 {
        N
    }
    #[inline(always)]
    fn port_id(&self) -> u8 {
        0
    }
}

/// Writes `mode` into the `MODER` field of port A pin `pin`, leaving the other pins alone
///
/// `pin` must be below 16.
pub(crate) fn set_mode<A: RegisterAccess>(regs: &mut A, pin: u8, mode: Mode) {
    let offset = moder_shift(pin);
    regs.modify(GPIOA::MODER, |r| {
        (r & !(MODER_FIELD_MASK << offset)) | ((mode as u32) << offset)
    });
}

/// Reads the `MODER` field of port A pin `pin`
pub(crate) fn mode<A: RegisterAccess>(regs: &mut A, pin: u8) -> Mode {
    Mode::from_field(regs.read(GPIOA::MODER) >> moder_shift(pin))
}
