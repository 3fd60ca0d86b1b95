//! # Reset & Control Clock
//!
//! Only peripheral clock gating is handled here; the system clock is left at its reset
//! configuration (HSI, no prescalers).

use crate::pac::RCC;
use crate::register::RegisterAccess;

mod enable;

/// Bus clock gate register
pub trait BusEnable: crate::Sealed {
    /// Address of the bus' peripheral clock enable register
    const ENR: u32;
}

/// AMBA High-performance Bus 1 (AHB1) registers
pub struct AHB1 {
    _0: (),
}

impl crate::Sealed for AHB1 {}
impl BusEnable for AHB1 {
    const ENR: u32 = RCC::AHB1ENR;
}

/// Advanced Peripheral Bus 2 (APB2) registers
pub struct APB2 {
    _0: (),
}

impl crate::Sealed for APB2 {}
impl BusEnable for APB2 {
    const ENR: u32 = RCC::APB2ENR;
}

/// Bus associated to peripheral
pub trait RccBus: crate::Sealed {
    /// Bus type;
    type Bus: BusEnable;
}

/// Enable/disable peripheral
pub trait Enable: RccBus {
    /// Opens the peripheral's clock gate.
    ///
    /// Until this is done, writes to the peripheral's registers are ignored by the hardware.
    fn enable<A: RegisterAccess>(regs: &mut A);
    fn disable<A: RegisterAccess>(regs: &mut A);
    fn is_enabled<A: RegisterAccess>(regs: &mut A) -> bool;
}
