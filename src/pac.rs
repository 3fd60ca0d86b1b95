//! # Peripheral memory map
//!
//! Base addresses, register offsets and bit fields for the three blocks this crate touches, taken
//! from the STM32F4 reference manual (RM0090 / RM0368). Only the registers the polled ADC flow
//! needs are described; the rest of each block is left out.
//!
//! Each block is a zero-sized marker carrying its `BASE` address and the absolute address of its
//! registers. The markers hold no state: all access goes through a
//! [`RegisterAccess`](crate::register::RegisterAccess) implementation.

/// Base address for all peripherals
pub const PERIPH_BASE: u32 = 0x4000_0000;

/// Advanced Peripheral Bus 2 (APB2)
pub const APB2PERIPH_BASE: u32 = PERIPH_BASE + 0x0001_0000;

/// Advanced High-performance Bus 1 (AHB1)
pub const AHB1PERIPH_BASE: u32 = PERIPH_BASE + 0x0002_0000;

/// Reset and clock control
pub struct RCC;

impl RCC {
    pub const BASE: u32 = AHB1PERIPH_BASE + 0x3800;

    /// AHB1 peripheral clock enable register
    pub const AHB1ENR: u32 = Self::BASE + 0x30;
    /// APB2 peripheral clock enable register
    pub const APB2ENR: u32 = Self::BASE + 0x44;
}

/// General purpose I/O port A
pub struct GPIOA;

impl GPIOA {
    pub const BASE: u32 = AHB1PERIPH_BASE;

    /// Port mode register, two bits per pin
    pub const MODER: u32 = Self::BASE;
}

/// Analog to digital converter 1
pub struct ADC1;

impl ADC1 {
    pub const BASE: u32 = APB2PERIPH_BASE + 0x2000;

    /// Status register
    pub const SR: u32 = Self::BASE;
    /// Control register 2
    pub const CR2: u32 = Self::BASE + 0x08;
    /// Regular sequence register 1 (sequence length)
    pub const SQR1: u32 = Self::BASE + 0x2C;
    /// Regular sequence register 3 (conversions 1 to 6)
    pub const SQR3: u32 = Self::BASE + 0x34;
    /// Regular data register
    pub const DR: u32 = Self::BASE + 0x4C;
}

pub mod rcc {
    bitflags::bitflags! {
        /// `RCC_AHB1ENR` clock gates
        pub struct Ahb1Enr: u32 {
            const GPIOAEN = 1 << 0;
        }
    }

    bitflags::bitflags! {
        /// `RCC_APB2ENR` clock gates
        pub struct Apb2Enr: u32 {
            const ADC1EN = 1 << 8;
        }
    }
}

pub mod gpio {
    /// Width of one pin's field in `MODER`
    pub const MODER_FIELD_WIDTH: u8 = 2;
    /// Mask of one pin's field in `MODER`, before shifting
    pub const MODER_FIELD_MASK: u32 = 0b11;

    /// `MODER` field offset for `pin`
    #[inline(always)]
    pub const fn moder_shift(pin: u8) -> u8 {
        pin * MODER_FIELD_WIDTH
    }
}

pub mod adc {
    bitflags::bitflags! {
        /// `ADC_SR` flags
        pub struct Sr: u32 {
            /// Regular channel end of conversion
            const EOC = 1 << 1;
            /// Regular channel start
            const STRT = 1 << 4;
        }
    }

    bitflags::bitflags! {
        /// `ADC_CR2` control bits used by the polled flow
        pub struct Cr2: u32 {
            /// A/D converter ON / OFF
            const ADON = 1 << 0;
            /// Start conversion of regular channels
            const SWSTART = 1 << 30;
        }
    }

    /// `SQR1.L`: regular sequence length minus one
    pub const SQR1_L_SHIFT: u8 = 20;
    pub const SQR1_L_MASK: u32 = 0b1111 << SQR1_L_SHIFT;

    /// `SQR3.SQ1`: first conversion in the regular sequence
    pub const SQR3_SQ1_MASK: u32 = 0b1_1111;

    /// `DR.DATA`: regular conversion result, alignment set by `CR2.ALIGN`
    pub const DR_DATA_MASK: u32 = 0xFFFF;
}
