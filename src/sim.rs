//! # Simulated register bus
//!
//! A [`RegisterAccess`] implementation backed by ordinary memory, for running the drivers on the
//! host. Registers read as their reset value (`0`) until written.
//!
//! On top of plain storage the bus models the few hardware side effects the ADC flow relies on:
//!
//! - writing `ADC_CR2` with `SWSTART` set while `ADON` is set starts a conversion and raises
//!   `ADC_SR.STRT`. `SWSTART` is cleared again as soon as the conversion starts, so rewriting
//!   `ADC_CR2` later does not start another one.
//! - while a conversion is running, each read of `ADC_SR` counts as one poll. After the configured
//!   number of polls have seen `EOC` clear, the next read sets `EOC`.
//! - reading `ADC_DR` clears `EOC`.
//!
//! Every access is also recorded in a fixed size journal so tests can check ordering.
//!
//! Both the register map and the journal have a fixed capacity. Running out of either panics
//! instead of silently losing a register or an access; call [`SimBus::clear_journal`] in long
//! running tests.

use heapless::{LinearMap, Vec};

use crate::pac::{adc, ADC1};
use crate::register::RegisterAccess;

const REGISTERS: usize = 16;
const JOURNAL: usize = 64;

/// One recorded register access
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read { address: u32, value: u32 },
    Write { address: u32, value: u32 },
}

impl Access {
    pub fn address(&self) -> u32 {
        match *self {
            Access::Read { address, .. } | Access::Write { address, .. } => address,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Access::Write { .. })
    }
}

/// In-memory stand-in for the peripheral memory map
#[derive(Debug, Default)]
pub struct SimBus {
    registers: LinearMap<u32, u32, REGISTERS>,
    journal: Vec<Access, JOURNAL>,
    /// Polls of `ADC_SR` left before the running conversion completes
    converting: Option<u32>,
    eoc_after: u32,
    data: u32,
    polls: u32,
    conversions: u32,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `ADC_SR` reads a conversion takes before `EOC` is raised
    pub fn eoc_after(mut self, polls: u32) -> Self {
        self.eoc_after = polls;
        self
    }

    /// Value the converter puts in `ADC_DR` when a conversion completes
    pub fn data(mut self, data: u32) -> Self {
        self.data = data;
        self
    }

    /// Register value without any side effect
    pub fn peek(&self, address: u32) -> u32 {
        self.registers.get(&address).copied().unwrap_or(0)
    }

    /// Sets a register without any side effect and without journaling
    ///
    /// # Panics
    ///
    /// If `address` is new and the register map is full.
    pub fn poke(&mut self, address: u32, value: u32) {
        if self.registers.insert(address, value).is_err() {
            panic!("simulated register map is full ({} registers)", REGISTERS);
        }
    }

    /// Accesses recorded since creation or since the last [`SimBus::clear_journal`]
    pub fn journal(&self) -> &[Access] {
        &self.journal
    }

    /// Writes recorded in the journal, in order
    pub fn writes(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.journal.iter().filter_map(|a| match *a {
            Access::Write { address, value } => Some((address, value)),
            Access::Read { .. } => None,
        })
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Reads of `ADC_SR` made so far
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Conversions started so far
    pub fn conversions(&self) -> u32 {
        self.conversions
    }

    /// `true` while a started conversion has not raised `EOC` yet
    pub fn is_converting(&self) -> bool {
        self.converting.is_some()
    }

    fn record(&mut self, access: Access) {
        if self.journal.push(access).is_err() {
            panic!(
                "simulated bus journal is full ({} accesses), clear it first",
                JOURNAL
            );
        }
    }

    fn start_conversion(&mut self) {
        self.conversions += 1;
        self.converting = Some(self.eoc_after);
        let cr2 = self.peek(ADC1::CR2) & !adc::Cr2::SWSTART.bits();
        self.poke(ADC1::CR2, cr2);
        let sr = self.peek(ADC1::SR) | adc::Sr::STRT.bits();
        self.poke(ADC1::SR, sr);
    }

    fn poll_status(&mut self) {
        self.polls += 1;
        match self.converting {
            Some(0) => {
                self.converting = None;
                let sr = self.peek(ADC1::SR) | adc::Sr::EOC.bits();
                self.poke(ADC1::SR, sr);
                let data = self.data;
                self.poke(ADC1::DR, data);
            }
            Some(left) => self.converting = Some(left - 1),
            None => {}
        }
    }
}

impl RegisterAccess for SimBus {
    fn read(&mut self, address: u32) -> u32 {
        if address == ADC1::SR {
            self.poll_status();
        }
        let value = self.peek(address);
        if address == ADC1::DR {
            let sr = self.peek(ADC1::SR) & !adc::Sr::EOC.bits();
            self.poke(ADC1::SR, sr);
        }
        self.record(Access::Read { address, value });
        value
    }

    fn write(&mut self, address: u32, value: u32) {
        self.poke(address, value);
        self.record(Access::Write { address, value });

        if address == ADC1::CR2 {
            let cr2 = adc::Cr2::from_bits_truncate(value);
            if cr2.contains(adc::Cr2::ADON | adc::Cr2::SWSTART) {
                self.start_conversion();
            }
        }
    }
}
