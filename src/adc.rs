//! # API for the Analog to Digital converter
//!
//! Single channel, software triggered, polled conversions on ADC1. One pin of port A is set to
//! analog mode and placed at position 1 of a regular sequence of length 1; each conversion is
//! started by `SWSTART` and its completion observed by polling `SR.EOC`.
//!
//! ```rust,ignore
//! let mut adc = Adc::new(regs, Config::default());
//! loop {
//!     adc.trigger_conversion();
//!     let raw = adc.read_result()?;
//! }
//! ```
//!
//! By default [`Adc::read_result`] waits for `EOC` forever, so a converter that never finishes
//! (clock gated off, `ADON` cleared) hangs the caller. Use [`PollLimit::Polls`] to bound the wait
//! instead.

use core::convert::Infallible;

use embedded_hal_02::adc::{Channel, OneShot};

use crate::gpio::{self, Mode};
use crate::pac::adc::{Cr2, Sr, DR_DATA_MASK, SQR1_L_MASK, SQR1_L_SHIFT, SQR3_SQ1_MASK};
use crate::pac::{ADC1, GPIOA};
use crate::rcc::Enable;
use crate::register::RegisterAccess;

/// How long [`Adc::read_result`] waits for the end of a conversion
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PollLimit {
    /// Poll `SR` until `EOC` is set, however long it takes
    #[default]
    Unbounded,
    /// Give up with [`Error::ConversionTimeout`] after this many polls of `SR`
    Polls(u32),
}

/// ADC configuration
///
/// The sampled pin can only be picked through [`Config::pin`], so the channel is always one that
/// has a port A pin behind it:
///
/// ```compile_fail
/// use stm32f4_adc_poll::adc::Config;
///
/// let config = Config { channel: 10, ..Config::default() };
/// ```
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    channel: u8,
    poll_limit: PollLimit,
}

impl Default for Config {
    /// PA1 (channel 1), unbounded polling
    fn default() -> Self {
        Config {
            channel: 1,
            poll_limit: PollLimit::Unbounded,
        }
    }
}

impl Config {
    /// Samples `pin`. The pin number of port A is also its ADC1 channel number.
    pub fn pin<PIN>(mut self, _pin: &PIN) -> Self
    where
        PIN: Channel<ADC1, ID = u8>,
    {
        self.channel = PIN::channel();
        self
    }

    pub fn poll_limit(mut self, poll_limit: PollLimit) -> Self {
        self.poll_limit = poll_limit;
        self
    }

    /// Port A pin number, and ADC1 channel, to sample
    pub fn channel(&self) -> u8 {
        self.channel
    }
}

/// ADC error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `EOC` was not set within the configured [`PollLimit`]
    ConversionTimeout,
}

macro_rules! adc_pins {
    ($ADC:ident, $($pin:ty => $chan:expr),+ $(,)*) => {
        $(
            impl Channel<$ADC> for $pin {
                type ID = u8;

                fn channel() -> u8 { $chan }
            }
        )+
    };
}

adc_pins!(ADC1,
    gpio::PA0 => 0_u8,
    gpio::PA1 => 1_u8,
    gpio::PA2 => 2_u8,
    gpio::PA3 => 3_u8,
    gpio::PA4 => 4_u8,
    gpio::PA5 => 5_u8,
    gpio::PA6 => 6_u8,
    gpio::PA7 => 7_u8,
);

/// `SQR1.L` encoding of a regular sequence of `len` conversions
#[inline(always)]
const fn sequence_length(len: u8) -> u32 {
    ((len as u32 - 1) << SQR1_L_SHIFT) & SQR1_L_MASK
}

/// ADC1, set up for single channel polled conversions
pub struct Adc<A: RegisterAccess> {
    regs: A,
    config: Config,
}

impl<A: RegisterAccess> Adc<A> {
    /// Init a new Adc
    ///
    /// Runs [`Adc::initialize_adc_input`] before returning, so conversions can be triggered right
    /// away.
    pub fn new(regs: A, config: Config) -> Self {
        let mut s = Self { regs, config };
        s.initialize_adc_input();
        s
    }

    /// Clocks the input pin and the converter, routes the pin to sequence position 1 and powers
    /// the converter up.
    ///
    /// The steps run in a fixed order: the port and ADC registers ignore writes until their clock
    /// has been enabled.
    pub fn initialize_adc_input(&mut self) {
        let channel = self.config.channel;

        GPIOA::enable(&mut self.regs);
        gpio::set_mode(&mut self.regs, channel, Mode::Analog);

        ADC1::enable(&mut self.regs);
        self.regs.write(ADC1::SQR3, u32::from(channel) & SQR3_SQ1_MASK);
        self.regs.write(ADC1::SQR1, sequence_length(1));

        // ADON has to stay set from here on, clearing it powers the analog front end down
        self.regs.set_bits(ADC1::CR2, Cr2::ADON.bits());

        #[cfg(feature = "defmt")]
        defmt::debug!("ADC1 armed on PA{=u8}", channel);
    }

    /// Starts a conversion of the regular sequence. Does not wait for it to finish.
    #[inline]
    pub fn trigger_conversion(&mut self) {
        self.regs.set_bits(ADC1::CR2, Cr2::SWSTART.bits());
    }

    /// Checks `EOC` once, and returns the contents of `DR` if the conversion is done.
    ///
    /// Reading `DR` clears `EOC`.
    pub fn try_read(&mut self) -> nb::Result<u32, Infallible> {
        if self.regs.read(ADC1::SR) & Sr::EOC.bits() == 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.regs.read(ADC1::DR))
    }

    /// Waits for the end of the running conversion and returns the raw value of `DR`.
    ///
    /// With [`PollLimit::Unbounded`] this only returns once `EOC` is set, and never fails.
    pub fn read_result(&mut self) -> Result<u32, Error> {
        match self.config.poll_limit {
            PollLimit::Unbounded => match nb::block!(self.try_read()) {
                Ok(raw) => Ok(raw),
                Err(never) => match never {},
            },
            PollLimit::Polls(limit) => {
                for _ in 0..limit {
                    if let Ok(raw) = self.try_read() {
                        return Ok(raw);
                    }
                }
                #[cfg(feature = "defmt")]
                defmt::warn!("ADC1 conversion timed out after {=u32} polls", limit);
                Err(Error::ConversionTimeout)
            }
        }
    }

    /// Triggers a conversion and waits for its result
    pub fn convert(&mut self) -> Result<u32, Error> {
        self.trigger_conversion();
        self.read_result()
    }

    /// Channel at sequence position 1
    pub fn channel(&self) -> u8 {
        self.config.channel
    }

    pub fn config(&self) -> Config {
        self.config
    }

    fn select_channel(&mut self, channel: u8) {
        if channel != self.config.channel {
            self.config.channel = channel;
            self.regs
                .modify(ADC1::SQR3, |r| (r & !SQR3_SQ1_MASK) | u32::from(channel));
        }
    }

    /// Powers down the ADC, disables the ADC clock and releases the register bus
    pub fn release(mut self) -> A {
        self.regs.clear_bits(ADC1::CR2, Cr2::ADON.bits());
        ADC1::disable(&mut self.regs);
        self.regs
    }
}

impl<A, WORD, PIN> OneShot<ADC1, WORD, PIN> for Adc<A>
where
    A: RegisterAccess,
    WORD: From<u16>,
    PIN: Channel<ADC1, ID = u8>,
{
    type Error = Error;

    /// Converts `PIN`, which must already be in analog mode
    fn read(&mut self, _pin: &mut PIN) -> nb::Result<WORD, Self::Error> {
        self.select_channel(PIN::channel());
        let raw = self.convert()?;
        Ok(((raw & DR_DATA_MASK) as u16).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::{PA0, PA1, PA2, PA3, PA4, PA5, PA6, PA7};
    use crate::pac::rcc::{Ahb1Enr, Apb2Enr};
    use crate::pac::RCC;
    use crate::sim::{Access, SimBus};

    fn adc(bus: SimBus) -> Adc<SimBus> {
        Adc::new(bus, Config::default())
    }

    #[test]
    fn init_enables_port_and_adc_clocks() {
        let mut bus = adc(SimBus::new()).regs;
        assert!(bus.is_set(RCC::AHB1ENR, Ahb1Enr::GPIOAEN.bits()));
        assert!(bus.is_set(RCC::APB2ENR, Apb2Enr::ADC1EN.bits()));
    }

    #[test]
    fn init_puts_pa1_in_analog_mode() {
        let bus = adc(SimBus::new()).regs;
        assert_eq!((bus.peek(GPIOA::MODER) >> 2) & 0b11, 0b11);
    }

    #[test]
    fn init_selects_channel_1_in_a_sequence_of_one() {
        let bus = adc(SimBus::new()).regs;
        assert_eq!(bus.peek(ADC1::SQR3), 1 << 0);
        assert_eq!(bus.peek(ADC1::SQR1), 0);
        assert_eq!(bus.peek(ADC1::CR2), Cr2::ADON.bits());
    }

    #[test]
    fn init_writes_in_order() {
        let bus = adc(SimBus::new()).regs;
        let writes: std::vec::Vec<u32> = bus.writes().map(|(address, _)| address).collect();
        assert_eq!(
            writes,
            [
                RCC::AHB1ENR,
                GPIOA::MODER,
                RCC::APB2ENR,
                ADC1::SQR3,
                ADC1::SQR1,
                ADC1::CR2
            ]
        );
    }

    #[test]
    fn init_rerun_leaves_registers_and_write_order_unchanged() {
        const TOUCHED: [u32; 6] = [
            RCC::AHB1ENR,
            RCC::APB2ENR,
            GPIOA::MODER,
            ADC1::SQR3,
            ADC1::SQR1,
            ADC1::CR2,
        ];
        let mut adc = adc(SimBus::new());
        let first: std::vec::Vec<(u32, u32)> = adc.regs.writes().collect();
        let state = TOUCHED.map(|r| adc.regs.peek(r));

        adc.regs.clear_journal();
        adc.initialize_adc_input();
        let second: std::vec::Vec<(u32, u32)> = adc.regs.writes().collect();

        assert_eq!(second, first);
        assert_eq!(TOUCHED.map(|r| adc.regs.peek(r)), state);
        assert_eq!(adc.regs.conversions(), 0);
    }

    #[test]
    fn init_rerun_after_a_conversion_does_not_start_another() {
        let mut adc = adc(SimBus::new().data(0x155));
        assert_eq!(adc.convert(), Ok(0x155));
        adc.initialize_adc_input();
        assert_eq!(adc.regs.conversions(), 1);
        assert!(!adc.regs.is_converting());
        assert_eq!(adc.regs.peek(ADC1::CR2), Cr2::ADON.bits());
    }

    #[test]
    fn config_channels_come_from_port_a_pins() {
        assert_eq!(Config::default().channel(), 1);
        let channels = [
            Config::default().pin(&PA0::new()).channel(),
            Config::default().pin(&PA1::new()).channel(),
            Config::default().pin(&PA2::new()).channel(),
            Config::default().pin(&PA3::new()).channel(),
            Config::default().pin(&PA4::new()).channel(),
            Config::default().pin(&PA5::new()).channel(),
            Config::default().pin(&PA6::new()).channel(),
            Config::default().pin(&PA7::new()).channel(),
        ];
        assert_eq!(channels, [0, 1, 2, 3, 4, 5, 6, 7]);
        // the poll limit builder leaves the pin alone
        let config = Config::default()
            .pin(&PA4::new())
            .poll_limit(PollLimit::Polls(3));
        assert_eq!(config.channel(), 4);
    }

    #[test]
    fn init_does_not_start_a_conversion() {
        let bus = adc(SimBus::new()).regs;
        assert_eq!(bus.conversions(), 0);
        assert!(!bus
            .journal()
            .iter()
            .any(|a| a.address() == ADC1::SR || a.address() == ADC1::DR));
    }

    #[test]
    fn trigger_sets_only_swstart() {
        let mut adc = adc(SimBus::new().eoc_after(u32::MAX));
        let before = adc.regs.peek(ADC1::CR2);
        adc.regs.clear_journal();
        adc.trigger_conversion();
        let writes: std::vec::Vec<(u32, u32)> = adc.regs.writes().collect();
        assert_eq!(writes, [(ADC1::CR2, before | Cr2::SWSTART.bits())]);
        assert_eq!(adc.regs.conversions(), 1);
        // the converter clears SWSTART itself once the conversion has started
        assert_eq!(adc.regs.peek(ADC1::CR2), before);
    }

    #[test]
    fn trigger_does_not_wait() {
        let mut adc = adc(SimBus::new().eoc_after(1_000));
        adc.regs.clear_journal();
        adc.trigger_conversion();
        assert_eq!(adc.regs.polls(), 0);
        assert!(adc.regs.journal().iter().all(|a| a.address() == ADC1::CR2));
    }

    #[test]
    fn read_result_spins_until_eoc() {
        let mut adc = adc(SimBus::new().eoc_after(25).data(0x0FFF));
        adc.trigger_conversion();
        assert_eq!(adc.read_result(), Ok(0x0FFF));
        // 25 polls saw EOC clear, the 26th saw it set
        assert_eq!(adc.regs.polls(), 26);
        assert!(!adc.regs.is_converting());
    }

    #[test]
    fn read_result_returns_data_register_unchanged() {
        let mut adc = adc(SimBus::new().data(0x2A3));
        adc.trigger_conversion();
        assert_eq!(adc.read_result(), Ok(0x2A3));
    }

    #[test]
    fn reading_result_clears_eoc() {
        let mut adc = adc(SimBus::new().eoc_after(2).data(9));
        assert_eq!(adc.convert(), Ok(9));
        assert_eq!(adc.regs.peek(ADC1::SR) & Sr::EOC.bits(), 0);
        let last = *adc.regs.journal().last().unwrap();
        assert_eq!(last, Access::Read { address: ADC1::DR, value: 9 });
    }

    #[test]
    fn try_read_would_block_until_done() {
        let mut adc = adc(SimBus::new().eoc_after(2).data(5));
        adc.trigger_conversion();
        assert_eq!(adc.try_read(), Err(nb::Error::WouldBlock));
        assert_eq!(adc.try_read(), Err(nb::Error::WouldBlock));
        assert_eq!(adc.try_read(), Ok(5));
        assert_eq!(adc.try_read(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn bounded_poll_times_out() {
        let config = Config::default().poll_limit(PollLimit::Polls(50));
        let mut bus = SimBus::new();
        // powered down converter: SWSTART is ignored
        let mut adc = Adc::new(&mut bus, config);
        adc.regs.clear_bits(ADC1::CR2, Cr2::ADON.bits());
        adc.trigger_conversion();
        adc.regs.clear_journal();
        assert_eq!(adc.read_result(), Err(Error::ConversionTimeout));
        drop(adc);
        assert_eq!(bus.polls(), 50);
        assert_eq!(bus.journal().len(), 50);
        assert_eq!(bus.conversions(), 0);
    }

    #[test]
    fn bounded_poll_returns_when_in_time() {
        let config = Config::default().poll_limit(PollLimit::Polls(10));
        let mut adc = Adc::new(SimBus::new().eoc_after(9).data(0x42), config);
        assert_eq!(adc.convert(), Ok(0x42));
        assert_eq!(adc.regs.polls(), 10);
    }

    #[test]
    fn other_pin_selects_matching_field_and_channel() {
        let config = Config::default().pin(&PA6::new());
        let adc = Adc::new(SimBus::new(), config);
        assert_eq!(adc.channel(), 6);
        let bus = adc.regs;
        assert_eq!(bus.peek(GPIOA::MODER), 0b11 << 12);
        assert_eq!(bus.peek(ADC1::SQR3), 6);
    }

    #[test]
    fn one_shot_switches_channel() {
        let mut adc = adc(SimBus::new().data(0x0ABC));
        let mut pa6 = PA6::new().into_analog(&mut adc.regs);
        let reading: u16 = nb::block!(adc.read(&mut pa6)).unwrap();
        assert_eq!(reading, 0x0ABC);
        assert_eq!(adc.channel(), 6);
        assert_eq!(adc.regs.peek(ADC1::SQR3), 6);

        let mut pa1 = PA1::new();
        let reading: u32 = nb::block!(adc.read(&mut pa1)).unwrap();
        assert_eq!(reading, 0x0ABC);
        assert_eq!(adc.regs.peek(ADC1::SQR3), 1);
    }

    #[test]
    fn release_powers_down() {
        let bus = adc(SimBus::new()).release();
        assert_eq!(bus.peek(ADC1::CR2) & Cr2::ADON.bits(), 0);
        assert_eq!(bus.peek(RCC::APB2ENR) & Apb2Enr::ADC1EN.bits(), 0);
        // the port clock is left alone, other pins may still use it
        assert_ne!(bus.peek(RCC::AHB1ENR) & Ahb1Enr::GPIOAEN.bits(), 0);
    }
}
