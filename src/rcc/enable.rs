use super::*;
use crate::pac::rcc::{Ahb1Enr, Apb2Enr};

macro_rules! bus_enable {
    ($PER:ident => $en:expr) => {
        impl Enable for crate::pac::$PER {
            #[inline(always)]
            fn enable<A: RegisterAccess>(regs: &mut A) {
                regs.set_bits(Self::Bus::ENR, $en.bits());
                // Dummy read so the clock reaches the peripheral before it is configured
                // (errata sheet: "Delay after an RCC peripheral clock enabling")
                let _ = regs.read(Self::Bus::ENR);
            }
            #[inline(always)]
            fn disable<A: RegisterAccess>(regs: &mut A) {
                regs.clear_bits(Self::Bus::ENR, $en.bits());
            }
            #[inline(always)]
            fn is_enabled<A: RegisterAccess>(regs: &mut A) -> bool {
                regs.is_set(Self::Bus::ENR, $en.bits())
            }
        }
    };
}

macro_rules! bus {
    ($($PER:ident => ($busX:ty, $en:expr),)+) => {
        $(
            impl crate::Sealed for crate::pac::$PER {}
            impl RccBus for crate::pac::$PER {
                type Bus = $busX;
            }
            bus_enable!($PER => $en);
        )+
    }
}

bus! {
    GPIOA => (AHB1, Ahb1Enr::GPIOAEN),
    ADC1 => (APB2, Apb2Enr::ADC1EN),
}
