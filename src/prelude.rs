pub use crate::rcc::Enable as _stm32_adc_rcc_Enable;
pub use crate::register::RegisterAccess as _stm32_adc_register_RegisterAccess;
pub use crate::sampler::Pause as _stm32_adc_sampler_Pause;
pub use embedded_hal_02::adc::OneShot as _embedded_hal_adc_OneShot;
