//! Volatile register access
//!
//! Drivers in this crate never dereference peripheral addresses themselves. They go through
//! [`RegisterAccess`], which is implemented once for the real memory map ([`Mmio`]) and once for
//! the host-side simulation ([`SimBus`](crate::sim::SimBus)).

use core::sync::atomic::{AtomicBool, Ordering};

use vcell::VolatileCell;

/// Word-sized access to memory mapped peripheral registers.
///
/// Every call must reach the register exactly once and in program order. Reads take `&mut self`
/// because they can have side effects in hardware, reading `ADC_DR` clears `ADC_SR.EOC` for
/// example.
pub trait RegisterAccess {
    /// Reads the register at `address`
    fn read(&mut self, address: u32) -> u32;

    /// Writes `value` to the register at `address`
    fn write(&mut self, address: u32, value: u32);

    /// Read-modify-write of the register at `address`
    #[inline(always)]
    fn modify<F>(&mut self, address: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let bits = self.read(address);
        self.write(address, f(bits));
    }

    /// Sets the bits in `mask` without modifying the other bits.
    #[inline(always)]
    fn set_bits(&mut self, address: u32, mask: u32) {
        self.modify(address, |r| r | mask);
    }

    /// Clears the bits in `mask` without modifying the other bits.
    #[inline(always)]
    fn clear_bits(&mut self, address: u32, mask: u32) {
        self.modify(address, |r| r & !mask);
    }

    /// Returns `true` if all the bits in `mask` are set
    #[inline(always)]
    fn is_set(&mut self, address: u32, mask: u32) -> bool {
        self.read(address) & mask == mask
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    #[inline(always)]
    fn read(&mut self, address: u32) -> u32 {
        (**self).read(address)
    }

    #[inline(always)]
    fn write(&mut self, address: u32, value: u32) {
        (**self).write(address, value)
    }
}

static TAKEN: AtomicBool = AtomicBool::new(false);

/// The peripheral memory map of the running chip
///
/// There is only ever one of these; it is the handle through which all peripheral registers are
/// reached.
pub struct Mmio {
    _0: (),
}

impl Mmio {
    /// Returns the memory map handle the first time it is called, `None` after that.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(unsafe { Self::steal() })
        }
    }

    /// Unchecked version of [`Mmio::take`]
    ///
    /// # Safety
    ///
    /// Only valid on a device with the STM32F4 memory map, and each handle must be the only one in
    /// use while it is alive.
    #[inline]
    pub unsafe fn steal() -> Self {
        Mmio { _0: () }
    }

    #[inline(always)]
    fn cell(address: u32) -> &'static VolatileCell<u32> {
        // The peripheral region is always mapped and word aligned registers are the only thing
        // addressed through here.
        unsafe { &*(address as usize as *const VolatileCell<u32>) }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&mut self, address: u32) -> u32 {
        Self::cell(address).get()
    }

    #[inline(always)]
    fn write(&mut self, address: u32, value: u32) {
        Self::cell(address).set(value)
    }
}
