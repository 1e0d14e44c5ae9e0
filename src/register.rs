//! Masked access to memory-mapped 32-bit registers.
//!
//! Every GPIO register packs the settings of many pins, so all updates are
//! read-modify-write under a mask. The read-modify-write runs inside a
//! critical section so an interrupt cannot slip a store in between.
//!
//! Some registers only accept stores while the privileged write latch is open
//! (`EALLOW`/`EDIS` on C28x). The latch itself belongs to the platform and is
//! plugged in through [`WriteProtect`].

use core::ptr::NonNull;

/// Privileged register write latch.
///
/// The latch is global to the chip: opening it allows stores to every
/// protected register until it is closed again.
pub trait WriteProtect {
    /// Open the latch (`EALLOW`).
    fn unlock(&self);

    /// Close the latch (`EDIS`).
    fn lock(&self);
}

/// Open write latch.
///
/// Holding an `Unlocked` is the capability to store to protected registers.
/// The latch is closed again when the token is dropped, on every exit path.
pub struct Unlocked<'a> {
    latch: &'a dyn WriteProtect,
}

impl<'a> Unlocked<'a> {
    /// Open `latch` for the lifetime of the returned token.
    #[inline]
    pub fn new(latch: &'a dyn WriteProtect) -> Self {
        latch.unlock();
        Self { latch }
    }
}

impl Drop for Unlocked<'_> {
    #[inline]
    fn drop(&mut self) {
        self.latch.lock();
    }
}

/// Whether a store has to be bracketed by the write latch.
#[derive(Clone, Copy)]
pub enum Protection<'a> {
    /// Plain store.
    None,
    /// Store with the latch held open.
    Latch(&'a dyn WriteProtect),
}

impl<'a> Protection<'a> {
    #[inline]
    fn open(self) -> Option<Unlocked<'a>> {
        match self {
            Self::None => None,
            Self::Latch(latch) => Some(Unlocked::new(latch)),
        }
    }
}

/// Handle to one 32-bit hardware register.
///
/// The handle only offers masked operations, so sibling fields sharing the
/// register can't be clobbered by accident.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reg {
    ptr: NonNull<u32>,
}

// SAFETY: The handle is an address. Every access is volatile, and every
// store runs inside a critical section.
unsafe impl Send for Reg {}
// SAFETY: See above.
unsafe impl Sync for Reg {}

impl Reg {
    /// Create a handle for the register at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a valid, 4-byte aligned register (or memory standing
    /// in for one) for as long as the handle or any copy of it is used.
    #[inline]
    pub const unsafe fn new(ptr: NonNull<u32>) -> Self {
        Self { ptr }
    }

    /// Address of the register.
    #[inline]
    pub fn as_ptr(&self) -> *mut u32 {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    fn load(&self) -> u32 {
        // SAFETY: Valid register address, guaranteed by the `new` contract.
        unsafe { self.ptr.as_ptr().read_volatile() }
    }

    #[inline(always)]
    fn store(&self, value: u32) {
        // SAFETY: Valid register address, guaranteed by the `new` contract.
        unsafe { self.ptr.as_ptr().write_volatile(value) }
    }

    /// Return the register contents masked by `mask`.
    #[inline]
    pub fn read(&self, mask: u32) -> u32 {
        self.load() & mask
    }

    /// Replace the bits selected by `mask` with the same bits of `value`.
    ///
    /// Bits outside `mask` keep their current value.
    #[inline]
    pub fn write(&self, mask: u32, value: u32, protection: Protection<'_>) {
        critical_section::with(|_| {
            let _unlocked = protection.open();
            let current = self.load();
            self.store((current & !mask) | (value & mask));
        })
    }

    /// Invert the bits selected by `mask`.
    ///
    /// Bits outside `mask` keep their current value.
    #[inline]
    pub fn toggle(&self, mask: u32, protection: Protection<'_>) {
        critical_section::with(|_| {
            let _unlocked = protection.open();
            let current = self.load();
            self.store((current & !mask) | (!current & mask));
        })
    }
}
