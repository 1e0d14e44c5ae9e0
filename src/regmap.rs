//! GPIO register blocks.
//!
//! The layouts mirror the C28x GPIO control and data register frames. The
//! base addresses come from the platform (linker script or device header),
//! never from this crate.

use core::ptr::{addr_of_mut, NonNull};

use crate::register::Reg;
use crate::resolve::{Half, Port, QualPort, RegisterId};

/// GPIO control register frame.
#[repr(C)]
#[derive(Default)]
#[allow(missing_docs)]
pub struct GpioCtrlRegs {
    pub gpactrl: u32,
    pub gpaqsel1: u32,
    pub gpaqsel2: u32,
    pub gpamux1: u32,
    pub gpamux2: u32,
    pub gpadir: u32,
    pub gpapud: u32,
    _rsvd1: u32,
    pub gpbctrl: u32,
    pub gpbqsel1: u32,
    pub gpbqsel2: u32,
    pub gpbmux1: u32,
    pub gpbmux2: u32,
    pub gpbdir: u32,
    pub gpbpud: u32,
    _rsvd2: [u32; 4],
    pub gpcmux1: u32,
    pub gpcmux2: u32,
    pub gpcdir: u32,
    pub gpcpud: u32,
}

/// GPIO data register frame.
#[repr(C)]
#[derive(Default)]
#[allow(missing_docs)]
pub struct GpioDataRegs {
    pub gpadat: u32,
    pub gpaset: u32,
    pub gpaclear: u32,
    pub gpatoggle: u32,
    pub gpbdat: u32,
    pub gpbset: u32,
    pub gpbclear: u32,
    pub gpbtoggle: u32,
    pub gpcdat: u32,
    pub gpcset: u32,
    pub gpcclear: u32,
    pub gpctoggle: u32,
    _rsvd: [u32; 4],
}

const _: () = assert!(core::mem::size_of::<GpioCtrlRegs>() == 23 * 4);
const _: () = assert!(core::mem::size_of::<GpioDataRegs>() == 16 * 4);

macro_rules! port_reg {
    ($block:expr, $port:expr, $name:ident) => {
        paste::paste! {
            match $port {
                Port::A => addr_of_mut!((*$block).[<gpa $name>]),
                Port::B => addr_of_mut!((*$block).[<gpb $name>]),
                Port::C => addr_of_mut!((*$block).[<gpc $name>]),
            }
        }
    };
}

macro_rules! qual_port_reg {
    ($block:expr, $port:expr, $name:ident) => {
        paste::paste! {
            match $port {
                QualPort::A => addr_of_mut!((*$block).[<gpa $name>]),
                QualPort::B => addr_of_mut!((*$block).[<gpb $name>]),
            }
        }
    };
}

/// The chip's GPIO register set.
#[derive(Clone, Copy, Debug)]
pub struct RegisterMap {
    ctrl: NonNull<GpioCtrlRegs>,
    data: NonNull<GpioDataRegs>,
}

// SAFETY: Only addresses are stored. All accesses go through `Reg`.
unsafe impl Send for RegisterMap {}
// SAFETY: See above.
unsafe impl Sync for RegisterMap {}

impl RegisterMap {
    /// Build the map from the two register frame base addresses.
    ///
    /// # Safety
    ///
    /// `ctrl` and `data` must point to the chip's GPIO control and data frames
    /// (or memory standing in for them) for as long as the map, or any
    /// [`Reg`] taken from it, is in use.
    #[inline]
    pub const unsafe fn new(ctrl: NonNull<GpioCtrlRegs>, data: NonNull<GpioDataRegs>) -> Self {
        Self { ctrl, data }
    }

    /// Handle to the register named by `id`.
    pub fn register(&self, id: RegisterId) -> Reg {
        let ctrl = self.ctrl.as_ptr();
        let data = self.data.as_ptr();

        // SAFETY: Only field addresses are computed, nothing is dereferenced.
        // Both frames are valid per the `new` contract.
        let ptr = unsafe {
            match id {
                RegisterId::Direction(port) => port_reg!(ctrl, port, dir),
                RegisterId::PullUpDisable(port) => port_reg!(ctrl, port, pud),
                RegisterId::Mux(port, Half::First) => port_reg!(ctrl, port, mux1),
                RegisterId::Mux(port, Half::Second) => port_reg!(ctrl, port, mux2),
                RegisterId::QualSelect(port, Half::First) => qual_port_reg!(ctrl, port, qsel1),
                RegisterId::QualSelect(port, Half::Second) => qual_port_reg!(ctrl, port, qsel2),
                RegisterId::QualControl(port) => qual_port_reg!(ctrl, port, ctrl),
                RegisterId::Data(port) => port_reg!(data, port, dat),
                RegisterId::Toggle(port) => port_reg!(data, port, toggle),
            }
        };

        // SAFETY: A field address inside a non-null frame is non-null and
        // aligned, and stays valid as long as the frame does.
        unsafe { Reg::new(NonNull::new_unchecked(ptr)) }
    }
}
