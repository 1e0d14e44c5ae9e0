//! Pin to register resolution.
//!
//! Pins come in mux groups of 16 and qualification groups of 8. Which
//! register holds a pin's setting, and where in that register, follows from
//! the group number alone:
//!
//! | Setting | Selected by | Registers | Field |
//! |---|---|---|---|
//! | direction, pull-up, data, toggle | mux group pair | {0,1} A, {2,3} B, {4,5} C | 1 bit at `pin % 32` |
//! | peripheral function | mux group 1..=6 | A mux 1/2, B mux 1/2, C mux 1/2 | 2 bits at `(pin % 16) * 2` |
//! | qualification mode | mux group 1..=4 | A qsel 1/2, B qsel 1/2 | 2 bits at `(pin % 16) * 2` |
//! | sampling period | qualification group 0..=7 | A ctrl, B ctrl | 8 bits at `(group % 4) * 8` |
//!
//! Mux group 0 has neither a mux nor a qualification select register. Its pins
//! always run peripheral function 0 with synchronous qualification.

use crate::error::Error;

/// Pins per mux group.
pub const PINS_PER_MUX_GROUP: u32 = 16;

/// Pins per qualification group.
pub const PINS_PER_QUAL_GROUP: u32 = 8;

/// Mux group of `pin`.
#[inline]
pub const fn mux_group(pin: u32) -> u32 {
    pin / PINS_PER_MUX_GROUP
}

/// Qualification group of `pin`.
#[inline]
pub const fn qual_group(pin: u32) -> u32 {
    pin / PINS_PER_QUAL_GROUP
}

/// A GPIO port.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Port A, pins 0 to 31.
    A,
    /// Port B, pins 32 to 63.
    B,
    /// Port C, pins 64 to 95.
    C,
}

/// A port with input qualification registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QualPort {
    /// Port A.
    A,
    /// Port B.
    B,
}

/// Which register of a 2-bit-per-pin register pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// First register of the pair (`MUX1`, `QSEL1`).
    First,
    /// Second register of the pair (`MUX2`, `QSEL2`).
    Second,
}

/// Identity of one GPIO register.
///
/// Only registers that exist on the chip can be named.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterId {
    /// `GPxDIR`
    Direction(Port),
    /// `GPxPUD`
    PullUpDisable(Port),
    /// `GPxMUX1` / `GPxMUX2`
    Mux(Port, Half),
    /// `GPxQSEL1` / `GPxQSEL2`
    QualSelect(QualPort, Half),
    /// `GPxCTRL`
    QualControl(QualPort),
    /// `GPxDAT`
    Data(Port),
    /// `GPxTOGGLE`
    Toggle(Port),
}

/// Location of a bit field inside a 32-bit register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    offset: u32,
    width: u32,
}

impl Field {
    /// Field number `index` of a register made of `width`-bit fields.
    ///
    /// `width` must divide 32. The index wraps at the register's field count,
    /// so the field never crosses the word boundary.
    #[inline]
    pub const fn nth(index: u32, width: u32) -> Self {
        let count = u32::BITS / width;
        Self {
            offset: (index % count) * width,
            width,
        }
    }

    /// Bit offset of the field.
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Width of the field in bits.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Largest value the field holds.
    #[inline]
    pub const fn max(&self) -> u32 {
        u32::MAX >> (u32::BITS - self.width)
    }

    /// Bits covered by the field.
    #[inline]
    pub const fn mask(&self) -> u32 {
        self.max() << self.offset
    }

    /// Shift `value` into the field position.
    #[inline]
    pub const fn place(&self, value: u32) -> u32 {
        (value << self.offset) & self.mask()
    }

    /// Extract the field from raw register contents.
    #[inline]
    pub const fn extract(&self, raw: u32) -> u32 {
        (raw & self.mask()) >> self.offset
    }
}

/// A resolved register and field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Target {
    /// Register holding the setting.
    pub register: RegisterId,
    /// Field of the setting inside `register`.
    pub field: Field,
}

/// A per-pin (or per-qualification-group) setting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Peripheral function select, indexed by pin.
    Function,
    /// Input/output direction, indexed by pin.
    Direction,
    /// Pull-up disable, indexed by pin.
    PullUp,
    /// Input qualification mode, indexed by pin.
    Qualification,
    /// Qualification sampling period, indexed by qualification group.
    SamplingPeriod,
    /// Output latch / input level, indexed by pin.
    Data,
    /// Output toggle, indexed by pin.
    Toggle,
}

impl Setting {
    /// Width of the setting's field in bits.
    #[inline]
    pub const fn width(self) -> u32 {
        match self {
            Self::Direction | Self::PullUp | Self::Data | Self::Toggle => 1,
            Self::Function | Self::Qualification => 2,
            Self::SamplingPeriod => 8,
        }
    }

    /// Check that `value` fits the field.
    #[inline]
    pub const fn validate(self, value: u32) -> Result<u32, Error> {
        if value > u32::MAX >> (u32::BITS - self.width()) {
            Err(Error::InvalidValue)
        } else {
            Ok(value)
        }
    }

    /// Register and field holding this setting for `index`.
    ///
    /// `index` is a qualification group for [`Setting::SamplingPeriod`] and a
    /// pin number for everything else.
    pub const fn resolve(self, index: u32) -> Result<Target, Error> {
        let register = match self {
            Self::Function => mux_register(index),
            Self::Direction => match port(index) {
                Some(port) => Some(RegisterId::Direction(port)),
                None => None,
            },
            Self::PullUp => match port(index) {
                Some(port) => Some(RegisterId::PullUpDisable(port)),
                None => None,
            },
            Self::Qualification => qual_select_register(index),
            Self::SamplingPeriod => qual_control_register(index),
            Self::Data => match port(index) {
                Some(port) => Some(RegisterId::Data(port)),
                None => None,
            },
            Self::Toggle => match port(index) {
                Some(port) => Some(RegisterId::Toggle(port)),
                None => None,
            },
        };
        match register {
            Some(register) => Ok(Target {
                register,
                field: Field::nth(index, self.width()),
            }),
            None => Err(Error::UnresolvedRegister),
        }
    }
}

/// Port owning the direction, pull-up, data and toggle bits of `pin`.
#[inline]
pub const fn port(pin: u32) -> Option<Port> {
    match mux_group(pin) {
        0 | 1 => Some(Port::A),
        2 | 3 => Some(Port::B),
        4 | 5 => Some(Port::C),
        _ => None,
    }
}

/// Peripheral mux register of `pin`.
#[inline]
pub const fn mux_register(pin: u32) -> Option<RegisterId> {
    match mux_group(pin) {
        1 => Some(RegisterId::Mux(Port::A, Half::First)),
        2 => Some(RegisterId::Mux(Port::A, Half::Second)),
        3 => Some(RegisterId::Mux(Port::B, Half::First)),
        4 => Some(RegisterId::Mux(Port::B, Half::Second)),
        5 => Some(RegisterId::Mux(Port::C, Half::First)),
        6 => Some(RegisterId::Mux(Port::C, Half::Second)),
        _ => None,
    }
}

/// Qualification select register of `pin`.
#[inline]
pub const fn qual_select_register(pin: u32) -> Option<RegisterId> {
    match mux_group(pin) {
        1 => Some(RegisterId::QualSelect(QualPort::A, Half::First)),
        2 => Some(RegisterId::QualSelect(QualPort::A, Half::Second)),
        3 => Some(RegisterId::QualSelect(QualPort::B, Half::First)),
        4 => Some(RegisterId::QualSelect(QualPort::B, Half::Second)),
        _ => None,
    }
}

/// Qualification control register of qualification group `group`.
#[inline]
pub const fn qual_control_register(group: u32) -> Option<RegisterId> {
    match group {
        0..=3 => Some(RegisterId::QualControl(QualPort::A)),
        4..=7 => Some(RegisterId::QualControl(QualPort::B)),
        _ => None,
    }
}
