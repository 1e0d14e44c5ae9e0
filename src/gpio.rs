//! GPIO driver.
//!
//! All operations take a plain pin number. Register and bit field are derived
//! from the number on every call, see [`crate::resolve`].
//!
//! Setters accept either the typed settings of this module or raw field
//! values. Raw values are range checked against the field width; a value that
//! doesn't fit is rejected with [`Error::InvalidValue`] before any register is
//! touched.

use crate::config::PinConfig;
use crate::error::Error;
use crate::regmap::RegisterMap;
use crate::register::{Protection, WriteProtect};
use crate::resolve::{qual_group, Setting};

/// Digital input or output level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logical low.
    Low = 0,
    /// Logical high.
    High = 1,
}

impl From<bool> for Level {
    fn from(val: bool) -> Self {
        match val {
            true => Self::High,
            false => Self::Low,
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        match level {
            Level::Low => false,
            Level::High => true,
        }
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> u32 {
        level as u32
    }
}

/// Pin direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Input.
    Input = 0,
    /// Output.
    Output = 1,
}

impl From<Direction> for u32 {
    fn from(direction: Direction) -> u32 {
        direction as u32
    }
}

/// Internal pull-up resistor.
///
/// The hardware bit is a pull-up *disable*.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Pull-up resistor enabled.
    Up = 0,
    /// No pull-up resistor.
    None = 1,
}

impl From<Pull> for u32 {
    fn from(pull: Pull) -> u32 {
        pull as u32
    }
}

/// Peripheral function number.
///
/// Function 0 is the plain GPIO function.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Function {
    /// Function 0 (GPIO)
    F0 = 0,
    /// Function 1
    F1 = 1,
    /// Function 2
    F2 = 2,
    /// Function 3
    F3 = 3,
}

impl From<Function> for u32 {
    fn from(function: Function) -> u32 {
        function as u32
    }
}

/// Input qualification mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Qualification {
    /// Synchronize to the system clock.
    Sync = 0,
    /// Qualify over three samples.
    ThreeSamples = 1,
    /// Qualify over six samples.
    SixSamples = 2,
    /// No synchronization or qualification.
    Async = 3,
}

impl From<Qualification> for u32 {
    fn from(qualification: Qualification) -> u32 {
        qualification as u32
    }
}

/// GPIO driver for the whole chip.
///
/// Every store is made with the write latch held open.
#[derive(Clone, Copy)]
pub struct Gpio<'d> {
    map: RegisterMap,
    latch: &'d (dyn WriteProtect + Sync),
}

impl<'d> Gpio<'d> {
    /// Create the driver from the chip's register map and its write latch.
    pub fn new(map: RegisterMap, latch: &'d (dyn WriteProtect + Sync)) -> Self {
        Self { map, latch }
    }

    fn apply(&self, setting: Setting, index: u32, value: u32) -> Result<(), Error> {
        let value = setting.validate(value).map_err(|e| {
            debug!("gpio: {:?} value {} out of range for index {}", setting, value, index);
            e
        })?;

        let target = setting.resolve(index).map_err(|e| {
            debug!("gpio: no {:?} register for index {}", setting, index);
            e
        })?;

        self.map
            .register(target.register)
            .write(target.field.mask(), target.field.place(value), Protection::Latch(self.latch));
        trace!("gpio: {:?}[{}] <- {} ({:?})", setting, index, value, target.register);
        Ok(())
    }

    /// Select the peripheral function (0..=3) of `pin`.
    ///
    /// Pins 0 to 15 have no function select register and report
    /// [`Error::UnresolvedRegister`].
    pub fn set_function(&self, pin: u32, function: impl Into<u32>) -> Result<(), Error> {
        self.apply(Setting::Function, pin, function.into())
    }

    /// Set the direction of `pin` (0 input, 1 output).
    pub fn set_direction(&self, pin: u32, direction: impl Into<u32>) -> Result<(), Error> {
        self.apply(Setting::Direction, pin, direction.into())
    }

    /// Set the pull-up disable bit of `pin` (0 pull-up on, 1 pull-up off).
    pub fn set_pull(&self, pin: u32, pull: impl Into<u32>) -> Result<(), Error> {
        self.apply(Setting::PullUp, pin, pull.into())
    }

    /// Select the input qualification mode (0..=3) of `pin`.
    ///
    /// Qualification select exists for pins 16 to 79 only.
    pub fn set_qualification(&self, pin: u32, qualification: impl Into<u32>) -> Result<(), Error> {
        self.apply(Setting::Qualification, pin, qualification.into())
    }

    /// Set the qualification sampling period (0..=255) of qualification group `group`.
    ///
    /// Only has an effect on pins of the group that use sampled qualification.
    pub fn set_sampling_period(&self, group: u32, period: impl Into<u32>) -> Result<(), Error> {
        self.apply(Setting::SamplingPeriod, group, period.into())
    }

    /// Drive the output latch of `pin` (0 low, 1 high).
    pub fn set_value(&self, pin: u32, value: impl Into<u32>) -> Result<(), Error> {
        self.apply(Setting::Data, pin, value.into())
    }

    /// Read the level of `pin`.
    pub fn get_value(&self, pin: u32) -> Result<Level, Error> {
        let target = Setting::Data.resolve(pin).map_err(|e| {
            debug!("gpio: no data register for pin {}", pin);
            e
        })?;
        let bits = self.map.register(target.register).read(target.field.mask());
        Ok((bits != 0).into())
    }

    /// Invert the output latch of `pin`.
    ///
    /// Goes through the write-one-to-toggle register, the data register itself
    /// is never read back.
    pub fn toggle(&self, pin: u32) -> Result<(), Error> {
        let target = Setting::Toggle.resolve(pin).map_err(|e| {
            debug!("gpio: no toggle register for pin {}", pin);
            e
        })?;
        self.map
            .register(target.register)
            .write(target.field.mask(), u32::MAX, Protection::Latch(self.latch));
        trace!("gpio: toggle pin {}", pin);
        Ok(())
    }

    /// Configure `pin` in one go.
    ///
    /// Applies function, direction, pull-up, qualification mode and the sampling
    /// period of the pin's qualification group, in that order. Stops at the first
    /// step that fails and returns its error. Steps already applied stay applied,
    /// so the pin is left partially configured.
    pub fn setup(
        &self,
        pin: u32,
        function: impl Into<u32>,
        direction: impl Into<u32>,
        pull: impl Into<u32>,
        qualification: impl Into<u32>,
        sampling_period: impl Into<u32>,
    ) -> Result<(), Error> {
        self.set_function(pin, function)?;
        self.set_direction(pin, direction)?;
        self.set_pull(pin, pull)?;
        self.set_qualification(pin, qualification)?;
        self.set_sampling_period(qual_group(pin), sampling_period)
    }

    /// Configure `pin` as plain GPIO in the given direction.
    ///
    /// Function 0, pull-up disabled, synchronous qualification, sampling period 0.
    pub fn setup_simple(&self, pin: u32, direction: impl Into<u32>) -> Result<(), Error> {
        self.setup(pin, Function::F0, direction, Pull::None, Qualification::Sync, 0u32)
    }

    /// Apply `config` to `pin`, see [`Gpio::setup`].
    pub fn configure(&self, pin: u32, config: &PinConfig) -> Result<(), Error> {
        self.setup(
            pin,
            config.function,
            config.direction,
            config.pull,
            config.qualification,
            config.sampling_period,
        )
    }

    /// Handle for `pin`. Doesn't touch the hardware.
    pub fn pin(&self, pin: u32) -> Pin<'d> {
        Pin { gpio: *self, pin }
    }

    /// Make `pin` an input with the given pull-up and return its handle.
    ///
    /// Only direction and pull-up are written. Function and qualification are
    /// left as they are, use [`Gpio::setup`] for those.
    pub fn input(&self, pin: u32, pull: Pull) -> Result<Pin<'d>, Error> {
        self.set_direction(pin, Direction::Input)?;
        self.set_pull(pin, pull)?;
        Ok(self.pin(pin))
    }

    /// Make `pin` an output driving `initial_output` and return its handle.
    ///
    /// The latch is written before the direction flips, so the pin never glitches
    /// to the previous level. Function and qualification are left as they are.
    pub fn output(&self, pin: u32, initial_output: Level) -> Result<Pin<'d>, Error> {
        self.set_value(pin, initial_output)?;
        self.set_direction(pin, Direction::Output)?;
        Ok(self.pin(pin))
    }
}

/// A single pin of a [`Gpio`].
#[derive(Clone, Copy)]
pub struct Pin<'d> {
    gpio: Gpio<'d>,
    pin: u32,
}

impl<'d> Pin<'d> {
    /// Pin number.
    #[inline]
    pub fn number(&self) -> u32 {
        self.pin
    }

    /// Set the output as high.
    #[inline]
    pub fn set_high(&mut self) -> Result<(), Error> {
        self.gpio.set_value(self.pin, Level::High)
    }

    /// Set the output as low.
    #[inline]
    pub fn set_low(&mut self) -> Result<(), Error> {
        self.gpio.set_value(self.pin, Level::Low)
    }

    /// Set the output level.
    #[inline]
    pub fn set_level(&mut self, level: Level) -> Result<(), Error> {
        self.gpio.set_value(self.pin, level)
    }

    /// Toggle the output level.
    #[inline]
    pub fn toggle(&mut self) -> Result<(), Error> {
        self.gpio.toggle(self.pin)
    }

    /// Get the pin level.
    #[inline]
    pub fn get_level(&self) -> Result<Level, Error> {
        self.gpio.get_value(self.pin)
    }

    /// Get whether the pin level is high.
    #[inline]
    pub fn is_high(&self) -> Result<bool, Error> {
        self.get_level().map(bool::from)
    }

    /// Get whether the pin level is low.
    #[inline]
    pub fn is_low(&self) -> Result<bool, Error> {
        self.is_high().map(|high| !high)
    }
}

// ====================

impl<'d> embedded_hal_02::digital::v2::InputPin for Pin<'d> {
    type Error = Error;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'d> embedded_hal_02::digital::v2::OutputPin for Pin<'d> {
    type Error = Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }
}

impl<'d> embedded_hal_02::digital::v2::StatefulOutputPin for Pin<'d> {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'d> embedded_hal_02::digital::v2::ToggleableOutputPin for Pin<'d> {
    type Error = Error;
    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}

impl<'d> embedded_hal_1::digital::ErrorType for Pin<'d> {
    type Error = Error;
}

impl<'d> embedded_hal_1::digital::InputPin for Pin<'d> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'d> embedded_hal_1::digital::OutputPin for Pin<'d> {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }
}

impl<'d> embedded_hal_1::digital::StatefulOutputPin for Pin<'d> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}
