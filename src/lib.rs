#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Feature flags
#![doc = document_features::document_features!(feature_label = r#"<span class="stab portability"><code>{feature}</code></span>"#)]

#[cfg(test)]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod error;
pub mod gpio;
pub mod regmap;
pub mod register;
pub mod resolve;
#[cfg(test)]
mod testing;

// Reexports
pub use error::Error;
pub use gpio::{Direction, Function, Gpio, Level, Pin, Pull, Qualification};
pub use regmap::RegisterMap;
pub use register::WriteProtect;

/// Pin configuration.
pub mod config {
    use crate::gpio::{Direction, Function, Pull, Qualification};

    /// Everything [`Gpio::setup`](crate::Gpio::setup) applies to one pin.
    #[non_exhaustive]
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PinConfig {
        /// Peripheral function.
        pub function: Function,
        /// Direction.
        pub direction: Direction,
        /// Pull-up resistor.
        pub pull: Pull,
        /// Input qualification mode.
        pub qualification: Qualification,
        /// Sampling period of the pin's qualification group.
        pub sampling_period: u8,
    }

    impl Default for PinConfig {
        fn default() -> Self {
            Self {
                function: Function::F0,
                direction: Direction::Input,
                pull: Pull::None,
                qualification: Qualification::Sync,
                sampling_period: 0,
            }
        }
    }

    impl PinConfig {
        /// Plain GPIO in the given direction, everything else at its default.
        pub fn new(direction: Direction) -> Self {
            Self {
                direction,
                ..Default::default()
            }
        }
    }
}
