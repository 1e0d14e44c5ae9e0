//! GPIO error type.

/// Failure of a pin operation.
///
/// Both kinds are detected before any register is touched.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The requested value does not fit the bit width of the target field.
    InvalidValue,
    /// The pin or qualification group does not map to any register on this chip.
    UnresolvedRegister,
}

impl embedded_hal_1::digital::Error for Error {
    fn kind(&self) -> embedded_hal_1::digital::ErrorKind {
        match *self {
            Self::InvalidValue | Self::UnresolvedRegister => embedded_hal_1::digital::ErrorKind::Other,
        }
    }
}
