use embedded_hal::digital::ErrorKind;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong between the pad bus and the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error("clock line fault: {0:?}")]
    Clock(ErrorKind),

    #[error("latch line fault: {0:?}")]
    Latch(ErrorKind),

    #[error("data line fault: {0:?}")]
    Data(ErrorKind),

    #[error("GPIO{0} is wired to more than one bus line")]
    PinConflict(u8),

    #[error("GPIO{0} does not exist on this chip")]
    PinOutOfRange(u8),

    #[error("time unit must be at least one microsecond")]
    ZeroTimeUnit,
}
