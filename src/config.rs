//! Build-time configuration of the dongle.

use crate::error::{Error, Result};
use crate::pins::PinMapping;

/// What the device reports itself as during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbIdentity {
    pub vid: u16,
    pub pid: u16,
    pub manufacturer: &'static str,
    pub product: &'static str,
    pub serial_number: &'static str,
    /// In mA.
    pub max_power: u16,
}

impl UsbIdentity {
    /// Shared V-USB VID/PID pair for HID joysticks.
    pub const DEFAULT: Self = Self {
        vid: 0x16c0,
        pid: 0x27dc,
        manufacturer: "PSX Pad Adapter",
        product: "PSX Pad Joystick",
        serial_number: "PSX001",
        max_power: 100,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub mapping: PinMapping,
    /// One protocol time unit, in microseconds.
    pub time_unit_us: u32,
    /// Interrupt IN endpoint interval.
    pub poll_ms: u8,
    /// Idle period until the host issues SET_IDLE. 0 means only send on change.
    pub idle_ms: u32,
    pub usb: UsbIdentity,
}

impl Config {
    pub const fn new(mapping: PinMapping) -> Self {
        Self {
            mapping,
            time_unit_us: 1_000,
            poll_ms: 5,
            idle_ms: 500,
            usb: UsbIdentity::DEFAULT,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_unit_us == 0 {
            return Err(Error::ZeroTimeUnit);
        }
        self.mapping.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PinMapping::DEV_BOARD)
    }
}
