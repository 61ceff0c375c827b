//! Physical wiring of the pad bus.
//!
//! | Line  | Direction | Notes                               |
//! |-------|-----------|-------------------------------------|
//! | CLOCK | output    | idles high between polls            |
//! | LATCH | output    | high loads the pad's shift register |
//! | DATA  | input     | active low, internal pull-up        |
//!
//! Both wirings below drive the same protocol; they only differ in which GPIOs
//! carry the lines. `DEV_BOARD` also wires two extra data lines. They get
//! pull-ups so they never float but nothing samples them.

use crate::error::{Error, Result};

/// Highest GPIO number in the RP2040 user bank.
pub const MAX_GPIO: u8 = 29;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMapping {
    pub clock: u8,
    pub latch: u8,
    pub data: u8,
    /// Wired and pulled up, never read.
    pub spare_data: &'static [u8],
}

impl PinMapping {
    /// Three data lines on GP0..GP2, latch on GP3, clock on GP4.
    pub const DEV_BOARD: Self = Self {
        clock: 4,
        latch: 3,
        data: 2,
        spare_data: &[1, 0],
    };

    /// Single data line next to the control lines on GP10..GP12.
    pub const COMPACT: Self = Self {
        clock: 10,
        latch: 11,
        data: 12,
        spare_data: &[],
    };

    /// Every GPIO the mapping claims, control lines first.
    pub fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        [self.clock, self.latch, self.data]
            .into_iter()
            .chain(self.spare_data.iter().copied())
    }

    pub fn validate(&self) -> Result<()> {
        for (i, pin) in self.pins().enumerate() {
            if pin > MAX_GPIO {
                return Err(Error::PinOutOfRange(pin));
            }
            if self.pins().take(i).any(|other| other == pin) {
                return Err(Error::PinConflict(pin));
            }
        }
        Ok(())
    }
}
