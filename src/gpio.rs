//! The three bus lines as plain digital signals.
//!
//! The driver is generic over `embedded-hal` pins so the protocol above it runs
//! the same on RP2040 GPIOs and on test doubles. Configuring the physical pins
//! (direction, pull-up) is the board's job; by the time pins reach
//! [`LineDriver::new`] the data line is already a pulled-up input.

use embedded_hal::digital::{Error as _, InputPin, OutputPin, PinState};

use crate::error::{Error, Result};

pub struct LineDriver<C, L, D> {
    clock: C,
    latch: L,
    data: D,
}

impl<C, L, D> LineDriver<C, L, D>
where
    C: OutputPin,
    L: OutputPin,
    D: InputPin,
{
    /// Takes ownership of the lines and drives both outputs low.
    pub fn new(clock: C, latch: L, data: D) -> Result<Self> {
        let mut bus = Self { clock, latch, data };
        bus.set_clock(PinState::Low)?;
        bus.set_latch(PinState::Low)?;
        Ok(bus)
    }

    #[inline]
    pub fn set_clock(&mut self, level: PinState) -> Result<()> {
        self.clock
            .set_state(level)
            .map_err(|e| Error::Clock(e.kind()))
    }

    #[inline]
    pub fn set_latch(&mut self, level: PinState) -> Result<()> {
        self.latch
            .set_state(level)
            .map_err(|e| Error::Latch(e.kind()))
    }

    /// `true` when the pad pulls the data line low, i.e. the sampled button
    /// is pressed. Reads whatever the line shows right now; sequencing against
    /// the clock is up to the caller.
    #[inline]
    pub fn read_data(&mut self) -> Result<bool> {
        self.data.is_low().map_err(|e| Error::Data(e.kind()))
    }
}
