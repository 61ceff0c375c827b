//! Latch-and-shift polling of the pad.
//!
//! One cycle raises clock and latch, drops the latch to start shifting, then
//! clocks out 12 button bits followed by 3 padding pulses and a 6 unit settle
//! before parking the clock high again.
//!
//! Each pulse holds the clock high for one time unit before dropping it, and the
//! data line is read straight after the drop. Every step is a fixed delay, so a
//! pad that never answers just reads as all-released.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::error::Result;
use crate::gpio::LineDriver;
use crate::report::{JoystickReport, PadSignal, SampleVector};

/// Unsampled clock pulses after the last button bit.
pub const PADDING_PULSES: usize = 3;

/// Time units to wait after the padding pulses before parking the clock high.
pub const SETTLE_UNITS: u32 = 6;

pub struct Poller<C, L, D, T> {
    bus: LineDriver<C, L, D>,
    delay: T,
    unit_us: u32,
}

impl<C, L, D, T> Poller<C, L, D, T>
where
    C: OutputPin,
    L: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    /// `unit_us` is the length of one protocol time unit in microseconds.
    pub fn new(bus: LineDriver<C, L, D>, delay: T, unit_us: u32) -> Self {
        Self {
            bus,
            delay,
            unit_us,
        }
    }

    /// Runs one full cycle.
    ///
    /// `report` is cleared while the latch is high and then filled from the
    /// samples, so it never carries state from an earlier poll. If a line
    /// faults mid-cycle the report is left neutral.
    pub fn poll(&mut self, report: &mut JoystickReport) -> Result<SampleVector> {
        self.bus.set_clock(PinState::High)?;
        self.bus.set_latch(PinState::High)?;

        report.clear();

        self.bus.set_latch(PinState::Low)?;

        let mut samples = SampleVector::RELEASED;
        for signal in PadSignal::SHIFT_ORDER {
            self.pulse_clock()?;
            samples.set(signal, self.bus.read_data()?);
        }

        for _ in 0..PADDING_PULSES {
            self.pulse_clock()?;
        }

        self.delay
            .delay_us(SETTLE_UNITS.saturating_mul(self.unit_us));
        self.bus.set_clock(PinState::High)?;

        report.apply(samples);
        trace!("pad samples {=u16:#x}", samples.bits());
        Ok(samples)
    }

    fn pulse_clock(&mut self) -> Result<()> {
        self.bus.set_clock(PinState::High)?;
        self.delay.delay_us(self.unit_us);
        self.bus.set_clock(PinState::Low)
    }
}
