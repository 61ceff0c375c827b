//! The pad bus on RP2040 GPIOs.

use defmt::warn;
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use heapless::Vec;
use psx_pad_dongle::{LineDriver, PinMapping, Result};

pub type PadBus = LineDriver<Output<'static>, Output<'static>, Input<'static>>;

pub const MAX_SPARE_LINES: usize = 4;

pub struct Board {
    pub bus: PadBus,
    /// Held so their pull-ups stay on.
    pub spare_lines: Vec<Input<'static>, MAX_SPARE_LINES>,
}

/// Clock and latch become outputs driven low, every data line a pulled-up
/// input.
///
/// # Safety
///
/// Call once. No other code may own the GPIOs named in `mapping`.
pub unsafe fn configure(mapping: &PinMapping) -> Result<Board> {
    let (clock, latch, data) = unsafe {
        (
            Output::new(AnyPin::steal(mapping.clock), Level::Low),
            Output::new(AnyPin::steal(mapping.latch), Level::Low),
            Input::new(AnyPin::steal(mapping.data), Pull::Up),
        )
    };

    let mut spare_lines = Vec::new();
    for &pin in mapping.spare_data {
        let line = unsafe { Input::new(AnyPin::steal(pin), Pull::Up) };
        if spare_lines.push(line).is_err() {
            warn!("GPIO{} left unconfigured, too many spare data lines", pin);
        }
    }

    Ok(Board {
        bus: LineDriver::new(clock, latch, data)?,
        spare_lines,
    })
}
