//! A simulated pad on fake bus lines.
//!
//! Every line operation and delay lands in one shared event log so tests can
//! check the exact order of the protocol. The data line behaves like the pad's
//! shift register: dropping the latch presents position 0, and each rising
//! clock edge after that moves one position along.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, PinState};
use psx_pad_dongle::{LineDriver, Poller};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Clock(PinState),
    Latch(PinState),
    /// `true` when the line read low.
    Read(bool),
    WaitNs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Clock,
    Latch,
    Data,
}

#[derive(Debug)]
pub struct FakeError;

impl embedded_hal::digital::Error for FakeError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    /// Bit n set when position n is held down.
    held: u16,
    clock: Option<PinState>,
    latch: Option<PinState>,
    edges: usize,
    broken: Option<Line>,
}

#[derive(Clone, Default)]
pub struct Pad(Rc<RefCell<State>>);

impl Pad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds the positions set in `held` (bit n = position n).
    pub fn hold(&self, held: u16) {
        self.0.borrow_mut().held = held;
    }

    pub fn break_line(&self, line: Line) {
        self.0.borrow_mut().broken = Some(line);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }

    pub fn clock(&self) -> Option<PinState> {
        self.0.borrow().clock
    }

    pub fn poller(&self, unit_us: u32) -> Poller<ClockPin, LatchPin, DataPin, FakeDelay> {
        let bus = LineDriver::new(
            ClockPin(self.clone()),
            LatchPin(self.clone()),
            DataPin(self.clone()),
        )
        .expect("fake lines start healthy");
        self.clear_events();
        Poller::new(bus, FakeDelay(self.clone()), unit_us)
    }

    fn check(&self, line: Line) -> Result<(), FakeError> {
        match self.0.borrow().broken {
            Some(broken) if broken == line => Err(FakeError),
            _ => Ok(()),
        }
    }
}

pub struct ClockPin(Pad);
pub struct LatchPin(Pad);
pub struct DataPin(Pad);
pub struct FakeDelay(Pad);

impl ErrorType for ClockPin {
    type Error = FakeError;
}

impl ErrorType for LatchPin {
    type Error = FakeError;
}

impl ErrorType for DataPin {
    type Error = FakeError;
}

impl ClockPin {
    fn drive(&mut self, level: PinState) -> Result<(), FakeError> {
        self.0.check(Line::Clock)?;
        let mut state = self.0 .0.borrow_mut();
        if level == PinState::High && state.clock != Some(PinState::High) {
            state.edges += 1;
        }
        state.clock = Some(level);
        state.events.push(Event::Clock(level));
        Ok(())
    }
}

impl OutputPin for ClockPin {
    fn set_low(&mut self) -> Result<(), FakeError> {
        self.drive(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), FakeError> {
        self.drive(PinState::High)
    }
}

impl LatchPin {
    fn drive(&mut self, level: PinState) -> Result<(), FakeError> {
        self.0.check(Line::Latch)?;
        let mut state = self.0 .0.borrow_mut();
        if level == PinState::Low && state.latch == Some(PinState::High) {
            state.edges = 0;
        }
        state.latch = Some(level);
        state.events.push(Event::Latch(level));
        Ok(())
    }
}

impl OutputPin for LatchPin {
    fn set_low(&mut self) -> Result<(), FakeError> {
        self.drive(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), FakeError> {
        self.drive(PinState::High)
    }
}

impl DataPin {
    fn pressed(&mut self) -> Result<bool, FakeError> {
        self.0.check(Line::Data)?;
        let mut state = self.0 .0.borrow_mut();
        let pressed = match state.edges {
            n @ 0..=11 => state.held & (1 << n) != 0,
            _ => false,
        };
        state.events.push(Event::Read(pressed));
        Ok(pressed)
    }
}

impl InputPin for DataPin {
    fn is_high(&mut self) -> Result<bool, FakeError> {
        self.pressed().map(|pressed| !pressed)
    }

    fn is_low(&mut self) -> Result<bool, FakeError> {
        self.pressed()
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0 .0.borrow_mut().events.push(Event::WaitNs(ns));
    }
}
