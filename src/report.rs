//! Turning the pad's 12 shifted-out bits into a joystick report.
//!
//! The pad shifts its state out in a fixed order. Each position either sets a
//! button bit or pins one axis to an end stop:
//!
//! | pos | signal   | effect   |
//! |-----|----------|----------|
//! | 0   | cross    | button   |
//! | 1   | square   | button   |
//! | 2   | select   | button   |
//! | 3   | start    | button   |
//! | 4   | up       | Y = -127 |
//! | 5   | down     | Y = 127  |
//! | 6   | left     | X = -127 |
//! | 7   | right    | X = 127  |
//! | 8   | circle   | button   |
//! | 9   | triangle | button   |
//! | 10  | l1       | button   |
//! | 11  | r1       | button   |
//!
//! Axis effects are applied in position order and simply overwrite, so with
//! both directions held, down wins over up and right wins over left.

use bitflags::bitflags;

/// Axis end stop; the report never uses -128.
pub const AXIS_MAX: i8 = 127;
pub const AXIS_MIN: i8 = -AXIS_MAX;

bitflags! {
    /// Button mask as it goes on the wire. Bits 12..16 are reserved and
    /// always zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        const SQUARE = 1 << 0;
        const CROSS = 1 << 1;
        const CIRCLE = 1 << 2;
        const TRIANGLE = 1 << 3;
        const L1 = 1 << 4;
        const R1 = 1 << 5;
        const L2 = 1 << 6;
        const R2 = 1 << 7;
        const SELECT = 1 << 8;
        const START = 1 << 9;
        const L3 = 1 << 10;
        const R3 = 1 << 11;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Buttons {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "Buttons({=u16:#x})", self.bits())
    }
}

/// One position in the pad's shift order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PadSignal {
    Cross = 0,
    Square,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    Circle,
    Triangle,
    L1,
    R1,
}

/// What a pressed [`PadSignal`] does to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Press(Buttons),
    SetX(i8),
    SetY(i8),
}

impl PadSignal {
    pub const COUNT: usize = 12;

    /// The order bits come off the data line after the latch drops.
    pub const SHIFT_ORDER: [PadSignal; Self::COUNT] = [
        PadSignal::Cross,
        PadSignal::Square,
        PadSignal::Select,
        PadSignal::Start,
        PadSignal::Up,
        PadSignal::Down,
        PadSignal::Left,
        PadSignal::Right,
        PadSignal::Circle,
        PadSignal::Triangle,
        PadSignal::L1,
        PadSignal::R1,
    ];

    #[inline]
    pub const fn position(self) -> usize {
        self as usize
    }

    pub const fn effect(self) -> Effect {
        match self {
            PadSignal::Cross => Effect::Press(Buttons::CROSS),
            PadSignal::Square => Effect::Press(Buttons::SQUARE),
            PadSignal::Select => Effect::Press(Buttons::SELECT),
            PadSignal::Start => Effect::Press(Buttons::START),
            PadSignal::Up => Effect::SetY(AXIS_MIN),
            PadSignal::Down => Effect::SetY(AXIS_MAX),
            PadSignal::Left => Effect::SetX(AXIS_MIN),
            PadSignal::Right => Effect::SetX(AXIS_MAX),
            PadSignal::Circle => Effect::Press(Buttons::CIRCLE),
            PadSignal::Triangle => Effect::Press(Buttons::TRIANGLE),
            PadSignal::L1 => Effect::Press(Buttons::L1),
            PadSignal::R1 => Effect::Press(Buttons::R1),
        }
    }
}

/// The bits sampled during one poll, bit `n` set when position `n` read low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleVector(u16);

impl SampleVector {
    const MASK: u16 = (1 << PadSignal::COUNT) - 1;

    /// Nothing pressed; also what a disconnected pad reads as.
    pub const RELEASED: Self = Self(0);

    /// Bits above position 11 are dropped.
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_pressed(self, signal: PadSignal) -> bool {
        self.0 & (1 << signal.position()) != 0
    }

    #[inline]
    pub fn set(&mut self, signal: PadSignal, pressed: bool) {
        let bit = 1 << signal.position();
        if pressed {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    /// Pressed signals in shift order.
    pub fn pressed(self) -> impl Iterator<Item = PadSignal> {
        PadSignal::SHIFT_ORDER
            .into_iter()
            .filter(move |&signal| self.is_pressed(signal))
    }
}

/// Input report payload: `[x, y, buttons_lo, buttons_hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    pub x: i8,
    pub y: i8,
    pub buttons: Buttons,
}

impl JoystickReport {
    /// Size of the report on the wire, in bytes.
    pub const SIZE: usize = 4;

    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            x: 0,
            y: 0,
            buttons: Buttons::empty(),
        }
    }

    /// Back to centred axes with no buttons.
    pub fn clear(&mut self) {
        *self = Self::neutral();
    }

    /// Applies every pressed position in shift order on top of the current
    /// state. Callers wanting a fresh report start from [`Self::neutral`].
    pub fn apply(&mut self, samples: SampleVector) {
        for signal in samples.pressed() {
            match signal.effect() {
                Effect::Press(button) => self.buttons |= button,
                Effect::SetX(x) => self.x = x,
                Effect::SetY(y) => self.y = y,
            }
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let [lo, hi] = self.buttons.bits().to_le_bytes();
        [self.x as u8, self.y as u8, lo, hi]
    }
}

impl From<SampleVector> for JoystickReport {
    fn from(samples: SampleVector) -> Self {
        build(samples)
    }
}

/// Builds a fresh report from one poll's samples.
pub fn build(samples: SampleVector) -> JoystickReport {
    let mut report = JoystickReport::neutral();
    report.apply(samples);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(signal: PadSignal) -> SampleVector {
        SampleVector::from_bits(1 << signal.position())
    }

    #[test]
    fn shift_order_matches_positions() {
        for (pos, signal) in PadSignal::SHIFT_ORDER.iter().enumerate() {
            assert_eq!(signal.position(), pos);
        }
    }

    #[test]
    fn neutral_baseline() {
        let report = build(SampleVector::RELEASED);
        assert_eq!(report, JoystickReport::neutral());
        assert_eq!(report.to_bytes(), [0, 0, 0, 0]);
    }

    #[test]
    fn cross_alone() {
        let report = build(only(PadSignal::Cross));
        assert_eq!(report.buttons, Buttons::CROSS);
        assert_eq!((report.x, report.y), (0, 0));
    }

    #[test]
    fn up_alone() {
        let report = build(only(PadSignal::Up));
        assert_eq!(report.y, -127);
        assert_eq!(report.x, 0);
        assert!(report.buttons.is_empty());
    }

    #[test]
    fn later_direction_wins() {
        let mut samples = SampleVector::RELEASED;
        samples.set(PadSignal::Up, true);
        samples.set(PadSignal::Down, true);
        assert_eq!(build(samples).y, 127);

        let mut samples = SampleVector::RELEASED;
        samples.set(PadSignal::Left, true);
        samples.set(PadSignal::Right, true);
        assert_eq!(build(samples).x, 127);
    }

    #[test]
    fn buttons_ignore_direction_bits() {
        let samples = SampleVector::from_bits(0b1111_0000);
        let report = build(samples);
        assert!(report.buttons.is_empty());
        assert_eq!((report.x, report.y), (127, 127));
    }

    #[test]
    fn every_sample_vector() {
        let press_bits = [
            (PadSignal::Cross, Buttons::CROSS),
            (PadSignal::Square, Buttons::SQUARE),
            (PadSignal::Select, Buttons::SELECT),
            (PadSignal::Start, Buttons::START),
            (PadSignal::Circle, Buttons::CIRCLE),
            (PadSignal::Triangle, Buttons::TRIANGLE),
            (PadSignal::L1, Buttons::L1),
            (PadSignal::R1, Buttons::R1),
        ];

        for bits in 0..(1u16 << PadSignal::COUNT) {
            let samples = SampleVector::from_bits(bits);
            let report = build(samples);

            let y = if bits & (1 << 5) != 0 {
                127
            } else if bits & (1 << 4) != 0 {
                -127
            } else {
                0
            };
            let x = if bits & (1 << 7) != 0 {
                127
            } else if bits & (1 << 6) != 0 {
                -127
            } else {
                0
            };
            let buttons = press_bits
                .iter()
                .filter(|(signal, _)| bits & (1 << signal.position()) != 0)
                .fold(Buttons::empty(), |acc, (_, b)| acc | *b);

            assert_eq!(report, JoystickReport { x, y, buttons }, "bits {bits:#014b}");
            assert_eq!(report.to_bytes()[3] & 0xf0, 0, "reserved bits set");
            assert_eq!(report, build(samples));
        }
    }

    #[test]
    fn from_bits_masks_reserved() {
        assert_eq!(SampleVector::from_bits(0xf001).bits(), 0x0001);
    }

    #[test]
    fn set_and_clear_sample() {
        let mut samples = SampleVector::RELEASED;
        samples.set(PadSignal::R1, true);
        assert!(samples.is_pressed(PadSignal::R1));
        assert_eq!(samples.bits(), 1 << 11);
        samples.set(PadSignal::R1, false);
        assert_eq!(samples, SampleVector::RELEASED);
    }

    #[test]
    fn wire_layout() {
        let report = JoystickReport {
            x: -127,
            y: 127,
            buttons: Buttons::CROSS | Buttons::START,
        };
        assert_eq!(report.to_bytes(), [0x81, 0x7f, 0x02, 0x02]);
    }

    #[test]
    fn clear_drops_previous_state() {
        let mut report = build(SampleVector::from_bits(0x0fff));
        report.clear();
        assert_eq!(report, JoystickReport::neutral());
    }
}
