/// HID report descriptor for [`JoystickReport`](crate::report::JoystickReport).
///
/// Two signed 8 bit axes, 12 one-bit buttons and 4 bits of constant padding:
/// 4 bytes, no report ID.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- D-pad as X/Y ---
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0xC0, //   End Collection
    //
    // --- Buttons (12) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x0C, //   Usage Maximum (Button 12)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x0C, //   Report Count (12)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Reserved ---
    0x75, 0x01, //   Report Size (1)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x01, //   Input (Constant)
    //
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::JoystickReport;

    /// Walks the short items and sums `size * count` for every Input item.
    fn input_bits(descriptor: &[u8]) -> (usize, i32) {
        let mut bits = 0;
        let mut depth = 0;
        let (mut size, mut count) = (0usize, 0usize);
        let mut i = 0;
        while i < descriptor.len() {
            let prefix = descriptor[i];
            let len = match prefix & 0x03 {
                3 => 4,
                n => n as usize,
            };
            let data = descriptor[i + 1..i + 1 + len]
                .iter()
                .rev()
                .fold(0usize, |acc, &b| (acc << 8) | b as usize);
            match prefix & 0xFC {
                0x74 => size = data,
                0x94 => count = data,
                0x80 => bits += size * count,
                0xA0 => depth += 1,
                0xC0 => depth -= 1,
                _ => {}
            }
            i += 1 + len;
        }
        (bits, depth)
    }

    #[test]
    fn declares_whole_report() {
        let (bits, depth) = input_bits(REPORT_DESCRIPTOR);
        assert_eq!(bits, JoystickReport::SIZE * 8);
        assert_eq!(depth, 0, "unbalanced collections");
    }
}
