//! Reads a PSX-style shift-register pad over a clock/latch/data bus and turns
//! it into a USB HID joystick report.
//!
//! Everything here is hardware-agnostic: pins come in through `embedded-hal`
//! traits and delays through [`DelayNs`](embedded_hal::delay::DelayNs). The
//! RP2040 firmware in `main.rs` supplies the real GPIOs and the USB stack.
//!
//! # Features
//!
//! - **`defmt`**: derive `defmt::Format` and log through defmt
//! - **`firmware`**: build the RP2040 binary
//! - **`compact-wiring`**: firmware uses [`PinMapping::COMPACT`]

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod config;
pub mod descriptor;
pub mod error;
pub mod gpio;
pub mod pins;
pub mod poller;
pub mod report;
pub mod transport;

pub use config::{Config, UsbIdentity};
pub use descriptor::REPORT_DESCRIPTOR;
pub use error::{Error, Result};
pub use gpio::LineDriver;
pub use pins::PinMapping;
pub use poller::Poller;
pub use report::{Buttons, JoystickReport, PadSignal, SampleVector};
pub use transport::{
    describe_host_report, PadReportSource, ReportBytes, ReportGate, ReportKind, ReportSource,
};
