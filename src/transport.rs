//! The seam between the pad and the USB HID class.
//!
//! The USB side asks a [`ReportSource`] for reports and hands it whatever the
//! host sends back. [`ReportGate`] sits in between and decides which reports
//! actually go out: a report is sent when it differs from the last one sent,
//! when the source forces it, or when the host's idle period runs out.

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::poller::Poller;
use crate::report::JoystickReport;

pub type ReportBytes = [u8; JoystickReport::SIZE];

/// HID report type of a report coming from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    Input,
    Output,
    Feature,
}

impl ReportKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportKind::Input => "input",
            ReportKind::Output => "output",
            ReportKind::Feature => "feature",
        }
    }
}

/// Writes a host report as one debug line: type, id and the raw bytes in hex.
pub fn describe_host_report<W: Write>(
    out: &mut W,
    kind: ReportKind,
    report_id: u8,
    data: &[u8],
) -> fmt::Result {
    write!(
        out,
        "Host {} report id={:#04x} len={}:",
        kind.as_str(),
        report_id,
        data.len()
    )?;
    for byte in data {
        write!(out, " {:02x}", byte)?;
    }
    Ok(())
}

/// Callbacks the HID class drives.
pub trait ReportSource {
    /// Produces the current report and whether it must be sent even when it
    /// matches the previous one.
    fn create_report(&mut self) -> (JoystickReport, bool);

    /// A report sent by the host.
    fn host_report(&mut self, kind: ReportKind, report_id: u8, data: &[u8]);
}

/// [`ReportSource`] backed by a live pad.
pub struct PadReportSource<C, L, D, T> {
    poller: Poller<C, L, D, T>,
    report: JoystickReport,
}

impl<C, L, D, T> PadReportSource<C, L, D, T>
where
    C: OutputPin,
    L: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    pub fn new(poller: Poller<C, L, D, T>) -> Self {
        Self {
            poller,
            report: JoystickReport::neutral(),
        }
    }
}

impl<C, L, D, T> ReportSource for PadReportSource<C, L, D, T>
where
    C: OutputPin,
    L: OutputPin,
    D: InputPin,
    T: DelayNs,
{
    fn create_report(&mut self) -> (JoystickReport, bool) {
        if let Err(e) = self.poller.poll(&mut self.report) {
            warn!("pad poll failed: {}", e);
            self.report.clear();
        }
        (self.report, false)
    }

    fn host_report(&mut self, kind: ReportKind, report_id: u8, data: &[u8]) {
        // Nothing on the pad to drive.
        info!(
            "host {} report id={=u8} len={=usize}: {=[u8]:#x}",
            kind.as_str(),
            report_id,
            data.len(),
            data
        );
    }
}

/// Duplicate suppression and idle-rate resend for the IN endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportGate {
    previous: Option<ReportBytes>,
    idle_ms: u32,
    idle_remaining_ms: u32,
}

impl ReportGate {
    /// `idle_ms` of 0 disables the idle resend.
    pub const fn new(idle_ms: u32) -> Self {
        Self {
            previous: None,
            idle_ms,
            idle_remaining_ms: idle_ms,
        }
    }

    pub fn idle_ms(&self) -> u32 {
        self.idle_ms
    }

    /// Applies a host SET_IDLE. The countdown restarts only when the period
    /// actually changes.
    pub fn set_idle_ms(&mut self, idle_ms: u32) {
        if idle_ms != self.idle_ms {
            debug!("idle period {=u32} -> {=u32} ms", self.idle_ms, idle_ms);
            self.idle_ms = idle_ms;
            self.idle_remaining_ms = idle_ms;
        }
    }

    /// Starts over for a new USB session: nothing counts as sent yet, the idle
    /// period is back to `idle_ms` and its countdown has already run out, so
    /// the next poll goes out whatever it holds.
    pub fn reset(&mut self, idle_ms: u32) {
        debug!("report gate reset, idle {=u32} ms", idle_ms);
        self.previous = None;
        self.idle_ms = idle_ms;
        self.idle_remaining_ms = 0;
    }

    /// Counts the idle timer down by `ms`.
    pub fn elapse(&mut self, ms: u32) {
        self.idle_remaining_ms = self.idle_remaining_ms.saturating_sub(ms);
    }

    /// The last report that went out, if any.
    pub fn previous(&self) -> Option<&ReportBytes> {
        self.previous.as_ref()
    }

    /// Asks `source` for a report and returns its bytes if they must be sent.
    pub fn poll<S: ReportSource + ?Sized>(&mut self, source: &mut S) -> Option<ReportBytes> {
        let (report, force_send) = source.create_report();
        let bytes = report.to_bytes();

        let changed = self.previous != Some(bytes);
        let idle_expired = self.idle_ms != 0 && self.idle_remaining_ms == 0;
        if !(force_send || changed || idle_expired) {
            return None;
        }

        if changed {
            trace!("report changed: {}", report);
        }
        self.previous = Some(bytes);
        self.idle_remaining_ms = self.idle_ms;
        Some(bytes)
    }
}
