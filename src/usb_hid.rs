//! HID joystick interface and the loop that feeds it.
//!
//! The control pipe handler and the report loop share the last report sent
//! (answers GET_REPORT), the host's idle period (SET_IDLE / GET_IDLE), a queue
//! of host reports (SET_REPORT) for the pad side, and a flag raised when a new
//! USB session starts.

use core::cell::Cell;

use defmt::{debug, info, warn};
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Instant;
use embassy_usb::class::hid::{
    self, HidBootProtocol, HidSubclass, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Handler};
use psx_pad_dongle::{
    describe_host_report, Config, JoystickReport, ReportBytes, ReportGate, ReportKind,
    ReportSource, REPORT_DESCRIPTOR,
};
use static_cell::StaticCell;

use crate::usb::UsbDriver;
use crate::usb_log;
use crate::usb_logger::USB_LOG_CHANNEL;

/// Interrupt IN endpoint size.
pub const PACKET_SIZE: usize = 8;

/// Largest host report kept; longer ones are dropped.
const HOST_REPORT_MAX: usize = 64;

static LAST_REPORT: Mutex<CriticalSectionRawMutex, Cell<ReportBytes>> =
    Mutex::new(Cell::new([0; JoystickReport::SIZE]));

static IDLE_MS: Mutex<CriticalSectionRawMutex, Cell<u32>> = Mutex::new(Cell::new(0));

/// Idle period a fresh session starts with.
static DEFAULT_IDLE_MS: Mutex<CriticalSectionRawMutex, Cell<u32>> = Mutex::new(Cell::new(0));

/// Raised on bus reset and on configuration; the report loop then starts its
/// gate over.
static SESSION_RESET: Signal<CriticalSectionRawMutex, ()> = Signal::new();

static HOST_REPORTS: Channel<CriticalSectionRawMutex, HostReport, 4> = Channel::new();

struct HostReport {
    kind: ReportKind,
    id: u8,
    data: heapless::Vec<u8, HOST_REPORT_MAX>,
}

pub fn add_joystick(
    builder: &mut Builder<'static, UsbDriver>,
    config: &Config,
) -> HidWriter<'static, UsbDriver, PACKET_SIZE> {
    static STATE: StaticCell<State> = StaticCell::new();
    static REQUEST_HANDLER: StaticCell<JoystickRequestHandler> = StaticCell::new();

    IDLE_MS.lock(|idle| idle.set(config.idle_ms));
    DEFAULT_IDLE_MS.lock(|idle| idle.set(config.idle_ms));

    let hid_config = hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(REQUEST_HANDLER.init(JoystickRequestHandler)),
        poll_ms: config.poll_ms,
        max_packet_size: PACKET_SIZE as u16,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };

    HidWriter::new(builder, STATE.init(State::new()), hid_config)
}

/// Polls the pad forever and sends whatever the gate lets through.
///
/// A poll blocks the executor for its whole cycle; the loop yields after each
/// one so the USB device task gets to run.
pub async fn run<S: ReportSource>(
    mut writer: HidWriter<'static, UsbDriver, PACKET_SIZE>,
    source: &mut S,
) -> ! {
    let mut gate = ReportGate::new(IDLE_MS.lock(Cell::get));
    let mut last_tick = Instant::now();

    loop {
        writer.ready().await;

        if SESSION_RESET.try_take().is_some() {
            gate.reset(IDLE_MS.lock(Cell::get));
        }

        while let Ok(report) = HOST_REPORTS.try_receive() {
            let mut line: heapless::String<128> = heapless::String::new();
            // Overlong reports are cut off at the line capacity.
            let _ = describe_host_report(&mut line, report.kind, report.id, &report.data);
            let _ = USB_LOG_CHANNEL.try_send(line);
            source.host_report(report.kind, report.id, &report.data);
        }

        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_tick).as_millis();
        last_tick = now;
        gate.set_idle_ms(IDLE_MS.lock(Cell::get));
        gate.elapse(u32::try_from(elapsed_ms).unwrap_or(u32::MAX));

        if let Some(bytes) = gate.poll(source) {
            LAST_REPORT.lock(|last| last.set(bytes));
            if let Err(e) = writer.write(&bytes).await {
                warn!("joystick report dropped: {}", e);
            }
        }

        yield_now().await;
    }
}

struct JoystickRequestHandler;

impl RequestHandler for JoystickRequestHandler {
    fn get_report(&mut self, _id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let report = LAST_REPORT.lock(Cell::get);
        buf.get_mut(..report.len())?.copy_from_slice(&report);
        Some(report.len())
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let (kind, id) = match id {
            ReportId::In(id) => (ReportKind::Input, id),
            ReportId::Out(id) => (ReportKind::Output, id),
            ReportId::Feature(id) => (ReportKind::Feature, id),
        };
        match heapless::Vec::from_slice(data) {
            Ok(data) => {
                if HOST_REPORTS.try_send(HostReport { kind, id, data }).is_err() {
                    warn!("host report queue full, dropping id={}", id);
                }
            }
            Err(()) => warn!("host report id={} too long ({} bytes)", id, data.len()),
        }
        // Accepted either way; nothing on this device consumes host data.
        OutResponse::Accepted
    }

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        Some(IDLE_MS.lock(Cell::get))
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
        debug!("SET_IDLE {} ms", duration_ms);
        IDLE_MS.lock(|idle| idle.set(duration_ms));
    }
}

/// Device lifecycle events. A bus reset or a new configuration puts the idle
/// period back to its default and starts the report gate over.
pub struct DeviceHandler {
    configured: bool,
}

impl DeviceHandler {
    pub const fn new() -> Self {
        Self { configured: false }
    }
}

/// Restores the idle period here, before the host can send SET_IDLE for the
/// new session, and lets the report loop drop its previous report.
fn new_session() {
    IDLE_MS.lock(|idle| idle.set(DEFAULT_IDLE_MS.lock(Cell::get)));
    SESSION_RESET.signal(());
}

impl Handler for DeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        self.configured = false;
        info!("USB {}", if enabled { "enabled" } else { "disabled" });
    }

    fn reset(&mut self) {
        self.configured = false;
        info!("USB bus reset");
        new_session();
    }

    fn addressed(&mut self, addr: u8) {
        self.configured = false;
        info!("USB address set to {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        self.configured = configured;
        if configured {
            info!("USB configured");
            new_session();
            usb_log!("USB configured");
        } else {
            info!("USB deconfigured");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("USB suspended (configured: {})", self.configured);
        } else {
            info!("USB resumed");
        }
    }
}
