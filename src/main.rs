#![no_std]
#![no_main]

mod board;
mod usb;
mod usb_hid;
mod usb_logger;

use defmt_rtt as _;
use panic_probe as _;

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::Delay;
use psx_pad_dongle::{Config, PadReportSource, PinMapping, Poller};

#[cfg(not(feature = "compact-wiring"))]
const MAPPING: PinMapping = PinMapping::DEV_BOARD;
#[cfg(feature = "compact-wiring")]
const MAPPING: PinMapping = PinMapping::COMPACT;

static CONFIG: Config = Config::new(MAPPING);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(embassy_rp::config::Config::default());

    info!("PSX pad dongle starting...");
    if let Err(e) = CONFIG.validate() {
        defmt::panic!("invalid configuration: {}", e);
    }

    let usb = usb::init(p.USB, &CONFIG);

    // Spawn USB tasks
    spawner.spawn(usb::usb_task(usb.device).unwrap());
    spawner.spawn(usb_logger::usb_logger_task(usb.serial).unwrap());

    usb_log!("=== System Initialized ===");

    // SAFETY: called once, and none of the mapping's GPIOs are taken from `p`.
    let board = match unsafe { board::configure(&CONFIG.mapping) } {
        Ok(board) => board,
        Err(e) => defmt::panic!("pad bus setup failed: {}", e),
    };
    let board::Board {
        bus,
        spare_lines: _spare_lines,
    } = board;

    let mapping = &CONFIG.mapping;
    info!(
        "Pad bus: clock=GP{} latch=GP{} data=GP{} spare={}",
        mapping.clock, mapping.latch, mapping.data, mapping.spare_data
    );
    usb_log!(
        "Pad bus: clock=GP{} latch=GP{} data=GP{} ({} spare)",
        mapping.clock,
        mapping.latch,
        mapping.data,
        mapping.spare_data.len()
    );

    let poller = Poller::new(bus, Delay, CONFIG.time_unit_us);
    let mut source = PadReportSource::new(poller);

    info!("Polling pad");
    usb_hid::run(usb.joystick, &mut source).await
}
