// USB Serial Logger
// Human-readable event log on the CDC-ACM half of the composite device

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::Builder;
use static_cell::StaticCell;

use crate::usb::UsbDriver;

/// USB logger message channel (capacity 16 messages, 128 bytes each)
pub static USB_LOG_CHANNEL: Channel<CriticalSectionRawMutex, heapless::String<128>, 16> =
    Channel::new();

/// Add the CDC-ACM serial interface to the device
pub fn add_serial(builder: &mut Builder<'static, UsbDriver>) -> CdcAcmClass<'static, UsbDriver> {
    static STATE: StaticCell<State> = StaticCell::new();
    CdcAcmClass::new(builder, STATE.init(State::new()), 64)
}

/// USB logger task - reads from channel and writes to USB serial
#[embassy_executor::task]
pub async fn usb_logger_task(mut class: CdcAcmClass<'static, UsbDriver>) -> ! {
    loop {
        // Wait for a terminal to open the port
        class.wait_connection().await;

        let _ = class
            .write_packet(b"\r\n=== PSX Pad Dongle ===\r\n")
            .await;
        let _ = class
            .write_packet(b"USB Serial Logger Active\r\n\r\n")
            .await;

        // Process log messages until disconnected
        loop {
            let msg = USB_LOG_CHANNEL.receive().await;

            // Lines longer than a packet go out in packet-sized pieces
            let mut failed = false;
            for chunk in msg.as_bytes().chunks(64) {
                if class.write_packet(chunk).await.is_err() {
                    failed = true;
                    break;
                }
            }
            if failed || class.write_packet(b"\r\n").await.is_err() {
                break;
            }
        }
    }
}

/// Log a formatted message to USB serial (non-blocking, dropped when full)
#[macro_export]
macro_rules! usb_log {
    ($($arg:tt)*) => {{
        let mut s: heapless::String<128> = heapless::String::new();
        use core::fmt::Write;
        let _ = write!(&mut s, $($arg)*);
        let _ = $crate::usb_logger::USB_LOG_CHANNEL.try_send(s);
    }};
}
