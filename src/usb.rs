//! Composite USB device: the HID joystick plus a CDC-ACM debug port.

use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_rp::Peri;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::class::hid::HidWriter;
use embassy_usb::{Builder, UsbDevice};
use psx_pad_dongle::Config;
use static_cell::StaticCell;

use crate::{usb_hid, usb_logger};

pub type UsbDriver = Driver<'static, USB>;

bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

pub struct Usb {
    pub device: UsbDevice<'static, UsbDriver>,
    pub joystick: HidWriter<'static, UsbDriver, { usb_hid::PACKET_SIZE }>,
    pub serial: CdcAcmClass<'static, UsbDriver>,
}

pub fn init(usb_peripheral: Peri<'static, USB>, config: &Config) -> Usb {
    let driver = Driver::new(usb_peripheral, Irqs);

    let mut usb_config = embassy_usb::Config::new(config.usb.vid, config.usb.pid);
    usb_config.manufacturer = Some(config.usb.manufacturer);
    usb_config.product = Some(config.usb.product);
    usb_config.serial_number = Some(config.usb.serial_number);
    usb_config.max_power = config.usb.max_power;
    usb_config.max_packet_size_0 = 64;

    // CDC next to HID needs interface association descriptors.
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static DEVICE_HANDLER: StaticCell<usb_hid::DeviceHandler> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [],
        CONTROL_BUF.init([0; 64]),
    );
    builder.handler(DEVICE_HANDLER.init(usb_hid::DeviceHandler::new()));

    let joystick = usb_hid::add_joystick(&mut builder, config);
    let serial = usb_logger::add_serial(&mut builder);

    Usb {
        device: builder.build(),
        joystick,
        serial,
    }
}

/// USB device task - must be spawned
#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    usb.run().await
}
