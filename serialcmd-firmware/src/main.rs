//! serialcmd - Serial Command Peripheral Firmware
//!
//! Turns an RP2040 board into a peripheral that a host drives over UART0
//! with single-byte command ids: pin configuration, digital I/O, uptime and
//! delays.
//!
//! The board announces the protocol version once at startup and then serves
//! requests one at a time for as long as it is powered.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Flex;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use serialcmd_core::{standard_commands, Device, DeviceConfig};
use serialcmd_hal::{ChannelConfig, IoChannel};
use serialcmd_hal_rp2040::{uart_config, FlexGpio, Rp2040Board};
use serialcmd_protocol::{CommandTable, Protocol, Status};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// GPIO0/GPIO1 carry the command channel
const UART_TX_PIN: u8 = 0;
const UART_RX_PIN: u8 = 1;

/// Attach pins to the bank under their GPIO numbers
macro_rules! attach_pins {
    ($gpio:expr, $($num:literal => $pin:expr),* $(,)?) => {
        $(
            if let Err(e) = $gpio.attach($num, Flex::new($pin)) {
                warn!("GPIO{} not attached: {}", $num, e);
            }
        )*
    };
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("serialcmd firmware starting...");

    let p = embassy_rp::init(Default::default());

    let config = unwrap!(DeviceConfig::default()
        .with_reserved_pin(UART_TX_PIN)
        .and_then(|config| config.with_reserved_pin(UART_RX_PIN)));
    if let Err(e) = config.validate() {
        // Keep serving; every pin command will simply be rejected
        error!("Invalid device config: {}", e);
    }

    // Command channel, 8N1 at the configured speed
    let line = uart_config(&ChannelConfig::with_baudrate(config.baudrate));
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, line);
    let channel = IoChannel::new(uart.into_buffered(Irqs, tx_buf, rx_buf));
    info!("UART0 ready at {} baud", config.baudrate);

    // Pins 2..20 of the reference pinout; GPIO0/1 stay with the UART
    let mut gpio = FlexGpio::new();
    attach_pins!(gpio,
        2 => p.PIN_2, 3 => p.PIN_3, 4 => p.PIN_4, 5 => p.PIN_5,
        6 => p.PIN_6, 7 => p.PIN_7, 8 => p.PIN_8, 9 => p.PIN_9,
        10 => p.PIN_10, 11 => p.PIN_11, 12 => p.PIN_12, 13 => p.PIN_13,
        14 => p.PIN_14, 15 => p.PIN_15, 16 => p.PIN_16, 17 => p.PIN_17,
        18 => p.PIN_18, 19 => p.PIN_19,
    );
    info!("{} GPIO pins attached", gpio.attached_count());

    let version = config.version;
    let device = Device::new(Rp2040Board::new(gpio), config);

    let entries = standard_commands::<_, Rp2040Board>();
    let table = unwrap!(CommandTable::new(&entries));
    for command in table.iter() {
        debug!("command {=u8}: {=str}", command.id, command.name);
    }

    let mut protocol = Protocol::new(channel, table, device);
    if let Err(e) = protocol.begin(version) {
        warn!("Version announcement failed: {}", e);
    }
    info!("Serving, protocol version {=u8}", version);

    loop {
        match protocol.pull() {
            Ok(served) => {
                if let Status::Error(code) = served.status {
                    debug!("Command {=u8} answered {}", served.id, code);
                }
            }
            Err(e) => {
                warn!("UART error: {}", e);
            }
        }
    }
}
