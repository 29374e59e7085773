//! Flipterm - VFD serial terminal firmware
//!
//! Main firmware binary for RP2040 boards driving an IEE FLIP 03600-20-040
//! vacuum fluorescent display. Bytes arrive over UART0, pass through the
//! receive queue and escape decoder, and land in the history session; the
//! display is driven over a bit-banged 8-bit parallel bus.
//!
//! Pin assignment:
//! - UART0: GPIO0 (TX), GPIO1 (RX)
//! - Display data bus D0-D7: GPIO2-GPIO9
//! - Display control: /WR GPIO10, /CS GPIO11, A0 GPIO12, /RD GPIO13
//! - Status LED: GPIO25 (Pico onboard)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use flipterm_core::config::TerminalConfig;
use flipterm_core::session::TerminalSession;
use flipterm_drivers::vfd::Flip03600;

mod bus;
mod channels;
mod tasks;

use crate::bus::RpParallelBus;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// History ring is ~16KB; it lives in a static, not on a task stack
static SESSION: StaticCell<TerminalSession> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Flipterm firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Serial link to the host
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized");

    // Display parallel bus
    let data = [
        Flex::new(p.PIN_2),
        Flex::new(p.PIN_3),
        Flex::new(p.PIN_4),
        Flex::new(p.PIN_5),
        Flex::new(p.PIN_6),
        Flex::new(p.PIN_7),
        Flex::new(p.PIN_8),
        Flex::new(p.PIN_9),
    ];
    let wr = Output::new(p.PIN_10, Level::High);
    let cs = Output::new(p.PIN_11, Level::High);
    let a0 = Output::new(p.PIN_12, Level::Low);
    let rd = Output::new(p.PIN_13, Level::High);

    let bus = RpParallelBus::new(data, wr, cs, a0, rd);
    let vfd = Flip03600::new(bus, embassy_time::Delay);
    info!("Display bus initialized");

    let session = SESSION.init(TerminalSession::new(TerminalConfig::default()));

    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::terminal_task(session, vfd, tx)).unwrap();
    spawner.spawn(tasks::status_task(led)).unwrap();

    info!("All tasks spawned");
}
