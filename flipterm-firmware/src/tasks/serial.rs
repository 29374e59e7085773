//! Serial receive task
//!
//! Producer side of the receive queue: reads whatever the UART has and
//! pushes it byte by byte. The queue absorbs bursts; if the terminal task
//! falls far enough behind, the oldest bytes are overwritten and the loss
//! shows up in the overrun counter.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::{RX_QUEUE, RX_WAKE};

/// Read chunk size; the queue is the real buffer
const READ_BUF_SIZE: usize = 32;

#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut buf = [0u8; READ_BUF_SIZE];
    let mut reported_overruns = 0;

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    RX_QUEUE.push(byte);
                }
                RX_WAKE.signal(());

                let overruns = RX_QUEUE.overruns();
                if overruns != reported_overruns {
                    warn!(
                        "receive queue overran: {} bytes lost total, high water {}",
                        overruns,
                        RX_QUEUE.high_water()
                    );
                    reported_overruns = overruns;
                }
            }
            Ok(_) => {
                // Zero-length read, nothing to do
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
