//! Terminal task
//!
//! Consumer side: drains the receive queue, feeds the escape decoder, and
//! applies session reactions to the display. Also owns the escape deadline
//! - the decoder asks for arm/disarm per byte, and here that maps onto a
//! timed wait whenever the queue runs dry mid-sequence.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{with_timeout, Duration, TimeoutError, Timer};
use embedded_io_async::Write;

use flipterm_core::decode::{EscapeDecoder, TerminalInput};
use flipterm_core::session::{Reaction, TerminalSession};
use flipterm_core::traits::display::{DisplayTransport, DisplayTransportExt};
use flipterm_drivers::vfd::Flip03600;

use crate::bus::RpParallelBus;
use crate::channels::{RX_QUEUE, RX_WAKE};

/// Concrete display transport for this board
pub type Vfd = Flip03600<RpParallelBus, embassy_time::Delay>;

#[embassy_executor::task]
pub async fn terminal_task(
    session: &'static mut TerminalSession,
    mut vfd: Vfd,
    mut tx: BufferedUartTx,
) {
    info!("Terminal task started");

    if let Err(e) = vfd.enable().and_then(|()| vfd.clear()) {
        warn!("display init failed: {:?}", e);
    }

    let escape_deadline = Duration::from_millis(u64::from(session.config().escape_timeout_ms));
    let replay_delay = Duration::from_millis(u64::from(session.config().replay_delay_ms));
    let mut decoder = EscapeDecoder::new();

    loop {
        let byte = match RX_QUEUE.pop() {
            Some(byte) => byte,
            None => {
                if decoder.mid_sequence() {
                    // Deadline armed: either the rest of the sequence
                    // arrives or this was a lone ESC
                    match with_timeout(escape_deadline, RX_WAKE.wait()).await {
                        Ok(()) => {}
                        Err(TimeoutError) => {
                            if let Some(input) = decoder.deadline_elapsed() {
                                apply(session, &mut vfd, &mut tx, input, replay_delay).await;
                            }
                        }
                    }
                } else {
                    RX_WAKE.wait().await;
                }
                continue;
            }
        };

        // A new byte always ends the previous wait; the returned TimerOp is
        // implicit here because the deadline is re-derived from
        // `mid_sequence` on the next empty poll
        let decoded = decoder.feed(byte);
        if let Some(input) = decoded.input {
            apply(session, &mut vfd, &mut tx, input, replay_delay).await;
        }
    }
}

/// Apply one decoded input to the session and the display
async fn apply(
    session: &mut TerminalSession,
    vfd: &mut Vfd,
    tx: &mut BufferedUartTx,
    input: TerminalInput,
    replay_delay: Duration,
) {
    match input {
        TerminalInput::Unrecognized(byte) => {
            debug!("unrecognized escape sequence key {=u8:x}", byte);
        }
        TerminalInput::Byte(byte) => {
            // Informational echo back to the host
            tx.write_all(&[byte]).await.ok();
        }
        _ => {}
    }

    match session.on_input(input) {
        Reaction::None => {}
        Reaction::Render(ops) => {
            if let Err(e) = vfd.run_frame(&ops) {
                warn!("display write failed: {:?}", e);
            }
        }
        Reaction::Forward(byte) => {
            if let Err(e) = vfd.write_byte(byte) {
                warn!("display write failed: {:?}", e);
            }
        }
        Reaction::Replay(replay) => {
            debug!("replaying {} characters", replay.total_steps());
            for frame in replay {
                if let Err(e) = vfd.run_frame(&frame) {
                    warn!("display write failed: {:?}", e);
                    break;
                }
                Timer::after(replay_delay).await;
            }
        }
    }
}
