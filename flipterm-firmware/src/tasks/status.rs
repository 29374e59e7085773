//! Status LED task

use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

/// Heartbeat blink so a wedged firmware is visible at a glance
#[embassy_executor::task]
pub async fn status_task(mut led: Output<'static>) {
    let mut ticker = Ticker::every(Duration::from_millis(500));
    loop {
        led.toggle();
        ticker.next().await;
    }
}
