//! Periodic log status report

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::config::STATUS_INTERVAL_S;
use crate::log::with_log;

#[embassy_executor::task]
pub async fn status_task() {
    info!("Status task started");

    let mut ticker = Ticker::every(Duration::from_secs(STATUS_INTERVAL_S));

    loop {
        ticker.next().await;

        let Some(status) = with_log(|log| log.status()) else {
            continue;
        };

        info!(
            "Log: {:?}, cursor={}, used={}/{}, wrapped={}, full={}",
            status.presence,
            status.write_cursor,
            status.used_size,
            status.capacity,
            status.has_wrapped,
            status.is_full()
        );
    }
}
